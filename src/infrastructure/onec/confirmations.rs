use async_trait::async_trait;
use chrono::Utc;
use encoding_rs::Encoding;
use std::path::{Path, PathBuf};

use super::codec::decode_confirmations;
use crate::domain::integration::{
  ConfirmationBatch, ConfirmationFile, ConfirmationSource, FileFormat, Integration,
  TransportError,
};

const PROCESSED_DIR: &str = "processed";

/// Reads confirmation files 1C leaves in an integration's import directory
///
/// Handled files are moved to `<import_path>/processed/`; files that fail to
/// parse stay where they are so an operator can inspect them.
pub struct FileConfirmationSource {
  csv_encoding: &'static Encoding,
}

impl FileConfirmationSource {
  pub fn new(csv_encoding: &'static Encoding) -> Self {
    Self { csv_encoding }
  }

  async fn candidates(dir: &Path) -> Result<Vec<(String, PathBuf, FileFormat)>, TransportError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut found = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
      if !entry.file_type().await?.is_file() {
        continue;
      }
      let name = entry.file_name().to_string_lossy().into_owned();
      if name.starts_with('.') {
        continue;
      }
      let format = Path::new(&name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(FileFormat::from_extension);
      if let Some(format) = format {
        found.push((name, entry.path(), format));
      }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found)
  }
}

#[async_trait]
impl ConfirmationSource for FileConfirmationSource {
  async fn pending(&self, integration: &Integration) -> Result<ConfirmationBatch, TransportError> {
    let dir = Path::new(&integration.import_path);
    if !tokio::fs::try_exists(dir).await? {
      tracing::debug!(path = %dir.display(), "Import directory does not exist yet");
      return Ok(ConfirmationBatch::default());
    }

    let mut batch = ConfirmationBatch::default();
    for (name, path, format) in Self::candidates(dir).await? {
      let bytes = tokio::fs::read(&path).await?;
      match decode_confirmations(&bytes, format, self.csv_encoding) {
        Ok(confirmations) => batch.files.push(ConfirmationFile {
          source: name,
          confirmations,
        }),
        Err(reason) => {
          tracing::warn!(file = %name, reason = %reason, "Unreadable confirmation file");
          batch.unreadable.push((name, reason));
        }
      }
    }

    Ok(batch)
  }

  async fn mark_processed(
    &self,
    integration: &Integration,
    source: &str,
  ) -> Result<(), TransportError> {
    let dir = Path::new(&integration.import_path);
    let processed = dir.join(PROCESSED_DIR);
    tokio::fs::create_dir_all(&processed).await?;

    let mut target = processed.join(source);
    if tokio::fs::try_exists(&target).await? {
      target = processed.join(format!("{}_{}", Utc::now().format("%Y%m%dT%H%M%S%3f"), source));
    }

    tokio::fs::rename(dir.join(source), &target).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::integration::{ConfirmationStatus, IntegrationType};
  use crate::test_support::sample_integration;

  fn integration(import_path: &Path) -> Integration {
    sample_integration(
      IntegrationType::FileExport,
      FileFormat::Json,
      None,
      "exports",
      &import_path.display().to_string(),
    )
  }

  #[tokio::test]
  async fn test_reads_supported_files_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
      dir.path().join("b.json"),
      r#"[{"document_number": "INV-2025-03-0002", "status": "rejected"}]"#,
    )
    .unwrap();
    std::fs::write(
      dir.path().join("a.csv"),
      "document_number;status\nINV-2025-03-0001;confirmed\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("c.xml"), "<Confirmations><oops>").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    std::fs::write(dir.path().join(".d.json.tmp"), "ignored").unwrap();
    std::fs::create_dir(dir.path().join("sub.json")).unwrap();

    let source = FileConfirmationSource::new(encoding_rs::UTF_8);
    let batch = source.pending(&integration(dir.path())).await.unwrap();

    let names: Vec<&str> = batch.files.iter().map(|f| f.source.as_str()).collect();
    assert_eq!(names, vec!["a.csv", "b.json"]);
    assert_eq!(
      batch.files[0].confirmations[0].status,
      ConfirmationStatus::Confirmed
    );
    assert_eq!(batch.unreadable.len(), 1);
    assert_eq!(batch.unreadable[0].0, "c.xml");
  }

  #[tokio::test]
  async fn test_missing_directory_yields_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileConfirmationSource::new(encoding_rs::UTF_8);

    let batch = source
      .pending(&integration(&dir.path().join("missing")))
      .await
      .unwrap();
    assert_eq!(batch, ConfirmationBatch::default());
  }

  #[tokio::test]
  async fn test_mark_processed_moves_file() {
    let dir = tempfile::tempdir().unwrap();
    let integration = integration(dir.path());
    let source = FileConfirmationSource::new(encoding_rs::UTF_8);

    std::fs::write(dir.path().join("a.json"), "[]").unwrap();
    source.mark_processed(&integration, "a.json").await.unwrap();
    assert!(!dir.path().join("a.json").exists());
    assert!(dir.path().join("processed").join("a.json").exists());

    // A second file with the same name does not clobber the first
    std::fs::write(dir.path().join("a.json"), "[]").unwrap();
    source.mark_processed(&integration, "a.json").await.unwrap();
    let moved = std::fs::read_dir(dir.path().join("processed"))
      .unwrap()
      .count();
    assert_eq!(moved, 2);

    // Processed files are not picked up again
    let batch = source.pending(&integration).await.unwrap();
    assert!(batch.files.is_empty());
  }
}
