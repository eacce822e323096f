use async_trait::async_trait;
use encoding_rs::Encoding;
use std::path::PathBuf;

use super::codec::encode_export;
use crate::domain::integration::{
  DeliveryReceipt, DocumentTransport, ExportPayload, FileFormat, IntegrationType, SyncStatus,
  TransportError,
};

/// Drops export files into a directory watched by 1C
///
/// Files are written under a temporary name and renamed into place so 1C
/// never picks up a partial file.
pub struct FileTransport {
  export_dir: PathBuf,
  format: FileFormat,
  csv_encoding: &'static Encoding,
}

impl FileTransport {
  pub fn new(export_dir: impl Into<PathBuf>, format: FileFormat, csv_encoding: &'static Encoding) -> Self {
    Self {
      export_dir: export_dir.into(),
      format,
      csv_encoding,
    }
  }
}

#[async_trait]
impl DocumentTransport for FileTransport {
  async fn deliver(&self, payload: &ExportPayload) -> Result<DeliveryReceipt, TransportError> {
    let contents = encode_export(payload, self.format, self.csv_encoding)?;

    tokio::fs::create_dir_all(&self.export_dir).await?;

    let file_name = format!("{}.{}", payload.file_stem(), self.format.extension());
    let target = self.export_dir.join(&file_name);
    let staging = self.export_dir.join(format!(".{}.tmp", file_name));

    tokio::fs::write(&staging, &contents).await?;
    if let Err(e) = tokio::fs::rename(&staging, &target).await {
      let _ = tokio::fs::remove_file(&staging).await;
      return Err(e.into());
    }

    let file_path = target.display().to_string();
    tracing::info!(
      document_number = %payload.document_number,
      path = %file_path,
      "Export file written"
    );

    Ok(DeliveryReceipt {
      status: SyncStatus::Pending,
      message: format!("Document exported to {}", file_path),
      external_id: None,
      response_data: Some(serde_json::json!({
        "file_path": file_path,
        "format": self.format.as_str(),
        "bytes": contents.len(),
      })),
      file_path: Some(file_path),
    })
  }

  fn kind(&self) -> IntegrationType {
    IntegrationType::FileExport
  }
}
