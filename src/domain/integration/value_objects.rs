use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Unknown integration type: {0}")]
  UnknownIntegrationType(String),
  #[error("Unknown file format: {0}")]
  UnknownFileFormat(String),
  #[error("Unknown sync value: {0}")]
  UnknownSyncValue(String),
  #[error("Invalid integration name: {0}")]
  InvalidName(String),
  #[error("Invalid endpoint URL: {0}")]
  InvalidEndpoint(String),
  #[error("Sync interval must be at least one minute")]
  InvalidSyncInterval,
}

/// Generates `as_str`, `FromStr` and `Display` for a string-backed enum
macro_rules! string_enum {
  ($name:ident, $err:ident, { $($variant:ident => $text:literal),+ $(,)? }) => {
    impl $name {
      pub fn as_str(&self) -> &'static str {
        match self {
          $($name::$variant => $text,)+
        }
      }
    }

    impl FromStr for $name {
      type Err = ValueObjectError;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
          $($text => Ok($name::$variant),)+
          _ => Err(ValueObjectError::$err(s.to_string())),
        }
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
      }
    }
  };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationType {
  Webservice,
  FileExport,
  Hybrid,
}

string_enum!(IntegrationType, UnknownIntegrationType, {
  Webservice => "webservice",
  FileExport => "file_export",
  Hybrid => "hybrid",
});

impl IntegrationType {
  pub fn requires_endpoint(&self) -> bool {
    matches!(self, IntegrationType::Webservice | IntegrationType::Hybrid)
  }

  /// Whether confirmations can be picked up from the import directory
  pub fn reads_files(&self) -> bool {
    matches!(self, IntegrationType::FileExport | IntegrationType::Hybrid)
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
  Xml,
  #[default]
  Json,
  Csv,
}

string_enum!(FileFormat, UnknownFileFormat, {
  Xml => "xml",
  Json => "json",
  Csv => "csv",
});

impl FileFormat {
  pub fn extension(&self) -> &'static str {
    self.as_str()
  }

  pub fn from_extension(ext: &str) -> Option<Self> {
    ext.parse().ok()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncType {
  Export,
  Import,
  Update,
}

string_enum!(SyncType, UnknownSyncValue, {
  Export => "export",
  Import => "import",
  Update => "update",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
  Success,
  Failed,
  Pending,
}

string_enum!(SyncStatus, UnknownSyncValue, {
  Success => "success",
  Failed => "failed",
  Pending => "pending",
});

impl SyncStatus {
  /// Delivered or handed off for pickup
  pub fn is_accepted(&self) -> bool {
    !matches!(self, SyncStatus::Failed)
  }
}

/// Outcome reported by 1C for an exported document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationStatus {
  Confirmed,
  Rejected,
}

string_enum!(ConfirmationStatus, UnknownSyncValue, {
  Confirmed => "confirmed",
  Rejected => "rejected",
});

/// Accepts only absolute http(s) URLs with a host
pub fn validate_endpoint(url: &str) -> Result<String, ValueObjectError> {
  let trimmed = url.trim();
  let rest = trimmed
    .strip_prefix("https://")
    .or_else(|| trimmed.strip_prefix("http://"))
    .ok_or_else(|| ValueObjectError::InvalidEndpoint(url.to_string()))?;

  let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
  if host.is_empty() || trimmed.chars().any(char::is_whitespace) {
    return Err(ValueObjectError::InvalidEndpoint(url.to_string()));
  }

  Ok(trimmed.to_string())
}
