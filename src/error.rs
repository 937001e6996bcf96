//! Error types for manifest verification.

use thiserror::Error;

/// Verification errors with specific exit codes.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("Could not read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest not reachable (HTTP {status})")]
    ManifestStatus { status: u16 },

    #[error("Manifest not reachable: {reason}")]
    ManifestUnreachable { reason: String },

    #[error("Manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "Manifest version {} is not supported",
        .version.as_deref().unwrap_or("<missing>")
    )]
    SchemaUnsupported { version: Option<String> },

    #[error("Manifest has no \"items\" array")]
    MissingItems,

    #[error("SHA-256 is not available in this environment")]
    CryptoUnsupported,
}

impl VerifyError {
    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            VerifyError::NoFileSelected => 2,
            VerifyError::Io(_) => 2,
            VerifyError::ManifestStatus { .. } => 3,
            VerifyError::ManifestUnreachable { .. } => 3,
            VerifyError::Json(_) => 4,
            VerifyError::SchemaUnsupported { .. } => 4,
            VerifyError::MissingItems => 4,
            VerifyError::CryptoUnsupported => 5,
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_in_message() {
        let err = VerifyError::ManifestStatus { status: 404 };
        assert_eq!(err.to_string(), "Manifest not reachable (HTTP 404)");
    }

    #[test]
    fn test_missing_version_message() {
        let err = VerifyError::SchemaUnsupported { version: None };
        assert_eq!(err.to_string(), "Manifest version <missing> is not supported");

        let err = VerifyError::SchemaUnsupported {
            version: Some("v2".to_string()),
        };
        assert_eq!(err.to_string(), "Manifest version v2 is not supported");
    }

    #[test]
    fn test_exit_codes_group_by_class() {
        assert_eq!(VerifyError::NoFileSelected.exit_code(), 2);
        assert_eq!(VerifyError::MissingItems.exit_code(), 4);
        assert_eq!(VerifyError::CryptoUnsupported.exit_code(), 5);
    }
}
