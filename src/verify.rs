//! Core verification logic.
//!
//! One verification request: check input, digest the file, load the
//! manifest, look the digest up. Every failure is folded into a
//! [`VerificationOutcome`] so a request never aborts the caller.

use std::path::Path;

use serde::Serialize;

use crate::crypto::{sha256_file, sha256_hex};
use crate::error::{Result, VerifyError};
use crate::manifest::{Manifest, ManifestRecord};
use crate::source::{load, ManifestSource};

/// Result of one verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// The file matches a published record.
    Valid {
        record: ManifestRecord,
        digest: String,
    },
    /// No record carries this digest.
    NotFound { digest: String },
    /// Nothing usable was supplied.
    InputError { reason: String },
    /// The manifest could not be retrieved.
    TransportError { reason: String },
    /// The manifest was retrieved but does not conform.
    SchemaError { reason: String },
    /// SHA-256 is unavailable; nothing can be verified.
    CryptoUnsupported { reason: String },
}

impl VerificationOutcome {
    /// Digest computed for the file, when one was computed.
    pub fn digest(&self) -> Option<&str> {
        match self {
            VerificationOutcome::Valid { digest, .. }
            | VerificationOutcome::NotFound { digest } => Some(digest),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid { .. })
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            VerificationOutcome::Valid { .. } => 0,
            VerificationOutcome::NotFound { .. } => 1,
            VerificationOutcome::InputError { .. } => 2,
            VerificationOutcome::TransportError { .. } => 3,
            VerificationOutcome::SchemaError { .. } => 4,
            VerificationOutcome::CryptoUnsupported { .. } => 5,
        }
    }
}

impl From<VerifyError> for VerificationOutcome {
    fn from(err: VerifyError) -> Self {
        let reason = err.to_string();
        match err {
            VerifyError::NoFileSelected | VerifyError::Io(_) => {
                VerificationOutcome::InputError { reason }
            }
            VerifyError::ManifestStatus { .. } | VerifyError::ManifestUnreachable { .. } => {
                VerificationOutcome::TransportError { reason }
            }
            VerifyError::Json(_)
            | VerifyError::SchemaUnsupported { .. }
            | VerifyError::MissingItems => VerificationOutcome::SchemaError { reason },
            VerifyError::CryptoUnsupported => VerificationOutcome::CryptoUnsupported { reason },
        }
    }
}

/// Verify a file against the manifest held by `source`.
///
/// A missing file is rejected before anything is hashed or fetched.
pub fn verify(file: Option<&Path>, source: &dyn ManifestSource) -> VerificationOutcome {
    let outcome = try_verify(file, source).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "verification failed");
        VerificationOutcome::from(err)
    });
    tracing::info!(exit_code = outcome.exit_code(), digest = ?outcome.digest(), "verification finished");
    outcome
}

fn try_verify(file: Option<&Path>, source: &dyn ManifestSource) -> Result<VerificationOutcome> {
    let path = file.ok_or(VerifyError::NoFileSelected)?;

    let digest = sha256_file(path)?;
    tracing::debug!(file = %path.display(), %digest, "file digested");

    let manifest = load(source)?;
    Ok(lookup(&digest, &manifest))
}

/// Verify in-memory content against an already-loaded manifest.
pub fn verify_bytes(content: &[u8], manifest: &Manifest) -> VerificationOutcome {
    lookup(&sha256_hex(content), manifest)
}

/// Match a computed digest against the manifest. First match wins.
pub fn lookup(digest: &str, manifest: &Manifest) -> VerificationOutcome {
    match manifest.find(digest) {
        Some(record) => VerificationOutcome::Valid {
            record: record.clone(),
            digest: digest.to_string(),
        },
        None => VerificationOutcome::NotFound {
            digest: digest.to_string(),
        },
    }
}
