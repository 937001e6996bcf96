//! shaverify CLI
//!
//! Prove that a local file matches one of the records in a published
//! SHA-256 manifest.
//!
//! The file's full content is hashed with SHA-256 and looked up in a
//! versioned JSON manifest fetched fresh for every request. Filenames and
//! metadata never take part in matching.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use shaverify_cli::source::ManifestLocation;
//! use shaverify_cli::verify::verify;
//!
//! let source = ManifestLocation::parse("https://example.com/manifest.json").into_source();
//! let outcome = verify(Some(Path::new("report.pdf")), source.as_ref());
//! println!("{}", outcome.transcript());
//! ```

pub mod crypto;
pub mod error;
pub mod manifest;
pub mod report;
pub mod source;
pub mod verify;

pub use error::{Result, VerifyError};
pub use manifest::{Manifest, ManifestRecord};
pub use report::{check_status, Severity, Status, StatusBoard, SystemStatus};
pub use source::{load, FileSource, HttpSource, ManifestLocation, ManifestSource};
pub use verify::{lookup, verify, verify_bytes, VerificationOutcome};
