//! Manifest retrieval.
//!
//! The manifest is the only source of truth and may change between
//! verification attempts, so every load performs exactly one fresh read and
//! nothing is cached.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::{Result, VerifyError};
use crate::manifest::Manifest;

/// Fixed relative location of the manifest.
pub const DEFAULT_MANIFEST: &str = "manifest.json";

/// Somewhere a manifest document can be read from.
#[cfg_attr(test, mockall::automock)]
pub trait ManifestSource {
    /// Read the raw manifest document.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the document cannot be retrieved.
    fn fetch(&self) -> Result<Vec<u8>>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// Where the manifest lives, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLocation {
    Url(String),
    Path(PathBuf),
}

impl ManifestLocation {
    /// `http://` and `https://` locations are URLs, anything else is a path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ManifestLocation::Url(location.to_string())
        } else {
            ManifestLocation::Path(PathBuf::from(location))
        }
    }

    /// Build the matching source.
    pub fn into_source(self) -> Box<dyn ManifestSource> {
        match self {
            ManifestLocation::Url(url) => Box::new(HttpSource::new(url)),
            ManifestLocation::Path(path) => Box::new(FileSource::new(path)),
        }
    }
}

impl Default for ManifestLocation {
    fn default() -> Self {
        ManifestLocation::Path(PathBuf::from(DEFAULT_MANIFEST))
    }
}

impl fmt::Display for ManifestLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestLocation::Url(url) => f.write_str(url),
            ManifestLocation::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Manifest served over HTTP(S) using `ureq`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl ManifestSource for HttpSource {
    fn fetch(&self) -> Result<Vec<u8>> {
        let response = http_agent()
            .get(&self.url)
            .header("Cache-Control", "no-cache, no-store")
            .header("Pragma", "no-cache")
            .call()
            .map_err(|e| map_ureq_error(&e))?;

        response
            .into_body()
            .read_to_vec()
            .map_err(|e| VerifyError::ManifestUnreachable {
                reason: e.to_string(),
            })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Shared agent. Single attempt, no timeout.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(ureq::Agent::new_with_defaults)
}

/// Map a ureq error to a transport [`VerifyError`].
fn map_ureq_error(err: &ureq::Error) -> VerifyError {
    match err {
        ureq::Error::StatusCode(status) => VerifyError::ManifestStatus { status: *status },
        other => VerifyError::ManifestUnreachable {
            reason: other.to_string(),
        },
    }
}

/// Manifest stored on the local filesystem, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ManifestSource for FileSource {
    fn fetch(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| VerifyError::ManifestUnreachable {
            reason: format!("{}: {}", self.path.display(), e),
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Retrieve and validate the manifest with a single read.
pub fn load(source: &dyn ManifestSource) -> Result<Manifest> {
    tracing::debug!(location = %source.describe(), "fetching manifest");
    let bytes = source.fetch()?;
    let manifest = Manifest::from_json(&bytes)?;
    tracing::debug!(records = manifest.records.len(), "manifest loaded");
    Ok(manifest)
}
