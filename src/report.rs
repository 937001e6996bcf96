//! Status reporting.
//!
//! Turns verification outcomes into a short status label, a severity class,
//! a detail message and a full transcript. Nothing here knows how the result
//! is drawn.

use serde::Serialize;

use crate::source::ManifestSource;
use crate::verify::VerificationOutcome;

/// Severity class used to color a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Neutral,
    Ok,
    Bad,
    Warn,
}

impl Severity {
    /// ANSI color code for terminal output.
    pub fn color_code(&self) -> &'static str {
        match self {
            Severity::Neutral => "\x1b[90m", // Gray
            Severity::Ok => "\x1b[32m",      // Green
            Severity::Bad => "\x1b[31m",     // Red
            Severity::Warn => "\x1b[33m",    // Yellow
        }
    }
}

/// Presentation state of a verification request.
///
/// `Idle -> Checking -> {Valid | Invalid | Error}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Checking,
    Valid,
    Invalid,
    Error,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Idle => "Idle",
            Status::Checking => "Checking…",
            Status::Valid => "VALID",
            Status::Invalid => "INVALID",
            Status::Error => "ERROR",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Status::Idle | Status::Checking => Severity::Neutral,
            Status::Valid => Severity::Ok,
            Status::Invalid => Severity::Bad,
            Status::Error => Severity::Warn,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Valid | Status::Invalid | Status::Error)
    }
}

impl From<&VerificationOutcome> for Status {
    fn from(outcome: &VerificationOutcome) -> Self {
        match outcome {
            VerificationOutcome::Valid { .. } => Status::Valid,
            VerificationOutcome::NotFound { .. } => Status::Invalid,
            _ => Status::Error,
        }
    }
}

/// Mutable view state owned by a front end.
///
/// Taking `&mut self` serializes requests: a new one can only begin once the
/// caller has finished the previous one.
#[derive(Debug)]
pub struct StatusBoard {
    status: Status,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self {
            status: Status::Idle,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Enter `Checking` for a fresh request.
    pub fn begin(&mut self) -> Status {
        self.status = Status::Checking;
        self.status
    }

    /// Enter the terminal state for `outcome`.
    pub fn finish(&mut self, outcome: &VerificationOutcome) -> Status {
        self.status = Status::from(outcome);
        self.status
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationOutcome {
    pub fn status(&self) -> Status {
        Status::from(self)
    }

    pub fn severity(&self) -> Severity {
        self.status().severity()
    }

    /// One-line human-readable explanation.
    pub fn detail(&self) -> String {
        match self {
            VerificationOutcome::Valid { record, .. } => {
                if record.name.is_empty() {
                    "This file matches a published record.".to_string()
                } else {
                    format!("This file matches the published record \"{}\".", record.name)
                }
            }
            VerificationOutcome::NotFound { .. } => {
                "No published record matches this file.".to_string()
            }
            VerificationOutcome::InputError { reason }
            | VerificationOutcome::TransportError { reason }
            | VerificationOutcome::SchemaError { reason }
            | VerificationOutcome::CryptoUnsupported { reason } => reason.clone(),
        }
    }

    /// Full multi-line result text.
    pub fn transcript(&self) -> String {
        let label = self.status().label();
        match self {
            VerificationOutcome::Valid { record, digest } => {
                let mut out = format!("{label}\n\nItem: {}\nID: {}\n", record.name, record.id);
                if !record.notes.is_empty() {
                    out.push_str(&format!("Notes: {}\n", record.notes));
                }
                out.push_str(&format!("\nSHA-256:\n{digest}"));
                out
            }
            VerificationOutcome::NotFound { digest } => {
                format!("{label}\nReason: Not found.\n\nComputed SHA-256:\n{digest}")
            }
            _ => format!("{label}\nReason: {}", self.detail()),
        }
    }
}

/// Whether the manifest can currently be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SystemStatus {
    Online,
    Offline { reason: String },
}

impl SystemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SystemStatus::Online => "Online",
            SystemStatus::Offline { .. } => "Offline",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SystemStatus::Online => Severity::Ok,
            SystemStatus::Offline { .. } => Severity::Bad,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SystemStatus::Online => "The verification system is ready and operational.",
            SystemStatus::Offline { .. } => {
                "Verification is temporarily unavailable. Please try again later."
            }
        }
    }
}

/// Probe manifest reachability with a single fetch. The body is not parsed.
pub fn check_status(source: &dyn ManifestSource) -> SystemStatus {
    match source.fetch() {
        Ok(_) => SystemStatus::Online,
        Err(err) => {
            tracing::warn!(location = %source.describe(), error = %err, "manifest not reachable");
            SystemStatus::Offline {
                reason: err.to_string(),
            }
        }
    }
}
