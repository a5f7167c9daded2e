// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Root error type for all TrustGraph Kernel failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrustError {
    /// Invalid input at the evaluation boundary (missing or short content).
    #[error("validation error: {0}")]
    Validation(String),

    /// An analyzer received malformed intermediate data or produced an
    /// out-of-contract result.
    #[error("analyzer error in {module}: {message}")]
    Analyzer { module: String, message: String },

    /// Module results could not be reduced to a consistent aggregate.
    #[error("aggregation error: {0}")]
    Aggregation(String),

    /// Certificate could not be issued for the given aggregate.
    #[error("certificate error: {0}")]
    Certificate(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in computation).
    #[error("numerical error: {0}")]
    Numerical(String),
}

impl TrustError {
    pub fn analyzer(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analyzer {
            module: module.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Analyzer { .. } => ErrorKind::Analyzer,
            Self::Aggregation(_) => ErrorKind::Aggregation,
            Self::Certificate(_) => ErrorKind::Certificate,
            Self::Config(_) => ErrorKind::Config,
            Self::Numerical(_) => ErrorKind::Numerical,
        }
    }

    /// Reduce to the structured `{kind, message}` form handed to callers.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Error category, stable on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Analyzer,
    Aggregation,
    Certificate,
    Config,
    Numerical,
}

/// Structured error description returned instead of an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&TrustError> for ErrorReport {
    fn from(err: &TrustError) -> Self {
        err.report()
    }
}

pub type TrustResult<T> = Result<T, TrustError>;
