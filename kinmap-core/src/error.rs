use serde::Serialize;
use thiserror::Error;

/// Why a single input row could not become an event.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum RowErrorKind {
    #[error("expected at least 5 columns, found {found}")]
    TooFewColumns { found: usize },

    #[error("invalid longitude '{0}'")]
    InvalidLongitude(String),

    #[error("invalid latitude '{0}'")]
    InvalidLatitude(String),

    #[error("invalid year '{0}'")]
    InvalidYear(String),

    #[error("coordinate out of range (lat {latitude}, lon {longitude})")]
    CoordinateOutOfRange { latitude: f64, longitude: f64 },
}

/// A row-level diagnostic. `line` is 1-based.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("line {line}: {kind}")]
pub struct RowError {
    pub line: usize,
    pub kind: RowErrorKind,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{} malformed row(s), first at {}", .0.len(), first_row(.0))]
    MalformedRows(Vec<RowError>),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),
}

impl PipelineError {
    /// Row diagnostics carried by this error, empty for non-row failures.
    pub fn row_errors(&self) -> &[RowError] {
        match self {
            PipelineError::MalformedRows(rows) => rows,
            _ => &[],
        }
    }
}

fn first_row(rows: &[RowError]) -> String {
    rows.first()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "unknown line".to_string())
}

pub type Result<T> = std::result::Result<T, PipelineError>;
