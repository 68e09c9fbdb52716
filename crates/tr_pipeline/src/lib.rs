//! tr_pipeline: client-facing query surface of the report engine.
//!
//! snapshot (tr_io) → completeness gate + aggregation (tr_algo) → model (tr_report) → bytes.
//!
//! Every call takes a fresh snapshot from the store and recomputes from it;
//! nothing is cached between calls.

#![forbid(unsafe_code)]

use thiserror::Error;

use tr_algo::Checklist;
use tr_io::{IoError, RecordKind};
use tr_report::ReportError;

pub mod generate;
pub mod validate;

pub use generate::{generate_report, preview_report};
pub use tr_report::{ExportFormat, ReportMode, ReportModel, ReportOptions};
pub use validate::{validate_report, NumberedExpense, ReportValidation};

/// Engine identifiers, baked at compile time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EngineMeta {
    pub name: String,
    pub version: String,
}

impl EngineMeta {
    pub fn current() -> Self {
        EngineMeta {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Single error surface for the query operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("report data incomplete: {}", .checklist.missing().join(", "))]
    IncompleteData { checklist: Checklist },

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    /// Duplicate ids and other write conflicts.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("io: {0}")]
    Io(String),

    #[error("render: {0}")]
    Render(String),
}

impl From<IoError> for PipelineError {
    fn from(e: IoError) -> Self {
        match e {
            IoError::NotFound { kind, id } => PipelineError::NotFound { kind, id },
            IoError::InvalidDateRange(m) => PipelineError::InvalidDateRange(m),
            IoError::InvalidAmount(m) => PipelineError::InvalidAmount(m),
            IoError::DuplicateId { kind, id } => PipelineError::Conflict(format!("duplicate {kind} id {id}")),
            IoError::Path(m) => PipelineError::Io(format!("path: {m}")),
            IoError::Json { pointer, msg } => PipelineError::Io(format!("json {pointer}: {msg}")),
            IoError::Hash(m) => PipelineError::Io(format!("hash: {m}")),
        }
    }
}

impl From<ReportError> for PipelineError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::IncompleteData { checklist } => PipelineError::IncompleteData { checklist },
            other => PipelineError::Render(other.to_string()),
        }
    }
}
