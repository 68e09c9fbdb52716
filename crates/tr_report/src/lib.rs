//! tr_report: Pure offline report model + renderers (JSON/HTML).
//!
//! Determinism rules:
//! - No clocks, no I/O. The issue date and every format choice arrive in
//!   `ReportOptions`.
//! - Itinerary and expense order come from `tr_algo`; this crate never re-sorts.
//! - Stable section order and field names.
//!
//! PDF and spreadsheet encoding are left to an external `Renderer`.

#![deny(unsafe_code)]

use thiserror::Error;

use tr_algo::Checklist;

pub mod builder;
pub mod model;
pub mod render;
#[cfg(feature = "render_html")]
pub mod render_html;
#[cfg(feature = "render_json")]
pub mod render_json;

pub use builder::{build_model, ReportInput, ReportMode, ReportOptions};
pub use model::ReportModel;
pub use render::{suggested_file_name, DocumentRenderer, ExportFormat, Renderer};

#[derive(Debug, Error)]
pub enum ReportError {
    /// Export requested while the completeness gate is closed.
    #[error("report data incomplete: {}", .checklist.missing().join(", "))]
    IncompleteData { checklist: Checklist },

    #[error("export format not supported by this renderer: {0}")]
    UnsupportedFormat(ExportFormat),

    #[error("serialization failed: {0}")]
    Serialize(String),

    #[error("digest failed: {0}")]
    Digest(String),
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        ReportError::Serialize(e.to_string())
    }
}

impl From<tr_io::IoError> for ReportError {
    fn from(e: tr_io::IoError) -> Self {
        ReportError::Digest(e.to_string())
    }
}
