//! crates/tr_io/src/lib.rs
//! Persistence collaborator for the report engine.
//!
//! - `store`: the `TripStore` read surface and the in-memory `MemoryStore`
//!   that enforces write-boundary rules.
//! - `bundle`: JSON snapshot files (profile + trips + entries) in and out.
//! - `canonical_json` / `hasher`: sorted-key compact JSON and SHA-256 digests
//!   used for golden report comparisons.
//!
//! Offline only: paths that look like URLs are rejected.

#![forbid(unsafe_code)]

use std::fmt;

use thiserror::Error;

pub mod bundle;
pub mod canonical_json;
pub mod hasher;
pub mod store;

/// Which kind of record a lookup or write referred to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Trip,
    Itinerary,
    Expense,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Trip => "trip",
            RecordKind::Itinerary => "itinerary",
            RecordKind::Expense => "expense",
        })
    }
}

/// Unified error for tr_io (store, bundle, canonical JSON, hashing).
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (create_dir_all, rename, fsync, etc.)
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with a JSON Pointer-ish location.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    #[error("hash error: {0}")]
    Hash(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: RecordKind, id: String },

    /// Trip end before start, or an entry dated outside its trip.
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps line/column rather than a pointer.
        IoError::Json {
            pointer: format!("line {} column {}", e.line(), e.column()),
            msg: e.to_string(),
        }
    }
}

/// SHA-256 hex of `bytes`, or an error when the `hash` feature is off.
pub fn try_sha256_hex(bytes: &[u8]) -> IoResult<String> {
    #[cfg(feature = "hash")]
    {
        Ok(hasher::sha256_hex(bytes))
    }
    #[cfg(not(feature = "hash"))]
    {
        let _ = bytes;
        Err(IoError::Hash("hash feature disabled".into()))
    }
}

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}
