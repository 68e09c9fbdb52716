//! tr_core: Core types, currency normalizer, and date/time ordering helpers.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`tr_algo`, `tr_io`, `tr_report`, `tr_pipeline`, `tr_cli`).
//!
//! - Identifier tokens: `TripId`, `EntryId`
//! - Snapshots: `Profile`, `Trip`, `ItineraryEntry`, `ExpenseEntry`
//! - Fixed-point money: `Amount`, `parse_amount`, `format_amount`
//! - Naive calendar ordering: `compare_dates`, `compare_times`, `within_range`
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod calendar;
pub mod entities;
pub mod ids;
pub mod money;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidId,
        InvalidAmount,
        InvalidDate,
        InvalidTime,
        UnknownLocale,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidId => write!(f, "invalid id"),
                CoreError::InvalidAmount => write!(f, "invalid amount"),
                CoreError::InvalidDate => write!(f, "invalid date (expected YYYY-MM-DD)"),
                CoreError::InvalidTime => write!(f, "invalid time (expected HH:MM)"),
                CoreError::UnknownLocale => write!(f, "unknown locale"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub use calendar::{compare_dates, compare_times, within_range};
pub use entities::{ExpenseEntry, ItineraryEntry, Profile, Trip, TripStatus};
pub use errors::CoreError;
pub use ids::{EntryId, TripId};
pub use money::{format_amount, parse_amount, Amount, AmountFormat, Locale};
