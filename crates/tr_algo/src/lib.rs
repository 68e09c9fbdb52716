// crates/tr_algo/src/lib.rs
//! Pure aggregation and gate logic over immutable snapshots.
//!
//! Nothing in this crate allocates ids, reads clocks, or performs I/O; every
//! function is a deterministic transform of its arguments and is safe to call
//! concurrently on shared snapshots.
#![forbid(unsafe_code)]

pub mod completeness;
pub mod expense;
pub mod itinerary;

pub use completeness::{evaluate, evaluate_detailed, Checklist, CompletenessReport};
pub use expense::{aggregate_expenses, total_amount, ExpenseLedger, ExpenseRow};
pub use itinerary::{flatten, group_itinerary, ItineraryGroup, ItineraryRow};
