//! crates/tr_algo/src/completeness.rs
//! Completeness gate: profile → trip → itinerary → expense, strict conjunction.
//! Stateless; every failing condition is reported, not just the first.

use tr_core::{Profile, Trip};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------- Reason codes ------------------------------------------------------------------

pub const PROFILE_INCOMPLETE: &str = "Profile.Incomplete";
pub const TRIP_INCOMPLETE: &str = "Trip.Incomplete";
pub const ITINERARY_EMPTY: &str = "Itinerary.Empty";
pub const EXPENSE_EMPTY: &str = "Expense.Empty";
pub const TRIP_DATE_RANGE: &str = "Trip.DateRange";

// ---------------- Types -------------------------------------------------------------------------

/// The four readiness flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Checklist {
    pub profile_completed: bool,
    pub trip_completed: bool,
    pub has_itinerary: bool,
    pub has_expense: bool,
}

impl Checklist {
    #[inline]
    pub fn can_generate(&self) -> bool {
        self.profile_completed && self.trip_completed && self.has_itinerary && self.has_expense
    }

    /// Reason codes for every false flag, in fixed order.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !self.profile_completed {
            out.push(PROFILE_INCOMPLETE);
        }
        if !self.trip_completed {
            out.push(TRIP_INCOMPLETE);
        }
        if !self.has_itinerary {
            out.push(ITINERARY_EMPTY);
        }
        if !self.has_expense {
            out.push(EXPENSE_EMPTY);
        }
        out
    }
}

/// Checklist plus itemized field gaps, for rendering a to-do list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CompletenessReport {
    pub checklist: Checklist,
    pub can_generate: bool,
    pub reasons: Vec<&'static str>,
    pub profile_fields: Vec<&'static str>,
    pub trip_fields: Vec<&'static str>,
}

// ---------------- Gate --------------------------------------------------------------------------

/// Evaluate the four conditions. Counts are taken as-is; zero means empty.
pub fn evaluate(profile: &Profile, trip: &Trip, itinerary_count: usize, expense_count: usize) -> Checklist {
    Checklist {
        profile_completed: profile.is_complete(),
        trip_completed: trip.is_complete(),
        has_itinerary: itinerary_count > 0,
        has_expense: expense_count > 0,
    }
}

pub fn evaluate_detailed(
    profile: &Profile,
    trip: &Trip,
    itinerary_count: usize,
    expense_count: usize,
) -> CompletenessReport {
    let checklist = evaluate(profile, trip, itinerary_count, expense_count);
    CompletenessReport {
        checklist,
        can_generate: checklist.can_generate(),
        reasons: checklist.missing(),
        profile_fields: profile_missing_fields(profile),
        trip_fields: trip_missing_fields(trip),
    }
}

#[inline]
fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Names of unfilled profile fields, in declaration order.
pub fn profile_missing_fields(p: &Profile) -> Vec<&'static str> {
    [
        ("full_name", &p.full_name),
        ("employee_id", &p.employee_id),
        ("title", &p.title),
        ("unit", &p.unit),
    ]
    .into_iter()
    .filter(|(_, v)| blank(v))
    .map(|(k, _)| k)
    .collect()
}

/// Names of unfilled trip fields; `Trip.DateRange` when both dates exist but end < start.
pub fn trip_missing_fields(t: &Trip) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for (k, v) in [("title", &t.title), ("destination", &t.destination)] {
        if blank(v) {
            out.push(k);
        }
    }
    if t.start_date.is_none() {
        out.push("start_date");
    }
    if t.end_date.is_none() {
        out.push("end_date");
    }
    for (k, v) in [("legal_basis", &t.legal_basis), ("purpose", &t.purpose)] {
        if blank(v) {
            out.push(k);
        }
    }
    if t.start_date.is_some() && t.end_date.is_some() && !t.has_valid_span() {
        out.push(TRIP_DATE_RANGE);
    }
    out
}
