//! Domain snapshots: profile, trip, itinerary and expense entries.
//!
//! These are plain values. Nothing here enforces the write-boundary rules
//! (entry dates inside the trip span, unique ids); the store does that.

use chrono::{NaiveDate, NaiveTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calendar::{compare_dates, within_range};
use crate::ids::{EntryId, TripId};
use crate::money::Amount;

#[inline]
fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Employee identity printed on the report. Empty strings mean "not filled yet".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Profile {
    pub full_name: String,
    pub employee_id: String,
    pub title: String,
    pub unit: String,
}

impl Profile {
    pub fn is_complete(&self) -> bool {
        filled(&self.full_name) && filled(&self.employee_id) && filled(&self.title) && filled(&self.unit)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TripStatus {
    #[default]
    Draft,
    Completed,
}

impl TripStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TripStatus::Draft => "draft",
            TripStatus::Completed => "completed",
        }
    }
}

/// Trip metadata. `status` is independent of report completeness.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trip {
    pub id: TripId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub destination: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_date: Option<NaiveDate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub end_date: Option<NaiveDate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub legal_basis: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub purpose: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: TripStatus,
}

impl Trip {
    /// A freshly created, empty draft.
    pub fn draft(id: TripId) -> Self {
        Trip {
            id,
            title: String::new(),
            destination: String::new(),
            start_date: None,
            end_date: None,
            legal_basis: String::new(),
            purpose: String::new(),
            status: TripStatus::Draft,
        }
    }

    /// Both dates present and `end >= start`.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(s), Some(e)) if compare_dates(&e, &s).is_ge() => Some((s, e)),
            _ => None,
        }
    }

    pub fn has_valid_span(&self) -> bool {
        self.date_span().is_some()
    }

    /// Whether `date` falls inside the trip span. A trip without a valid span contains no date.
    pub fn contains_date(&self, date: &NaiveDate) -> bool {
        self.date_span().map_or(false, |(s, e)| within_range(date, &s, &e))
    }

    pub fn is_complete(&self) -> bool {
        filled(&self.title)
            && filled(&self.destination)
            && filled(&self.legal_basis)
            && filled(&self.purpose)
            && self.has_valid_span()
    }
}

/// One timed activity on a trip day.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItineraryEntry {
    pub id: EntryId,
    pub date: NaiveDate,
    #[cfg_attr(feature = "serde", serde(with = "crate::calendar::hm_format"))]
    pub time_of_day: NaiveTime,
    pub activity: String,
    pub location: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub note: Option<String>,
}

/// One monetary outlay. Sequence numbers are derived, never stored here.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExpenseEntry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Amount,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub note: Option<String>,
}
