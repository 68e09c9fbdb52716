// crates/tr_report/src/model.rs
//
// Normalized, format-agnostic report structure handed to renderers.
// Raw values are kept alongside their display text so a renderer never has
// to format money or dates on its own.

use chrono::NaiveDate;
use serde::Serialize;

use tr_algo::{Checklist, ExpenseLedger, ItineraryGroup};
use tr_core::{calendar::DateFormat, AmountFormat, Locale, Profile, Trip};

use crate::builder::ReportMode;
use crate::ReportError;

pub const REPORT_TITLE_ID: &str = "LAPORAN PERJALANAN DINAS";
pub const REPORT_TITLE_EN: &str = "OFFICIAL TRAVEL REPORT";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportModel {
    pub mode: ReportMode,
    pub header: SectionHeader,
    pub reporter: Profile,
    pub trip: SectionTrip,
    pub itinerary: Vec<ItineraryGroup>,
    pub expenses: SectionExpenses,
    pub completeness: SectionCompleteness,
    pub signature: SectionSignature,
    pub presentation: Presentation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionHeader {
    pub title: String,
    /// Letter number; not assigned by the engine.
    pub number: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionTrip {
    pub trip: Trip,
    /// e.g. `1 Mei 2024 s.d. 3 Mei 2024`; empty when either date is unset.
    pub period_text: String,
    pub day_count: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionExpenses {
    pub ledger: ExpenseLedger,
    pub amount_texts: Vec<String>,
    pub total_text: String,
    pub subtotals: Vec<DaySubtotal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DaySubtotal {
    pub date: NaiveDate,
    pub total: u128,
    pub total_text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionCompleteness {
    #[serde(flatten)]
    pub checklist: Checklist,
    pub can_generate: bool,
    pub missing: Vec<&'static str>,
    pub profile_fields: Vec<&'static str>,
    pub trip_fields: Vec<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionSignature {
    pub place: Option<String>,
    pub issued_on: Option<NaiveDate>,
    /// `Bandung, 3 Mei 2024` with blanks where place or date are unknown.
    pub place_date_line: String,
    pub reporter_name: String,
    pub reporter_employee_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub locale: Locale,
    pub amount_format: AmountFormat,
    pub date_format: DateFormat,
}

impl ReportModel {
    #[inline]
    pub fn can_generate(&self) -> bool {
        self.completeness.can_generate
    }

    #[inline]
    pub fn total_expense(&self) -> u128 {
        self.expenses.ledger.total
    }

    /// SHA-256 over the canonical JSON of the whole model.
    pub fn digest(&self) -> Result<String, ReportError> {
        Ok(tr_io::hasher::sha256_canonical(self)?)
    }
}
