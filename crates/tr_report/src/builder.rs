//! Report Model Builder: validator output + aggregator output + snapshots
//! → `ReportModel`. Pure; identical inputs give identical models.

use chrono::NaiveDate;
use serde::Serialize;

use tr_algo::completeness::{evaluate_detailed, CompletenessReport};
use tr_algo::{aggregate_expenses, group_itinerary};
use tr_core::calendar::{format_date, DateFormat};
use tr_core::{format_amount, AmountFormat, ExpenseEntry, ItineraryEntry, Locale, Profile, Trip};
use tr_io::store::TripSnapshot;

use crate::model::{
    DaySubtotal, Presentation, ReportModel, SectionCompleteness, SectionExpenses, SectionHeader,
    SectionSignature, SectionTrip, REPORT_TITLE_EN, REPORT_TITLE_ID,
};
use crate::ReportError;

/// Preview always builds; Export requires the completeness gate to be open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    Preview,
    Export,
}

/// Explicit presentation settings. Nothing here is read from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    pub locale: Locale,
    pub amount_format: AmountFormat,
    pub date_format: DateFormat,
    pub issue_place: Option<String>,
    pub issued_on: Option<NaiveDate>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions::for_locale(Locale::default())
    }
}

impl ReportOptions {
    /// Amount preset and long date style matching `locale`.
    pub fn for_locale(locale: Locale) -> Self {
        let date_format = match locale {
            Locale::IdId => DateFormat::LongId,
            Locale::EnUs => DateFormat::LongEn,
        };
        ReportOptions {
            locale,
            amount_format: locale.amount_format(),
            date_format,
            issue_place: None,
            issued_on: None,
        }
    }
}

/// Borrowed view of everything one report needs.
#[derive(Clone, Copy, Debug)]
pub struct ReportInput<'a> {
    pub profile: &'a Profile,
    pub trip: &'a Trip,
    pub itineraries: &'a [ItineraryEntry],
    pub expenses: &'a [ExpenseEntry],
    pub options: &'a ReportOptions,
}

impl<'a> ReportInput<'a> {
    pub fn from_snapshot(snap: &'a TripSnapshot, options: &'a ReportOptions) -> Self {
        ReportInput {
            profile: &snap.profile,
            trip: &snap.trip,
            itineraries: &snap.itineraries,
            expenses: &snap.expenses,
            options,
        }
    }
}

/// Assemble the report model.
///
/// In `Export` mode a closed gate yields `IncompleteData` carrying the four
/// flags; `Preview` always succeeds and records the flags in the model.
pub fn build_model(input: &ReportInput<'_>, mode: ReportMode) -> Result<ReportModel, ReportError> {
    let gate: CompletenessReport =
        evaluate_detailed(input.profile, input.trip, input.itineraries.len(), input.expenses.len());
    if mode == ReportMode::Export && !gate.can_generate {
        return Err(ReportError::IncompleteData { checklist: gate.checklist });
    }

    let opts = input.options;
    let fmt_date = |d: &NaiveDate| format_date(d, opts.date_format);
    let fmt_money = |v: u128| format_amount(v, &opts.amount_format);

    let ledger = aggregate_expenses(input.expenses);
    let amount_texts = ledger.rows.iter().map(|r| fmt_money(u128::from(r.entry.amount))).collect();
    let subtotals = ledger
        .subtotals_by_date()
        .into_iter()
        .map(|(date, total)| DaySubtotal { date, total, total_text: fmt_money(total) })
        .collect();
    let total_text = fmt_money(ledger.total);

    let (period_text, day_count) = match (input.trip.start_date, input.trip.end_date) {
        (Some(s), Some(e)) => {
            let sep = match opts.locale {
                Locale::IdId => "s.d.",
                Locale::EnUs => "to",
            };
            let days = input.trip.date_span().map(|(s, e)| (e - s).num_days() + 1);
            (format!("{} {} {}", fmt_date(&s), sep, fmt_date(&e)), days)
        }
        _ => (String::new(), None),
    };

    let title = match opts.locale {
        Locale::IdId => REPORT_TITLE_ID,
        Locale::EnUs => REPORT_TITLE_EN,
    };

    let place_date_line = format!(
        "{}, {}",
        opts.issue_place.as_deref().filter(|p| !p.trim().is_empty()).unwrap_or("__________"),
        opts.issued_on.as_ref().map(fmt_date).unwrap_or_else(|| "__________".to_string()),
    );

    Ok(ReportModel {
        mode,
        header: SectionHeader { title: title.to_string(), number: "-".to_string() },
        reporter: input.profile.clone(),
        trip: SectionTrip { trip: input.trip.clone(), period_text, day_count },
        itinerary: group_itinerary(input.itineraries),
        expenses: SectionExpenses { ledger, amount_texts, total_text, subtotals },
        completeness: SectionCompleteness {
            checklist: gate.checklist,
            can_generate: gate.can_generate,
            missing: gate.reasons,
            profile_fields: gate.profile_fields,
            trip_fields: gate.trip_fields,
        },
        signature: SectionSignature {
            place: opts.issue_place.clone(),
            issued_on: opts.issued_on,
            place_date_line,
            reporter_name: input.profile.full_name.clone(),
            reporter_employee_id: input.profile.employee_id.clone(),
        },
        presentation: Presentation {
            locale: opts.locale,
            amount_format: opts.amount_format.clone(),
            date_format: opts.date_format,
        },
    })
}
