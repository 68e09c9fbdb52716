//! validate_report: the checklist view a client shows before export.
//! Itineraries come back in report order, expenses numbered.

use serde::Serialize;
use tracing::info;

use tr_algo::completeness::evaluate;
use tr_algo::{aggregate_expenses, itinerary::flatten, group_itinerary};
use tr_core::{ExpenseEntry, ItineraryEntry, Profile, Trip, TripId};
use tr_io::store::TripStore;

use crate::PipelineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NumberedExpense {
    pub no: usize,
    #[serde(flatten)]
    pub entry: ExpenseEntry,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportValidation {
    pub profile_completed: bool,
    pub trip_completed: bool,
    pub has_itinerary: bool,
    pub has_expense: bool,
    pub can_generate: bool,
    pub missing: Vec<&'static str>,
    pub trip: Trip,
    pub user: Profile,
    pub itineraries: Vec<ItineraryEntry>,
    pub expenses: Vec<NumberedExpense>,
    pub total_expense: u128,
}

pub fn validate_report<S>(store: &S, trip_id: &TripId) -> Result<ReportValidation, PipelineError>
where
    S: TripStore + ?Sized,
{
    let snap = store.snapshot(trip_id)?;
    let checklist = evaluate(&snap.profile, &snap.trip, snap.itineraries.len(), snap.expenses.len());
    let ledger = aggregate_expenses(&snap.expenses);

    if !checklist.can_generate() {
        info!(trip = %trip_id, missing = ?checklist.missing(), "completeness gate closed");
    }

    Ok(ReportValidation {
        profile_completed: checklist.profile_completed,
        trip_completed: checklist.trip_completed,
        has_itinerary: checklist.has_itinerary,
        has_expense: checklist.has_expense,
        can_generate: checklist.can_generate(),
        missing: checklist.missing(),
        itineraries: flatten(&group_itinerary(&snap.itineraries)),
        total_expense: ledger.total,
        expenses: ledger
            .rows
            .into_iter()
            .map(|r| NumberedExpense { no: r.seq, entry: r.entry })
            .collect(),
        trip: snap.trip,
        user: snap.profile,
    })
}
