//! Trip storage: a read trait for the query surface and an in-memory
//! implementation that enforces the write-boundary rules.
//!
//! Rules checked on every write:
//! - a trip's end date may not precede its start date;
//! - itinerary and expense dates must lie inside the trip span;
//! - entry ids are unique within their trip, trip ids within the store;
//! - unknown trips/entries yield `NotFound`.
//!
//! Reads hand out owned clones so callers never see a half-applied write.

use chrono::NaiveDate;
use tr_core::{
    calendar::compare_dates, EntryId, ExpenseEntry, ItineraryEntry, Profile, Trip, TripId, TripStatus,
};
use tracing::debug;

use crate::{IoError, IoResult, RecordKind};

// ----------------------------- Read surface -----------------------------

/// Everything the report engine needs for one trip, taken at one instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripSnapshot {
    pub profile: Profile,
    pub trip: Trip,
    pub itineraries: Vec<ItineraryEntry>,
    pub expenses: Vec<ExpenseEntry>,
}

pub trait TripStore {
    fn profile(&self) -> Profile;
    fn trip(&self, id: &TripId) -> IoResult<Trip>;
    fn itineraries(&self, id: &TripId) -> IoResult<Vec<ItineraryEntry>>;
    fn expenses(&self, id: &TripId) -> IoResult<Vec<ExpenseEntry>>;

    /// Trip ids, most recently created first.
    fn trip_ids(&self) -> Vec<TripId>;

    fn snapshot(&self, id: &TripId) -> IoResult<TripSnapshot> {
        Ok(TripSnapshot {
            profile: self.profile(),
            trip: self.trip(id)?,
            itineraries: self.itineraries(id)?,
            expenses: self.expenses(id)?,
        })
    }
}

// ----------------------------- Patches -----------------------------

/// Partial trip update; `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TripPatch {
    pub title: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub legal_basis: Option<String>,
    pub purpose: Option<String>,
    pub status: Option<TripStatus>,
}

impl TripPatch {
    fn apply_to(self, t: &mut Trip) {
        if let Some(v) = self.title {
            t.title = v;
        }
        if let Some(v) = self.destination {
            t.destination = v;
        }
        if let Some(v) = self.start_date {
            t.start_date = Some(v);
        }
        if let Some(v) = self.end_date {
            t.end_date = Some(v);
        }
        if let Some(v) = self.legal_basis {
            t.legal_basis = v;
        }
        if let Some(v) = self.purpose {
            t.purpose = v;
        }
        if let Some(v) = self.status {
            t.status = v;
        }
    }
}

// ----------------------------- In-memory store -----------------------------

#[derive(Clone, Debug)]
struct TripRecord {
    trip: Trip,
    itineraries: Vec<ItineraryEntry>,
    expenses: Vec<ExpenseEntry>,
}

/// Single-profile store. Trips are kept in creation order.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    profile: Profile,
    trips: Vec<TripRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: Profile) -> Self {
        MemoryStore { profile, trips: Vec::new() }
    }

    pub fn set_profile(&mut self, profile: Profile) {
        debug!(complete = profile.is_complete(), "profile updated");
        self.profile = profile;
    }

    /// Create an empty draft trip, then apply `fields`. Status is always draft.
    pub fn create_trip(&mut self, id: TripId, fields: TripPatch) -> IoResult<Trip> {
        if self.position(&id).is_some() {
            return Err(IoError::DuplicateId { kind: RecordKind::Trip, id: id.to_string() });
        }
        let mut trip = Trip::draft(id);
        TripPatch { status: None, ..fields }.apply_to(&mut trip);
        check_trip_range(&trip)?;
        debug!(trip = %trip.id, "trip created");
        self.trips.push(TripRecord { trip: trip.clone(), itineraries: Vec::new(), expenses: Vec::new() });
        Ok(trip)
    }

    /// Apply a partial update. Rejected when the new span is inverted or would
    /// leave an existing entry outside it.
    pub fn update_trip(&mut self, id: &TripId, patch: TripPatch) -> IoResult<Trip> {
        let rec = self.record_mut(id)?;
        let mut next = rec.trip.clone();
        patch.apply_to(&mut next);
        check_trip_range(&next)?;
        if next.start_date != rec.trip.start_date || next.end_date != rec.trip.end_date {
            let stranded = rec
                .itineraries
                .iter()
                .map(|e| e.date)
                .chain(rec.expenses.iter().map(|e| e.date))
                .find(|d| !next.contains_date(d));
            if let Some(d) = stranded {
                return Err(IoError::InvalidDateRange(format!(
                    "trip {id}: existing entry dated {d} falls outside the new span"
                )));
            }
        }
        debug!(trip = %id, "trip updated");
        rec.trip = next.clone();
        Ok(next)
    }

    pub fn mark_completed(&mut self, id: &TripId) -> IoResult<Trip> {
        self.update_trip(id, TripPatch { status: Some(TripStatus::Completed), ..TripPatch::default() })
    }

    /// Remove a trip and every entry it owns.
    pub fn delete_trip(&mut self, id: &TripId) -> IoResult<()> {
        let idx = self.position(id).ok_or_else(|| not_found(RecordKind::Trip, id.as_str()))?;
        let rec = self.trips.remove(idx);
        debug!(
            trip = %id,
            itineraries = rec.itineraries.len(),
            expenses = rec.expenses.len(),
            "trip deleted with owned entries"
        );
        Ok(())
    }

    pub fn add_itinerary(&mut self, trip: &TripId, entry: ItineraryEntry) -> IoResult<()> {
        let rec = self.record_mut(trip)?;
        check_entry_date(&rec.trip, &entry.date)?;
        if rec.itineraries.iter().any(|e| e.id == entry.id) {
            return Err(IoError::DuplicateId { kind: RecordKind::Itinerary, id: entry.id.to_string() });
        }
        debug!(trip = %trip, entry = %entry.id, "itinerary added");
        rec.itineraries.push(entry);
        Ok(())
    }

    /// Replace the entry with the same id.
    pub fn update_itinerary(&mut self, trip: &TripId, entry: ItineraryEntry) -> IoResult<()> {
        let rec = self.record_mut(trip)?;
        check_entry_date(&rec.trip, &entry.date)?;
        let slot = rec
            .itineraries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(|| not_found(RecordKind::Itinerary, entry.id.as_str()))?;
        debug!(trip = %trip, entry = %entry.id, "itinerary updated");
        *slot = entry;
        Ok(())
    }

    pub fn remove_itinerary(&mut self, trip: &TripId, entry: &EntryId) -> IoResult<()> {
        let rec = self.record_mut(trip)?;
        let idx = rec
            .itineraries
            .iter()
            .position(|e| &e.id == entry)
            .ok_or_else(|| not_found(RecordKind::Itinerary, entry.as_str()))?;
        rec.itineraries.remove(idx);
        debug!(trip = %trip, entry = %entry, "itinerary removed");
        Ok(())
    }

    pub fn add_expense(&mut self, trip: &TripId, entry: ExpenseEntry) -> IoResult<()> {
        let rec = self.record_mut(trip)?;
        check_entry_date(&rec.trip, &entry.date)?;
        if rec.expenses.iter().any(|e| e.id == entry.id) {
            return Err(IoError::DuplicateId { kind: RecordKind::Expense, id: entry.id.to_string() });
        }
        debug!(trip = %trip, entry = %entry.id, amount = entry.amount.units(), "expense added");
        rec.expenses.push(entry);
        Ok(())
    }

    pub fn update_expense(&mut self, trip: &TripId, entry: ExpenseEntry) -> IoResult<()> {
        let rec = self.record_mut(trip)?;
        check_entry_date(&rec.trip, &entry.date)?;
        let slot = rec
            .expenses
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(|| not_found(RecordKind::Expense, entry.id.as_str()))?;
        debug!(trip = %trip, entry = %entry.id, "expense updated");
        *slot = entry;
        Ok(())
    }

    pub fn remove_expense(&mut self, trip: &TripId, entry: &EntryId) -> IoResult<()> {
        let rec = self.record_mut(trip)?;
        let idx = rec
            .expenses
            .iter()
            .position(|e| &e.id == entry)
            .ok_or_else(|| not_found(RecordKind::Expense, entry.as_str()))?;
        rec.expenses.remove(idx);
        debug!(trip = %trip, entry = %entry, "expense removed");
        Ok(())
    }

    /// Trips in creation order (oldest first), for serialization.
    pub fn trips_in_creation_order(&self) -> impl Iterator<Item = (&Trip, &[ItineraryEntry], &[ExpenseEntry])> {
        self.trips.iter().map(|r| (&r.trip, r.itineraries.as_slice(), r.expenses.as_slice()))
    }

    fn position(&self, id: &TripId) -> Option<usize> {
        self.trips.iter().position(|r| &r.trip.id == id)
    }

    fn record(&self, id: &TripId) -> IoResult<&TripRecord> {
        self.trips
            .iter()
            .find(|r| &r.trip.id == id)
            .ok_or_else(|| not_found(RecordKind::Trip, id.as_str()))
    }

    fn record_mut(&mut self, id: &TripId) -> IoResult<&mut TripRecord> {
        self.trips
            .iter_mut()
            .find(|r| &r.trip.id == id)
            .ok_or_else(|| not_found(RecordKind::Trip, id.as_str()))
    }
}

impl TripStore for MemoryStore {
    fn profile(&self) -> Profile {
        self.profile.clone()
    }

    fn trip(&self, id: &TripId) -> IoResult<Trip> {
        Ok(self.record(id)?.trip.clone())
    }

    fn itineraries(&self, id: &TripId) -> IoResult<Vec<ItineraryEntry>> {
        Ok(self.record(id)?.itineraries.clone())
    }

    fn expenses(&self, id: &TripId) -> IoResult<Vec<ExpenseEntry>> {
        Ok(self.record(id)?.expenses.clone())
    }

    fn trip_ids(&self) -> Vec<TripId> {
        self.trips.iter().rev().map(|r| r.trip.id.clone()).collect()
    }

    fn snapshot(&self, id: &TripId) -> IoResult<TripSnapshot> {
        let rec = self.record(id)?;
        Ok(TripSnapshot {
            profile: self.profile.clone(),
            trip: rec.trip.clone(),
            itineraries: rec.itineraries.clone(),
            expenses: rec.expenses.clone(),
        })
    }
}

// ----------------------------- Checks -----------------------------

fn not_found(kind: RecordKind, id: &str) -> IoError {
    IoError::NotFound { kind, id: id.to_string() }
}

fn check_trip_range(t: &Trip) -> IoResult<()> {
    if let (Some(s), Some(e)) = (t.start_date, t.end_date) {
        if compare_dates(&e, &s).is_lt() {
            return Err(IoError::InvalidDateRange(format!("trip {}: end {e} precedes start {s}", t.id)));
        }
    }
    Ok(())
}

fn check_entry_date(t: &Trip, date: &NaiveDate) -> IoResult<()> {
    if t.contains_date(date) {
        return Ok(());
    }
    let span = match (t.start_date, t.end_date) {
        (Some(s), Some(e)) => format!("{s}..={e}"),
        _ => "an unset span".to_string(),
    };
    Err(IoError::InvalidDateRange(format!("entry dated {date} is outside trip {} ({span})", t.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tr_core::calendar::{parse_date, parse_time};
    use tr_core::Amount;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn tid(s: &str) -> TripId {
        s.parse().unwrap()
    }

    fn span(start: &str, end: &str) -> TripPatch {
        TripPatch {
            title: Some("Kunjungan Kerja".into()),
            start_date: Some(d(start)),
            end_date: Some(d(end)),
            ..TripPatch::default()
        }
    }

    fn it(id: &str, date: &str) -> ItineraryEntry {
        ItineraryEntry {
            id: id.parse().unwrap(),
            date: d(date),
            time_of_day: parse_time("09:00").unwrap(),
            activity: "Rapat".into(),
            location: "Kantor Wilayah".into(),
            note: None,
        }
    }

    fn ex(id: &str, date: &str, amount: u64) -> ExpenseEntry {
        ExpenseEntry {
            id: id.parse().unwrap(),
            date: d(date),
            description: "Taksi".into(),
            amount: Amount::new(amount),
            note: None,
        }
    }

    #[test]
    fn create_rejects_inverted_span_and_duplicates() {
        let mut s = MemoryStore::new();
        assert!(matches!(
            s.create_trip(tid("t1"), span("2024-05-03", "2024-05-01")),
            Err(IoError::InvalidDateRange(_))
        ));
        s.create_trip(tid("t1"), span("2024-05-01", "2024-05-03")).unwrap();
        assert!(matches!(
            s.create_trip(tid("t1"), TripPatch::default()),
            Err(IoError::DuplicateId { kind: RecordKind::Trip, .. })
        ));
    }

    #[test]
    fn create_forces_draft() {
        let mut s = MemoryStore::new();
        let t = s
            .create_trip(tid("t1"), TripPatch { status: Some(TripStatus::Completed), ..TripPatch::default() })
            .unwrap();
        assert_eq!(t.status, TripStatus::Draft);
        assert_eq!(s.mark_completed(&tid("t1")).unwrap().status, TripStatus::Completed);
    }

    #[test]
    fn entries_must_fall_inside_span() {
        let mut s = MemoryStore::new();
        s.create_trip(tid("t1"), span("2024-05-01", "2024-05-02")).unwrap();
        s.add_itinerary(&tid("t1"), it("i1", "2024-05-02")).unwrap();
        assert!(matches!(
            s.add_itinerary(&tid("t1"), it("i2", "2024-05-03")),
            Err(IoError::InvalidDateRange(_))
        ));
        assert!(matches!(
            s.add_expense(&tid("t1"), ex("e1", "2024-04-30", 1)),
            Err(IoError::InvalidDateRange(_))
        ));
        assert!(matches!(
            s.add_itinerary(&tid("t1"), it("i1", "2024-05-01")),
            Err(IoError::DuplicateId { kind: RecordKind::Itinerary, .. })
        ));
        assert_eq!(s.itineraries(&tid("t1")).unwrap().len(), 1);
    }

    #[test]
    fn entry_on_trip_without_dates_is_rejected() {
        let mut s = MemoryStore::new();
        s.create_trip(tid("t1"), TripPatch::default()).unwrap();
        assert!(matches!(
            s.add_expense(&tid("t1"), ex("e1", "2024-05-01", 10)),
            Err(IoError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn narrowing_span_cannot_strand_entries() {
        let mut s = MemoryStore::new();
        s.create_trip(tid("t1"), span("2024-05-01", "2024-05-03")).unwrap();
        s.add_expense(&tid("t1"), ex("e1", "2024-05-03", 10)).unwrap();
        let narrower = TripPatch { end_date: Some(d("2024-05-02")), ..TripPatch::default() };
        assert!(matches!(s.update_trip(&tid("t1"), narrower), Err(IoError::InvalidDateRange(_))));
        assert_eq!(s.trip(&tid("t1")).unwrap().end_date, Some(d("2024-05-03")));

        let retitle = TripPatch { title: Some("Baru".into()), ..TripPatch::default() };
        assert_eq!(s.update_trip(&tid("t1"), retitle).unwrap().title, "Baru");
    }

    #[test]
    fn update_and_remove_entries() {
        let mut s = MemoryStore::new();
        s.create_trip(tid("t1"), span("2024-05-01", "2024-05-02")).unwrap();
        s.add_expense(&tid("t1"), ex("e1", "2024-05-01", 10)).unwrap();
        s.update_expense(&tid("t1"), ex("e1", "2024-05-02", 99)).unwrap();
        assert_eq!(s.expenses(&tid("t1")).unwrap()[0].amount, Amount::new(99));
        assert!(matches!(
            s.update_expense(&tid("t1"), ex("nope", "2024-05-02", 1)),
            Err(IoError::NotFound { kind: RecordKind::Expense, .. })
        ));
        s.remove_expense(&tid("t1"), &"e1".parse().unwrap()).unwrap();
        assert!(s.expenses(&tid("t1")).unwrap().is_empty());

        s.add_itinerary(&tid("t1"), it("i1", "2024-05-01")).unwrap();
        s.update_itinerary(&tid("t1"), it("i1", "2024-05-02")).unwrap();
        s.remove_itinerary(&tid("t1"), &"i1".parse().unwrap()).unwrap();
        assert!(matches!(
            s.remove_itinerary(&tid("t1"), &"i1".parse().unwrap()),
            Err(IoError::NotFound { kind: RecordKind::Itinerary, .. })
        ));
    }

    #[test]
    fn delete_cascades() {
        let mut s = MemoryStore::new();
        s.create_trip(tid("t1"), span("2024-05-01", "2024-05-02")).unwrap();
        s.add_itinerary(&tid("t1"), it("i1", "2024-05-01")).unwrap();
        s.add_expense(&tid("t1"), ex("e1", "2024-05-01", 10)).unwrap();
        s.delete_trip(&tid("t1")).unwrap();
        assert!(matches!(s.itineraries(&tid("t1")), Err(IoError::NotFound { .. })));
        assert!(matches!(s.expenses(&tid("t1")), Err(IoError::NotFound { .. })));
        assert!(matches!(s.delete_trip(&tid("t1")), Err(IoError::NotFound { .. })));

        // a re-created trip with the same id starts empty
        s.create_trip(tid("t1"), span("2024-05-01", "2024-05-02")).unwrap();
        assert!(s.snapshot(&tid("t1")).unwrap().expenses.is_empty());
    }

    #[test]
    fn newest_first_listing() {
        let mut s = MemoryStore::new();
        for id in ["a", "b", "c"] {
            s.create_trip(tid(id), TripPatch::default()).unwrap();
        }
        let ids: Vec<String> = s.trip_ids().into_iter().map(String::from).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }
}
