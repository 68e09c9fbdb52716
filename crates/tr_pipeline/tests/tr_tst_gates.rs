//! Completeness gate and export behaviour through the public query surface.

use std::cell::Cell;
use std::path::PathBuf;

use tr_core::calendar::{parse_date, parse_time};
use tr_core::{Amount, ExpenseEntry, ItineraryEntry, Profile, TripId};
use tr_io::store::{MemoryStore, TripPatch};
use tr_io::bundle::{read_bundle_file, write_bundle_file};
use tr_io::RecordKind;
use tr_pipeline::{
    generate_report, preview_report, validate_report, ExportFormat, PipelineError, ReportOptions,
};
use tr_report::{DocumentRenderer, ReportError, ReportModel, Renderer};

// -----------------------------------------------------------------------------
// Fixture store
// -----------------------------------------------------------------------------

fn tid() -> TripId {
    "trip-1".parse().unwrap()
}

fn profile() -> Profile {
    Profile {
        full_name: "Budi Santoso".into(),
        employee_id: "197901012005011002".into(),
        title: "Kepala Seksi".into(),
        unit: "Bidang Program".into(),
    }
}

fn store_with(profile: Profile, itineraries: usize, expenses: &[(&str, u64)]) -> MemoryStore {
    let mut s = MemoryStore::with_profile(profile);
    s.create_trip(
        tid(),
        TripPatch {
            title: Some("Rapat Koordinasi".into()),
            destination: Some("Bandung".into()),
            start_date: Some(parse_date("2024-05-01").unwrap()),
            end_date: Some(parse_date("2024-05-02").unwrap()),
            legal_basis: Some("SPT 090/045/2024".into()),
            purpose: Some("Koordinasi anggaran".into()),
            status: None,
        },
    )
    .unwrap();
    let slots = [("2024-05-02", "08:00"), ("2024-05-01", "14:00"), ("2024-05-01", "09:00")];
    for (i, (date, time)) in slots.iter().cycle().take(itineraries).enumerate() {
        s.add_itinerary(
            &tid(),
            ItineraryEntry {
                id: format!("it-{i}").parse().unwrap(),
                date: parse_date(date).unwrap(),
                time_of_day: parse_time(time).unwrap(),
                activity: format!("Kegiatan {i}"),
                location: "Gedung Sate".into(),
                note: None,
            },
        )
        .unwrap();
    }
    for (i, (date, amount)) in expenses.iter().enumerate() {
        s.add_expense(
            &tid(),
            ExpenseEntry {
                id: format!("ex-{i}").parse().unwrap(),
                date: parse_date(date).unwrap(),
                description: format!("Biaya {i}"),
                amount: Amount::new(*amount),
                note: None,
            },
        )
        .unwrap();
    }
    s
}

fn complete_store() -> MemoryStore {
    store_with(profile(), 3, &[("2024-05-02", 10_000), ("2024-05-01", 25_000), ("2024-05-01", 5_000)])
}

fn opts() -> ReportOptions {
    ReportOptions { issued_on: Some(parse_date("2024-05-03").unwrap()), ..ReportOptions::default() }
}

/// Stand-in for an external binary renderer; counts invocations.
#[derive(Default)]
struct CountingPdf {
    calls: Cell<u32>,
}

impl Renderer for CountingPdf {
    fn render(&self, model: &ReportModel, format: ExportFormat) -> Result<Vec<u8>, ReportError> {
        self.calls.set(self.calls.get() + 1);
        match format {
            ExportFormat::Pdf => Ok(format!("%PDF-1.4 {}", model.expenses.total_text).into_bytes()),
            other => Err(ReportError::UnsupportedFormat(other)),
        }
    }

    fn supports(&self, format: ExportFormat) -> bool {
        format == ExportFormat::Pdf
    }
}

// -----------------------------------------------------------------------------
// validate_report
// -----------------------------------------------------------------------------

#[test]
fn incomplete_profile_is_the_only_failure() {
    let mut p = profile();
    p.title = String::new();
    let store = store_with(p, 2, &[("2024-05-01", 50_000)]);

    let v = validate_report(&store, &tid()).unwrap();
    assert!(!v.can_generate);
    assert!(!v.profile_completed);
    assert!(v.trip_completed && v.has_itinerary && v.has_expense);
    assert_eq!(v.missing, vec!["Profile.Incomplete"]);
}

#[test]
fn validation_orders_and_numbers() {
    let v = validate_report(&complete_store(), &tid()).unwrap();
    assert!(v.can_generate);

    let it: Vec<(String, String)> = v
        .itineraries
        .iter()
        .map(|e| (e.date.to_string(), tr_core::calendar::format_time(&e.time_of_day)))
        .collect();
    assert_eq!(
        it,
        vec![
            ("2024-05-01".to_string(), "09:00".to_string()),
            ("2024-05-01".to_string(), "14:00".to_string()),
            ("2024-05-02".to_string(), "08:00".to_string()),
        ]
    );

    let ex: Vec<(usize, u64)> = v.expenses.iter().map(|e| (e.no, e.entry.amount.units())).collect();
    assert_eq!(ex, vec![(1, 25_000), (2, 5_000), (3, 10_000)]);
    assert_eq!(v.total_expense, 40_000);

    let json = serde_json::to_value(&v).unwrap();
    assert_eq!(json["expenses"][0]["no"], 1);
    assert_eq!(json["expenses"][0]["amount"], 25_000);
}

#[test]
fn empty_collections_are_not_errors() {
    let store = store_with(profile(), 0, &[]);
    let v = validate_report(&store, &tid()).unwrap();
    assert_eq!(v.missing, vec!["Itinerary.Empty", "Expense.Empty"]);
    assert_eq!(v.total_expense, 0);
    assert!(v.itineraries.is_empty() && v.expenses.is_empty());
}

#[test]
fn unknown_trip_is_not_found() {
    let err = validate_report(&complete_store(), &"nope".parse().unwrap()).unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { kind: RecordKind::Trip, .. }));
}

// -----------------------------------------------------------------------------
// generate_report / preview_report
// -----------------------------------------------------------------------------

#[test]
fn export_with_closed_gate_produces_no_bytes() {
    let store = store_with(profile(), 2, &[]);
    let pdf = CountingPdf::default();

    let err = generate_report(&store, &tid(), ExportFormat::Pdf, &pdf, &opts()).unwrap_err();
    match err {
        PipelineError::IncompleteData { checklist } => {
            assert!(checklist.profile_completed && checklist.trip_completed && checklist.has_itinerary);
            assert!(!checklist.has_expense);
        }
        other => panic!("expected IncompleteData, got {other:?}"),
    }
    assert_eq!(pdf.calls.get(), 0);
}

#[test]
fn export_goes_through_the_supplied_renderer() {
    let pdf = CountingPdf::default();
    let bytes = generate_report(&complete_store(), &tid(), ExportFormat::Pdf, &pdf, &opts()).unwrap();
    assert_eq!(bytes, b"%PDF-1.4 Rp 40.000".to_vec());
    assert_eq!(pdf.calls.get(), 1);

    let err = generate_report(&complete_store(), &tid(), ExportFormat::Pdf, &DocumentRenderer, &opts()).unwrap_err();
    assert!(matches!(err, PipelineError::Render(_)));
}

#[test]
fn preview_always_builds() {
    let store = store_with(Profile::default(), 0, &[]);
    let m = preview_report(&store, &tid(), &opts()).unwrap();
    assert!(!m.can_generate());
    assert_eq!(m.completeness.missing, vec!["Profile.Incomplete", "Itinerary.Empty", "Expense.Empty"]);
}

#[test]
fn golden_digest_is_stable_and_tracks_changes() {
    let store = complete_store();
    let a = preview_report(&store, &tid(), &opts()).unwrap().digest().unwrap();
    let b = preview_report(&store, &tid(), &opts()).unwrap().digest().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 64);

    // same records inserted in a different order give the same ledger
    let reordered =
        store_with(profile(), 3, &[("2024-05-01", 25_000), ("2024-05-01", 5_000), ("2024-05-02", 10_000)]);
    let ra = preview_report(&reordered, &tid(), &opts()).unwrap();
    assert_eq!(ra.expenses.amount_texts, vec!["Rp 25.000", "Rp 5.000", "Rp 10.000"]);
    assert_eq!(ra.expenses.total_text, "Rp 40.000");

    let mut changed = complete_store();
    changed
        .update_trip(&tid(), TripPatch { destination: Some("Bogor".into()), ..TripPatch::default() })
        .unwrap();
    let c = preview_report(&changed, &tid(), &opts()).unwrap().digest().unwrap();
    assert_ne!(a, c);
}

#[test]
fn status_does_not_affect_the_gate() {
    let mut store = store_with(profile(), 1, &[]);
    store.mark_completed(&tid()).unwrap();
    let v = validate_report(&store, &tid()).unwrap();
    assert!(!v.can_generate);
    assert_eq!(v.trip.status, tr_core::TripStatus::Completed);
}

#[test]
fn cascade_delete_then_lookup_fails() {
    let mut store = complete_store();
    store.delete_trip(&tid()).unwrap();
    let err = preview_report(&store, &tid(), &opts()).unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { .. }));
}

// -----------------------------------------------------------------------------
// Bundle fixture
// -----------------------------------------------------------------------------

fn fixture() -> MemoryStore {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/trip_bundle.json");
    read_bundle_file(&path).unwrap()
}

#[test]
fn fixture_draft_trip_cannot_export() {
    let store = fixture();
    let draft: TripId = "trip-draft".parse().unwrap();

    let v = validate_report(&store, &draft).unwrap();
    assert_eq!(v.missing, vec!["Trip.Incomplete", "Expense.Empty"]);

    let err = generate_report(&store, &draft, ExportFormat::Json, &DocumentRenderer, &opts()).unwrap_err();
    assert!(matches!(err, PipelineError::IncompleteData { .. }));
}

#[test]
fn fixture_digest_survives_save_and_reload() {
    let store = fixture();
    let id: TripId = "trip-bdg-2024".parse().unwrap();
    let before = preview_report(&store, &id, &opts()).unwrap().digest().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundle.json");
    write_bundle_file(&path, &store).unwrap();
    let reloaded = read_bundle_file(&path).unwrap();
    let after = preview_report(&reloaded, &id, &opts()).unwrap().digest().unwrap();
    assert_eq!(before, after);

    let v = validate_report(&reloaded, &id).unwrap();
    assert_eq!(v.total_expense, 40_000);
}

#[test]
fn writes_outside_the_trip_span_are_rejected() {
    let mut store = fixture();
    let id: TripId = "trip-bdg-2024".parse().unwrap();
    let err = store
        .add_expense(
            &id,
            ExpenseEntry {
                id: "ex-late".parse().unwrap(),
                date: parse_date("2024-05-09").unwrap(),
                description: "Taksi".into(),
                amount: Amount::new(1_000),
                note: None,
            },
        )
        .unwrap_err();
    assert!(matches!(PipelineError::from(err), PipelineError::InvalidDateRange(_)));
    assert_eq!(validate_report(&store, &id).unwrap().expenses.len(), 3);
}
