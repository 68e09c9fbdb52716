//! JSON bundles: one profile plus its trips, each trip carrying its own
//! itinerary and expense entries.
//!
//! Loading replays every record through `MemoryStore`, so a bundle that
//! violates a write-boundary rule is rejected as a whole. Amounts may be
//! written as integers, integral floats, or text such as `"Rp 1.500.000"`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tr_core::{parse_amount, Amount, EntryId, ExpenseEntry, ItineraryEntry, Profile, Trip, TripStatus};
use tracing::{debug, info};

use crate::canonical_json::write_canonical_file;
use crate::store::{MemoryStore, TripPatch};
use crate::{looks_like_url_strict, IoError, IoResult};

// ----------------------------- Wire types -----------------------------

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub trips: Vec<BundleTrip>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BundleTrip {
    #[serde(flatten)]
    pub trip: Trip,
    #[serde(default)]
    pub itineraries: Vec<ItineraryEntry>,
    #[serde(default)]
    pub expenses: Vec<BundleExpense>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BundleExpense {
    pub id: EntryId,
    pub date: chrono::NaiveDate,
    pub description: String,
    pub amount: WireAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

const U64_CEILING: f64 = 18_446_744_073_709_551_616.0;

/// Accepted spellings of a monetary amount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireAmount {
    Units(u64),
    Float(f64),
    Text(String),
}

impl WireAmount {
    pub fn to_amount(&self) -> IoResult<Amount> {
        match self {
            WireAmount::Units(n) => Ok(Amount::new(*n)),
            WireAmount::Float(f) => {
                // 2^64 is exact in f64, while `u64::MAX as f64` rounds up to it
                if f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f < U64_CEILING {
                    Ok(Amount::new(*f as u64))
                } else {
                    Err(IoError::InvalidAmount(f.to_string()))
                }
            }
            WireAmount::Text(s) => parse_amount(s).map_err(|_| IoError::InvalidAmount(s.clone())),
        }
    }
}

impl BundleExpense {
    fn into_entry(self) -> IoResult<ExpenseEntry> {
        let amount = self.amount.to_amount()?;
        Ok(ExpenseEntry {
            id: self.id,
            date: self.date,
            description: self.description,
            amount,
            note: self.note,
        })
    }
}

impl From<&ExpenseEntry> for BundleExpense {
    fn from(e: &ExpenseEntry) -> Self {
        BundleExpense {
            id: e.id.clone(),
            date: e.date,
            description: e.description.clone(),
            amount: WireAmount::Units(e.amount.units()),
            note: e.note.clone(),
        }
    }
}

// ----------------------------- Load / save -----------------------------

/// Replay a parsed bundle into a fresh store. Trips are created in file order.
pub fn load_bundle(bundle: Bundle) -> IoResult<MemoryStore> {
    let mut store = MemoryStore::with_profile(bundle.profile);
    for bt in bundle.trips {
        let t = bt.trip;
        let id = t.id.clone();
        let completed = t.status == TripStatus::Completed;
        store.create_trip(
            id.clone(),
            TripPatch {
                title: Some(t.title),
                destination: Some(t.destination),
                start_date: t.start_date,
                end_date: t.end_date,
                legal_basis: Some(t.legal_basis),
                purpose: Some(t.purpose),
                status: None,
            },
        )?;
        for it in bt.itineraries {
            store.add_itinerary(&id, it)?;
        }
        for ex in bt.expenses {
            store.add_expense(&id, ex.into_entry()?)?;
        }
        if completed {
            store.mark_completed(&id)?;
        }
    }
    Ok(store)
}

pub fn parse_bundle(bytes: &[u8]) -> IoResult<MemoryStore> {
    let bundle: Bundle = serde_json::from_slice(bytes)?;
    load_bundle(bundle)
}

/// Read a local bundle file. URL-looking paths are refused.
pub fn read_bundle_file(path: &Path) -> IoResult<MemoryStore> {
    let shown = path.display().to_string();
    if looks_like_url_strict(&shown) {
        return Err(IoError::Path(format!("refusing non-local path: {shown}")));
    }
    let bytes = fs::read(path).map_err(|e| IoError::Path(format!("{shown}: {e}")))?;
    let store = parse_bundle(&bytes)?;
    info!(path = %shown, trips = store.trips_in_creation_order().count(), "bundle loaded");
    Ok(store)
}

pub fn bundle_from_store(store: &MemoryStore) -> Bundle {
    use crate::store::TripStore;
    Bundle {
        profile: store.profile(),
        trips: store
            .trips_in_creation_order()
            .map(|(trip, its, exps)| BundleTrip {
                trip: trip.clone(),
                itineraries: its.to_vec(),
                expenses: exps.iter().map(BundleExpense::from).collect(),
            })
            .collect(),
    }
}

/// Write the store back as canonical JSON (sorted keys, atomic replace).
pub fn write_bundle_file(path: &Path, store: &MemoryStore) -> IoResult<()> {
    let bundle = bundle_from_store(store);
    write_canonical_file(path, &bundle)?;
    debug!(path = %path.display(), trips = bundle.trips.len(), "bundle written");
    Ok(())
}
