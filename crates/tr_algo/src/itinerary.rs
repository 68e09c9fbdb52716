//! crates/tr_algo/src/itinerary.rs
//! Itinerary grouping: one group per calendar day, days ascending, entries
//! ascending by time of day. Equal times keep input order.

use chrono::NaiveDate;
use tr_core::{calendar::compare_dates, calendar::compare_times, ItineraryEntry};

#[cfg(feature = "serde")]
use serde::Serialize;

/// An entry with its 1-based position in the whole itinerary.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ItineraryRow {
    pub no: usize,
    pub entry: ItineraryEntry,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ItineraryGroup {
    pub date: NaiveDate,
    pub rows: Vec<ItineraryRow>,
}

/// Group and order itinerary entries.
///
/// Every input entry lands in exactly one group; empty input yields no groups.
pub fn group_itinerary(entries: &[ItineraryEntry]) -> Vec<ItineraryGroup> {
    let mut ordered: Vec<&ItineraryEntry> = entries.iter().collect();
    // slice::sort_by is stable: equal (date, time) keys keep input order.
    ordered.sort_by(|a, b| {
        compare_dates(&a.date, &b.date).then_with(|| compare_times(&a.time_of_day, &b.time_of_day))
    });

    let mut groups: Vec<ItineraryGroup> = Vec::new();
    for (i, e) in ordered.into_iter().enumerate() {
        let row = ItineraryRow { no: i + 1, entry: e.clone() };
        match groups.last_mut() {
            Some(g) if g.date == e.date => g.rows.push(row),
            _ => groups.push(ItineraryGroup { date: e.date, rows: vec![row] }),
        }
    }
    groups
}

/// Entries in final report order.
pub fn flatten(groups: &[ItineraryGroup]) -> Vec<ItineraryEntry> {
    groups
        .iter()
        .flat_map(|g| g.rows.iter().map(|r| r.entry.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tr_core::calendar::{format_time, parse_date, parse_time};

    fn entry(id: &str, date: &str, time: &str) -> ItineraryEntry {
        ItineraryEntry {
            id: id.parse().unwrap(),
            date: parse_date(date).unwrap(),
            time_of_day: parse_time(time).unwrap(),
            activity: format!("activity {id}"),
            location: "Bandung".into(),
            note: None,
        }
    }

    fn shape(groups: &[ItineraryGroup]) -> Vec<(String, Vec<String>)> {
        groups
            .iter()
            .map(|g| {
                (
                    g.date.to_string(),
                    g.rows.iter().map(|r| format_time(&r.entry.time_of_day)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn groups_by_day_then_time() {
        let input = vec![
            entry("c", "2024-05-02", "08:00"),
            entry("b", "2024-05-01", "14:00"),
            entry("a", "2024-05-01", "09:00"),
        ];
        let groups = group_itinerary(&input);
        assert_eq!(
            shape(&groups),
            vec![
                ("2024-05-01".to_string(), vec!["09:00".to_string(), "14:00".to_string()]),
                ("2024-05-02".to_string(), vec!["08:00".to_string()]),
            ]
        );
        let numbers: Vec<usize> = groups.iter().flat_map(|g| g.rows.iter().map(|r| r.no)).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn equal_times_keep_input_order() {
        let input = vec![
            entry("late-added", "2024-05-01", "10:00"),
            entry("x", "2024-05-01", "09:00"),
            entry("later", "2024-05-01", "10:00"),
        ];
        let ids: Vec<String> = flatten(&group_itinerary(&input)).into_iter().map(|e| e.id.to_string()).collect();
        assert_eq!(ids, vec!["x", "late-added", "later"]);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(group_itinerary(&[]).is_empty());
    }

    fn arb_entries() -> impl Strategy<Value = Vec<ItineraryEntry>> {
        // Distinct (day, minute) keys so that permutations cannot reorder ties.
        prop::collection::btree_set((1u32..=28, 0u32..(24 * 60)), 0..24).prop_map(|keys| {
            keys.into_iter()
                .enumerate()
                .map(|(i, (day, minute))| {
                    entry(
                        &format!("e{i}"),
                        &format!("2024-05-{day:02}"),
                        &format!("{:02}:{:02}", minute / 60, minute % 60),
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn permutation_independent(entries in arb_entries(), seed in any::<u64>()) {
            let mut shuffled = entries.clone();
            // Deterministic rotation + reversal stands in for a shuffle.
            if !shuffled.is_empty() {
                let k = (seed as usize) % shuffled.len();
                shuffled.rotate_left(k);
                if seed % 2 == 0 { shuffled.reverse(); }
            }
            prop_assert_eq!(group_itinerary(&entries), group_itinerary(&shuffled));
        }

        #[test]
        fn nothing_dropped_and_idempotent(entries in arb_entries()) {
            let groups = group_itinerary(&entries);
            let flat = flatten(&groups);
            prop_assert_eq!(flat.len(), entries.len());
            for e in &entries {
                prop_assert_eq!(groups.iter().filter(|g| g.rows.iter().any(|r| &r.entry == e)).count(), 1);
            }
            prop_assert_eq!(group_itinerary(&flat), groups);
        }
    }
}
