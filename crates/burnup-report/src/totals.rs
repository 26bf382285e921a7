//! Daily totals: points opened and closed per calendar day.

use burnup_backlog::BacklogStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether the last activity day gets its own row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeEnd {
    /// Rows run from the first day up to, not including, the last day.
    #[default]
    Exclusive,
    /// Rows run from the first day through the last day.
    Inclusive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub points_opened: f64,
    pub points_closed: f64,
}

/// Bucket leaf points by the day they were opened and closed, then emit one
/// row per calendar day across the observed range.
///
/// Only leaves with positive points participate. Days are taken from the
/// export's timestamps as-is; no timezone conversion is applied.
pub fn daily_totals(store: &BacklogStore, end: RangeEnd) -> Vec<DailyTotal> {
    let mut opened: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut closed: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for item in store.leaves().filter(|item| item.points > 0.0) {
        if let Some(day) = item.opened_day() {
            *opened.entry(day).or_default() += item.points;
        }
        if let Some(day) = item.closed_day() {
            *closed.entry(day).or_default() += item.points;
        }
    }

    let first = opened.keys().chain(closed.keys()).min().copied();
    let last = opened.keys().chain(closed.keys()).max().copied();
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|day| match end {
            RangeEnd::Exclusive => *day < last,
            RangeEnd::Inclusive => *day <= last,
        })
        .map(|day| DailyTotal {
            day,
            points_opened: opened.get(&day).copied().unwrap_or_default(),
            points_closed: closed.get(&day).copied().unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{EXPORT_HEADER, store_from_csv};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).expect("valid January date")
    }

    fn two_story_store() -> BacklogStore {
        store_from_csv(&format!(
            "{EXPORT_HEADER}\n\
             PRJ-1,1,Story,Done,01/Jan/24 9:00 AM,02/Jan/24 5:00 PM,,3,\n\
             PRJ-2,2,Story,Done,03/Jan/24 10:00 AM,05/Jan/24 11:00 AM,,3,\n"
        ))
    }

    fn as_tuples(totals: &[DailyTotal]) -> Vec<(NaiveDate, f64, f64)> {
        totals
            .iter()
            .map(|t| (t.day, t.points_opened, t.points_closed))
            .collect()
    }

    #[test]
    fn exclusive_range_omits_last_activity_day() {
        let totals = daily_totals(&two_story_store(), RangeEnd::Exclusive);
        assert_eq!(
            as_tuples(&totals),
            vec![
                (day(1), 3.0, 0.0),
                (day(2), 0.0, 3.0),
                (day(3), 3.0, 0.0),
                (day(4), 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn inclusive_range_reports_last_activity_day() {
        let totals = daily_totals(&two_story_store(), RangeEnd::Inclusive);
        assert_eq!(totals.len(), 5);
        assert_eq!(
            as_tuples(&totals[4..]),
            vec![(day(5), 0.0, 3.0)]
        );
    }

    #[test]
    fn single_activity_day_depends_on_range_end() {
        let store = store_from_csv(&format!(
            "{EXPORT_HEADER}\nPRJ-1,1,Story,Open,01/Jan/24 9:00 AM,,,2,\n"
        ));
        assert!(daily_totals(&store, RangeEnd::Exclusive).is_empty());
        assert_eq!(
            as_tuples(&daily_totals(&store, RangeEnd::Inclusive)),
            vec![(day(1), 2.0, 0.0)]
        );
    }

    #[test]
    fn zero_point_items_and_parents_are_ignored() {
        let store = store_from_csv(&format!(
            "{EXPORT_HEADER}\n\
             PRJ-1,1,Epic,Open,01/Jan/24 9:00 AM,,,40,\n\
             PRJ-2,2,Story,Open,02/Jan/24 9:00 AM,,,,1\n\
             PRJ-3,3,Story,Done,03/Jan/24 9:00 AM,04/Jan/24 9:00 AM,,1.5,1\n\
             PRJ-4,4,Story,Open,03/Jan/24 1:00 PM,,,2.5,1\n"
        ));
        assert_eq!(
            as_tuples(&daily_totals(&store, RangeEnd::Inclusive)),
            vec![(day(3), 4.0, 0.0), (day(4), 0.0, 1.5)]
        );
    }

    #[test]
    fn missing_open_date_still_counts_close() {
        let store = store_from_csv(&format!(
            "{EXPORT_HEADER}\n\
             PRJ-1,1,Story,Done,,03/Jan/24 9:00 AM,,2,\n\
             PRJ-2,2,Story,Open,01/Jan/24 9:00 AM,,,1,\n"
        ));
        assert_eq!(
            as_tuples(&daily_totals(&store, RangeEnd::Inclusive)),
            vec![(day(1), 1.0, 0.0), (day(2), 0.0, 0.0), (day(3), 0.0, 2.0)]
        );
    }

    #[test]
    fn empty_backlog_has_no_rows() {
        let store = BacklogStore::new();
        assert!(daily_totals(&store, RangeEnd::Inclusive).is_empty());
    }
}
