//! Leaf snapshot: every item without children, with its points.

use burnup_backlog::BacklogStore;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRow {
    pub item_type: String,
    pub id: String,
    pub opened: Option<NaiveDate>,
    pub closed: Option<NaiveDate>,
    pub points: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafSnapshot {
    pub rows: Vec<SnapshotRow>,
    /// Sum of `points` over `rows`.
    pub total_points: f64,
}

/// Collect the leaf items in key order and total their points.
pub fn leaf_snapshot(store: &BacklogStore) -> LeafSnapshot {
    let mut snapshot = LeafSnapshot::default();
    for item in store.leaves() {
        snapshot.total_points += item.points;
        snapshot.rows.push(SnapshotRow {
            item_type: item.item_type.clone(),
            id: item.id.clone(),
            opened: item.opened_day(),
            closed: item.closed_day(),
            points: item.points,
        });
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{EXPORT_HEADER, store_from_csv};

    #[test]
    fn snapshot_lists_exactly_the_leaves() {
        let store = store_from_csv(&format!(
            "{EXPORT_HEADER}\n\
             PRJ-1,1,Epic,Open,01/Jan/24 9:00 AM,,,21,\n\
             PRJ-2,2,Story,Done,02/Jan/24 9:00 AM,04/Jan/24 4:00 PM,,3,1\n\
             PRJ-3,3,Story,Open,03/Jan/24 9:00 AM,,,5,1\n\
             PRJ-4,4,Bug,Open,03/Jan/24 9:00 AM,,,,\n"
        ));

        let snapshot = leaf_snapshot(&store);
        let ids: Vec<&str> = snapshot.rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["PRJ-2", "PRJ-3", "PRJ-4"]);
        assert_eq!(snapshot.total_points, 8.0);
        assert_eq!(
            snapshot.total_points,
            snapshot.rows.iter().map(|row| row.points).sum::<f64>()
        );

        let done = &snapshot.rows[0];
        assert_eq!(done.opened, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(done.closed, NaiveDate::from_ymd_opt(2024, 1, 4));
        assert_eq!(snapshot.rows[1].closed, None);
    }

    #[test]
    fn unresolved_placeholders_are_not_leaves() {
        let store = store_from_csv(&format!(
            "{EXPORT_HEADER}\nPRJ-7,7,Story,Open,,,,2,99\n"
        ));
        let snapshot = leaf_snapshot(&store);
        assert_eq!(store.len(), 2);
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.total_points, 2.0);
    }
}
