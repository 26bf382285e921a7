//! No-points audit: leaf items that still lack an estimate.

use burnup_backlog::BacklogStore;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoPointsRow {
    pub item_type: String,
    pub id: String,
    pub was_closed: bool,
}

/// Leaves whose points are exactly zero, in key order.
pub fn no_points_audit(store: &BacklogStore) -> Vec<NoPointsRow> {
    store
        .leaves()
        .filter(|item| item.points == 0.0)
        .map(|item| NoPointsRow {
            item_type: item.item_type.clone(),
            id: item.id.clone(),
            was_closed: item.is_closed(),
        })
        .collect()
}
