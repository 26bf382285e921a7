//! Canonical in-memory backlog: key -> reconstructed item.
//!
//! All hierarchy bookkeeping goes through two operations:
//! - [`BacklogStore::insert_or_upgrade`] places a full record, upgrading a
//!   placeholder if one is waiting under the same key
//! - [`BacklogStore::mark_ancestors`] walks up from a parent key, creating a
//!   placeholder for the first unseen ancestor and zeroing every known one
//!
//! Together they keep the placeholder and zero-points invariants in one place.

use crate::item::BacklogItem;
use std::collections::{BTreeMap, BTreeSet};

/// What [`BacklogStore::insert_or_upgrade`] did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// First sighting of the key.
    Inserted,
    /// The key was a placeholder; it now carries the real record, keeps
    /// `has_children` and drops the record's points.
    Upgraded,
    /// The key's own record was already read; nothing changed.
    Duplicate,
}

/// The ancestor walk revisited a key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parent chain loops back to {key}")]
pub struct ParentCycle {
    pub key: String,
}

#[derive(Debug, Clone, Default)]
pub struct BacklogStore {
    items: BTreeMap<String, BacklogItem>,
}

impl BacklogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries, placeholders included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lookup one item by key.
    pub fn get(&self, key: &str) -> Option<&BacklogItem> {
        self.items.get(key)
    }

    /// Whether `key` already carries its own record (not just a placeholder).
    pub fn is_recorded(&self, key: &str) -> bool {
        self.items.get(key).is_some_and(|item| !item.placeholder)
    }

    /// Iterate all items in deterministic key order.
    pub fn items(&self) -> impl Iterator<Item = &BacklogItem> {
        self.items.values()
    }

    /// Iterate items with no children: the only ones that carry points.
    pub fn leaves(&self) -> impl Iterator<Item = &BacklogItem> {
        self.items().filter(|item| item.is_leaf())
    }

    /// Parents referenced by some row whose own row never arrived.
    pub fn placeholders(&self) -> impl Iterator<Item = &BacklogItem> {
        self.items().filter(|item| item.placeholder)
    }

    /// Insert a full record, or upgrade the placeholder waiting under its key.
    ///
    /// A key whose own record was already read is left untouched, whether or
    /// not it has gained children since.
    pub fn insert_or_upgrade(&mut self, item: BacklogItem) -> InsertOutcome {
        match self.items.get_mut(&item.key) {
            Some(existing) if !existing.placeholder => InsertOutcome::Duplicate,
            Some(existing) => {
                *existing = BacklogItem {
                    has_children: true,
                    placeholder: false,
                    points: 0.0,
                    ..item
                };
                InsertOutcome::Upgraded
            }
            None => {
                let key = item.key.clone();
                self.items.insert(
                    key,
                    BacklogItem {
                        has_children: false,
                        placeholder: false,
                        ..item
                    },
                );
                InsertOutcome::Inserted
            }
        }
    }

    /// Flag every ancestor of `child_key`, starting at `parent_key`.
    ///
    /// An unseen parent becomes a placeholder and ends the walk; its real
    /// record finds out it has children when it is upgraded. Known parents
    /// are zeroed and the walk continues through their own parent key.
    pub fn mark_ancestors(&mut self, child_key: &str, parent_key: &str) -> Result<(), ParentCycle> {
        let mut visited = BTreeSet::from([child_key.to_string()]);
        let mut next = parent_key.to_string();

        while !next.is_empty() {
            if !visited.insert(next.clone()) {
                return Err(ParentCycle { key: next });
            }
            match self.items.get_mut(&next) {
                Some(parent) => {
                    parent.mark_has_children();
                    next = parent.parent_key.clone();
                }
                None => {
                    let placeholder = BacklogItem::placeholder(next.clone());
                    self.items.insert(next, placeholder);
                    break;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str, parent_key: &str, points: f64) -> BacklogItem {
        BacklogItem {
            key: key.to_string(),
            id: format!("PRJ-{key}"),
            item_type: "Story".to_string(),
            parent_key: parent_key.to_string(),
            points,
            ..BacklogItem::default()
        }
    }

    #[test]
    fn first_insert_is_a_leaf() {
        let mut store = BacklogStore::new();
        assert_eq!(
            store.insert_or_upgrade(item("1", "", 3.0)),
            InsertOutcome::Inserted
        );
        let stored = store.get("1").expect("item must exist");
        assert!(stored.is_leaf());
        assert!(!stored.placeholder);
        assert_eq!(stored.points, 3.0);
    }

    #[test]
    fn upgrade_keeps_children_and_drops_points() {
        let mut store = BacklogStore::new();
        store
            .mark_ancestors("2", "1")
            .expect("no cycle in a two-level chain");
        assert!(store.get("1").expect("placeholder").placeholder);

        assert_eq!(
            store.insert_or_upgrade(item("1", "", 8.0)),
            InsertOutcome::Upgraded
        );
        let parent = store.get("1").expect("upgraded item");
        assert!(parent.has_children);
        assert!(!parent.placeholder);
        assert_eq!(parent.points, 0.0);
        assert_eq!(parent.id, "PRJ-1");
    }

    #[test]
    fn recorded_key_is_duplicate_even_with_children() {
        let mut store = BacklogStore::new();
        store.insert_or_upgrade(item("1", "", 0.0));
        store.mark_ancestors("2", "1").expect("no cycle");

        let mut replacement = item("1", "", 5.0);
        replacement.id = "PRJ-OTHER".to_string();
        assert_eq!(
            store.insert_or_upgrade(replacement),
            InsertOutcome::Duplicate
        );
        let parent = store.get("1").expect("item must exist");
        assert_eq!(parent.id, "PRJ-1");
        assert!(parent.has_children);
    }

    #[test]
    fn walk_zeroes_every_known_ancestor() {
        let mut store = BacklogStore::new();
        store.insert_or_upgrade(item("epic", "", 13.0));
        store.insert_or_upgrade(item("story", "epic", 5.0));
        store.insert_or_upgrade(item("task", "story", 2.0));
        store.mark_ancestors("task", "story").expect("no cycle");

        assert_eq!(store.get("epic").expect("epic").points, 0.0);
        assert!(store.get("epic").expect("epic").has_children);
        assert_eq!(store.get("story").expect("story").points, 0.0);
        assert!(store.get("task").expect("task").is_leaf());
        assert_eq!(store.leaves().count(), 1);
    }

    #[test]
    fn walk_stops_at_first_unseen_ancestor() {
        let mut store = BacklogStore::new();
        store.mark_ancestors("task", "story").expect("no cycle");
        assert_eq!(store.len(), 1);
        assert_eq!(store.placeholders().count(), 1);
        assert!(store.get("epic").is_none());
    }

    #[test]
    fn walk_reports_cycles() {
        let mut store = BacklogStore::new();
        store.insert_or_upgrade(item("a", "b", 1.0));
        store.insert_or_upgrade(item("b", "a", 1.0));

        let err = store
            .mark_ancestors("b", "a")
            .expect_err("a -> b -> a must be detected");
        assert_eq!(err.key, "b");
        assert!(store.get("a").expect("a").has_children);
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let mut store = BacklogStore::new();
        store.insert_or_upgrade(item("a", "a", 1.0));
        let err = store.mark_ancestors("a", "a").expect_err("self loop");
        assert_eq!(err.key, "a");
        assert!(store.get("a").expect("a").is_leaf());
    }
}
