//! Backlog item: one reconstructed issue in the hierarchy.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One issue as reconstructed from the export.
///
/// Points are only meaningful at leaf granularity. Once an item is known to
/// have children its points are pinned to zero so totals never count the
/// same work at two levels of the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacklogItem {
    // ── Identification ──
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    // ── Hierarchy ──
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_key: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub placeholder: bool,

    // ── Timestamps ──
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<NaiveDateTime>,

    // ── Estimate ──
    #[serde(default)]
    pub points: f64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tags: String,
}

impl BacklogItem {
    /// A bare entry for a parent referenced before its own row was read.
    pub fn placeholder(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            has_children: true,
            placeholder: true,
            ..Self::default()
        }
    }

    /// Whether this item counts toward point totals.
    pub fn is_leaf(&self) -> bool {
        !self.has_children
    }

    /// Whether a resolution timestamp is present.
    pub fn is_closed(&self) -> bool {
        self.closed.is_some()
    }

    pub fn opened_day(&self) -> Option<NaiveDate> {
        self.opened.map(|ts| ts.date())
    }

    pub fn closed_day(&self) -> Option<NaiveDate> {
        self.closed.map(|ts| ts.date())
    }

    /// Record that some other item names this one as parent.
    ///
    /// Idempotent; points stay at zero from here on.
    pub fn mark_has_children(&mut self) {
        self.has_children = true;
        self.points = 0.0;
    }
}
