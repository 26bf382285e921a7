//! # burnup-backlog
//!
//! Backlog layer for burn-up reporting.
//!
//! This crate provides:
//! - `IssueRecord` and `RecordReader` (streaming CSV ingestion by header name)
//! - `BacklogItem` (one reconstructed issue)
//! - `BacklogStore` (key -> item, with insert-or-upgrade placeholder semantics)
//! - `BacklogBuilder` (folds records into the store, collecting findings)
//!
//! Rows may arrive in any order. A child seen before its parent leaves a
//! placeholder behind; the parent's own row later upgrades it. Any item
//! with children carries zero points so totals are only counted at leaves.
//!
//! ## Data model
//!
//! ```text
//! CSV export (header row + one row per issue)
//!     ↓  RecordReader (ColumnMap resolved once)
//! IssueRecord stream
//!     ↓  BacklogBuilder::push (transform, insert_or_upgrade, mark_ancestors)
//! BacklogStore (read-only after ingestion)
//! ```

pub mod builder;
pub mod error;
pub mod fields;
pub mod finding;
pub mod ingest;
pub mod item;
pub mod store;

pub use builder::{BacklogBuilder, IngestSummary, build_backlog, load_backlog};
pub use error::IngestError;
pub use fields::{
    EXPORT_TIMESTAMP_FORMAT, FieldError, ISO_DATE_FORMAT, format_iso_date, parse_points,
    parse_timestamp,
};
pub use finding::{
    BacklogFinding, FINDING_CLASS_DATE_UNPARSEABLE, FINDING_CLASS_DUPLICATE,
    FINDING_CLASS_KEY_MISSING, FINDING_CLASS_PARENT_CYCLE, FINDING_CLASS_POINTS_UNPARSEABLE,
};
pub use ingest::{ColumnMap, ColumnNames, IssueRecord, RecordReader};
pub use item::BacklogItem;
pub use store::{BacklogStore, InsertOutcome, ParentCycle};
