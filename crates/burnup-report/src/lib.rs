//! # burnup-report
//!
//! Read-only views over a finished `BacklogStore`, and the CSV files they
//! are written to. Every view skips items with children; only leaves carry
//! points.
//!
//! - `leaf_snapshot`: each leaf with its dates and points, plus the total
//! - `no_points_audit`: leaves still missing an estimate
//! - `daily_totals`: points opened and closed per calendar day
//!
//! `BurnupReport` bundles the three and writes them under an output root.

pub mod audit;
pub mod error;
pub mod report;
pub mod snapshot;
pub mod totals;
pub mod writer;

pub use audit::{NoPointsRow, no_points_audit};
pub use error::ReportError;
pub use report::{BurnupReport, WrittenReport};
pub use snapshot::{LeafSnapshot, SnapshotRow, leaf_snapshot};
pub use totals::{DailyTotal, RangeEnd, daily_totals};
pub use writer::{
    DEFAULT_OUTPUT_ROOT, ReportKind, render_no_points, render_snapshot, render_totals,
    write_report,
};

#[cfg(test)]
pub(crate) mod test_support {
    use burnup_backlog::{BacklogStore, ColumnNames, RecordReader, build_backlog};

    pub const EXPORT_HEADER: &str = "Issue key,Issue id,Issue Type,Status,Created,Resolved,Labels,Custom field (Story point estimate),Parent";

    pub fn store_from_csv(csv: &str) -> BacklogStore {
        let reader = RecordReader::new(csv.as_bytes(), &ColumnNames::default())
            .expect("fixture header should resolve");
        let (store, _) = build_backlog(reader).expect("fixture rows should read");
        store
    }
}
