//! All three views derived from one finished backlog, and their files.

use crate::audit::{NoPointsRow, no_points_audit};
use crate::error::ReportError;
use crate::snapshot::{LeafSnapshot, leaf_snapshot};
use crate::totals::{DailyTotal, RangeEnd, daily_totals};
use crate::writer::{ReportKind, render_no_points, render_snapshot, render_totals, write_report};
use burnup_backlog::BacklogStore;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnupReport {
    pub snapshot: LeafSnapshot,
    pub no_points: Vec<NoPointsRow>,
    pub totals: Vec<DailyTotal>,
}

/// A report file that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WrittenReport {
    pub kind: ReportKind,
    pub path: PathBuf,
    pub rows: usize,
}

impl BurnupReport {
    /// Run the three read-only passes over a finished store.
    pub fn from_store(store: &BacklogStore, end: RangeEnd) -> Self {
        Self {
            snapshot: leaf_snapshot(store),
            no_points: no_points_audit(store),
            totals: daily_totals(store, end),
        }
    }

    pub fn rows(&self, kind: ReportKind) -> usize {
        match kind {
            ReportKind::Snapshot => self.snapshot.rows.len(),
            ReportKind::NoPoints => self.no_points.len(),
            ReportKind::Totals => self.totals.len(),
        }
    }

    pub fn render(&self, kind: ReportKind) -> Result<String, ReportError> {
        match kind {
            ReportKind::Snapshot => render_snapshot(&self.snapshot),
            ReportKind::NoPoints => render_no_points(&self.no_points),
            ReportKind::Totals => render_totals(&self.totals),
        }
    }

    /// Write every report under `root`, dated `date`. Stops at the first
    /// failure; files already written are left in place.
    pub fn write_all(
        &self,
        root: impl AsRef<Path>,
        date: NaiveDate,
    ) -> Result<Vec<WrittenReport>, ReportError> {
        let root = root.as_ref();
        let mut written = Vec::with_capacity(ReportKind::ALL.len());
        for kind in ReportKind::ALL {
            let path = kind.path(root, date);
            write_report(&path, &self.render(kind)?)?;
            log::info!("wrote {} row(s) to {}", self.rows(kind), path.display());
            written.push(WrittenReport {
                kind,
                path,
                rows: self.rows(kind),
            });
        }
        Ok(written)
    }
}
