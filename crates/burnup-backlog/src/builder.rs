//! Fold a stream of export records into a [`BacklogStore`].

use crate::error::IngestError;
use crate::fields::{parse_points, parse_timestamp};
use crate::finding::{
    BacklogFinding, FINDING_CLASS_DATE_UNPARSEABLE, FINDING_CLASS_DUPLICATE,
    FINDING_CLASS_KEY_MISSING, FINDING_CLASS_PARENT_CYCLE, FINDING_CLASS_POINTS_UNPARSEABLE,
};
use crate::ingest::{ColumnNames, IssueRecord, RecordReader};
use crate::item::BacklogItem;
use crate::store::{BacklogStore, InsertOutcome};
use serde::Serialize;
use std::path::Path;

/// Counters and findings from one ingestion pass.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub records_read: usize,
    pub inserted: usize,
    pub upgraded: usize,
    pub skipped: usize,
    pub findings: Vec<BacklogFinding>,
}

impl IngestSummary {
    /// Number of findings with the given class.
    pub fn count_class(&self, class: &str) -> usize {
        self.findings.iter().filter(|f| f.class == class).count()
    }
}

/// Owns the store for the duration of an ingestion pass.
#[derive(Debug, Default)]
pub struct BacklogBuilder {
    store: BacklogStore,
    summary: IngestSummary,
}

impl BacklogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the backlog.
    ///
    /// Field problems are warned about and defaulted; duplicates and
    /// keyless rows are warned about and skipped. Nothing here is fatal.
    pub fn push(&mut self, record: &IssueRecord) -> Option<InsertOutcome> {
        self.summary.records_read += 1;

        if record.key.is_empty() {
            self.skip(BacklogFinding::new(
                record.line,
                &record.id,
                FINDING_CLASS_KEY_MISSING,
                "row has no unique key",
            ));
            return None;
        }
        if self.store.is_recorded(&record.key) {
            self.skip(BacklogFinding::new(
                record.line,
                &record.id,
                FINDING_CLASS_DUPLICATE,
                format!("unexpected duplicate of key {}", record.key),
            ));
            return Some(InsertOutcome::Duplicate);
        }

        let item = self.transform(record);
        let outcome = self.store.insert_or_upgrade(item);
        match outcome {
            InsertOutcome::Inserted => self.summary.inserted += 1,
            InsertOutcome::Upgraded => {
                log::debug!("{} upgraded from placeholder", record.key);
                self.summary.upgraded += 1;
            }
            InsertOutcome::Duplicate => self.summary.skipped += 1,
        }

        if let Err(cycle) = self.store.mark_ancestors(&record.key, &record.parent_key) {
            self.report(BacklogFinding::new(
                record.line,
                &record.id,
                FINDING_CLASS_PARENT_CYCLE,
                cycle.to_string(),
            ));
        }
        Some(outcome)
    }

    /// Finish the pass; the store is read-only from here on.
    pub fn finish(self) -> (BacklogStore, IngestSummary) {
        log::info!(
            "ingested {} record(s) into {} backlog item(s), {} finding(s)",
            self.summary.records_read,
            self.store.len(),
            self.summary.findings.len()
        );
        (self.store, self.summary)
    }

    fn transform(&mut self, record: &IssueRecord) -> BacklogItem {
        let points = parse_points(&record.points).unwrap_or_else(|err| {
            self.report(BacklogFinding::new(
                record.line,
                &record.id,
                FINDING_CLASS_POINTS_UNPARSEABLE,
                format!("story points: {err}; using 0"),
            ));
            0.0
        });
        let opened = self.timestamp(record, "creation date", &record.created);
        let closed = self.timestamp(record, "resolution date", &record.resolved);

        BacklogItem {
            key: record.key.clone(),
            id: record.id.clone(),
            item_type: record.issue_type.clone(),
            status: record.status.clone(),
            parent_key: record.parent_key.clone(),
            opened,
            closed,
            points,
            tags: record.labels.clone(),
            ..BacklogItem::default()
        }
    }

    fn timestamp(
        &mut self,
        record: &IssueRecord,
        label: &str,
        raw: &str,
    ) -> Option<chrono::NaiveDateTime> {
        parse_timestamp(raw).unwrap_or_else(|err| {
            self.report(BacklogFinding::new(
                record.line,
                &record.id,
                FINDING_CLASS_DATE_UNPARSEABLE,
                format!("{label}: {err}; leaving it unset"),
            ));
            None
        })
    }

    fn report(&mut self, finding: BacklogFinding) {
        finding.log();
        self.summary.findings.push(finding);
    }

    fn skip(&mut self, finding: BacklogFinding) {
        self.summary.skipped += 1;
        self.report(finding);
    }
}

/// Build a backlog from any record stream. Stops at the first read error.
pub fn build_backlog<I>(records: I) -> Result<(BacklogStore, IngestSummary), IngestError>
where
    I: IntoIterator<Item = Result<IssueRecord, IngestError>>,
{
    let mut builder = BacklogBuilder::new();
    for record in records {
        builder.push(&record?);
    }
    Ok(builder.finish())
}

/// Read an export (a file, or standard input when `path` is `None`) and
/// build its backlog.
pub fn load_backlog(
    path: Option<&Path>,
    names: &ColumnNames,
) -> Result<(BacklogStore, IngestSummary), IngestError> {
    build_backlog(RecordReader::open(path, names)?)
}
