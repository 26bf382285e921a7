//! CSV ingestion: header resolution and streaming issue records.
//!
//! The export's column order is arbitrary. Positions are resolved once from
//! the header row into a [`ColumnMap`] that travels with the reader; there
//! is no process-wide column state.

use crate::error::IngestError;
use csv::{ByteRecord, ReaderBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

pub const JIRA_COLUMN_ISSUE_KEY: &str = "Issue key";
pub const JIRA_COLUMN_ISSUE_ID: &str = "Issue id";
pub const JIRA_COLUMN_ISSUE_TYPE: &str = "Issue Type";
pub const JIRA_COLUMN_STATUS: &str = "Status";
pub const JIRA_COLUMN_CREATED: &str = "Created";
pub const JIRA_COLUMN_RESOLVED: &str = "Resolved";
pub const JIRA_COLUMN_LABELS: &str = "Labels";
pub const JIRA_COLUMN_POINTS: &str = "Custom field (Story point estimate)";
pub const JIRA_COLUMN_PARENT: &str = "Parent";

/// Header names for each required field.
///
/// Defaults match the Jira cloud export. Note the naming inversion: Jira's
/// "Issue key" is the human-readable id, "Issue id" the stable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct ColumnNames {
    pub id: String,
    pub key: String,
    pub issue_type: String,
    pub status: String,
    pub created: String,
    pub resolved: String,
    pub labels: String,
    pub points: String,
    pub parent_key: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            id: JIRA_COLUMN_ISSUE_KEY.to_string(),
            key: JIRA_COLUMN_ISSUE_ID.to_string(),
            issue_type: JIRA_COLUMN_ISSUE_TYPE.to_string(),
            status: JIRA_COLUMN_STATUS.to_string(),
            created: JIRA_COLUMN_CREATED.to_string(),
            resolved: JIRA_COLUMN_RESOLVED.to_string(),
            labels: JIRA_COLUMN_LABELS.to_string(),
            points: JIRA_COLUMN_POINTS.to_string(),
            parent_key: JIRA_COLUMN_PARENT.to_string(),
        }
    }
}

/// One export row with its cells picked out by name. Values are raw text;
/// typed conversion happens when the record is folded into the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueRecord {
    /// 1-based line in the export, for diagnostics.
    pub line: u64,
    pub id: String,
    pub key: String,
    pub issue_type: String,
    pub status: String,
    pub created: String,
    pub resolved: String,
    pub labels: String,
    pub points: String,
    pub parent_key: String,
}

/// Resolved column positions for one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    id: usize,
    key: usize,
    issue_type: usize,
    status: usize,
    created: usize,
    resolved: usize,
    /// Jira repeats the labels header once per label.
    labels: Vec<usize>,
    points: usize,
    parent_key: usize,
}

impl ColumnMap {
    /// Resolve every required column from a header row.
    ///
    /// The first occurrence of a repeated header wins, except labels where
    /// every occurrence is kept. All missing names are reported together.
    pub fn resolve(headers: &ByteRecord, names: &ColumnNames) -> Result<Self, IngestError> {
        let headers: Vec<String> = headers
            .iter()
            .map(|h| {
                String::from_utf8_lossy(h)
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .to_string()
            })
            .collect();
        let mut missing = Vec::new();
        let mut find = |name: &str| -> usize {
            match headers.iter().position(|h| h == name) {
                Some(index) => index,
                None => {
                    missing.push(name.to_string());
                    0
                }
            }
        };

        let id = find(names.id.as_str());
        let key = find(names.key.as_str());
        let issue_type = find(names.issue_type.as_str());
        let status = find(names.status.as_str());
        let created = find(names.created.as_str());
        let resolved = find(names.resolved.as_str());
        let points = find(names.points.as_str());
        let parent_key = find(names.parent_key.as_str());
        let labels: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| **h == names.labels)
            .map(|(index, _)| index)
            .collect();
        if labels.is_empty() {
            missing.push(names.labels.clone());
        }

        if !missing.is_empty() {
            return Err(IngestError::MissingColumns(missing));
        }
        Ok(Self {
            id,
            key,
            issue_type,
            status,
            created,
            resolved,
            labels,
            points,
            parent_key,
        })
    }

    /// Pick this map's cells out of a row. Short rows read as empty cells.
    ///
    /// Cells are decoded lossily; bytes that are not UTF-8 become U+FFFD.
    /// Columns outside the map are never decoded.
    pub fn record(&self, row: &ByteRecord) -> IssueRecord {
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let cell = |index: usize| decode_cell(row, index, line);
        let labels = self
            .labels
            .iter()
            .map(|index| cell(*index))
            .filter(|label| !label.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        IssueRecord {
            line,
            id: cell(self.id),
            key: cell(self.key),
            issue_type: cell(self.issue_type),
            status: cell(self.status),
            created: cell(self.created),
            resolved: cell(self.resolved),
            labels,
            points: cell(self.points),
            parent_key: cell(self.parent_key),
        }
    }
}

fn decode_cell(row: &ByteRecord, index: usize, line: u64) -> String {
    let raw = row.get(index).unwrap_or_default();
    match std::str::from_utf8(raw) {
        Ok(text) => text.trim().to_string(),
        Err(_) => {
            log::warn!("line {line}: column {index} is not valid UTF-8; invalid bytes replaced");
            String::from_utf8_lossy(raw).trim().to_string()
        }
    }
}

/// Streaming reader over an export: yields one [`IssueRecord`] per row.
///
/// Iteration stops after the first read error.
pub struct RecordReader<R: Read> {
    reader: csv::Reader<R>,
    columns: ColumnMap,
    row: ByteRecord,
    failed: bool,
}

impl<R: Read> RecordReader<R> {
    /// Read the header row and resolve columns.
    pub fn new(input: R, names: &ColumnNames) -> Result<Self, IngestError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut headers = ByteRecord::new();
        let has_header = reader
            .read_byte_record(&mut headers)
            .map_err(|source| IngestError::Read { row: 1, source })?;
        if !has_header {
            return Err(IngestError::MissingHeader);
        }
        let columns = ColumnMap::resolve(&headers, names)?;

        Ok(Self {
            reader,
            columns,
            row: ByteRecord::new(),
            failed: false,
        })
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }
}

impl RecordReader<Box<dyn Read>> {
    /// Open an export file, or standard input when `path` is `None`.
    pub fn open(path: Option<&Path>, names: &ColumnNames) -> Result<Self, IngestError> {
        let input: Box<dyn Read> = match path {
            Some(path) => {
                let file = File::open(path).map_err(|source| IngestError::Open {
                    path: path.display().to_string(),
                    source,
                })?;
                Box::new(BufReader::new(file))
            }
            None => Box::new(BufReader::new(io::stdin())),
        };
        Self::new(input, names)
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<IssueRecord, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.reader.read_byte_record(&mut self.row) {
            Ok(true) => Some(Ok(self.columns.record(&self.row))),
            Ok(false) => None,
            Err(source) => {
                self.failed = true;
                let row = source
                    .position()
                    .map(|p| p.line())
                    .unwrap_or_else(|| self.reader.position().line());
                Some(Err(IngestError::Read { row, source }))
            }
        }
    }
}
