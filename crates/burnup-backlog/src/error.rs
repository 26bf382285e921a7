//! Error types for backlog ingestion.

/// Fatal problems reading an export. Per-record field problems are not
/// errors; they surface as findings on the ingest summary.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The stream could not be read or is not valid CSV.
    #[error("row {row}: failed to read export: {source}")]
    Read {
        row: u64,
        #[source]
        source: csv::Error,
    },

    /// The input ended before a header row was seen.
    #[error("export is empty: no header row")]
    MissingHeader,

    /// The header row lacks one or more required columns.
    #[error("header is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The input file could not be opened.
    #[error("{path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
