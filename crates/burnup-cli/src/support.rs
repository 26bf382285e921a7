use crate::config::ConfigFile;
use burnup_backlog::{
    BacklogFinding, BacklogStore, ColumnNames, ISO_DATE_FORMAT, IngestSummary, load_backlog,
};
use chrono::{Local, NaiveDate};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

pub const FINDING_SAMPLE_LIMIT: usize = 25;
const STDIN_LABEL: &str = "<stdin>";

pub fn load_config_or_exit(config: Option<&str>) -> ConfigFile {
    let Some(path) = config else {
        return ConfigFile::default();
    };
    ConfigFile::load(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn load_backlog_or_exit(
    input: Option<&str>,
    columns: &ColumnNames,
) -> (BacklogStore, IngestSummary) {
    let path = input.map(PathBuf::from);
    load_backlog(path.as_deref(), columns).unwrap_or_else(|e| {
        eprintln!("error: failed to load {}: {e}", source_label(input));
        std::process::exit(1);
    })
}

pub fn report_date_or_exit(as_of: Option<&str>) -> NaiveDate {
    match as_of {
        None => Local::now().date_naive(),
        Some(raw) => NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT).unwrap_or_else(|e| {
            eprintln!("error: invalid --as-of date `{raw}` (expected YYYY-MM-DD): {e}");
            std::process::exit(1);
        }),
    }
}

pub fn source_label(input: Option<&str>) -> String {
    input.unwrap_or(STDIN_LABEL).to_string()
}

pub fn display_path(path: &Path) -> String {
    path.display().to_string()
}

pub fn sample_with_truncation<T>(mut values: Vec<T>, limit: usize) -> (Vec<T>, usize) {
    if values.len() <= limit {
        return (values, 0);
    }
    let truncated = values.len() - limit;
    values.truncate(limit);
    (values, truncated)
}

/// Backlog shape shared by every command's output.
pub fn backlog_counts_json(store: &BacklogStore) -> Value {
    json!({
        "itemCount": store.len(),
        "leafCount": store.leaves().count(),
        "unresolvedParentCount": store.placeholders().count(),
    })
}

pub fn print_backlog_counts(store: &BacklogStore, summary: &IngestSummary) {
    println!("  Records read: {}", summary.records_read);
    println!(
        "  Backlog items: {} (leaves: {}, unresolved parents: {})",
        store.len(),
        store.leaves().count(),
        store.placeholders().count()
    );
    if summary.upgraded > 0 {
        println!("  Parents read after their children: {}", summary.upgraded);
    }
    if summary.skipped > 0 {
        println!("  Rows skipped: {}", summary.skipped);
    }
}

pub fn print_findings(findings: &[BacklogFinding], truncated: usize) {
    if findings.is_empty() {
        return;
    }
    println!("  Findings:");
    for finding in findings {
        println!(
            "    - line {} {} {} ({})",
            finding.line, finding.issue_id, finding.class, finding.message
        );
    }
    if truncated > 0 {
        println!("    ... {truncated} more");
    }
}

pub fn print_json_or_exit(payload: &Value) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|e| {
        eprintln!("error: failed to render json payload: {e}");
        std::process::exit(2);
    });
    println!("{rendered}");
}
