//! CSV rendering and on-disk layout for the three burn-up reports.
//!
//! ```text
//! <root>/Snapshots/Backlog Snapshot <date>.csv
//! <root>/Audits/No Points <date>.csv
//! <root>/Totals/Totals <date>.csv
//! ```

use crate::audit::NoPointsRow;
use crate::error::ReportError;
use crate::snapshot::LeafSnapshot;
use crate::totals::DailyTotal;
use burnup_backlog::format_iso_date;
use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_OUTPUT_ROOT: &str = "Burnup";

/// One of the three report files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Snapshot,
    NoPoints,
    Totals,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [Self::Snapshot, Self::NoPoints, Self::Totals];

    /// Subdirectory under the output root.
    pub fn dir(self) -> &'static str {
        match self {
            Self::Snapshot => "Snapshots",
            Self::NoPoints => "Audits",
            Self::Totals => "Totals",
        }
    }

    /// File-name label preceding the report date.
    pub fn label(self) -> &'static str {
        match self {
            Self::Snapshot => "Backlog Snapshot",
            Self::NoPoints => "No Points",
            Self::Totals => "Totals",
        }
    }

    pub fn path(self, root: &Path, date: NaiveDate) -> PathBuf {
        root.join(self.dir())
            .join(format!("{} {}.csv", self.label(), format_iso_date(date)))
    }
}

/// One output cell. Text is always quoted; values are written bare.
enum Cell {
    Text(String),
    Value(String),
}

impl Cell {
    fn into_field(self) -> String {
        match self {
            Self::Text(text) => format!("\"{}\"", text.replace('"', "\"\"")),
            Self::Value(value) => value,
        }
    }
}

fn render(header: &[&str], rows: Vec<Vec<Cell>>) -> Result<String, ReportError> {
    // Cells arrive already quoted.
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let header: Vec<Cell> = header.iter().map(|name| Cell::Text(name.to_string())).collect();
    for row in std::iter::once(header).chain(rows) {
        let fields: Vec<String> = row.into_iter().map(Cell::into_field).collect();
        writer.write_record(&fields)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Render(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Render(e.to_string()))
}

fn optional_day(day: Option<NaiveDate>) -> Cell {
    Cell::Text(day.map(format_iso_date).unwrap_or_default())
}

/// `type,id,opened,closed,points`; closed is blank while the item is open.
pub fn render_snapshot(snapshot: &LeafSnapshot) -> Result<String, ReportError> {
    let rows = snapshot
        .rows
        .iter()
        .map(|row| {
            vec![
                Cell::Text(row.item_type.clone()),
                Cell::Text(row.id.clone()),
                optional_day(row.opened),
                optional_day(row.closed),
                Cell::Value(format!("{:.2}", row.points)),
            ]
        })
        .collect();
    render(&["type", "id", "opened", "closed", "points"], rows)
}

/// `type,id,closed` where closed is a bare `true`/`false` for whether a
/// resolution date exists.
pub fn render_no_points(rows: &[NoPointsRow]) -> Result<String, ReportError> {
    let rows = rows
        .iter()
        .map(|row| {
            vec![
                Cell::Text(row.item_type.clone()),
                Cell::Text(row.id.clone()),
                Cell::Value(row.was_closed.to_string()),
            ]
        })
        .collect();
    render(&["type", "id", "closed"], rows)
}

/// `date,pointsOpened,pointsClosed`; every data cell is bare.
pub fn render_totals(totals: &[DailyTotal]) -> Result<String, ReportError> {
    let rows = totals
        .iter()
        .map(|total| {
            vec![
                Cell::Value(format_iso_date(total.day)),
                Cell::Value(format!("{:.2}", total.points_opened)),
                Cell::Value(format!("{:.2}", total.points_closed)),
            ]
        })
        .collect();
    render(&["date", "pointsOpened", "pointsClosed"], rows)
}

/// Write one report, creating parent directories on demand.
///
/// Contents land in a sibling temp file that is renamed into place, so a
/// failed write never leaves a truncated report behind.
pub fn write_report(path: impl AsRef<Path>, contents: &str) -> Result<(), ReportError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), ReportError> {
        let file = File::create(&tmp_path).map_err(|e| ReportError::io(&tmp_path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(contents.as_bytes())
            .map_err(|e| ReportError::io(&tmp_path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| ReportError::io(&tmp_path, e.into_error()))?;
        file.sync_all().map_err(|e| ReportError::io(&tmp_path, e))?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        ReportError::io(path, e)
    })?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotRow;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).expect("valid January date")
    }

    #[test]
    fn report_paths_follow_directory_convention() {
        let root = Path::new("Burnup");
        assert_eq!(
            ReportKind::Snapshot.path(root, day(9)),
            PathBuf::from("Burnup/Snapshots/Backlog Snapshot 2024-01-09.csv")
        );
        assert_eq!(
            ReportKind::NoPoints.path(root, day(9)),
            PathBuf::from("Burnup/Audits/No Points 2024-01-09.csv")
        );
        assert_eq!(
            ReportKind::Totals.path(root, day(9)),
            PathBuf::from("Burnup/Totals/Totals 2024-01-09.csv")
        );
    }

    #[test]
    fn snapshot_renders_quoted_text_and_fixed_points() {
        let snapshot = LeafSnapshot {
            rows: vec![
                SnapshotRow {
                    item_type: "Story".to_string(),
                    id: "PRJ-2".to_string(),
                    opened: Some(day(2)),
                    closed: Some(day(4)),
                    points: 3.0,
                },
                SnapshotRow {
                    item_type: "Bug".to_string(),
                    id: "PRJ-3".to_string(),
                    opened: Some(day(3)),
                    closed: None,
                    points: 0.5,
                },
            ],
            total_points: 3.5,
        };

        let rendered = render_snapshot(&snapshot).expect("render should succeed");
        insta::assert_snapshot!(rendered, @r#"
        "type","id","opened","closed","points"
        "Story","PRJ-2","2024-01-02","2024-01-04",3.00
        "Bug","PRJ-3","2024-01-03","",0.50
        "#);
    }

    #[test]
    fn no_points_renders_close_flag() {
        let rows = vec![NoPointsRow {
            item_type: "Story".to_string(),
            id: "PRJ-9".to_string(),
            was_closed: true,
        }];
        let rendered = render_no_points(&rows).expect("render should succeed");
        insta::assert_snapshot!(rendered, @r#"
        "type","id","closed"
        "Story","PRJ-9",true
        "#);
    }

    #[test]
    fn totals_render_two_decimals() {
        let totals = vec![
            DailyTotal {
                day: day(1),
                points_opened: 3.0,
                points_closed: 0.0,
            },
            DailyTotal {
                day: day(2),
                points_opened: 0.0,
                points_closed: 1.25,
            },
        ];
        let rendered = render_totals(&totals).expect("render should succeed");
        insta::assert_snapshot!(rendered, @r#"
        "date","pointsOpened","pointsClosed"
        2024-01-01,3.00,0.00
        2024-01-02,0.00,1.25
        "#);
    }

    #[test]
    fn embedded_quotes_are_escaped() {
        let rows = vec![NoPointsRow {
            item_type: "Bug, urgent".to_string(),
            id: "PRJ-\"1\"".to_string(),
            was_closed: false,
        }];
        let rendered = render_no_points(&rows).expect("render should succeed");
        assert!(rendered.ends_with("\"Bug, urgent\",\"PRJ-\"\"1\"\"\",false\n"));
    }

    #[test]
    fn write_report_creates_directories_and_replaces_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = ReportKind::Totals.path(&dir.path().join("Burnup"), day(1));

        write_report(&path, "first\n").expect("first write should succeed");
        write_report(&path, "second\n").expect("second write should succeed");

        assert_eq!(
            fs::read_to_string(&path).expect("report should exist"),
            "second\n"
        );
        let siblings: Vec<_> = fs::read_dir(path.parent().expect("parent dir"))
            .expect("dir should list")
            .collect();
        assert_eq!(siblings.len(), 1, "temp files must not linger");
    }

    #[test]
    fn write_report_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("Burnup");
        fs::write(&blocker, "not a directory").expect("blocker should write");

        let err = write_report(ReportKind::Snapshot.path(&blocker, day(1)), "x")
            .expect_err("writing under a file must fail");
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
