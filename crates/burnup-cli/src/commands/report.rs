use crate::config::Settings;
use crate::support::{
    FINDING_SAMPLE_LIMIT, backlog_counts_json, display_path, load_backlog_or_exit,
    load_config_or_exit, print_backlog_counts, print_findings, print_json_or_exit,
    report_date_or_exit, sample_with_truncation, source_label,
};
use burnup_backlog::format_iso_date;
use burnup_report::{BurnupReport, RangeEnd};
use serde_json::json;

#[derive(Debug, Default)]
pub struct Args {
    pub input: Option<String>,
    pub out_dir: Option<String>,
    pub as_of: Option<String>,
    pub range_end: Option<RangeEnd>,
    pub config: Option<String>,
    pub json: bool,
}

pub fn run(args: Args) {
    let settings = Settings::resolve(
        load_config_or_exit(args.config.as_deref()),
        args.out_dir,
        args.range_end,
    );
    log::debug!("resolved settings: {settings:?}");
    let date = report_date_or_exit(args.as_of.as_deref());
    let (store, summary) = load_backlog_or_exit(args.input.as_deref(), &settings.columns);

    let report = BurnupReport::from_store(&store, settings.range_end);
    let written = report
        .write_all(&settings.output_root, date)
        .unwrap_or_else(|e| {
            eprintln!("error: unable to write report: {e}");
            std::process::exit(1);
        });

    let (findings, findings_truncated) =
        sample_with_truncation(summary.findings.clone(), FINDING_SAMPLE_LIMIT);

    if args.json {
        let payload = json!({
            "source": source_label(args.input.as_deref()),
            "reportDate": format_iso_date(date),
            "outputRoot": display_path(&settings.output_root),
            "rangeEnd": settings.range_end,
            "recordsRead": summary.records_read,
            "backlog": backlog_counts_json(&store),
            "totalPoints": report.snapshot.total_points,
            "findingCount": summary.findings.len(),
            "findingsSample": findings,
            "findingsTruncatedCount": findings_truncated,
            "written": written,
        });
        print_json_or_exit(&payload);
    } else {
        println!("burnup report {}", format_iso_date(date));
        println!("  Source: {}", source_label(args.input.as_deref()));
        print_backlog_counts(&store, &summary);
        println!("  Leaf points: {:.2}", report.snapshot.total_points);
        print_findings(&findings, findings_truncated);
        println!("  Wrote:");
        for file in &written {
            println!("    - {} ({} row(s))", display_path(&file.path), file.rows);
        }
    }
}
