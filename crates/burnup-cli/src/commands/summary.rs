use crate::support::{
    FINDING_SAMPLE_LIMIT, backlog_counts_json, load_backlog_or_exit, load_config_or_exit,
    print_backlog_counts, print_findings, print_json_or_exit, sample_with_truncation,
    source_label,
};
use burnup_report::leaf_snapshot;
use serde_json::json;
use std::collections::BTreeMap;

pub fn run(input: Option<String>, config: Option<String>, json_output: bool) {
    let file = load_config_or_exit(config.as_deref());
    let (store, summary) = load_backlog_or_exit(input.as_deref(), &file.columns);
    let snapshot = leaf_snapshot(&store);

    let mut finding_classes: BTreeMap<&str, usize> = BTreeMap::new();
    for finding in &summary.findings {
        *finding_classes.entry(finding.class.as_str()).or_default() += 1;
    }
    let (findings, findings_truncated) =
        sample_with_truncation(summary.findings.clone(), FINDING_SAMPLE_LIMIT);

    if json_output {
        let payload = json!({
            "source": source_label(input.as_deref()),
            "recordsRead": summary.records_read,
            "inserted": summary.inserted,
            "upgraded": summary.upgraded,
            "skipped": summary.skipped,
            "backlog": backlog_counts_json(&store),
            "totalPoints": snapshot.total_points,
            "findingClasses": finding_classes,
            "findingsSample": findings,
            "findingsTruncatedCount": findings_truncated,
        });
        print_json_or_exit(&payload);
    } else {
        println!("burnup summary");
        println!("  Source: {}", source_label(input.as_deref()));
        print_backlog_counts(&store, &summary);
        println!("  Leaf points: {:.2}", snapshot.total_points);
        print_findings(&findings, findings_truncated);
    }
}
