use pagemirror_core::download::{AssetOutcome, AssetStatus};
use pagemirror_core::mirror::MirrorSummary;
use pagemirror_core::report::{ReportFormat, generate_json_report, generate_text_report, save_report};
use pagemirror_scanner::result::AssetKind;
use std::path::PathBuf;

fn sample_summary() -> MirrorSummary {
    MirrorSummary {
        target: "https://example.com/".to_string(),
        host: "example.com".to_string(),
        workspace: PathBuf::from("./example.com"),
        references_rewritten: 4,
        discovered: 3,
        written: 2,
        failed: 1,
        skipped: 0,
        collisions: 0,
        index_saved: true,
        elapsed_ms: 128,
        assets: vec![
            AssetOutcome {
                url: "https://example.com/app.js".to_string(),
                kind: AssetKind::Script,
                local_path: Some("app.js".to_string()),
                outcome: AssetStatus::Written,
            },
            AssetOutcome {
                url: "https://example.com/img/a.png".to_string(),
                kind: AssetKind::Image,
                local_path: Some("img/a.png".to_string()),
                outcome: AssetStatus::Written,
            },
            AssetOutcome {
                url: "https://cdn.example.com/dead.css".to_string(),
                kind: AssetKind::Link,
                local_path: Some("dead.css".to_string()),
                outcome: AssetStatus::Failed {
                    reason: "connection refused".to_string(),
                },
            },
        ],
    }
}

#[test]
fn test_report_format_from_str() {
    assert!(matches!(ReportFormat::from_str("text"), Some(ReportFormat::Text)));
    assert!(matches!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json)));
    assert!(ReportFormat::from_str("html").is_none());
}

#[test]
fn test_text_report_carries_summary_counts() {
    let report = generate_text_report(&sample_summary());

    assert!(report.contains("Target: https://example.com/"));
    assert!(report.contains("Assets discovered: 3"));
    assert!(report.contains("Files written: 2/3"));
    assert!(report.contains("Failed downloads: 1"));
    assert!(report.contains("Index saved: yes"));
    assert!(report.contains("app.js"));
    assert!(report.contains("connection refused"));
    // Zero-count lines stay out of the report
    assert!(!report.contains("Path collisions"));
}

#[test]
fn test_text_report_is_free_of_terminal_escapes() {
    // The text report is written verbatim by save_report, so escape
    // sequences must never be baked into it
    let report = generate_text_report(&sample_summary());
    assert!(!report.contains('\u{1b}'));
}

#[test]
fn test_json_report_is_valid_json() {
    let report = generate_json_report(&sample_summary()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();

    assert_eq!(parsed["report"]["metadata"]["generator"], "Pagemirror");
    assert_eq!(parsed["report"]["session"]["host"], "example.com");
    assert_eq!(parsed["report"]["summary"]["assets_discovered"], 3);
    assert_eq!(parsed["report"]["summary"]["files_written"], 2);

    let assets = parsed["report"]["assets"].as_array().unwrap();
    assert_eq!(assets.len(), 3);
    assert_eq!(assets[0]["kind"], "script");
    assert_eq!(assets[0]["status"], "written");
    assert_eq!(assets[2]["status"], "failed");
    assert_eq!(assets[2]["reason"], "connection refused");
}

#[test]
fn test_save_report_writes_file() {
    let temp = tempfile::tempdir().unwrap();
    let target = temp.path().join("report.txt");

    let content = generate_text_report(&sample_summary());
    save_report(&content, &target).unwrap();

    assert_eq!(std::fs::read_to_string(&target).unwrap(), content);
}
