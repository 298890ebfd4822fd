// Report generation from a mirror summary

use crate::download::{AssetOutcome, AssetStatus};
use crate::mirror::MirrorSummary;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

pub fn generate_text_report(summary: &MirrorSummary) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Target: {}\n", summary.target));
    report.push_str(&format!("  Workspace: {}\n", summary.workspace.display()));
    report.push_str(&format!(
        "  References rewritten: {}\n",
        summary.references_rewritten
    ));
    report.push_str(&format!("  Assets discovered: {}\n", summary.discovered));
    report.push_str(&format!(
        "  Files written: {}/{}\n",
        summary.written, summary.discovered
    ));
    if summary.failed > 0 {
        report.push_str(&format!("  Failed downloads: {}\n", summary.failed));
    }
    if summary.skipped > 0 {
        report.push_str(&format!("  Skipped (no file segment): {}\n", summary.skipped));
    }
    if summary.collisions > 0 {
        report.push_str(&format!("  Path collisions: {}\n", summary.collisions));
    }
    report.push_str(&format!(
        "  Index saved: {}\n",
        if summary.index_saved { "yes" } else { "no" }
    ));
    report.push_str(&format!("  Elapsed: {}ms\n", summary.elapsed_ms));

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    if !summary.assets.is_empty() {
        report.push_str(&format!("## {}\n", summary.host));
        report.push_str(&format!("  {} assets processed\n\n", summary.assets.len()));

        for asset in &summary.assets {
            report.push_str(&format_asset_line(asset));
            report.push('\n');
        }
        report.push('\n');
    }

    report
}

// Plain glyph markers only: the report is saved to files as-is, so no
// terminal escapes belong in it.
fn format_asset_line(asset: &AssetOutcome) -> String {
    let (marker, detail) = match &asset.outcome {
        AssetStatus::Written => ("✓", String::new()),
        AssetStatus::Failed { reason } => ("✗", format!("  ({})", reason)),
        AssetStatus::SkippedDirectory => ("-", "  (no file segment)".to_string()),
        AssetStatus::Collision { claimed_by } => {
            ("!", format!("  (path claimed by {})", claimed_by))
        }
    };

    let path = asset.local_path.as_deref().unwrap_or("-");
    format!("  {} {} <- {}{}", marker, path, asset.url, detail)
}

pub fn generate_json_report(summary: &MirrorSummary) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Pagemirror",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "session": {
                "target": summary.target,
                "host": summary.host,
                "workspace": summary.workspace,
                "elapsed_ms": summary.elapsed_ms,
                "index_saved": summary.index_saved
            },
            "summary": {
                "references_rewritten": summary.references_rewritten,
                "assets_discovered": summary.discovered,
                "files_written": summary.written,
                "failed": summary.failed,
                "skipped": summary.skipped,
                "collisions": summary.collisions
            },
            "assets": summary.assets
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
