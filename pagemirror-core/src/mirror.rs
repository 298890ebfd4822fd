use crate::download::{AssetOutcome, AssetStatus, DownloadOptions, execute_downloads};
use crate::workspace::MirrorWorkspace;
use anyhow::{Context, Result};
use pagemirror_scanner::{TransportConfig, build_client, extract_and_rewrite, fetch_page_text};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use url::Url;

/// Options for one mirror run
pub struct MirrorOptions {
    /// Absolute URL of the page to mirror.
    pub target: String,
    /// Parent directory the `<host>/` workspace is created under.
    pub output_dir: PathBuf,
    pub threads: usize,
    pub transport: TransportConfig,
    pub show_progress_bars: bool,
}

/// Everything one run produced, for the operator report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorSummary {
    pub target: String,
    pub host: String,
    pub workspace: PathBuf,
    /// Attribute rewrites performed, duplicates included.
    pub references_rewritten: usize,
    /// Distinct assets in the discovery set.
    pub discovered: usize,
    pub written: usize,
    pub failed: usize,
    pub skipped: usize,
    pub collisions: usize,
    pub index_saved: bool,
    pub elapsed_ms: u64,
    pub assets: Vec<AssetOutcome>,
}

/// Mirror one page: fetch it, extract and rewrite its asset references,
/// acquire the workspace, download the discovery set, persist the document.
///
/// The stages run in that fixed order with no retries. A page-fetch failure
/// degrades to empty content so the run still completes with zero assets.
/// Only an unusable target URL or a workspace acquisition failure is fatal.
pub async fn execute_mirror(options: MirrorOptions) -> Result<MirrorSummary> {
    let started = Instant::now();

    let target = Url::parse(&options.target)
        .with_context(|| format!("Invalid target URL '{}'", options.target))?;
    let host = target
        .host_str()
        .with_context(|| format!("Target URL '{}' has no host", options.target))?
        .to_string();

    let client = build_client(&options.transport).context("Failed to create HTTP client")?;

    info!("Mirroring {} into {}/{}", target, options.output_dir.display(), host);

    let page = match fetch_page_text(&client, target.as_str()).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to retrieve page content for {}: {}", target, e);
            String::new()
        }
    };

    let extraction = extract_and_rewrite(&page, &target);

    let workspace = MirrorWorkspace::acquire(&options.output_dir, &host)?;

    let download_options = DownloadOptions {
        threads: options.threads,
        show_progress_bars: options.show_progress_bars,
    };
    let report =
        execute_downloads(&client, &extraction.assets, workspace.root(), &download_options)
            .await?;

    let index_saved = match std::fs::write(workspace.index_path(), &extraction.html) {
        Ok(()) => {
            info!("Saved index.html to {}", workspace.index_path().display());
            true
        }
        Err(e) => {
            warn!(
                "Failed to save {}: {}",
                workspace.index_path().display(),
                e
            );
            false
        }
    };

    let failed = count_status(&report.outcomes, |s| matches!(s, AssetStatus::Failed { .. }));
    let skipped = count_status(&report.outcomes, |s| {
        matches!(s, AssetStatus::SkippedDirectory)
    });
    let collisions = count_status(&report.outcomes, |s| {
        matches!(s, AssetStatus::Collision { .. })
    });

    Ok(MirrorSummary {
        target: target.to_string(),
        host,
        workspace: workspace.root().to_path_buf(),
        references_rewritten: extraction.rewrites,
        discovered: extraction.assets.len(),
        written: report.written,
        failed,
        skipped,
        collisions,
        index_saved,
        elapsed_ms: started.elapsed().as_millis() as u64,
        assets: report.outcomes,
    })
}

fn count_status(outcomes: &[AssetOutcome], pred: impl Fn(&AssetStatus) -> bool) -> usize {
    outcomes.iter().filter(|o| pred(&o.outcome)).count()
}
