// Download orchestration for the discovered asset set

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pagemirror_scanner::result::{AssetKind, DiscoveredAsset};
use pagemirror_scanner::{fetch_bytes, local_path_for};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Options for configuring a download batch
pub struct DownloadOptions {
    pub threads: usize,
    pub show_progress_bars: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            threads: 8,
            show_progress_bars: false,
        }
    }
}

/// Terminal state of one discovered asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum AssetStatus {
    Written,
    Failed { reason: String },
    /// Directory-like URL with no file segment; not a failure.
    SkippedDirectory,
    /// A distinct URL already claimed this local path; nothing overwritten.
    Collision { claimed_by: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetOutcome {
    pub url: String,
    pub kind: AssetKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    #[serde(flatten)]
    pub outcome: AssetStatus,
}

/// Result of one download batch, outcomes in discovery order.
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub outcomes: Vec<AssetOutcome>,
    pub written: usize,
}

enum Planned {
    Fetch {
        url: String,
        kind: AssetKind,
        rel_path: String,
    },
    Done(AssetOutcome),
}

/// Fetch every asset in the discovery set and write it under `root`.
///
/// Precondition: `root` was wiped and recreated empty, so every write lands
/// on a fresh path. Planning resolves each URL to its target path up front
/// and lets the first URL claim a contested path; later URLs mapping to the
/// same path are reported as collisions instead of overwriting. Fetches run
/// on a bounded worker pool; a failing asset is logged and skipped, never
/// aborting the batch.
pub async fn execute_downloads(
    client: &Client,
    assets: &[DiscoveredAsset],
    root: &Path,
    options: &DownloadOptions,
) -> Result<DownloadReport> {
    let plan = plan_downloads(assets);
    let fetch_count = plan
        .iter()
        .filter(|p| matches!(p, Planned::Fetch { .. }))
        .count();

    let progress_bar = if options.show_progress_bars && fetch_count > 0 {
        let pb = ProgressBar::new(fetch_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb.set_message("downloading assets");
        Some(pb)
    } else {
        None
    };

    let semaphore = Arc::new(Semaphore::new(options.threads.max(1)));
    let mut handles = Vec::new();

    for (idx, entry) in plan.iter().enumerate() {
        let Planned::Fetch { url, rel_path, .. } = entry else {
            continue;
        };

        let client = client.clone();
        let url = url.clone();
        let target: PathBuf = root.join(rel_path);
        let semaphore = semaphore.clone();
        let pb = progress_bar.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire().await.unwrap();
            let status = download_asset(&client, &url, &target).await;
            if let Some(ref pb) = pb {
                pb.inc(1);
            }
            (idx, status)
        }));
    }

    let mut statuses: HashMap<usize, AssetStatus> = HashMap::new();
    for handle in handles {
        let (idx, status) = handle.await.context("Download worker task failed")?;
        statuses.insert(idx, status);
    }

    if let Some(pb) = progress_bar {
        pb.finish_with_message("done");
    }

    let mut outcomes = Vec::with_capacity(plan.len());
    let mut written = 0usize;
    for (idx, entry) in plan.into_iter().enumerate() {
        match entry {
            Planned::Done(outcome) => outcomes.push(outcome),
            Planned::Fetch {
                url,
                kind,
                rel_path,
            } => {
                let status = statuses
                    .remove(&idx)
                    .unwrap_or(AssetStatus::Failed {
                        reason: "not attempted".to_string(),
                    });
                if matches!(status, AssetStatus::Written) {
                    written += 1;
                }
                outcomes.push(AssetOutcome {
                    url,
                    kind,
                    local_path: Some(rel_path),
                    outcome: status,
                });
            }
        }
    }

    info!(
        "Download batch complete: {}/{} assets written",
        written,
        assets.len()
    );

    Ok(DownloadReport { outcomes, written })
}

/// Resolve each discovered URL to its on-disk path, in discovery order.
fn plan_downloads(assets: &[DiscoveredAsset]) -> Vec<Planned> {
    let mut claimed: HashMap<String, String> = HashMap::new();

    assets
        .iter()
        .map(|asset| {
            let Some(rel_path) = local_path_for(&asset.url, false) else {
                // Discovery only admits mappable URLs, but stay tolerant
                return Planned::Done(AssetOutcome {
                    url: asset.url.clone(),
                    kind: asset.kind,
                    local_path: None,
                    outcome: AssetStatus::SkippedDirectory,
                });
            };

            let file_name = rel_path.rsplit('/').next().unwrap_or("");
            if file_name.is_empty() {
                debug!("Skipping directory-like URL {}", asset.url);
                return Planned::Done(AssetOutcome {
                    url: asset.url.clone(),
                    kind: asset.kind,
                    local_path: Some(rel_path),
                    outcome: AssetStatus::SkippedDirectory,
                });
            }

            if let Some(first) = claimed.get(&rel_path) {
                warn!(
                    "Path collision: {} already claimed by {}, skipping {}",
                    rel_path, first, asset.url
                );
                return Planned::Done(AssetOutcome {
                    url: asset.url.clone(),
                    kind: asset.kind,
                    local_path: Some(rel_path.clone()),
                    outcome: AssetStatus::Collision {
                        claimed_by: first.clone(),
                    },
                });
            }
            claimed.insert(rel_path.clone(), asset.url.clone());

            Planned::Fetch {
                url: asset.url.clone(),
                kind: asset.kind,
                rel_path,
            }
        })
        .collect()
}

async fn download_asset(client: &Client, url: &str, target: &Path) -> AssetStatus {
    if let Some(parent) = target.parent()
        && let Err(e) = tokio::fs::create_dir_all(parent).await
    {
        warn!("Failed to create directory for {}: {}", target.display(), e);
        return AssetStatus::Failed {
            reason: e.to_string(),
        };
    }

    let bytes = match fetch_bytes(client, url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to download {}: {}", url, e);
            return AssetStatus::Failed {
                reason: e.to_string(),
            };
        }
    };

    match tokio::fs::write(target, &bytes).await {
        Ok(()) => {
            debug!("Downloaded {} to {}", url, target.display());
            AssetStatus::Written
        }
        Err(e) => {
            warn!("Failed to write {}: {}", target.display(), e);
            AssetStatus::Failed {
                reason: e.to_string(),
            }
        }
    }
}
