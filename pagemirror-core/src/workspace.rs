use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The output directory for one mirrored host: `<parent>/<host>/`.
///
/// Acquisition is wipe-and-recreate: any directory left by a previous run at
/// the same path is deleted first, so a re-run never keeps stale assets.
/// Acquisition failure is fatal for the run.
#[derive(Debug, Clone)]
pub struct MirrorWorkspace {
    root: PathBuf,
    host: String,
}

impl MirrorWorkspace {
    pub fn acquire(parent: &Path, host: &str) -> Result<Self> {
        let root = parent.join(host);

        match fs::remove_dir_all(&root) {
            Ok(()) => debug!("Removed stale workspace {}", root.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to clear workspace {}", root.display()));
            }
        }

        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create workspace {}", root.display()))?;

        Ok(Self {
            root,
            host: host.to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join("index.html")
    }
}
