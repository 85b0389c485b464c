//! Screenshot storage for walkthrough runs.
//!
//! Each run gets its own directory under `<data_root>/screenshots/`, named
//! `visual_<timestamp>`. Saved paths are returned relative to the data root
//! so the gateway can serve them without knowing the absolute layout.

use std::path::PathBuf;

use tracing::debug;

use crate::error::BrowserError;

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    data_root: PathBuf,
    screenshots_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        let data_root = data_root.into();
        let screenshots_dir = data_root.join("screenshots");
        Self {
            data_root,
            screenshots_dir,
        }
    }

    /// Create the per-run directory for a walkthrough starting now.
    pub async fn begin_run(&self, timestamp: u64) -> Result<RunArtifacts, BrowserError> {
        let dir = self.screenshots_dir.join(format!("visual_{timestamp}"));
        tokio::fs::create_dir_all(&dir).await?;
        debug!(dir = %dir.display(), "created walkthrough artifact directory");
        Ok(RunArtifacts {
            data_root: self.data_root.clone(),
            dir,
            timestamp,
        })
    }
}

/// Artifact directory for a single walkthrough.
#[derive(Debug)]
pub struct RunArtifacts {
    data_root: PathBuf,
    dir: PathBuf,
    timestamp: u64,
}

impl RunArtifacts {
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Write a PNG into the run directory and return its path relative to
    /// the data root.
    pub async fn save(&self, name: &str, png: &[u8]) -> Result<String, BrowserError> {
        let path = self.dir.join(name);
        tokio::fs::write(&path, png).await?;
        let rel = path.strip_prefix(&self.data_root).unwrap_or(&path);
        Ok(rel.to_string_lossy().into_owned())
    }
}
