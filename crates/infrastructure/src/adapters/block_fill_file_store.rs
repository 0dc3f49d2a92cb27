//! Large file storage filled by `dd`

use std::path::{Path, PathBuf};

use application::{LargeFilePort, SimulationError};
use async_trait::async_trait;
use domain::LargeFileTier;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// Keeps one zero-filled file per tier in a directory
///
/// Files are written by an out-of-process `dd if=/dev/zero bs=1M` into a
/// temporary name and renamed when complete, so a half-written file is
/// never reported as existing. Creation is serialized.
#[derive(Debug)]
pub struct BlockFillFileStore {
    directory: PathBuf,
    creating: Mutex<()>,
}

impl BlockFillFileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            creating: Mutex::new(()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn partial_path(&self, tier: LargeFileTier) -> PathBuf {
        self.directory.join(format!("{}.partial", tier.file_name()))
    }
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> SimulationError {
    SimulationError::Internal(format!("failed to {action} {}: {e}", path.display()))
}

#[async_trait]
impl LargeFilePort for BlockFillFileStore {
    fn path(&self, tier: LargeFileTier) -> PathBuf {
        self.directory.join(tier.file_name())
    }

    async fn exists(&self, tier: LargeFileTier) -> Result<bool, SimulationError> {
        let path = self.path(tier);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| io_error("inspect", &path, &e))
    }

    #[instrument(skip(self), fields(tier = %tier))]
    async fn create(&self, tier: LargeFileTier) -> Result<(), SimulationError> {
        let _guard = self.creating.lock().await;
        if self.exists(tier).await? {
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| io_error("create directory", &self.directory, &e))?;

        let partial = self.partial_path(tier);
        let status = Command::new("dd")
            .arg("if=/dev/zero")
            .arg(format!("of={}", partial.display()))
            .arg("bs=1M")
            .arg(format!("count={}", tier.size_mib()))
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| io_error("run dd for", &partial, &e))?;

        if !status.success() {
            warn!(%status, "Block fill failed");
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(SimulationError::Internal(format!(
                "dd exited with {status} while writing {}",
                partial.display()
            )));
        }

        let path = self.path(tier);
        tokio::fs::rename(&partial, &path)
            .await
            .map_err(|e| io_error("move", &path, &e))?;
        info!(path = %path.display(), bytes = tier.size_bytes(), "Created large file");
        Ok(())
    }
}
