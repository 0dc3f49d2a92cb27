//! Large file port definition

use std::path::PathBuf;

use async_trait::async_trait;
use domain::LargeFileTier;
#[cfg(test)]
use mockall::automock;

use crate::error::SimulationError;

/// On-disk storage of generated large files, one file per tier
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LargeFilePort: Send + Sync {
    /// Location of the backing file of a tier
    fn path(&self, tier: LargeFileTier) -> PathBuf;

    /// Whether the backing file of a tier already exists
    async fn exists(&self, tier: LargeFileTier) -> Result<bool, SimulationError>;

    /// Create the backing file of a tier
    async fn create(&self, tier: LargeFileTier) -> Result<(), SimulationError>;
}
