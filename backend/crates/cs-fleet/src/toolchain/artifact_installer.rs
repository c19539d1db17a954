use cs_core::{InstalledVersion, Result as CoreResult};

use std::path::Path;

use async_trait::async_trait;

/// Places a build into a server directory.
#[async_trait]
pub trait ArtifactInstaller: Send + Sync {
    /// Fetch the artifact into `cache_dir` unless a copy with a matching
    /// hash is already there, then install it under `target_dir`.
    async fn install(
        &self,
        version: &InstalledVersion,
        cache_dir: &Path,
        target_dir: &Path,
    ) -> CoreResult<()>;
}
