use cs_core::{InstalledVersion, Result as CoreResult};

use async_trait::async_trait;

/// Resolves the newest published build for one edition.
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Fails with `CoreError::Discovery` when the upstream is unreachable or
    /// publishes nothing usable for this host.
    async fn latest_version(&self) -> CoreResult<InstalledVersion>;
}
