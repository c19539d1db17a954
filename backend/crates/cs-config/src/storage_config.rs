use crate::{ConfigError, ConfigErrorResult, DEFAULT_BASE_PATH, DEFAULT_VERSION_CACHE};

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Where server instances and downloaded artifacts live on disk.
///
/// Relative paths are resolved against the config directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of `servers.json` and the per-server directories
    pub base_path: String,
    /// Download cache shared by all servers of an edition
    pub version_cache: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: String::from(DEFAULT_BASE_PATH),
            version_cache: String::from(DEFAULT_VERSION_CACHE),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.base_path.trim().is_empty() {
            return Err(ConfigError::storage("storage.base_path cannot be empty"));
        }

        if self.version_cache.trim().is_empty() {
            return Err(ConfigError::storage(
                "storage.version_cache cannot be empty",
            ));
        }

        Ok(())
    }

    pub fn resolve_base_path(&self, config_dir: &Path) -> PathBuf {
        Self::resolve(config_dir, &self.base_path)
    }

    pub fn resolve_version_cache(&self, config_dir: &Path) -> PathBuf {
        Self::resolve(config_dir, &self.version_cache)
    }

    fn resolve(config_dir: &Path, value: &str) -> PathBuf {
        let path = Path::new(value);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            config_dir.join(path)
        }
    }
}
