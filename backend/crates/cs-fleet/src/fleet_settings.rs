use crate::edition::{BedrockEdition, EditionProfile, JavaEdition};

use cs_config::{Config, ConfigErrorResult};
use cs_core::Edition;

use std::path::PathBuf;
use std::time::Duration;

/// Resolved runtime settings for a fleet, derived from [`Config`].
#[derive(Debug, Clone)]
pub struct FleetSettings {
    pub base_path: PathBuf,
    pub version_cache: PathBuf,
    pub bedrock_default_port: u16,
    pub java_default_port: u16,
    pub java_binary: PathBuf,
    pub java_max_memory_mb: u32,
    pub backup_quiescence: Duration,
    pub lan_beacon: bool,
}

impl FleetSettings {
    pub fn from_config(config: &Config) -> ConfigErrorResult<Self> {
        Ok(Self {
            base_path: config.base_path()?,
            version_cache: config.version_cache_path()?,
            bedrock_default_port: config.fleet.bedrock_default_port,
            java_default_port: config.fleet.java_default_port,
            java_binary: PathBuf::from(&config.fleet.java_binary),
            java_max_memory_mb: config.fleet.java_max_memory_mb,
            backup_quiescence: Duration::from_secs(config.fleet.backup_quiescence_secs),
            lan_beacon: config.fleet.lan_beacon,
        })
    }

    /// Defaults rooted at `base_path`, with the cache beside it.
    pub fn with_base_path<P: Into<PathBuf>>(base_path: P) -> Self {
        let base_path = base_path.into();
        let fleet = cs_config::FleetConfig::default();

        Self {
            version_cache: base_path.join(".versions"),
            base_path,
            bedrock_default_port: fleet.bedrock_default_port,
            java_default_port: fleet.java_default_port,
            java_binary: PathBuf::from(fleet.java_binary),
            java_max_memory_mb: fleet.java_max_memory_mb,
            backup_quiescence: Duration::from_secs(fleet.backup_quiescence_secs),
            lan_beacon: fleet.lan_beacon,
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.base_path.join(crate::manifest_file::MANIFEST_FILENAME)
    }

    /// Behavior for a new or recovered instance. `max_memory_mb` falls back
    /// to the fleet default and is ignored for Bedrock.
    pub fn profile(&self, edition: Edition, max_memory_mb: Option<u32>) -> EditionProfile {
        match edition {
            Edition::Bedrock => EditionProfile::Bedrock(BedrockEdition::new(self.backup_quiescence)),
            Edition::Java => EditionProfile::Java(JavaEdition::new(
                &self.java_binary,
                max_memory_mb.unwrap_or(self.java_max_memory_mb),
                self.lan_beacon,
            )),
        }
    }
}
