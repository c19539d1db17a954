use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_BACKUP_QUIESCENCE_SECS, DEFAULT_BEDROCK_PORT,
    DEFAULT_JAVA_BINARY, DEFAULT_JAVA_MAX_MEMORY_MB, DEFAULT_JAVA_PORT, DEFAULT_LAN_BEACON,
    MAX_BACKUP_QUIESCENCE_SECS, MAX_JAVA_MAX_MEMORY_MB, MIN_JAVA_MAX_MEMORY_MB, MIN_PORT,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// First port tried for new Bedrock servers
    pub bedrock_default_port: u16,
    /// First port tried for new Java servers
    pub java_default_port: u16,
    /// Java runtime used to launch `server.jar`
    pub java_binary: String,
    /// Heap limit for Java servers created without one
    pub java_max_memory_mb: u32,
    /// Pause between `save hold` and copying a Bedrock world
    pub backup_quiescence_secs: u64,
    /// Announce running Java servers on the local network
    pub lan_beacon: bool,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            bedrock_default_port: DEFAULT_BEDROCK_PORT,
            java_default_port: DEFAULT_JAVA_PORT,
            java_binary: String::from(DEFAULT_JAVA_BINARY),
            java_max_memory_mb: DEFAULT_JAVA_MAX_MEMORY_MB,
            backup_quiescence_secs: DEFAULT_BACKUP_QUIESCENCE_SECS,
            lan_beacon: DEFAULT_LAN_BEACON,
        }
    }
}

impl FleetConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for (name, port) in [
            ("fleet.bedrock_default_port", self.bedrock_default_port),
            ("fleet.java_default_port", self.java_default_port),
        ] {
            if port < MIN_PORT {
                return Err(ConfigError::fleet(format!(
                    "{} must be >= {}, got {}",
                    name, MIN_PORT, port
                )));
            }
        }

        if self.java_binary.trim().is_empty() {
            return Err(ConfigError::fleet("fleet.java_binary cannot be empty"));
        }

        if self.java_max_memory_mb < MIN_JAVA_MAX_MEMORY_MB
            || self.java_max_memory_mb > MAX_JAVA_MAX_MEMORY_MB
        {
            return Err(ConfigError::fleet(format!(
                "fleet.java_max_memory_mb must be {}-{}, got {}",
                MIN_JAVA_MAX_MEMORY_MB, MAX_JAVA_MAX_MEMORY_MB, self.java_max_memory_mb
            )));
        }

        if self.backup_quiescence_secs > MAX_BACKUP_QUIESCENCE_SECS {
            return Err(ConfigError::fleet(format!(
                "fleet.backup_quiescence_secs must be <= {}, got {}",
                MAX_BACKUP_QUIESCENCE_SECS, self.backup_quiescence_secs
            )));
        }

        Ok(())
    }
}
