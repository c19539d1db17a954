use crate::{
    CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR,
    FleetConfig, LoggingConfig, StorageConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub fleet: FleetConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config with full production error handling.
    ///
    /// Loading order:
    /// 1. Check for CS_CONFIG_DIR env var, else use ./.crankshaft/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply CS_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: CS_CONFIG_DIR env var > ./.crankshaft/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.storage.validate()?;
        self.fleet.validate()?;

        if let Some(file) = &self.logging.file
            && file.trim().is_empty()
        {
            return Err(ConfigError::logging("logging.file cannot be empty when set"));
        }

        Ok(())
    }

    /// Absolute root of the fleet manifest and server directories.
    pub fn base_path(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(self.storage.resolve_base_path(&config_dir))
    }

    /// Absolute root of the artifact download cache.
    pub fn version_cache_path(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(self.storage.resolve_version_cache(&config_dir))
    }

    /// Absolute path of the log file, when file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        let Some(file) = &self.logging.file else {
            return Ok(None);
        };

        let config_dir = Self::config_dir()?;
        Ok(Some(config_dir.join(&self.logging.dir).join(file)))
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  storage: base={}, cache={}",
            self.storage.base_path, self.storage.version_cache
        );
        info!(
            "  fleet: bedrock_port={}, java_port={}, java={} ({}MB)",
            self.fleet.bedrock_default_port,
            self.fleet.java_default_port,
            self.fleet.java_binary,
            self.fleet.java_max_memory_mb
        );
        info!(
            "  backup: quiescence={}s, lan_beacon={}",
            self.fleet.backup_quiescence_secs, self.fleet.lan_beacon
        );
        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
    }

    fn apply_env_overrides(&mut self) {
        // Storage
        Self::apply_env_string("CS_BASE_PATH", &mut self.storage.base_path);
        Self::apply_env_string("CS_VERSION_CACHE", &mut self.storage.version_cache);

        // Fleet
        Self::apply_env_parse(
            "CS_BEDROCK_DEFAULT_PORT",
            &mut self.fleet.bedrock_default_port,
        );
        Self::apply_env_parse("CS_JAVA_DEFAULT_PORT", &mut self.fleet.java_default_port);
        Self::apply_env_string("CS_JAVA_BINARY", &mut self.fleet.java_binary);
        Self::apply_env_parse(
            "CS_JAVA_MAX_MEMORY_MB",
            &mut self.fleet.java_max_memory_mb,
        );
        Self::apply_env_parse(
            "CS_BACKUP_QUIESCENCE_SECS",
            &mut self.fleet.backup_quiescence_secs,
        );
        Self::apply_env_bool("CS_LAN_BEACON", &mut self.fleet.lan_beacon);

        // Logging
        Self::apply_env_parse("CS_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("CS_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("CS_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
