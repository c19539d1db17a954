mod config;
mod error;
mod fleet_config;
mod log_level;
mod logging_config;
mod storage_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use fleet_config::FleetConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use storage_config::StorageConfig;

const CONFIG_DIR_ENV: &str = "CS_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".crankshaft";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_BASE_PATH: &str = "servers";
const DEFAULT_VERSION_CACHE: &str = "versions";

const DEFAULT_BEDROCK_PORT: u16 = 19132;
const DEFAULT_JAVA_PORT: u16 = 25565;
const MIN_PORT: u16 = 1024;
const DEFAULT_JAVA_BINARY: &str = "java";
const DEFAULT_JAVA_MAX_MEMORY_MB: u32 = 2048;
const MIN_JAVA_MAX_MEMORY_MB: u32 = 512;
const MAX_JAVA_MAX_MEMORY_MB: u32 = 65536;
const DEFAULT_BACKUP_QUIESCENCE_SECS: u64 = 5;
const MAX_BACKUP_QUIESCENCE_SECS: u64 = 300;
const DEFAULT_LAN_BEACON: bool = true;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;
