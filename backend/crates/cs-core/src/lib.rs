pub mod error;
pub mod models;

#[cfg(test)]
mod tests;

pub use error::{CoreError, ErrorCategory, Result};
pub use models::bedrock_config_view::BedrockConfigView;
pub use models::edition::Edition;
pub use models::edition_config_view::EditionConfigView;
pub use models::game_mode::GameMode;
pub use models::installed_version::InstalledVersion;
pub use models::java_config_view::JavaConfigView;
pub use models::server_record::ServerRecord;
pub use models::server_settings::ServerSettings;
pub use models::server_state_snapshot::ServerStateSnapshot;
pub use models::server_status::ServerStatus;
