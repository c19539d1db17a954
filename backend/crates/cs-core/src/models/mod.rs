pub mod bedrock_config_view;
pub mod edition;
pub mod edition_config_view;
pub mod game_mode;
pub mod installed_version;
pub mod java_config_view;
pub mod server_record;
pub mod server_settings;
pub mod server_state_snapshot;
pub mod server_status;
