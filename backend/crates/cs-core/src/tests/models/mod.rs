mod edition;
mod game_mode;
mod server_record;
mod server_settings;
mod server_state_snapshot;
mod server_status;
