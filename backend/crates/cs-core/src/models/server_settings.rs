use crate::GameMode;

use serde::{Deserialize, Serialize};

/// Partial settings update. Only the provided fields are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    pub online_mode: Option<bool>,
    pub game_mode: Option<GameMode>,
    pub content_log_console_output: Option<bool>,
    pub emit_telemetry: Option<bool>,
}

impl ServerSettings {
    pub fn is_empty(&self) -> bool {
        self.online_mode.is_none()
            && self.game_mode.is_none()
            && self.content_log_console_output.is_none()
            && self.emit_telemetry.is_none()
    }
}
