use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedrockConfigView {
    pub port: u16,
    /// Active world (`level-name`)
    pub world: Option<String>,
    /// Directories under `worlds/`
    pub worlds: Vec<String>,
    pub mode: Option<String>,
    pub online_mode: bool,
    pub content_log_console_output: bool,
    pub emit_telemetry: bool,
}
