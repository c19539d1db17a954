use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaConfigView {
    pub port: u16,
    pub max_memory_mb: u32,
    pub eula_accepted: bool,
    pub jar: String,
    pub online_mode: bool,
    pub mode: Option<String>,
    pub motd: Option<String>,
    pub world: Option<String>,
}
