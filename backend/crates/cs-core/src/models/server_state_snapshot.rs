use crate::{Edition, EditionConfigView, InstalledVersion, ServerStatus};

use serde::{Deserialize, Serialize};

/// Read-only picture of one instance at the moment `state()` was called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStateSnapshot {
    pub id: u32,
    pub edition: Edition,
    pub status: ServerStatus,
    /// 0 when no process is alive
    pub pid: u32,
    pub port: u16,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub version: Option<InstalledVersion>,
    pub config: EditionConfigView,
    pub exit_code: Option<i32>,
}
