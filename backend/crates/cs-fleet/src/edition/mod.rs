//! Edition specific behavior.
//!
//! [`EditionProfile`] is the closed set of supported editions. Every call
//! site goes through the [`EditionRuntime`] trait it dereferences to.

mod bedrock_edition;
mod java_edition;

pub use bedrock_edition::BedrockEdition;
pub use java_edition::JavaEdition;
pub(crate) use java_edition::{DEFAULT_MOTD, SERVER_JAR};

use crate::{ConfigStore, InstanceLayout, LaunchCommand, ProcessSupervisor, Setting};

use cs_core::{CoreError, Edition, EditionConfigView, Result as CoreResult};

use std::ops::Deref;
use std::path::PathBuf;

use async_trait::async_trait;

pub(crate) const KEY_SERVER_PORT: &str = "server-port";
pub(crate) const KEY_LEVEL_NAME: &str = "level-name";
pub(crate) const KEY_GAMEMODE: &str = "gamemode";
pub(crate) const KEY_ONLINE_MODE: &str = "online-mode";
pub(crate) const KEY_MOTD: &str = "motd";
pub(crate) const STOP_COMMAND: &str = "stop";

/// What a running server needs to hand to a backup.
pub struct BackupRequest<'a> {
    pub id: u32,
    pub supervisor: &'a ProcessSupervisor,
    pub layout: &'a InstanceLayout,
    /// Active world name
    pub world: &'a str,
}

#[async_trait]
pub trait EditionRuntime: Send + Sync {
    fn edition(&self) -> Edition;

    fn launch_command(&self, layout: &InstanceLayout) -> LaunchCommand;

    fn stop_command(&self) -> &'static str {
        STOP_COMMAND
    }

    /// Write the port and edition defaults before the process is spawned.
    fn prepare(
        &self,
        config: &mut ConfigStore,
        layout: &InstanceLayout,
        port: u16,
    ) -> CoreResult<()>;

    /// Properties key for a setting, `None` when the edition lacks it.
    fn setting_key(&self, setting: Setting) -> Option<&'static str>;

    /// Keys carried across a reinstall.
    fn preserved_keys(&self) -> &'static [&'static str];

    /// World used when `level-name` is unset.
    fn default_world(&self) -> &'static str;

    fn supports_import(&self) -> bool {
        false
    }

    fn max_memory_mb(&self) -> Option<u32> {
        None
    }

    fn config_view(
        &self,
        config: &ConfigStore,
        layout: &InstanceLayout,
        port: u16,
    ) -> CoreResult<EditionConfigView>;

    /// Snapshot the active world of a running server.
    async fn backup(&self, request: BackupRequest<'_>) -> CoreResult<PathBuf> {
        Err(CoreError::unsupported(request.id, self.edition(), "backup"))
    }
}

#[derive(Debug, Clone)]
pub enum EditionProfile {
    Bedrock(BedrockEdition),
    Java(JavaEdition),
}

impl Deref for EditionProfile {
    type Target = dyn EditionRuntime;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Bedrock(bedrock) => bedrock,
            Self::Java(java) => java,
        }
    }
}
