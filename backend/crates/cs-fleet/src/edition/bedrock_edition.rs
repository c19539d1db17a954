use crate::edition::{
    BackupRequest, EditionRuntime, KEY_GAMEMODE, KEY_LEVEL_NAME, KEY_ONLINE_MODE,
    KEY_SERVER_PORT,
};
use crate::instance_layout::WORLDS_DIR;
use crate::{ConfigStore, InstanceLayout, LaunchCommand, Setting, fs_util};

use cs_core::{BedrockConfigView, CoreError, Edition, EditionConfigView, Result as CoreResult};

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};

#[cfg(windows)]
const EXECUTABLE: &str = "bedrock_server.exe";
#[cfg(not(windows))]
const EXECUTABLE: &str = "bedrock_server";

const KEY_CONTENT_LOG: &str = "content-log-console-output-enabled";
const KEY_TELEMETRY: &str = "emit-server-telemetry";
const DEFAULT_WORLD: &str = "Bedrock level";
const SAVE_HOLD: &str = "save hold";
const SAVE_RESUME: &str = "save resume";
const BACKUP_TIMESTAMP: &str = "%Y%m%d-%H%M%S-%3f";

const PRESERVED_KEYS: &[&str] = &[
    KEY_LEVEL_NAME,
    KEY_GAMEMODE,
    KEY_ONLINE_MODE,
    KEY_CONTENT_LOG,
    KEY_TELEMETRY,
];

/// Bedrock Dedicated Server: a native executable unpacked from a zip.
#[derive(Debug, Clone)]
pub struct BedrockEdition {
    backup_quiescence: Duration,
}

impl BedrockEdition {
    pub fn new(backup_quiescence: Duration) -> Self {
        Self { backup_quiescence }
    }
}

#[async_trait]
impl EditionRuntime for BedrockEdition {
    fn edition(&self) -> Edition {
        Edition::Bedrock
    }

    fn launch_command(&self, layout: &InstanceLayout) -> LaunchCommand {
        let command = LaunchCommand::new(layout.server_dir().join(EXECUTABLE), layout.server_dir());

        // The Linux build ships its shared libraries next to the binary
        if cfg!(target_os = "linux") {
            command.env("LD_LIBRARY_PATH", ".")
        } else {
            command
        }
    }

    fn prepare(
        &self,
        config: &mut ConfigStore,
        _layout: &InstanceLayout,
        port: u16,
    ) -> CoreResult<()> {
        config.set(KEY_SERVER_PORT, &port.to_string())?;
        Ok(())
    }

    fn setting_key(&self, setting: Setting) -> Option<&'static str> {
        Some(match setting {
            Setting::OnlineMode => KEY_ONLINE_MODE,
            Setting::GameMode => KEY_GAMEMODE,
            Setting::ContentLogConsoleOutput => KEY_CONTENT_LOG,
            Setting::EmitTelemetry => KEY_TELEMETRY,
        })
    }

    fn preserved_keys(&self) -> &'static [&'static str] {
        PRESERVED_KEYS
    }

    fn default_world(&self) -> &'static str {
        DEFAULT_WORLD
    }

    fn supports_import(&self) -> bool {
        true
    }

    fn config_view(
        &self,
        config: &ConfigStore,
        _layout: &InstanceLayout,
        port: u16,
    ) -> CoreResult<EditionConfigView> {
        let worlds = config.list_directory_entries(WORLDS_DIR)?;

        Ok(EditionConfigView::Bedrock(BedrockConfigView {
            port,
            world: config.get(KEY_LEVEL_NAME).map(String::from),
            worlds,
            mode: config.get(KEY_GAMEMODE).map(String::from),
            online_mode: config.get_bool(KEY_ONLINE_MODE).unwrap_or(true),
            content_log_console_output: config.get_bool(KEY_CONTENT_LOG).unwrap_or(false),
            emit_telemetry: config.get_bool(KEY_TELEMETRY).unwrap_or(false),
        }))
    }

    /// `save hold`, wait for in-flight writes, copy the world, `save resume`.
    ///
    /// `save resume` is sent even when the copy fails so the server does
    /// not stay paused.
    async fn backup(&self, request: BackupRequest<'_>) -> CoreResult<PathBuf> {
        let BackupRequest {
            id,
            supervisor,
            layout,
            world,
        } = request;

        supervisor
            .send_line(SAVE_HOLD)
            .await
            .map_err(|e| e.into_core(id))?;
        tokio::time::sleep(self.backup_quiescence).await;

        let source = layout.worlds_dir().join(world);
        let stamp = chrono::Local::now().format(BACKUP_TIMESTAMP);
        let target = layout.backups_dir().join(format!("{world}-{stamp}"));

        let copied = {
            let source = source.clone();
            let target = target.clone();
            tokio::task::spawn_blocking(move || fs_util::copy_dir_recursive(&source, &target))
                .await
        };

        if let Err(e) = supervisor.send_line(SAVE_RESUME).await {
            warn!("Server {id}: failed to resume saving after backup: {e}");
            return Err(e.into_core(id));
        }

        match copied {
            Ok(Ok(())) => {
                info!("Server {id}: backed up '{world}' to {}", target.display());
                Ok(target)
            }
            Ok(Err(e)) => Err(CoreError::io(source, e)),
            Err(e) => Err(CoreError::io(source, std::io::Error::other(e))),
        }
    }
}
