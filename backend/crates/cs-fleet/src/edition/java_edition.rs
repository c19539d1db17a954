use crate::edition::{
    EditionRuntime, KEY_GAMEMODE, KEY_LEVEL_NAME, KEY_MOTD, KEY_ONLINE_MODE, KEY_SERVER_PORT,
};
use crate::{ConfigStore, InstanceLayout, LaunchCommand, Setting};

use cs_core::{Edition, EditionConfigView, GameMode, JavaConfigView, Result as CoreResult};

use std::path::PathBuf;

use async_trait::async_trait;

pub(crate) const SERVER_JAR: &str = "server.jar";
pub(crate) const DEFAULT_MOTD: &str = "Crankshaft Java Server";
const KEY_EULA: &str = "eula";
const DEFAULT_WORLD: &str = "world";

const PRESERVED_KEYS: &[&str] = &[KEY_LEVEL_NAME, KEY_GAMEMODE, KEY_ONLINE_MODE, KEY_MOTD];

/// Java Edition server: `server.jar` run by a configured Java runtime.
#[derive(Debug, Clone)]
pub struct JavaEdition {
    java_binary: PathBuf,
    max_memory_mb: u32,
    lan_beacon: bool,
}

impl JavaEdition {
    pub fn new<P: Into<PathBuf>>(java_binary: P, max_memory_mb: u32, lan_beacon: bool) -> Self {
        Self {
            java_binary: java_binary.into(),
            max_memory_mb,
            lan_beacon,
        }
    }

    /// Whether running servers announce themselves on the LAN
    pub fn lan_beacon(&self) -> bool {
        self.lan_beacon
    }
}

#[async_trait]
impl EditionRuntime for JavaEdition {
    fn edition(&self) -> Edition {
        Edition::Java
    }

    fn launch_command(&self, layout: &InstanceLayout) -> LaunchCommand {
        LaunchCommand::new(&self.java_binary, layout.server_dir())
            .arg(format!("-Xmx{}M", self.max_memory_mb))
            .arg("-jar")
            .arg(SERVER_JAR)
            .arg("nogui")
    }

    fn prepare(
        &self,
        config: &mut ConfigStore,
        layout: &InstanceLayout,
        port: u16,
    ) -> CoreResult<()> {
        let mut eula = ConfigStore::open(layout.eula())?;
        eula.set(KEY_EULA, "true")?;

        config.set(KEY_SERVER_PORT, &port.to_string())?;

        let defaults = [
            (KEY_ONLINE_MODE, "true"),
            (KEY_MOTD, DEFAULT_MOTD),
            (KEY_GAMEMODE, GameMode::Survival.as_str()),
        ];
        for (key, value) in defaults {
            if config.get(key).is_none() {
                config.set(key, value)?;
            }
        }

        Ok(())
    }

    fn setting_key(&self, setting: Setting) -> Option<&'static str> {
        match setting {
            Setting::OnlineMode => Some(KEY_ONLINE_MODE),
            Setting::GameMode => Some(KEY_GAMEMODE),
            Setting::ContentLogConsoleOutput | Setting::EmitTelemetry => None,
        }
    }

    fn preserved_keys(&self) -> &'static [&'static str] {
        PRESERVED_KEYS
    }

    fn default_world(&self) -> &'static str {
        DEFAULT_WORLD
    }

    fn max_memory_mb(&self) -> Option<u32> {
        Some(self.max_memory_mb)
    }

    fn config_view(
        &self,
        config: &ConfigStore,
        layout: &InstanceLayout,
        port: u16,
    ) -> CoreResult<EditionConfigView> {
        let eula = ConfigStore::open(layout.eula())?;

        Ok(EditionConfigView::Java(JavaConfigView {
            port,
            max_memory_mb: self.max_memory_mb,
            eula_accepted: eula.get_bool(KEY_EULA).unwrap_or(false),
            jar: String::from(SERVER_JAR),
            online_mode: config.get_bool(KEY_ONLINE_MODE).unwrap_or(true),
            mode: config.get(KEY_GAMEMODE).map(String::from),
            motd: config.get(KEY_MOTD).map(String::from),
            world: config.get(KEY_LEVEL_NAME).map(String::from),
        }))
    }
}
