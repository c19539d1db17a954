//! Lifecycle engine for one game server.
//!
//! Every lifecycle operation holds the instance's `lifecycle` mutex for its
//! whole duration, so a start can never interleave with a stop or an update
//! of the same server. Status lives on a `watch` channel and the config
//! cache behind its own short-lived lock; [`ServerInstance::state`] never
//! waits for an in-flight operation.

use crate::{content_import, fs_util};
use crate::edition::{BackupRequest, DEFAULT_MOTD, EditionProfile, KEY_LEVEL_NAME, KEY_MOTD};
use crate::toolchain::Toolchain;
use crate::{ConfigStore, ExitNotice, InstanceLayout, LanBeacon, ProcessSupervisor, Setting};

use cs_core::{
    CoreError, Edition, InstalledVersion, Result as CoreResult, ServerRecord, ServerSettings,
    ServerStateSnapshot, ServerStatus,
};

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;

/// Background tasks tied to the current process.
#[derive(Default)]
struct Lifecycle {
    exit_watcher: Option<JoinHandle<()>>,
    lan_beacon: Option<JoinHandle<()>>,
}

pub struct ServerInstance {
    id: u32,
    profile: EditionProfile,
    layout: InstanceLayout,
    port: u16,
    toolchain: Toolchain,
    status: Arc<watch::Sender<ServerStatus>>,
    config: Mutex<ConfigStore>,
    process: RwLock<Option<Arc<ProcessSupervisor>>>,
    lifecycle: Mutex<Lifecycle>,
}

impl ServerInstance {
    pub fn new(
        id: u32,
        profile: EditionProfile,
        layout: InstanceLayout,
        port: u16,
        toolchain: Toolchain,
    ) -> CoreResult<Self> {
        let config = ConfigStore::open(layout.properties())?;
        let (status, _) = watch::channel(ServerStatus::Unknown);

        Ok(Self {
            id,
            profile,
            layout,
            port,
            toolchain,
            status: Arc::new(status),
            config: Mutex::new(config),
            process: RwLock::new(None),
            lifecycle: Mutex::new(Lifecycle::default()),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn edition(&self) -> Edition {
        self.profile.edition()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn layout(&self) -> &InstanceLayout {
        &self.layout
    }

    pub fn status(&self) -> ServerStatus {
        *self.status.borrow()
    }

    /// Observe status transitions.
    pub fn subscribe(&self) -> watch::Receiver<ServerStatus> {
        self.status.subscribe()
    }

    /// Manifest entry for this instance.
    pub fn record(&self) -> ServerRecord {
        ServerRecord::new(
            self.id,
            self.edition(),
            self.port,
            self.profile.max_memory_mb(),
        )
    }

    /// Build recorded by the last successful install, `None` if never
    /// installed.
    pub async fn installed_version(&self) -> CoreResult<Option<InstalledVersion>> {
        let path = self.layout.version_marker();
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::io(path, e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CoreError::version_marker_corrupt(self.id, path, e.to_string()))
    }

    /// Download and install the newest build. Status is unchanged.
    pub async fn install(&self) -> CoreResult<InstalledVersion> {
        let _lifecycle = self.lifecycle.lock().await;

        let status = self.status();
        if status.is_running() {
            return Err(CoreError::not_stopped(self.id, status));
        }

        self.install_latest().await
    }

    pub async fn start(&self) -> CoreResult<()> {
        let mut lifecycle = self.lifecycle.lock().await;
        self.start_locked(&mut lifecycle).await
    }

    /// Ask the server to shut down and wait until it has exited.
    pub async fn stop(&self) -> CoreResult<()> {
        let mut lifecycle = self.lifecycle.lock().await;
        self.stop_locked(&mut lifecycle).await
    }

    /// Install the newest build if it differs from the installed one.
    ///
    /// Returns false when already current, in which case the server is not
    /// restarted. Settings in the edition's preserved keys survive the
    /// reinstall.
    pub async fn update(&self) -> CoreResult<bool> {
        let mut lifecycle = self.lifecycle.lock().await;

        let latest = self
            .toolchain
            .version_source
            .latest_version()
            .await
            .map_err(|e| CoreError::update_failed(self.id, e))?;
        let installed = self
            .recorded_version()
            .await
            .map_err(|e| CoreError::update_failed(self.id, e))?;

        if let Some(installed) = &installed
            && installed.is_same_build(&latest)
        {
            debug!("Server {}: build {} is current", self.id, installed.build);
            return Ok(false);
        }

        info!(
            "Server {}: updating {} -> {}",
            self.id,
            installed.as_ref().map_or("none", |v| v.build.as_str()),
            latest.build
        );

        let was_running = self.status().is_running();
        self.stop_locked(&mut lifecycle)
            .await
            .map_err(|e| CoreError::update_failed(self.id, e))?;

        let preserved = self
            .preserved_settings()
            .await
            .map_err(|e| CoreError::update_failed(self.id, e))?;

        if let Err(e) = self.install_version(&latest).await {
            self.status.send_replace(ServerStatus::Stopped);
            return Err(CoreError::update_failed(
                self.id,
                CoreError::install_failed(self.id, e),
            ));
        }

        self.apply_settings(&preserved)
            .await
            .map_err(|e| CoreError::update_failed(self.id, e))?;

        if was_running {
            self.start_locked(&mut lifecycle)
                .await
                .map_err(|e| CoreError::update_failed(self.id, e))?;
        }

        Ok(true)
    }

    /// Copy the active world of a running server into `backups/`.
    pub async fn backup(&self) -> CoreResult<PathBuf> {
        let _lifecycle = self.lifecycle.lock().await;

        let process = self.process.read().await.clone();
        let supervisor = match process {
            Some(supervisor) if self.status().is_running() => supervisor,
            _ => return Err(CoreError::not_running(self.id)),
        };

        let world = self.active_world().await?;
        self.profile
            .backup(BackupRequest {
                id: self.id,
                supervisor: &supervisor,
                layout: &self.layout,
                world: &world,
            })
            .await
    }

    /// Point `level-name` at another world, restarting if running.
    pub async fn change_active_content(&self, name: &str) -> CoreResult<bool> {
        content_import::validate_content_name(self.id, name)?;

        let mut lifecycle = self.lifecycle.lock().await;

        {
            let mut config = self.config.lock().await;
            config.refresh()?;
            if config.get(KEY_LEVEL_NAME) == Some(name) {
                return Ok(false);
            }
        }

        let was_running = self.status().is_running();
        self.stop_locked(&mut lifecycle).await?;

        self.config.lock().await.set(KEY_LEVEL_NAME, name)?;
        info!("Server {}: active world is now '{name}'", self.id);

        if was_running {
            self.start_locked(&mut lifecycle).await?;
        }

        Ok(true)
    }

    /// Install an uploaded `.mcworld` and make it the active world.
    pub async fn import_content(&self, bytes: Vec<u8>, original_name: &str) -> CoreResult<String> {
        if !self.profile.supports_import() {
            return Err(CoreError::unsupported(
                self.id,
                self.edition(),
                "content import",
            ));
        }

        let _lifecycle = self.lifecycle.lock().await;

        let status = self.status();
        if status.is_running() {
            return Err(CoreError::not_stopped(self.id, status));
        }

        if bytes.is_empty() {
            return Err(CoreError::empty_upload(self.id));
        }

        if !content_import::has_world_extension(original_name) {
            return Err(CoreError::invalid_archive(
                self.id,
                format!(
                    "'{original_name}' is not a .{} file",
                    content_import::WORLD_EXTENSION
                ),
            ));
        }

        let id = self.id;
        let worlds_dir = self.layout.worlds_dir();
        let upload_name = original_name.to_string();
        let name = tokio::task::spawn_blocking(move || {
            content_import::import_world(id, &bytes, &upload_name, &worlds_dir)
        })
        .await
        .map_err(|e| CoreError::io(self.layout.worlds_dir(), std::io::Error::other(e)))??;

        let mut config = self.config.lock().await;
        config.refresh()?;
        config.set(KEY_LEVEL_NAME, &name)?;

        Ok(name)
    }

    /// Apply a partial settings update, restarting if anything changed
    /// while running.
    pub async fn set_settings(&self, settings: &ServerSettings) -> CoreResult<bool> {
        let mut requested = Vec::new();
        for (setting, value) in Setting::requested(settings) {
            let key = self.profile.setting_key(setting).ok_or_else(|| {
                CoreError::unsupported(self.id, self.edition(), setting.operation())
            })?;
            requested.push((key, value));
        }

        let mut lifecycle = self.lifecycle.lock().await;

        let changes: Vec<(&'static str, String)> = {
            let mut config = self.config.lock().await;
            config.refresh()?;
            requested
                .into_iter()
                .filter(|(key, value)| config.get(key) != Some(value.as_str()))
                .collect()
        };

        if changes.is_empty() {
            return Ok(false);
        }

        let was_running = self.status().is_running();
        self.stop_locked(&mut lifecycle).await?;

        {
            let mut config = self.config.lock().await;
            for (key, value) in &changes {
                config.set(key, value)?;
            }
        }
        info!("Server {}: updated {} setting(s)", self.id, changes.len());

        if was_running {
            self.start_locked(&mut lifecycle).await?;
        }

        Ok(true)
    }

    pub async fn state(&self) -> CoreResult<ServerStateSnapshot> {
        let status = self.status();

        let process = self.process.read().await.clone();
        let (pid, stdout, stderr, exit_code) = match process {
            Some(process) => (
                if process.is_alive() { process.pid() } else { 0 },
                process.stdout().await,
                process.stderr().await,
                process.exit_code().await,
            ),
            None => (0, Vec::new(), Vec::new(), None),
        };

        let version = self.installed_version().await.unwrap_or_else(|e| {
            warn!("Server {}: {e}", self.id);
            None
        });

        let config = {
            let mut config = self.config.lock().await;
            config.refresh()?;
            self.profile.config_view(&config, &self.layout, self.port)?
        };

        Ok(ServerStateSnapshot {
            id: self.id,
            edition: self.edition(),
            status,
            pid,
            port: self.port,
            stdout,
            stderr,
            version,
            config,
            exit_code,
        })
    }

    async fn start_locked(&self, lifecycle: &mut Lifecycle) -> CoreResult<()> {
        if self.status().is_running() {
            return Err(CoreError::already_running(self.id));
        }

        match self.launch(lifecycle).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Server {}: start failed: {e}", self.id);
                self.status.send_replace(ServerStatus::Stopped);
                Err(CoreError::start_failed(self.id, e))
            }
        }
    }

    async fn launch(&self, lifecycle: &mut Lifecycle) -> CoreResult<()> {
        if self.recorded_version().await?.is_none() {
            info!("Server {}: no installed build, installing", self.id);
            self.install_latest().await?;
        }

        let motd = {
            let mut config = self.config.lock().await;
            config.refresh()?;
            self.profile.prepare(&mut config, &self.layout, self.port)?;
            config.get(KEY_MOTD).unwrap_or(DEFAULT_MOTD).to_string()
        };

        let command = self.profile.launch_command(&self.layout);
        let (supervisor, exit_notice) =
            ProcessSupervisor::spawn(self.id, &command).map_err(|e| e.into_core(self.id))?;

        *self.process.write().await = Some(Arc::new(supervisor));
        self.status.send_replace(ServerStatus::Running);
        lifecycle.exit_watcher = Some(self.watch_exit(exit_notice));

        if let EditionProfile::Java(java) = &self.profile
            && java.lan_beacon()
        {
            lifecycle.lan_beacon = Some(LanBeacon::spawn(
                self.id,
                motd,
                self.port,
                self.status.subscribe(),
            ));
        }

        info!("Server {}: running on port {}", self.id, self.port);
        Ok(())
    }

    /// Flip to Stopped once the process has exited, whatever the cause.
    fn watch_exit(&self, exit_notice: ExitNotice) -> JoinHandle<()> {
        let id = self.id;
        let status = Arc::clone(&self.status);

        tokio::spawn(async move {
            let code = exit_notice.await.ok().flatten();
            status.send_replace(ServerStatus::Stopped);

            match code {
                Some(0) => info!("Server {id}: stopped"),
                Some(code) => warn!("Server {id}: exited with code {code}"),
                None => warn!("Server {id}: terminated by signal"),
            }
        })
    }

    async fn stop_locked(&self, lifecycle: &mut Lifecycle) -> CoreResult<()> {
        if !self.status().is_running() {
            return Ok(());
        }

        let process = self.process.read().await.clone();
        if let Some(process) = process {
            process
                .stop(self.profile.stop_command())
                .await
                .map_err(|e| e.into_core(self.id))?;
        }

        if let Some(watcher) = lifecycle.exit_watcher.take()
            && let Err(e) = watcher.await
        {
            warn!("Server {}: exit watcher failed: {e}", self.id);
        }

        self.status.send_replace(ServerStatus::Stopped);

        if let Some(beacon) = lifecycle.lan_beacon.take()
            && let Err(e) = beacon.await
        {
            warn!("Server {}: LAN beacon failed: {e}", self.id);
        }

        Ok(())
    }

    async fn install_latest(&self) -> CoreResult<InstalledVersion> {
        let result: CoreResult<InstalledVersion> = async {
            let latest = self.toolchain.version_source.latest_version().await?;
            self.install_version(&latest).await?;
            Ok(latest)
        }
        .await;

        result.map_err(|e| CoreError::install_failed(self.id, e))
    }

    async fn install_version(&self, version: &InstalledVersion) -> CoreResult<()> {
        self.toolchain
            .installer
            .install(version, self.layout.cache_dir(), self.layout.server_dir())
            .await?;

        let marker = self.layout.version_marker();
        let json = serde_json::to_string_pretty(version)
            .map_err(|e| CoreError::io(&marker, std::io::Error::other(e)))?;
        fs_util::write_atomic(&marker, json.as_bytes()).await?;

        info!("Server {}: installed build {}", self.id, version.build);
        Ok(())
    }

    /// The installed build, with a corrupt marker treated as no install so
    /// the next start or update reinstalls over it.
    async fn recorded_version(&self) -> CoreResult<Option<InstalledVersion>> {
        match self.installed_version().await {
            Err(e @ CoreError::VersionMarkerCorrupt { .. }) => {
                warn!("Server {}: {e}, reinstalling", self.id);
                Ok(None)
            }
            result => result,
        }
    }

    async fn active_world(&self) -> CoreResult<String> {
        let mut config = self.config.lock().await;
        config.refresh()?;
        Ok(config
            .get(KEY_LEVEL_NAME)
            .unwrap_or(self.profile.default_world())
            .to_string())
    }

    async fn preserved_settings(&self) -> CoreResult<Vec<(&'static str, String)>> {
        let mut config = self.config.lock().await;
        config.refresh()?;

        Ok(self
            .profile
            .preserved_keys()
            .iter()
            .filter_map(|key| config.get(key).map(|value| (*key, value.to_string())))
            .collect())
    }

    async fn apply_settings(&self, settings: &[(&'static str, String)]) -> CoreResult<()> {
        let mut config = self.config.lock().await;
        config.refresh()?;
        for (key, value) in settings {
            config.set(key, value)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ServerInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerInstance")
            .field("id", &self.id)
            .field("edition", &self.edition())
            .field("port", &self.port)
            .field("status", &self.status())
            .finish()
    }
}
