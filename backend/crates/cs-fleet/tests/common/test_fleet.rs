#![allow(dead_code)]

use crate::common::fake_toolchain::{FakeInstaller, FakeVersionSource, write_server_script};

use cs_core::{Edition, ServerStatus};
use cs_fleet::toolchain::{Toolchain, Toolchains};
use cs_fleet::{FleetManager, FleetSettings, ServerInstance};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

pub const WAIT: Duration = Duration::from_secs(10);

/// A fleet rooted in a temp directory, backed by fake toolchains.
pub struct TestFleet {
    pub dir: TempDir,
    pub settings: FleetSettings,
    pub toolchains: Toolchains,
    pub bedrock_source: Arc<FakeVersionSource>,
    pub java_source: Arc<FakeVersionSource>,
    pub bedrock_installer: Arc<FakeInstaller>,
    pub java_installer: Arc<FakeInstaller>,
    pub manager: FleetManager,
}

impl TestFleet {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("fake-server.sh");
        write_server_script(&script);

        let mut settings = FleetSettings::with_base_path(dir.path().join("servers"));
        settings.java_binary = script.clone();
        settings.backup_quiescence = Duration::ZERO;
        settings.lan_beacon = false;

        let bedrock_source = Arc::new(FakeVersionSource::new(Edition::Bedrock, "1.0"));
        let java_source = Arc::new(FakeVersionSource::new(Edition::Java, "1.0"));
        let bedrock_installer = Arc::new(FakeInstaller::new(Edition::Bedrock, script.clone()));
        let java_installer = Arc::new(FakeInstaller::new(Edition::Java, script));

        let toolchains = Toolchains {
            bedrock: Toolchain::new(bedrock_source.clone(), bedrock_installer.clone()),
            java: Toolchain::new(java_source.clone(), java_installer.clone()),
        };
        let manager = FleetManager::new(settings.clone(), toolchains.clone());

        Self {
            dir,
            settings,
            toolchains,
            bedrock_source,
            java_source,
            bedrock_installer,
            java_installer,
            manager,
        }
    }

    /// A second manager over the same directory, as after a daemon restart.
    pub fn reopen(&self) -> FleetManager {
        FleetManager::new(self.settings.clone(), self.toolchains.clone())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.settings.manifest_path()
    }

    pub fn manifest_json(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.manifest_path()).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    pub fn write_manifest(&self, content: &str) {
        std::fs::create_dir_all(&self.settings.base_path).unwrap();
        std::fs::write(self.manifest_path(), content).unwrap();
    }
}

/// Wait until the instance reports `status`.
pub async fn wait_for_status(instance: &ServerInstance, status: ServerStatus) {
    let mut receiver = instance.subscribe();
    tokio::time::timeout(WAIT, receiver.wait_for(|current| *current == status))
        .await
        .expect("timed out waiting for status")
        .expect("status channel closed");
}
