#![allow(dead_code)]

use cs_core::{CoreError, Edition, InstalledVersion, Result as CoreResult};
use cs_fleet::toolchain::{ArtifactInstaller, VersionSource};

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

/// Shell stand-in for both server editions. It answers console commands
/// on stdout, exits on `stop`, and crashes when its motd is `crash`.
pub const FAKE_SERVER_SCRIPT: &str = r#"#!/bin/sh
if [ -f server.properties ] && grep -q '^motd=crash' server.properties; then
  echo "boom" >&2
  exit 3
fi
echo "[INFO] Server started."
while IFS= read -r line; do
  case "$line" in
    stop) echo "[INFO] Quit correctly"; exit 0 ;;
    *) echo "[INFO] $line" ;;
  esac
done
"#;

/// Properties shipped inside a Bedrock build; reinstalling overwrites them.
pub const BEDROCK_DEFAULT_PROPERTIES: &str =
    "server-name=Dedicated Server\ngamemode=survival\nonline-mode=true\nlevel-name=Bedrock level\n";

/// Writes the fake server script once, before anything is spawned.
pub fn write_server_script(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, FAKE_SERVER_SCRIPT).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Version source whose latest build can be changed or made to fail.
pub struct FakeVersionSource {
    edition: Edition,
    build: Mutex<String>,
    fail: AtomicBool,
}

impl FakeVersionSource {
    pub fn new(edition: Edition, build: &str) -> Self {
        Self {
            edition,
            build: Mutex::new(build.to_string()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_build(&self, build: &str) {
        *self.build.lock().unwrap() = build.to_string();
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl VersionSource for FakeVersionSource {
    async fn latest_version(&self) -> CoreResult<InstalledVersion> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::discovery(self.edition, "upstream unavailable"));
        }

        let build = self.build.lock().unwrap().clone();
        Ok(InstalledVersion {
            url: format!("https://example.invalid/{}/{build}", self.edition),
            filename: format!("{}-{build}", self.edition),
            version: build.clone(),
            build,
            sha1: None,
        })
    }
}

/// Installs the fake server without touching the network.
///
/// Bedrock gets the script hard-linked in as `bedrock_server` plus default
/// properties; Java gets a placeholder `server.jar`.
pub struct FakeInstaller {
    edition: Edition,
    script: PathBuf,
    installs: AtomicUsize,
    fail: AtomicBool,
}

impl FakeInstaller {
    pub fn new(edition: Edition, script: PathBuf) -> Self {
        Self {
            edition,
            script,
            installs: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn installs(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ArtifactInstaller for FakeInstaller {
    async fn install(
        &self,
        version: &InstalledVersion,
        _cache_dir: &Path,
        target_dir: &Path,
    ) -> CoreResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::download(&version.url, "simulated failure"));
        }

        std::fs::create_dir_all(target_dir).map_err(|e| CoreError::io(target_dir, e))?;

        match self.edition {
            Edition::Bedrock => {
                let executable = target_dir.join("bedrock_server");
                let _ = std::fs::remove_file(&executable);
                // A hard link keeps the executable from ever being open for writing
                std::fs::hard_link(&self.script, &executable)
                    .map_err(|e| CoreError::io(&executable, e))?;
                std::fs::write(target_dir.join("server.properties"), BEDROCK_DEFAULT_PROPERTIES)
                    .map_err(|e| CoreError::io(target_dir, e))?;
            }
            Edition::Java => {
                std::fs::write(target_dir.join("server.jar"), &version.build)
                    .map_err(|e| CoreError::io(target_dir, e))?;
            }
        }

        self.installs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
