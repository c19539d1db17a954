//! Downloads artifacts into the version cache and installs them.

use crate::edition::SERVER_JAR;
use crate::toolchain::ArtifactInstaller;

use cs_core::{CoreError, InstalledVersion, Result as CoreResult};

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};
use sha1::{Digest, Sha1};

/// How a cached artifact becomes a runnable server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Unpacked over the server directory
    ZipArchive,
    /// Copied to `server.jar`
    Jar,
}

pub struct HttpArtifactInstaller {
    client: reqwest::Client,
    kind: ArtifactKind,
}

impl HttpArtifactInstaller {
    pub fn new(client: reqwest::Client, kind: ArtifactKind) -> Self {
        Self { client, kind }
    }

    pub fn sha1_hex(bytes: &[u8]) -> String {
        hex::encode(Sha1::digest(bytes))
    }

    /// True when `path` exists and matches the expected hash (if any).
    async fn is_cached(path: &Path, sha1: Option<&str>) -> CoreResult<bool> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(CoreError::io(path, e)),
        };

        Ok(match sha1 {
            Some(expected) => Self::sha1_hex(&bytes).eq_ignore_ascii_case(expected),
            None => true,
        })
    }

    async fn download(&self, version: &InstalledVersion, destination: &Path) -> CoreResult<()> {
        info!("Downloading {}", version.url);

        let bytes = self
            .client
            .get(&version.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CoreError::download(&version.url, e.to_string()))?
            .bytes()
            .await
            .map_err(|e| CoreError::download(&version.url, e.to_string()))?;

        if let Some(expected) = &version.sha1 {
            let actual = Self::sha1_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(CoreError::download(
                    &version.url,
                    format!("SHA-1 mismatch: expected {expected}, got {actual}"),
                ));
            }
        }

        // Write then rename so a torn download never looks cached
        let partial = destination.with_extension("part");
        tokio::fs::write(&partial, &bytes)
            .await
            .map_err(|e| CoreError::io(&partial, e))?;
        tokio::fs::rename(&partial, destination)
            .await
            .map_err(|e| CoreError::io(destination, e))
    }

    fn extract_zip(archive_path: &Path, target_dir: &Path) -> CoreResult<()> {
        let file = File::open(archive_path).map_err(|e| CoreError::io(archive_path, e))?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| {
            CoreError::io(archive_path, std::io::Error::new(ErrorKind::InvalidData, e))
        })?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| {
                CoreError::io(archive_path, std::io::Error::new(ErrorKind::InvalidData, e))
            })?;

            // Entries escaping the target directory are skipped
            let Some(relative) = entry.enclosed_name() else {
                debug!("Skipping unsafe archive entry {}", entry.name());
                continue;
            };
            let destination = target_dir.join(relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&destination)
                    .map_err(|e| CoreError::io(&destination, e))?;
                continue;
            }

            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
            }
            let mut out = File::create(&destination).map_err(|e| CoreError::io(&destination, e))?;
            std::io::copy(&mut entry, &mut out).map_err(|e| CoreError::io(&destination, e))?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&destination, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| CoreError::io(&destination, e))?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ArtifactInstaller for HttpArtifactInstaller {
    async fn install(
        &self,
        version: &InstalledVersion,
        cache_dir: &Path,
        target_dir: &Path,
    ) -> CoreResult<()> {
        tokio::fs::create_dir_all(cache_dir)
            .await
            .map_err(|e| CoreError::io(cache_dir, e))?;
        tokio::fs::create_dir_all(target_dir)
            .await
            .map_err(|e| CoreError::io(target_dir, e))?;

        let cached = cache_dir.join(&version.filename);
        if Self::is_cached(&cached, version.sha1.as_deref()).await? {
            info!("Found {} in cache, skipping download", version.filename);
        } else {
            self.download(version, &cached).await?;
        }

        match self.kind {
            ArtifactKind::Jar => {
                let jar: PathBuf = target_dir.join(SERVER_JAR);
                tokio::fs::copy(&cached, &jar)
                    .await
                    .map_err(|e| CoreError::io(&jar, e))?;
            }
            ArtifactKind::ZipArchive => {
                let target = target_dir.to_path_buf();
                let archive = cached.clone();
                tokio::task::spawn_blocking(move || Self::extract_zip(&archive, &target))
                    .await
                    .map_err(|e| CoreError::io(&cached, std::io::Error::other(e)))??;
            }
        }

        info!(
            "Installed {} into {}",
            version.filename,
            target_dir.display()
        );
        Ok(())
    }
}
