//! Java Edition releases from Mojang's piston-meta version manifest.

use crate::toolchain::VersionSource;

use cs_core::{CoreError, Edition, InstalledVersion, Result as CoreResult};

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

#[derive(Debug, Deserialize)]
struct VersionManifest {
    latest: LatestVersions,
    versions: Vec<VersionEntry>,
}

#[derive(Debug, Deserialize)]
struct LatestVersions {
    release: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VersionEntry {
    id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct VersionDetail {
    id: Option<String>,
    downloads: Option<Downloads>,
}

#[derive(Debug, Deserialize)]
struct Downloads {
    server: Option<ServerDownload>,
}

#[derive(Debug, Deserialize)]
struct ServerDownload {
    url: String,
    sha1: Option<String>,
}

pub struct MojangVersionSource {
    client: reqwest::Client,
    manifest_url: String,
}

impl MojangVersionSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_manifest_url(client, VERSION_MANIFEST_URL)
    }

    pub fn with_manifest_url<S: Into<String>>(client: reqwest::Client, manifest_url: S) -> Self {
        Self {
            client,
            manifest_url: manifest_url.into(),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, url: &str) -> CoreResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CoreError::discovery(Edition::Java, format!("GET {url}: {e}")))?;

        response
            .json::<T>()
            .await
            .map_err(|e| CoreError::discovery(Edition::Java, format!("Invalid JSON from {url}: {e}")))
    }

    /// Some manifests prefix ids with "java"; the build id is the bare version.
    fn clean_id(id: &str) -> String {
        let lower = id.to_ascii_lowercase();
        if lower.starts_with("java") {
            id[4..].trim_start_matches([' ', '-']).to_string()
        } else {
            id.to_string()
        }
    }
}

#[async_trait]
impl VersionSource for MojangVersionSource {
    async fn latest_version(&self) -> CoreResult<InstalledVersion> {
        let manifest: VersionManifest = self.read_json(&self.manifest_url).await?;

        let latest_id = manifest
            .latest
            .release
            .or_else(|| manifest.versions.first().map(|v| v.id.clone()))
            .ok_or_else(|| CoreError::discovery(Edition::Java, "No Java release versions found"))?;

        let entry = manifest
            .versions
            .iter()
            .find(|v| v.id == latest_id)
            .or_else(|| manifest.versions.first())
            .ok_or_else(|| {
                CoreError::discovery(Edition::Java, format!("Release {latest_id} not listed"))
            })?;

        debug!("Latest Java release is {}", entry.id);
        let detail: VersionDetail = self.read_json(&entry.url).await?;

        let server = detail
            .downloads
            .and_then(|d| d.server)
            .ok_or_else(|| {
                CoreError::discovery(Edition::Java, "No Java server download found in manifest")
            })?;

        let version = Self::clean_id(&entry.id);
        let build = detail
            .id
            .map(|id| Self::clean_id(&id))
            .unwrap_or_else(|| version.clone());

        Ok(InstalledVersion {
            build,
            filename: format!("server-{version}.jar"),
            version,
            url: server.url,
            sha1: server.sha1,
        })
    }
}
