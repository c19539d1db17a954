//! Bedrock Dedicated Server builds scraped from the public download page.

use crate::toolchain::VersionSource;

use cs_core::{CoreError, Edition, InstalledVersion, Result as CoreResult};

use async_trait::async_trait;
use log::debug;

pub const DOWNLOAD_PAGE_URL: &str = "https://www.minecraft.net/en-us/download/server/bedrock";
const FILE_PREFIX: &str = "bedrock-server-";
const FILE_SUFFIX: &str = ".zip";
// The download page rejects clients without a browser-like agent
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) crankshaft";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedrockPlatform {
    Linux,
    Windows,
}

impl BedrockPlatform {
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    /// Platform a download link targets, judged by its URL.
    pub fn of_link(url: &str) -> Self {
        if url.contains("win") {
            Self::Windows
        } else {
            Self::Linux
        }
    }
}

pub struct BedrockVersionSource {
    client: reqwest::Client,
    page_url: String,
    platform: BedrockPlatform,
}

impl BedrockVersionSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_page_url(client, DOWNLOAD_PAGE_URL, BedrockPlatform::host())
    }

    pub fn with_page_url<S: Into<String>>(
        client: reqwest::Client,
        page_url: S,
        platform: BedrockPlatform,
    ) -> Self {
        Self {
            client,
            page_url: page_url.into(),
            platform,
        }
    }

    /// Every `bedrock-server-<version>.zip` link on the page, in page order.
    /// Preview builds are skipped.
    pub fn parse_download_links(html: &str) -> Vec<(BedrockPlatform, InstalledVersion)> {
        let mut builds = Vec::new();

        for url in Self::links(html) {
            if url.contains("preview") {
                continue;
            }

            let Some(filename) = url.rsplit('/').next() else {
                continue;
            };
            let Some(version) = filename
                .strip_prefix(FILE_PREFIX)
                .and_then(|rest| rest.strip_suffix(FILE_SUFFIX))
            else {
                continue;
            };

            let build = InstalledVersion {
                build: version.to_string(),
                version: version.to_string(),
                url: url.to_string(),
                filename: filename.to_string(),
                sha1: None,
            };
            if !builds.iter().any(|(_, b): &(BedrockPlatform, InstalledVersion)| b.url == build.url) {
                builds.push((BedrockPlatform::of_link(url), build));
            }
        }

        builds
    }

    /// Quoted `href` values.
    fn links(html: &str) -> impl Iterator<Item = &str> {
        html.split("href=").skip(1).filter_map(|rest| {
            let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
            let value = &rest[1..];
            value.split(quote).next()
        })
    }
}

#[async_trait]
impl VersionSource for BedrockVersionSource {
    async fn latest_version(&self) -> CoreResult<InstalledVersion> {
        let html = self
            .client
            .get(&self.page_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CoreError::discovery(Edition::Bedrock, format!("GET {}: {e}", self.page_url)))?
            .text()
            .await
            .map_err(|e| CoreError::discovery(Edition::Bedrock, e.to_string()))?;

        let builds = Self::parse_download_links(&html);
        if builds.is_empty() {
            return Err(CoreError::discovery(Edition::Bedrock, "No builds found"));
        }

        let (_, latest) = builds
            .into_iter()
            .find(|(platform, _)| *platform == self.platform)
            .ok_or_else(|| CoreError::discovery(Edition::Bedrock, "No compatible builds found"))?;

        debug!("Latest Bedrock build is {}", latest.version);
        Ok(latest)
    }
}
