use crate::toolchain::{
    ArtifactInstaller, ArtifactKind, BedrockVersionSource, HttpArtifactInstaller,
    MojangVersionSource, VersionSource,
};

use cs_core::Edition;

use std::sync::Arc;

/// Discovery and installation for one edition.
#[derive(Clone)]
pub struct Toolchain {
    pub version_source: Arc<dyn VersionSource>,
    pub installer: Arc<dyn ArtifactInstaller>,
}

impl Toolchain {
    pub fn new(
        version_source: Arc<dyn VersionSource>,
        installer: Arc<dyn ArtifactInstaller>,
    ) -> Self {
        Self {
            version_source,
            installer,
        }
    }
}

#[derive(Clone)]
pub struct Toolchains {
    pub bedrock: Toolchain,
    pub java: Toolchain,
}

impl Toolchains {
    /// Toolchains backed by the public download endpoints.
    pub fn http(client: reqwest::Client) -> Self {
        Self {
            bedrock: Toolchain::new(
                Arc::new(BedrockVersionSource::new(client.clone())),
                Arc::new(HttpArtifactInstaller::new(
                    client.clone(),
                    ArtifactKind::ZipArchive,
                )),
            ),
            java: Toolchain::new(
                Arc::new(MojangVersionSource::new(client.clone())),
                Arc::new(HttpArtifactInstaller::new(client, ArtifactKind::Jar)),
            ),
        }
    }

    pub fn for_edition(&self, edition: Edition) -> Toolchain {
        match edition {
            Edition::Bedrock => self.bedrock.clone(),
            Edition::Java => self.java.clone(),
        }
    }
}
