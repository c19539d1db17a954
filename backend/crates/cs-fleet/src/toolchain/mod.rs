//! Collaborators that find and install server builds.

mod artifact_installer;
mod bedrock_version_source;
mod http_artifact_installer;
mod mojang_version_source;
mod toolchains;
mod version_source;

pub use artifact_installer::ArtifactInstaller;
pub use bedrock_version_source::{BedrockPlatform, BedrockVersionSource};
pub use http_artifact_installer::{ArtifactKind, HttpArtifactInstaller};
pub use mojang_version_source::MojangVersionSource;
pub use toolchains::{Toolchain, Toolchains};
pub use version_source::VersionSource;
