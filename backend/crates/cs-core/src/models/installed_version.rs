//! Installed build marker, persisted as `version.json` next to the server files.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledVersion {
    /// Build identifier compared on update
    pub build: String,
    /// Human readable version string
    pub version: String,
    pub url: String,
    /// Artifact filename inside the version cache
    pub filename: String,
    /// SHA-1 of the artifact when the publisher provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
}

impl InstalledVersion {
    pub fn is_same_build(&self, other: &InstalledVersion) -> bool {
        self.build == other.build
    }
}
