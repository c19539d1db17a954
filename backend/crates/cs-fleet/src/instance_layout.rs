//! On-disk layout of one server instance.
//!
//! ```text
//! <base>/<id>/<edition>/version.json
//! <base>/<id>/<edition>/server.properties
//! <base>/<id>/<edition>/worlds/
//! <base>/<id>/<edition>/backups/
//! <version_cache>/<edition>/
//! ```

use cs_core::Edition;

use std::path::{Path, PathBuf};

const VERSION_MARKER: &str = "version.json";
const SERVER_PROPERTIES: &str = "server.properties";
const EULA_FILE: &str = "eula.txt";
pub(crate) const WORLDS_DIR: &str = "worlds";
const BACKUPS_DIR: &str = "backups";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceLayout {
    root: PathBuf,
    server_dir: PathBuf,
    cache_dir: PathBuf,
}

impl InstanceLayout {
    pub fn new(base_path: &Path, version_cache: &Path, id: u32, edition: Edition) -> Self {
        let root = base_path.join(id.to_string());
        let server_dir = root.join(edition.as_str());
        let cache_dir = version_cache.join(edition.as_str());

        Self {
            root,
            server_dir,
            cache_dir,
        }
    }

    /// `<base>/<id>`, removed as a whole when the server is deleted
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Working directory of the server process
    pub fn server_dir(&self) -> &Path {
        &self.server_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn version_marker(&self) -> PathBuf {
        self.server_dir.join(VERSION_MARKER)
    }

    pub fn properties(&self) -> PathBuf {
        self.server_dir.join(SERVER_PROPERTIES)
    }

    pub fn eula(&self) -> PathBuf {
        self.server_dir.join(EULA_FILE)
    }

    pub fn worlds_dir(&self) -> PathBuf {
        self.server_dir.join(WORLDS_DIR)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.server_dir.join(BACKUPS_DIR)
    }
}
