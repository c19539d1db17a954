//! `<base>/servers.json`, the durable list of fleet members.

use crate::fs_util;

use cs_core::{CoreError, Result as CoreResult, ServerRecord};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

pub const MANIFEST_FILENAME: &str = "servers.json";

#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw entries. `None` when the file is missing or blank; a file that
    /// is not a JSON array is corrupt and left untouched.
    pub async fn read(&self) -> CoreResult<Option<Vec<Value>>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(entries)) => Ok(Some(entries)),
            Ok(_) => Err(CoreError::manifest_corrupt(
                &self.path,
                "expected a JSON array",
            )),
            Err(e) => Err(CoreError::manifest_corrupt(&self.path, e.to_string())),
        }
    }

    /// Replace the manifest with `records`, sorted by id.
    pub async fn write(&self, records: &[ServerRecord]) -> CoreResult<()> {
        let mut records = records.to_vec();
        records.sort_by_key(|r| r.id);

        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| CoreError::io(&self.path, std::io::Error::other(e)))?;

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| CoreError::io(dir, e))?;
        }

        fs_util::write_atomic(&self.path, json.as_bytes()).await?;

        debug!("Persisted {} server(s) to {}", records.len(), self.path.display());
        Ok(())
    }
}
