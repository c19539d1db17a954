//! Line-oriented `key=value` configuration file (server.properties, eula.txt).
//!
//! The file is cached in memory and only re-read on [`ConfigStore::refresh`].
//! Every [`ConfigStore::set`] that changes a value rewrites the whole file
//! immediately. Lines other than the one being replaced are written back
//! byte-for-byte, including their line endings and comments.

use cs_core::{CoreError, Result as CoreResult};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const COMMENT_PREFIX: char = '#';

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    /// Raw lines without `\n`; a line may keep its trailing `\r`
    lines: Vec<String>,
    ends_with_newline: bool,
}

impl ConfigStore {
    /// Open a config file. A missing file is an empty store; it is created
    /// by the first `set`.
    pub fn open<P: Into<PathBuf>>(path: P) -> CoreResult<Self> {
        let mut store = Self {
            path: path.into(),
            lines: Vec::new(),
            ends_with_newline: false,
        };
        store.refresh()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload the cache from disk.
    pub fn refresh(&mut self) -> CoreResult<()> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(CoreError::io(&self.path, e)),
        };

        self.ends_with_newline = content.ends_with('\n');
        self.lines = if content.is_empty() {
            Vec::new()
        } else {
            let mut lines: Vec<String> = content.split('\n').map(String::from).collect();
            if self.ends_with_newline {
                lines.pop();
            }
            lines
        };

        Ok(())
    }

    /// First value recorded for `key`. Comment lines are ignored.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).map(|(_, value)| value)
    }

    /// Value of `key` parsed as a properties boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Write `key=value`, replacing the first line that defines `key` or
    /// appending a new one. Returns false, without touching the file, when
    /// the value is already current.
    pub fn set(&mut self, key: &str, value: &str) -> CoreResult<bool> {
        match self.find(key) {
            Some((_, current)) if current == value => return Ok(false),
            Some((index, _)) => {
                let carriage_return = if self.lines[index].ends_with('\r') {
                    "\r"
                } else {
                    ""
                };
                self.lines[index] = format!("{key}={value}{carriage_return}");
            }
            None => self.append(format!("{key}={value}")),
        }

        self.write()?;
        Ok(true)
    }

    /// Sorted names of the directories under `subpath`, relative to the
    /// directory holding this file. A missing directory lists as empty.
    pub fn list_directory_entries(&self, subpath: &str) -> CoreResult<Vec<String>> {
        let dir = self
            .path
            .parent()
            .map(|parent| parent.join(subpath))
            .unwrap_or_else(|| PathBuf::from(subpath));

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CoreError::io(&dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::io(&dir, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| CoreError::io(entry.path(), e))?
                .is_dir();
            if is_dir && let Some(name) = entry.file_name().to_str() {
                // Staging directories from an in-flight import are hidden
                if !name.starts_with('.') {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    fn find(&self, key: &str) -> Option<(usize, &str)> {
        self.lines.iter().enumerate().find_map(|(index, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim_start().starts_with(COMMENT_PREFIX) {
                return None;
            }
            let (line_key, value) = line.split_once('=')?;
            (line_key.trim() == key).then_some((index, value))
        })
    }

    fn append(&mut self, line: String) {
        let crlf = self.lines.iter().any(|l| l.ends_with('\r'));

        if !self.ends_with_newline
            && crlf
            && let Some(last) = self.lines.last_mut()
        {
            last.push('\r');
        }

        self.lines.push(if crlf { format!("{line}\r") } else { line });
        self.ends_with_newline = true;
    }

    fn write(&self) -> CoreResult<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            std::fs::create_dir_all(dir).map_err(|e| CoreError::io(dir, e))?;
        }

        let mut content = self.lines.join("\n");
        if self.ends_with_newline {
            content.push('\n');
        }

        std::fs::write(&self.path, content).map_err(|e| CoreError::io(&self.path, e))
    }
}
