//! Lock file keeping a second daemon off the same base path.

use crate::error::{Result as ServerResult, ServerError};

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};

use error_location::ErrorLocation;
use log::info;
use serde::{Deserialize, Serialize};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

pub const LOCK_FILENAME: &str = "crankshaft.lock";
#[cfg(unix)]
const LOCK_FILE_MODE: u32 = 0o600;

/// Holds `<base>/crankshaft.lock` for the lifetime of the daemon.
///
/// The file records the owning PID so a lock left behind by a crashed
/// daemon is detected and replaced.
pub struct LockFile {
    path: PathBuf,
    file: Option<File>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LockInfo {
    pub pid: u32,
    pub started_at: String,
}

impl LockFile {
    #[track_caller]
    pub fn acquire(base_path: &Path) -> ServerResult<Self> {
        let path = base_path.join(LOCK_FILENAME);

        if path.exists()
            && let Ok(existing) = Self::read_info(&path)
        {
            if Self::is_process_running(existing.pid) {
                return Err(ServerError::AlreadyRunning {
                    path,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            info!(
                "Removing stale lock file (PID {} not running)",
                existing.pid
            );
            std::fs::remove_file(&path).ok();
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(LOCK_FILE_MODE);

        let file = options
            .open(&path)
            .map_err(|e| ServerError::lock_acquisition(&path, e))?;

        let mut lock = Self {
            path,
            file: Some(file),
        };
        lock.write_info()?;

        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[track_caller]
    fn write_info(&mut self) -> ServerResult<()> {
        let info = LockInfo {
            pid: std::process::id(),
            started_at: chrono::Utc::now().to_rfc3339(),
        };

        let content = serde_json::to_string_pretty(&info).map_err(|e| {
            ServerError::lock_acquisition(
                &self.path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;

        if let Some(ref mut file) = self.file {
            file.write_all(content.as_bytes())
                .and_then(|()| file.sync_all())
                .map_err(|e| ServerError::lock_acquisition(&self.path, e))?;
        }

        Ok(())
    }

    pub fn read_info(path: &Path) -> std::io::Result<LockInfo> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    #[cfg(unix)]
    fn is_process_running(pid: u32) -> bool {
        let Ok(pid) = i32::try_from(pid) else {
            return false;
        };
        // Signal 0 only probes for existence
        unsafe { libc::kill(pid, 0) == 0 }
    }

    #[cfg(windows)]
    fn is_process_running(pid: u32) -> bool {
        use windows_sys::Win32::Foundation::{CloseHandle, STILL_ACTIVE};
        use windows_sys::Win32::System::Threading::{
            GetExitCodeProcess, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION,
        };

        unsafe {
            let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
            if handle.is_null() {
                return false;
            }

            let mut exit_code: u32 = 0;
            let result = GetExitCodeProcess(handle, &mut exit_code);
            CloseHandle(handle);

            result != 0 && exit_code == STILL_ACTIVE as u32
        }
    }

    /// Release the lock. Also runs on drop.
    pub fn release(&mut self) {
        if self.file.take().is_some() {
            std::fs::remove_file(&self.path).ok();
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        self.release();
    }
}
