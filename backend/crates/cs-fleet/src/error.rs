use cs_core::CoreError;

use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

/// Failures talking to a supervised child process.
#[derive(ThisError, Debug)]
pub enum ProcessError {
    #[error("Failed to spawn {program}: {source} {location}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Process {pid} stdin is closed {location}")]
    StdinClosed { pid: u32, location: ErrorLocation },

    #[error("IO error writing to process {pid}: {source} {location}")]
    Io {
        pid: u32,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl ProcessError {
    /// Attach the owning server id.
    #[track_caller]
    pub fn into_core(self, id: u32) -> CoreError {
        CoreError::process(id, self.to_string())
    }
}

pub type ProcessResult<T> = StdResult<T, ProcessError>;
