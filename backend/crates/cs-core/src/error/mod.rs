use crate::{Edition, ServerStatus};

use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

/// Broad failure classes used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad caller input. Never retried.
    Validation,
    /// Operation conflicts with the current fleet or instance state.
    Conflict,
    /// A process, network or filesystem dependency failed.
    External,
    /// Persisted data could not be trusted.
    Corruption,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::External => "external",
            Self::Corruption => "corruption",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    // Validation
    #[error("Invalid server id: {value} {location}")]
    InvalidId {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid {field}: '{value}' {location}")]
    InvalidValue {
        field: &'static str,
        value: String,
        location: ErrorLocation,
    },

    #[error("Server {id}: invalid content name '{name}' {location}")]
    InvalidContentName {
        id: u32,
        name: String,
        location: ErrorLocation,
    },

    #[error("Server {id}: uploaded archive is empty {location}")]
    EmptyUpload { id: u32, location: ErrorLocation },

    #[error("Server {id}: invalid archive: {reason} {location}")]
    InvalidArchive {
        id: u32,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Server {id}: {operation} is not supported for {edition} servers {location}")]
    Unsupported {
        id: u32,
        edition: Edition,
        operation: &'static str,
        location: ErrorLocation,
    },

    #[error("Server {id} not found {location}")]
    NotFound { id: u32, location: ErrorLocation },

    // Conflict
    #[error("Server {id} already exists {location}")]
    AlreadyExists { id: u32, location: ErrorLocation },

    #[error("Server {id} must be stopped before removal (status: {status}) {location}")]
    MustBeStopped {
        id: u32,
        status: ServerStatus,
        location: ErrorLocation,
    },

    #[error("Server {id} must be stopped first (status: {status}) {location}")]
    NotStopped {
        id: u32,
        status: ServerStatus,
        location: ErrorLocation,
    },

    #[error("Server {id} is not running {location}")]
    NotRunning { id: u32, location: ErrorLocation },

    #[error("Server {id} is already running {location}")]
    AlreadyRunning { id: u32, location: ErrorLocation },

    // External
    #[error("Server {id}: install failed: {source} {location}")]
    InstallFailed {
        id: u32,
        #[source]
        source: Box<CoreError>,
        location: ErrorLocation,
    },

    #[error("Server {id}: start failed: {source} {location}")]
    StartFailed {
        id: u32,
        #[source]
        source: Box<CoreError>,
        location: ErrorLocation,
    },

    #[error("Server {id}: update failed: {source} {location}")]
    UpdateFailed {
        id: u32,
        #[source]
        source: Box<CoreError>,
        location: ErrorLocation,
    },

    #[error("Version discovery failed for {edition}: {message} {location}")]
    Discovery {
        edition: Edition,
        message: String,
        location: ErrorLocation,
    },

    #[error("Download of {url} failed: {message} {location}")]
    Download {
        url: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Server {id}: process error: {message} {location}")]
    Process {
        id: u32,
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error at {path}: {source} {location}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("No free port at or above {start} {location}")]
    PortsExhausted { start: u16, location: ErrorLocation },

    // Corruption
    #[error("Manifest {path} is corrupt: {message} {location}")]
    ManifestCorrupt {
        path: PathBuf,
        message: String,
        location: ErrorLocation,
    },

    #[error("Server {id}: version marker {path} is corrupt: {message} {location}")]
    VersionMarkerCorrupt {
        id: u32,
        path: PathBuf,
        message: String,
        location: ErrorLocation,
    },
}

impl CoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidId { .. }
            | Self::InvalidValue { .. }
            | Self::InvalidContentName { .. }
            | Self::EmptyUpload { .. }
            | Self::InvalidArchive { .. }
            | Self::Unsupported { .. }
            | Self::NotFound { .. } => ErrorCategory::Validation,

            Self::AlreadyExists { .. }
            | Self::MustBeStopped { .. }
            | Self::NotStopped { .. }
            | Self::NotRunning { .. }
            | Self::AlreadyRunning { .. } => ErrorCategory::Conflict,

            Self::InstallFailed { .. }
            | Self::StartFailed { .. }
            | Self::UpdateFailed { .. }
            | Self::Discovery { .. }
            | Self::Download { .. }
            | Self::Process { .. }
            | Self::Io { .. }
            | Self::PortsExhausted { .. } => ErrorCategory::External,

            Self::ManifestCorrupt { .. } | Self::VersionMarkerCorrupt { .. } => {
                ErrorCategory::Corruption
            }
        }
    }

    /// Instance id the failure belongs to, if any.
    pub fn server_id(&self) -> Option<u32> {
        match self {
            Self::InvalidContentName { id, .. }
            | Self::EmptyUpload { id, .. }
            | Self::InvalidArchive { id, .. }
            | Self::Unsupported { id, .. }
            | Self::NotFound { id, .. }
            | Self::AlreadyExists { id, .. }
            | Self::MustBeStopped { id, .. }
            | Self::NotStopped { id, .. }
            | Self::NotRunning { id, .. }
            | Self::AlreadyRunning { id, .. }
            | Self::InstallFailed { id, .. }
            | Self::StartFailed { id, .. }
            | Self::UpdateFailed { id, .. }
            | Self::Process { id, .. }
            | Self::VersionMarkerCorrupt { id, .. } => Some(*id),
            _ => None,
        }
    }

    #[track_caller]
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_value<S: Into<String>>(field: &'static str, value: S) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found(id: u32) -> Self {
        Self::NotFound {
            id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_content_name<S: Into<String>>(id: u32, name: S) -> Self {
        Self::InvalidContentName {
            id,
            name: name.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn empty_upload(id: u32) -> Self {
        Self::EmptyUpload {
            id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn already_exists(id: u32) -> Self {
        Self::AlreadyExists {
            id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn must_be_stopped(id: u32, status: ServerStatus) -> Self {
        Self::MustBeStopped {
            id,
            status,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_stopped(id: u32, status: ServerStatus) -> Self {
        Self::NotStopped {
            id,
            status,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_running(id: u32) -> Self {
        Self::NotRunning {
            id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn already_running(id: u32) -> Self {
        Self::AlreadyRunning {
            id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn ports_exhausted(start: u16) -> Self {
        Self::PortsExhausted {
            start,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn version_marker_corrupt<P: Into<PathBuf>, S: Into<String>>(
        id: u32,
        path: P,
        message: S,
    ) -> Self {
        Self::VersionMarkerCorrupt {
            id,
            path: path.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_archive<S: Into<String>>(id: u32, reason: S) -> Self {
        Self::InvalidArchive {
            id,
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unsupported(id: u32, edition: Edition, operation: &'static str) -> Self {
        Self::Unsupported {
            id,
            edition,
            operation,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn discovery<S: Into<String>>(edition: Edition, message: S) -> Self {
        Self::Discovery {
            edition,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn download<U: Into<String>, S: Into<String>>(url: U, message: S) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn process<S: Into<String>>(id: u32, message: S) -> Self {
        Self::Process {
            id,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn install_failed(id: u32, source: CoreError) -> Self {
        Self::InstallFailed {
            id,
            source: Box::new(source),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn start_failed(id: u32, source: CoreError) -> Self {
        Self::StartFailed {
            id,
            source: Box::new(source),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn update_failed(id: u32, source: CoreError) -> Self {
        Self::UpdateFailed {
            id,
            source: Box::new(source),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn manifest_corrupt<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::ManifestCorrupt {
            path: path.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = StdResult<T, CoreError>;
