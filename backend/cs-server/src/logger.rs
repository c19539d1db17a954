//! Daemon log output.
//!
//! Lines look like
//! `[2026-10-16T09:14:03Z INFO  cs_fleet] Server 3: running on port 19134 (server_instance.rs:412)`.
//! The bracketed target is the crate that emitted the line, so fleet,
//! config and daemon messages can be told apart when grepping a log file.

use crate::error::{Result as ServerErrorResult, ServerError};

use std::fmt::{Arguments, Display};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record, info};

/// Chatty HTTP internals are capped at this level.
const DEPENDENCY_LEVEL: LevelFilter = LevelFilter::Warn;
const DEPENDENCY_TARGETS: [&str; 3] = ["reqwest", "hyper_util", "rustls"];

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stdout { colored: bool },
    /// Appended to; color is never used in files
    File(PathBuf),
}

impl LogSink {
    pub fn new(log_file: Option<PathBuf>, colored: bool) -> Self {
        match log_file {
            Some(path) => Self::File(path),
            None => Self::Stdout { colored },
        }
    }
}

/// Install the global logger. Fails if one is already installed.
#[track_caller]
pub fn initialize(
    log_level: cs_config::LogLevel,
    log_file: Option<PathBuf>,
    colored: bool,
) -> ServerErrorResult<()> {
    let sink = LogSink::new(log_file, colored);
    let level = log_level.0;

    let mut dispatch = Dispatch::new().level(level);
    for target in DEPENDENCY_TARGETS {
        dispatch = dispatch.level_for(target, level.min(DEPENDENCY_LEVEL));
    }

    let dispatch = match &sink {
        LogSink::File(path) => dispatch
            .format(|out, message, record| write_line(out, message, record, record.level()))
            .chain(open_log_file(path)?),
        LogSink::Stdout { colored: true } => {
            let colors = ColoredLevelConfig::new()
                .trace(Color::Magenta)
                .debug(Color::Blue)
                .info(Color::Green)
                .warn(Color::Yellow)
                .error(Color::Red);
            dispatch
                .format(move |out, message, record| {
                    write_line(out, message, record, colors.color(record.level()))
                })
                .chain(std::io::stdout())
        }
        LogSink::Stdout { colored: false } => dispatch
            .format(|out, message, record| write_line(out, message, record, record.level()))
            .chain(std::io::stdout()),
    };

    dispatch
        .apply()
        .map_err(|e| ServerError::logger(e.to_string()))?;

    match sink {
        LogSink::File(path) => info!("Logging at {level} to {}", path.display()),
        LogSink::Stdout { .. } => info!("Logging at {level} to stdout"),
    }

    Ok(())
}

fn write_line(
    out: FormatCallback<'_>,
    message: &Arguments<'_>,
    record: &Record<'_>,
    level: impl Display,
) {
    out.finish(format_args!(
        "[{date} {level:<5} {target}] {message} ({file}:{line})",
        date = humantime::format_rfc3339_seconds(SystemTime::now()),
        target = crate_of(record.target()),
        file = record
            .file()
            .and_then(|file| Path::new(file).file_name())
            .and_then(|name| name.to_str())
            .unwrap_or("unknown"),
        line = record.line().unwrap_or(0),
    ))
}

/// `cs_fleet::server_instance` -> `cs_fleet`
pub fn crate_of(target: &str) -> &str {
    target.split("::").next().unwrap_or(target)
}

#[track_caller]
fn open_log_file(path: &Path) -> ServerErrorResult<std::fs::File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| ServerError::logger(format!("Failed to create {}: {e}", dir.display())))?;
    }

    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ServerError::logger(format!("Failed to open log file {}: {e}", path.display())))
}
