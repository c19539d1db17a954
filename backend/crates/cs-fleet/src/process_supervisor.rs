//! One supervised game-server child process.

use crate::{LaunchCommand, LineReassembler, ProcessError, ProcessResult};

use std::panic::Location;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tokio::sync::{Mutex, RwLock, oneshot};
use tokio::task::JoinHandle;

const READ_BUFFER_SIZE: usize = 8 * 1024;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Resolves exactly once with the exit code (`None` when the process was
/// killed by a signal) after both output streams have been drained.
pub type ExitNotice = oneshot::Receiver<Option<i32>>;

/// Owns a running child: its stdin, its captured output and its exit code.
///
/// Output is pumped by two background tasks; a third task waits for the
/// child and resolves the [`ExitNotice`]. Stop never kills: it writes the
/// server's own shutdown command and leaves the exit to the process.
pub struct ProcessSupervisor {
    id: u32,
    pid: u32,
    stdin: Mutex<Option<ChildStdin>>,
    stdout: Arc<RwLock<Vec<String>>>,
    stderr: Arc<RwLock<Vec<String>>>,
    exit_code: Arc<RwLock<Option<i32>>>,
    alive: Arc<AtomicBool>,
}

impl ProcessSupervisor {
    /// Spawn the process for server `id` and start pumping its output.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(id: u32, command: &LaunchCommand) -> ProcessResult<(Self, ExitNotice)> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(&command.working_dir)
            .envs(command.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| ProcessError::Spawn {
            program: command.program.display().to_string(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let pid = child.id().unwrap_or(0);
        info!("Server {id}: spawned `{command}` with PID {pid}");

        let stdout = Arc::new(RwLock::new(Vec::new()));
        let stderr = Arc::new(RwLock::new(Vec::new()));
        let exit_code = Arc::new(RwLock::new(None));
        let alive = Arc::new(AtomicBool::new(true));

        let stdout_pump = child
            .stdout
            .take()
            .map(|stream| Self::pump(stream, Arc::clone(&stdout)));
        let stderr_pump = child
            .stderr
            .take()
            .map(|stream| Self::pump(stream, Arc::clone(&stderr)));
        let stdin = child.stdin.take();

        let (notice_tx, notice_rx) = oneshot::channel();
        {
            let exit_code = Arc::clone(&exit_code);
            let alive = Arc::clone(&alive);

            tokio::spawn(async move {
                let code = match child.wait().await {
                    Ok(status) => status.code(),
                    Err(e) => {
                        warn!("Server {id}: failed to wait for PID {pid}: {e}");
                        None
                    }
                };

                // Residual partial lines are flushed by the pumps at EOF
                for pump in [stdout_pump, stderr_pump].into_iter().flatten() {
                    if let Err(e) = pump.await {
                        warn!("Server {id}: output pump failed: {e}");
                    }
                }

                *exit_code.write().await = code;
                alive.store(false, Ordering::SeqCst);
                info!("Server {id}: PID {pid} exited with code {code:?}");

                // Receiver may already be gone; nothing else to notify
                let _ = notice_tx.send(code);
            });
        }

        let supervisor = Self {
            id,
            pid,
            stdin: Mutex::new(stdin),
            stdout,
            stderr,
            exit_code,
            alive,
        };

        Ok((supervisor, notice_rx))
    }

    fn pump<R>(mut stream: R, lines: Arc<RwLock<Vec<String>>>) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let mut reassembler = LineReassembler::new();
            let mut buffer = vec![0u8; READ_BUFFER_SIZE];

            loop {
                match stream.read(&mut buffer).await {
                    Ok(0) => break,
                    Ok(n) => {
                        let completed = reassembler.push(&buffer[..n]);
                        if !completed.is_empty() {
                            lines.write().await.extend(completed);
                        }
                    }
                    Err(e) => {
                        debug!("Output stream closed with error: {e}");
                        break;
                    }
                }
            }

            if let Some(last) = reassembler.flush() {
                lines.write().await.push(last);
            }
        })
    }

    /// Write raw bytes to the process's stdin.
    pub async fn send_raw(&self, bytes: &[u8]) -> ProcessResult<()> {
        let mut guard = self.stdin.lock().await;
        let stdin = guard.as_mut().ok_or_else(|| ProcessError::StdinClosed {
            pid: self.pid,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let io_error = |e| ProcessError::Io {
            pid: self.pid,
            source: e,
            location: ErrorLocation::from(Location::caller()),
        };
        stdin.write_all(bytes).await.map_err(io_error)?;
        stdin.flush().await.map_err(io_error)
    }

    /// Write one console command followed by a line terminator.
    pub async fn send_line(&self, command: &str) -> ProcessResult<()> {
        debug!("Server {}: > {command}", self.id);
        self.send_raw(format!("{command}{LINE_ENDING}").as_bytes())
            .await
    }

    /// Ask the server to shut itself down. Does nothing once the process
    /// has exited. The caller awaits the [`ExitNotice`].
    pub async fn stop(&self, command: &str) -> ProcessResult<()> {
        if !self.is_alive() {
            return Ok(());
        }

        info!("Server {}: sending `{command}` to PID {}", self.id, self.pid);
        self.send_line(command).await
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub async fn stdout(&self) -> Vec<String> {
        self.stdout.read().await.clone()
    }

    pub async fn stderr(&self) -> Vec<String> {
        self.stderr.read().await.clone()
    }

    /// Exit code once the process is gone; `None` while running or when it
    /// was killed by a signal.
    pub async fn exit_code(&self) -> Option<i32> {
        *self.exit_code.read().await
    }
}

impl std::fmt::Debug for ProcessSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessSupervisor")
            .field("id", &self.id)
            .field("pid", &self.pid)
            .field("alive", &self.is_alive())
            .finish()
    }
}
