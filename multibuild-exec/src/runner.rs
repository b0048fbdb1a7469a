//! Synchronous command execution.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::command::CommandSpec;
use crate::error::ExecError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs one external command in one working directory.
pub trait CommandRunner {
    /// Run `command` with `cwd` as working directory and return its stdout.
    ///
    /// Any unsuccessful completion is an [`ExecError`].
    fn run(&self, command: &CommandSpec, cwd: &Path) -> Result<String, ExecError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &CommandSpec, cwd: &Path) -> Result<String, ExecError> {
        (**self).run(command, cwd)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, command: &CommandSpec, cwd: &Path) -> Result<String, ExecError> {
        (**self).run(command, cwd)
    }
}

// ---------------------------------------------------------------------------
// SystemRunner
// ---------------------------------------------------------------------------

/// Spawns real processes and blocks until they finish.
///
/// stdin is closed; stdout and stderr are drained on helper threads so a
/// chatty build cannot fill the pipe and stall.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill commands that run longer than `timeout`. `None` waits forever.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec, cwd: &Path) -> Result<String, ExecError> {
        let rendered = command.to_string();
        let io = |source| ExecError::Io {
            command: rendered.clone(),
            cwd: cwd.to_path_buf(),
            source,
        };

        tracing::debug!("running `{rendered}` in {}", cwd.display());
        let started = Instant::now();

        let mut process = Command::new(command.program());
        process
            .args(command.args())
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        detach_from_terminal_signals(&mut process);
        let mut child = process.spawn().map_err(io)?;

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = match self.timeout {
            None => child.wait().map_err(io)?,
            Some(limit) => match wait_until(&mut child, started + limit).map_err(io)? {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    // Readers are left detached: grandchildren may still hold the pipes.
                    tracing::warn!("`{rendered}` killed after {}s", limit.as_secs());
                    return Err(ExecError::TimedOut {
                        command: rendered,
                        cwd: cwd.to_path_buf(),
                        timeout: limit,
                    });
                }
            },
        };

        let stdout = collect(stdout);
        let stderr = collect(stderr);

        if !status.success() {
            return Err(ExecError::Failed {
                command: rendered,
                cwd: cwd.to_path_buf(),
                code: status.code(),
                stderr,
            });
        }

        tracing::info!(
            "`{rendered}` in {} finished in {}ms",
            cwd.display(),
            started.elapsed().as_millis()
        );
        Ok(stdout)
    }
}

/// A terminal Ctrl-C reaches the whole foreground process group. Children
/// get their own group so only our handler sees it and the running command
/// completes.
#[cfg(unix)]
fn detach_from_terminal_signals(process: &mut Command) {
    use std::os::unix::process::CommandExt;
    process.process_group(0);
}

#[cfg(not(unix))]
fn detach_from_terminal_signals(_process: &mut Command) {}

fn wait_until(child: &mut Child, deadline: Instant) -> std::io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// DryRunRunner
// ---------------------------------------------------------------------------

/// Logs each command instead of running it. Always succeeds with empty output.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &CommandSpec, cwd: &Path) -> Result<String, ExecError> {
        tracing::info!("[dry-run] would run `{command}` in {}", cwd.display());
        Ok(String::new())
    }
}
