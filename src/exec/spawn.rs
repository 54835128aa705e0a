//! Handle mode: spawn swc and hand back the live process.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::{Child, ChildStderr, ChildStdout};

use crate::command::{build_command_args, CommandError, CommandOptions, SPAWN_OPTIONS_KEY};
use crate::exec::{chunk_stream, Chunk, ChunkReader, OutputEncoding, SpawnError};

/// What the child's stdout and stderr are connected to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdioMode {
    /// Pipe output back to the caller.
    #[default]
    Pipe,
    /// Share the parent's stdout and stderr.
    Inherit,
    /// Discard output.
    Ignore,
}

impl StdioMode {
    fn stdio(self) -> Stdio {
        match self {
            Self::Pipe => Stdio::piped(),
            Self::Inherit => Stdio::inherit(),
            Self::Ignore => Stdio::null(),
        }
    }
}

/// Process settings for the exec adapters. Never rendered into the command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpawnOptions {
    /// Working directory of the child.
    pub cwd: Option<PathBuf>,
    /// Extra environment variables.
    pub env: BTreeMap<String, String>,
    /// Start from an empty environment.
    pub env_clear: bool,
    /// Output stream wiring.
    pub stdio: StdioMode,
    /// Output encoding. Defaults differ per adapter.
    pub encoding: Option<OutputEncoding>,
}

/// Command options plus the process settings used to run them.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecOptions {
    /// Options compiled into the swc command.
    pub command: CommandOptions,
    /// Process settings.
    pub spawn: SpawnOptions,
}

impl ExecOptions {
    /// Run `command` with default process settings.
    #[must_use]
    pub fn new(command: CommandOptions) -> Self {
        Self {
            command,
            spawn: SpawnOptions::default(),
        }
    }

    /// Replace the process settings.
    #[must_use]
    pub fn spawn_options(mut self, spawn: SpawnOptions) -> Self {
        self.spawn = spawn;
        self
    }

    /// Compile the command into a program and its arguments.
    ///
    /// `program` replaces the launcher when given.
    pub(crate) fn program_and_args(
        &self,
        program: Option<&str>,
    ) -> Result<(String, Vec<String>), CommandError> {
        let mut args = build_command_args(&self.command, &[SPAWN_OPTIONS_KEY])?;
        let launcher = args.remove(0);
        Ok((program.map_or(launcher, str::to_string), args))
    }
}

/// Build the shared process description for every adapter.
pub(crate) fn std_command(
    program: &str,
    args: &[String],
    spawn: &SpawnOptions,
) -> std::process::Command {
    let mut cmd = std::process::Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(spawn.stdio.stdio())
        .stderr(spawn.stdio.stdio());

    if let Some(ref dir) = spawn.cwd {
        cmd.current_dir(dir);
    }
    if spawn.env_clear {
        cmd.env_clear();
    }
    cmd.envs(&spawn.env);
    cmd
}

/// How a process ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitInfo {
    /// Exit code, `None` when killed by a signal.
    pub code: Option<i32>,
    /// Terminating signal name such as `SIGTERM`.
    pub signal: Option<String>,
}

impl From<ExitStatus> for ExitInfo {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
            signal: signal_name(status),
        }
    }
}

#[cfg(unix)]
pub(crate) fn signal_name(status: ExitStatus) -> Option<String> {
    use nix::sys::signal::Signal;
    use std::os::unix::process::ExitStatusExt;

    let raw = status.signal()?;
    Some(Signal::try_from(raw).map_or_else(|_| raw.to_string(), |s| s.as_str().to_string()))
}

#[cfg(not(unix))]
pub(crate) fn signal_name(_status: ExitStatus) -> Option<String> {
    None
}

/// A running (or failed to start) swc process.
///
/// A spawn failure does not fail [`cp_swc`]; it is reported by the first
/// call to [`SwcProcess::wait`] or [`SwcProcess::try_wait`], and is visible
/// through [`SwcProcess::spawn_error`] until then.
#[derive(Debug)]
pub struct SwcProcess {
    child: Option<Child>,
    spawn_error: Option<SpawnError>,
    encoding: OutputEncoding,
}

impl SwcProcess {
    pub(crate) fn launch(
        program: &str,
        args: &[String],
        spawn: &SpawnOptions,
        default_encoding: OutputEncoding,
    ) -> Self {
        tracing::debug!(program, ?args, "Spawning swc process");
        let encoding = spawn.encoding.unwrap_or(default_encoding);
        let mut cmd = tokio::process::Command::from(std_command(program, args, spawn));

        match cmd.spawn() {
            Ok(child) => Self {
                child: Some(child),
                spawn_error: None,
                encoding,
            },
            Err(e) => {
                tracing::warn!(program, error = %e, "Failed to spawn swc process");
                Self {
                    child: None,
                    spawn_error: Some(SpawnError::from_io(e)),
                    encoding,
                }
            }
        }
    }

    /// Encoding applied by the chunk streams.
    #[must_use]
    pub fn encoding(&self) -> OutputEncoding {
        self.encoding
    }

    /// Pending spawn failure, if the process could not be started.
    #[must_use]
    pub fn spawn_error(&self) -> Option<&SpawnError> {
        self.spawn_error.as_ref()
    }

    /// Borrow the child, surfacing a pending spawn failure once.
    pub(crate) fn child_mut(&mut self) -> Result<&mut Child, SpawnError> {
        match self.child.as_mut() {
            Some(child) => Ok(child),
            None => Err(self.spawn_error.take().unwrap_or(SpawnError::NotSpawned)),
        }
    }

    /// Get the process ID, if still running.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    /// Take ownership of the stdout handle.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.as_mut()?.stdout.take()
    }

    /// Take ownership of the stderr handle.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.child.as_mut()?.stderr.take()
    }

    /// Stream of stdout chunks in this process's encoding.
    ///
    /// Takes the stdout handle; returns `None` if it was already taken or
    /// output is not piped.
    pub fn stdout_chunks(
        &mut self,
    ) -> Option<impl futures_core::Stream<Item = std::io::Result<Chunk>>> {
        let encoding = self.encoding;
        let stdout = self.take_stdout()?;
        Some(chunk_stream(ChunkReader::new(stdout, encoding)))
    }

    /// Stream of stderr chunks in this process's encoding.
    pub fn stderr_chunks(
        &mut self,
    ) -> Option<impl futures_core::Stream<Item = std::io::Result<Chunk>>> {
        let encoding = self.encoding;
        let stderr = self.take_stderr()?;
        Some(chunk_stream(ChunkReader::new(stderr, encoding)))
    }

    /// Check if the process has exited without blocking.
    ///
    /// # Errors
    ///
    /// Returns the spawn failure, or an error if the state cannot be queried.
    pub fn try_wait(&mut self) -> Result<Option<ExitInfo>, SpawnError> {
        Ok(self.child_mut()?.try_wait()?.map(ExitInfo::from))
    }

    /// Wait for the process to exit.
    ///
    /// # Errors
    ///
    /// Returns the spawn failure, or an error if waiting fails.
    pub async fn wait(&mut self) -> Result<ExitInfo, SpawnError> {
        let status = self.child_mut()?.wait().await?;
        Ok(ExitInfo::from(status))
    }

    /// Forcefully kill the process.
    ///
    /// # Errors
    ///
    /// Returns an error if the kill signal cannot be sent.
    pub async fn kill(&mut self) -> Result<(), SpawnError> {
        Ok(self.child_mut()?.kill().await?)
    }

    /// Attempt graceful termination with a timeout.
    ///
    /// On Unix, sends SIGTERM first, then SIGKILL after the timeout.
    /// On other platforms, falls back to immediate kill.
    ///
    /// # Errors
    ///
    /// Returns an error if termination fails.
    pub async fn graceful_terminate(&mut self, timeout: Duration) -> Result<(), SpawnError> {
        #[cfg(unix)]
        {
            self.graceful_terminate_unix(timeout).await
        }

        #[cfg(not(unix))]
        {
            let _ = timeout;
            self.kill().await
        }
    }

    #[cfg(unix)]
    async fn graceful_terminate_unix(&mut self, timeout: Duration) -> Result<(), SpawnError> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        let child = self.child_mut()?;
        let Some(pid) = child.id() else {
            // already exited
            return Ok(());
        };

        let nix_pid = Pid::from_raw(i32::try_from(pid).unwrap_or(i32::MAX));
        let _ = kill(nix_pid, Signal::SIGTERM);

        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Ok(child.kill().await?),
        }
    }
}

/// Spawn `npx swc` with the compiled token vector and return immediately.
///
/// Must be called from within a Tokio runtime. Output is delivered as raw
/// bytes unless `spawn.encoding` says otherwise.
///
/// # Errors
///
/// Returns `CommandError` if the options cannot be compiled. Spawn failures
/// are reported through the returned [`SwcProcess`].
pub fn cp_swc(options: &ExecOptions) -> Result<SwcProcess, CommandError> {
    spawn_with(None, options)
}

/// Like [`cp_swc`], replacing the `npx` launcher with `program`.
///
/// # Errors
///
/// Returns `CommandError` if the options cannot be compiled.
pub fn cp_swc_with_program(
    program: &str,
    options: &ExecOptions,
) -> Result<SwcProcess, CommandError> {
    spawn_with(Some(program), options)
}

fn spawn_with(program: Option<&str>, options: &ExecOptions) -> Result<SwcProcess, CommandError> {
    let (program, args) = options.program_and_args(program)?;
    Ok(SwcProcess::launch(
        &program,
        &args,
        &options.spawn,
        OutputEncoding::Bytes,
    ))
}
