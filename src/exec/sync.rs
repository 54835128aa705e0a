//! Synchronous mode: run swc and block until it exits.

use crate::command::CommandError;
use crate::exec::{signal_name, std_command, Chunk, ExecOptions, OutputEncoding, SpawnError};

/// Result of a blocking run.
///
/// A spawn failure is reported in `error`, with no status and empty output.
#[derive(Debug)]
pub struct SyncOutput {
    /// Exit code, `None` when killed by a signal or not spawned.
    pub status: Option<i32>,
    /// Terminating signal name.
    pub signal: Option<String>,
    /// Captured stdout, text unless `spawn.encoding` asks for bytes.
    pub stdout: Chunk,
    /// Captured stderr.
    pub stderr: Chunk,
    /// Spawn or wait failure.
    pub error: Option<SpawnError>,
}

impl SyncOutput {
    fn failed(error: SpawnError, encoding: OutputEncoding) -> Self {
        Self {
            status: None,
            signal: None,
            stdout: Chunk::empty(encoding),
            stderr: Chunk::empty(encoding),
            error: Some(error),
        }
    }

    /// Stdout and stderr in that order.
    #[must_use]
    pub fn output(&self) -> [&Chunk; 2] {
        [&self.stdout, &self.stderr]
    }
}

/// Run `npx swc` and block until it exits.
///
/// # Errors
///
/// Returns `CommandError` if the options cannot be compiled. Spawn failures
/// are reported in [`SyncOutput::error`].
pub fn swc_sync(options: &ExecOptions) -> Result<SyncOutput, CommandError> {
    run_sync(None, options)
}

/// Like [`swc_sync`], replacing the `npx` launcher with `program`.
///
/// # Errors
///
/// Returns `CommandError` if the options cannot be compiled.
pub fn swc_sync_with_program(
    program: &str,
    options: &ExecOptions,
) -> Result<SyncOutput, CommandError> {
    run_sync(Some(program), options)
}

fn run_sync(program: Option<&str>, options: &ExecOptions) -> Result<SyncOutput, CommandError> {
    let (program, args) = options.program_and_args(program)?;
    let encoding = options.spawn.encoding.unwrap_or(OutputEncoding::Utf8);
    tracing::debug!(program = %program, ?args, "Running swc synchronously");

    let output = match std_command(&program, &args, &options.spawn).output() {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(program = %program, error = %e, "Failed to spawn swc process");
            return Ok(SyncOutput::failed(SpawnError::from_io(e), encoding));
        }
    };

    Ok(SyncOutput {
        status: output.status.code(),
        signal: signal_name(output.status),
        stdout: Chunk::from_output(output.stdout, encoding),
        stderr: Chunk::from_output(output.stderr, encoding),
        error: None,
    })
}
