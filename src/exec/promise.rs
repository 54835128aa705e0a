//! Promise mode: spawn swc and collect its result as a future.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;

use crate::command::{CommandError, CommandOptions};
use crate::exec::{
    Chunk, ChunkReader, ExecOptions, ExitInfo, OutputEncoding, SpawnError, SpawnOptions,
    SwcProcess,
};

/// Which process event resolves the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveEvent {
    /// The process exited and both output streams reached EOF.
    #[default]
    Close,
    /// The process exited. Output still in flight may be missing.
    Exit,
}

/// Which output streams are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capture {
    /// Collect stdout chunks.
    pub stdout: bool,
    /// Collect stderr chunks.
    pub stderr: bool,
}

impl Default for Capture {
    fn default() -> Self {
        Self {
            stdout: true,
            stderr: true,
        }
    }
}

/// Options for [`swc`]. `resolve_event` and `capture` never reach the command.
#[derive(Debug, Clone, PartialEq)]
pub struct PromiseOptions {
    /// Command and process settings.
    pub exec: ExecOptions,
    /// Event the run resolves on.
    pub resolve_event: ResolveEvent,
    /// Streams to collect.
    pub capture: Capture,
}

impl PromiseOptions {
    /// Run `command` with default settings: resolve on close, capture both streams.
    #[must_use]
    pub fn new(command: CommandOptions) -> Self {
        Self::from(ExecOptions::new(command))
    }

    /// Replace the process settings.
    #[must_use]
    pub fn spawn_options(mut self, spawn: SpawnOptions) -> Self {
        self.exec.spawn = spawn;
        self
    }

    /// Choose the resolving event.
    #[must_use]
    pub fn resolve_event(mut self, event: ResolveEvent) -> Self {
        self.resolve_event = event;
        self
    }

    /// Choose which streams to collect.
    #[must_use]
    pub fn capture(mut self, capture: Capture) -> Self {
        self.capture = capture;
        self
    }
}

impl From<ExecOptions> for PromiseOptions {
    fn from(exec: ExecOptions) -> Self {
        Self {
            exec,
            resolve_event: ResolveEvent::default(),
            capture: Capture::default(),
        }
    }
}

/// Result of a promise-mode run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwcOutput {
    /// Exit code, `None` when killed by a signal.
    pub exit_code: Option<i32>,
    /// Terminating signal name.
    pub exit_signal: Option<String>,
    /// Collected stdout chunks, `Some` iff captured.
    pub stdout: Option<Vec<Chunk>>,
    /// Collected stderr chunks, `Some` iff captured.
    pub stderr: Option<Vec<Chunk>>,
}

/// Future returned by the promise-mode entry points.
///
/// It owns the process, so nothing the `inspect` callback borrowed stays
/// borrowed while it runs.
pub type SwcFuture = Pin<Box<dyn Future<Output = Result<SwcOutput, SpawnError>> + Send>>;

/// Spawn swc now and return a future resolving with its exit and output.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns `CommandError` synchronously if the options cannot be compiled.
/// The future resolves to `SpawnError` if the process fails to start or an
/// I/O error occurs while it runs.
pub fn swc(options: PromiseOptions) -> Result<SwcFuture, CommandError> {
    swc_with(options, |_| {})
}

/// Like [`swc`], handing the live process to `inspect` before any output is read.
///
/// `inspect` can record the process ID or take a stream to handle itself.
///
/// # Errors
///
/// Returns `CommandError` if the options cannot be compiled.
pub fn swc_with<F>(options: PromiseOptions, inspect: F) -> Result<SwcFuture, CommandError>
where
    F: FnOnce(&mut SwcProcess),
{
    run(None, options, inspect)
}

/// Like [`swc_with`], replacing the `npx` launcher with `program`.
///
/// # Errors
///
/// Returns `CommandError` if the options cannot be compiled.
pub fn swc_with_program<F>(
    program: &str,
    options: PromiseOptions,
    inspect: F,
) -> Result<SwcFuture, CommandError>
where
    F: FnOnce(&mut SwcProcess),
{
    run(Some(program), options, inspect)
}

fn run<F>(
    program: Option<&str>,
    options: PromiseOptions,
    inspect: F,
) -> Result<SwcFuture, CommandError>
where
    F: FnOnce(&mut SwcProcess),
{
    let (program, args) = options.exec.program_and_args(program)?;
    let mut process = SwcProcess::launch(
        &program,
        &args,
        &options.exec.spawn,
        OutputEncoding::Bytes,
    );
    inspect(&mut process);

    Ok(Box::pin(collect(process, options.resolve_event, options.capture)))
}

async fn next_chunk<R: AsyncRead + Unpin>(
    reader: &mut Option<ChunkReader<R>>,
) -> std::io::Result<Option<Chunk>> {
    match reader {
        Some(reader) => reader.next_chunk().await,
        None => Ok(None),
    }
}

fn push(collected: &mut Option<Vec<Chunk>>, chunk: Chunk) {
    if let Some(chunks) = collected {
        chunks.push(chunk);
    }
}

/// Drive the process to the resolving event. Returns exactly once: the first
/// error wins over any later exit.
async fn collect(
    mut process: SwcProcess,
    resolve_event: ResolveEvent,
    capture: Capture,
) -> Result<SwcOutput, SpawnError> {
    let encoding = process.encoding();
    let child = process.child_mut()?;

    // uncaptured streams are still drained so the child never blocks on a full pipe
    let mut stdout = child.stdout.take().map(|s| ChunkReader::new(s, encoding));
    let mut stderr = child.stderr.take().map(|s| ChunkReader::new(s, encoding));
    let mut stdout_chunks = capture.stdout.then(Vec::new);
    let mut stderr_chunks = capture.stderr.then(Vec::new);
    let mut exit: Option<ExitInfo> = None;

    let exit = loop {
        if let Some(info) = exit.as_ref() {
            let streams_closed = stdout.is_none() && stderr.is_none();
            if resolve_event == ResolveEvent::Exit || streams_closed {
                break info.clone();
            }
        }

        tokio::select! {
            chunk = next_chunk(&mut stdout), if stdout.is_some() => match chunk? {
                Some(chunk) => push(&mut stdout_chunks, chunk),
                None => stdout = None,
            },
            chunk = next_chunk(&mut stderr), if stderr.is_some() => match chunk? {
                Some(chunk) => push(&mut stderr_chunks, chunk),
                None => stderr = None,
            },
            status = child.wait(), if exit.is_none() => {
                exit = Some(ExitInfo::from(status?));
            }
        }
    };

    tracing::debug!(
        exit_code = ?exit.code,
        exit_signal = ?exit.signal,
        ?resolve_event,
        "swc process resolved"
    );

    Ok(SwcOutput {
        exit_code: exit.code,
        exit_signal: exit.signal,
        stdout: stdout_chunks,
        stderr: stderr_chunks,
    })
}
