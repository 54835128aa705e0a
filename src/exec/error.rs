//! Process spawning error types.

/// Error type for process spawning and waiting.
#[derive(thiserror::Error, Debug)]
pub enum SpawnError {
    /// The launcher binary was not found.
    #[error("swc launcher not found")]
    NotFound,
    /// Permission denied when spawning.
    #[error("Permission denied")]
    PermissionDenied,
    /// The process was never started, or its spawn failure was already reported.
    #[error("Process not spawned")]
    NotSpawned,
    /// Other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpawnError {
    /// Create a `SpawnError` from an I/O error, classifying common cases.
    pub(crate) fn from_io(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(err),
        }
    }
}
