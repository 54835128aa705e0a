//! Command compiler error types.

/// Documentation the error messages point users to.
pub const DOC_URL: &str = "https://swc.rs/docs/usage/cli";

/// Errors raised while compiling options into a command.
///
/// These are always returned before any process is spawned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// An option value is not one of the kinds the swc CLI accepts.
    #[error("Wrong options value type for {option}! Check the cli documentation at {DOC_URL}")]
    UnsupportedValueType {
        /// Name of the offending option.
        option: String,
    },

    /// The options document has no string `src` entry.
    #[error("Missing `src` option! Check the cli documentation at {DOC_URL}")]
    MissingSource,

    /// Neither `outDir` nor `outFile` was given.
    #[error("One of `outDir` or `outFile` is required")]
    MissingDestination,

    /// Both `outDir` and `outFile` were given.
    #[error("`outDir` and `outFile` are mutually exclusive")]
    ConflictingDestination,

    /// The options document is not a key/value table.
    #[error("Invalid options document: {0}")]
    InvalidOptionsDocument(String),
}

impl CommandError {
    pub(crate) fn unsupported(option: impl Into<String>) -> Self {
        Self::UnsupportedValueType {
            option: option.into(),
        }
    }
}
