//! Helpers for inspecting swc output.

use crate::exec::Chunk;

/// Phrase swc prints after a successful compilation.
pub const SUCCESS_MARKER: &str = "Successfully compiled";

/// Process output as a single string or as ordered chunks.
#[derive(Debug, Clone)]
pub enum CompilerOutput<'a> {
    /// Whole output.
    Text(&'a str),
    /// Ordered text pieces.
    Lines(&'a [String]),
    /// Ordered chunks as collected from a stream.
    Chunks(&'a [Chunk]),
}

impl<'a> From<&'a str> for CompilerOutput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for CompilerOutput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a [String]> for CompilerOutput<'a> {
    fn from(lines: &'a [String]) -> Self {
        Self::Lines(lines)
    }
}

impl<'a> From<&'a Vec<String>> for CompilerOutput<'a> {
    fn from(lines: &'a Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

impl<'a> From<&'a [Chunk]> for CompilerOutput<'a> {
    fn from(chunks: &'a [Chunk]) -> Self {
        Self::Chunks(chunks)
    }
}

impl<'a> From<&'a Vec<Chunk>> for CompilerOutput<'a> {
    fn from(chunks: &'a Vec<Chunk>) -> Self {
        Self::Chunks(chunks)
    }
}

/// Returns true if the concatenated output contains [`SUCCESS_MARKER`].
#[must_use]
pub fn is_compilation_successful<'a>(output: impl Into<CompilerOutput<'a>>) -> bool {
    let joined = match output.into() {
        CompilerOutput::Text(text) => return text.contains(SUCCESS_MARKER),
        CompilerOutput::Lines(lines) => lines.concat(),
        CompilerOutput::Chunks(chunks) => chunks.iter().map(Chunk::to_text).collect::<String>(),
    };
    joined.contains(SUCCESS_MARKER)
}
