//! Shell quoting modes for the string form of a command.

/// How values are made shell-safe in a command string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quoting {
    /// Wrap each value in double quotes.
    #[default]
    DoubleQuote,
    /// Leave values bare, escaping every space with a backslash.
    ///
    /// An empty value renders as `""` so it still forms a word.
    EscapeSpaces,
}

impl Quoting {
    /// Pick a mode from the `useDoubleQuote` style flag.
    #[must_use]
    pub fn from_double_quote(use_double_quote: bool) -> Self {
        if use_double_quote {
            Self::DoubleQuote
        } else {
            Self::EscapeSpaces
        }
    }

    /// Apply this mode to a single value.
    #[must_use]
    pub fn apply(self, part: &str) -> String {
        match self {
            Self::DoubleQuote => format!("\"{part}\""),
            Self::EscapeSpaces if part.is_empty() => "\"\"".to_string(),
            Self::EscapeSpaces => part.replace(' ', "\\ "),
        }
    }
}
