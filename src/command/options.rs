//! Typed option set for the swc CLI.
//!
//! [`CommandOptions`] keeps options in insertion order, which is the order
//! they are rendered in. The output destination is a [`Destination`] given at
//! construction, so a command can never carry both `outDir` and `outFile`;
//! it keeps its own slot in that order.

use std::borrow::Cow;

use serde_json::{Map, Value};

use super::CommandError;

/// Positional input path key.
pub const SRC_KEY: &str = "src";
/// Key whose value is flattened into `-C` overrides.
pub const CONFIG_KEY: &str = "config";
/// Schema marker, never rendered at any depth.
pub const SCHEMA_KEY: &str = "$schema";
/// Process spawn settings key, consumed by the exec adapters only.
pub const SPAWN_OPTIONS_KEY: &str = "spawnOptions";
/// Directory destination key.
pub const OUT_DIR_KEY: &str = "outDir";
/// Single file destination key.
pub const OUT_FILE_KEY: &str = "outFile";

/// Nested swc configuration (`.swcrc` shape), flattened into `-C key=value`.
///
/// Keys keep the order they were inserted or parsed in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree(Map<String, Value>);

impl ConfigTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a tree from a JSON object such as the contents of `.swcrc`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Map<String, Value>>(json).map(Self)
    }

    /// Add or replace a top-level entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Borrow the underlying ordered map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns true if the tree has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ConfigTree {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Value of a single command option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Flag, rendered bare when true.
    Bool(bool),
    /// Single string value.
    String(String),
    /// List rendered as a comma-joined string.
    List(Vec<String>),
    /// Nested configuration, only valid under the `config` option.
    Config(ConfigTree),
}

impl OptionValue {
    /// Convert a dynamic JSON value for the option `name`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::UnsupportedValueType` for numbers, nulls and
    /// lists holding anything but strings.
    pub fn from_json(name: &str, value: Value) -> Result<Self, CommandError> {
        match value {
            Value::Bool(flag) => Ok(Self::Bool(flag)),
            Value::String(text) => Ok(Self::String(text)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(text) => Ok(text),
                    _ => Err(CommandError::unsupported(name)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Value::Object(map) => Ok(Self::Config(ConfigTree(map))),
            Value::Null | Value::Number(_) => Err(CommandError::unsupported(name)),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<&str> for OptionValue {
    fn from(text: &str) -> Self {
        Self::String(text.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<&[&str]> for OptionValue {
    fn from(items: &[&str]) -> Self {
        Self::List(items.iter().map(|s| (*s).to_string()).collect())
    }
}

impl From<ConfigTree> for OptionValue {
    fn from(tree: ConfigTree) -> Self {
        Self::Config(tree)
    }
}

/// Where swc writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// `--out-dir`: compile a directory into another directory.
    OutDir(String),
    /// `--out-file`: bundle everything into one file.
    OutFile(String),
}

impl Destination {
    /// Option name of this destination.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::OutDir(_) => OUT_DIR_KEY,
            Self::OutFile(_) => OUT_FILE_KEY,
        }
    }

    /// Destination path.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::OutDir(path) | Self::OutFile(path) => path,
        }
    }
}

/// Accepted values of `--source-maps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMaps {
    /// `true` or `false`.
    Bool(bool),
    /// Inline source maps.
    Inline,
    /// Inline and separate file.
    Both,
}

impl From<SourceMaps> for OptionValue {
    fn from(maps: SourceMaps) -> Self {
        match maps {
            SourceMaps::Bool(flag) => Self::Bool(flag),
            SourceMaps::Inline => Self::String("inline".to_string()),
            SourceMaps::Both => Self::String("both".to_string()),
        }
    }
}

/// Ordered option set for one swc invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOptions {
    src: String,
    destination: Destination,
    /// Number of entries rendered before the destination.
    destination_slot: usize,
    entries: Vec<(String, Option<OptionValue>)>,
}

impl CommandOptions {
    /// Create an option set compiling `src` into `destination`.
    ///
    /// The destination renders before any option set afterwards.
    #[must_use]
    pub fn new(src: impl Into<String>, destination: Destination) -> Self {
        Self {
            src: src.into(),
            destination,
            destination_slot: 0,
            entries: Vec::new(),
        }
    }

    /// Input path.
    #[must_use]
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Output destination.
    #[must_use]
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Replace the output destination, keeping its position.
    #[must_use]
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Set an option by its camelCase name.
    ///
    /// `None` records the option as undefined, which renders as nothing.
    /// An existing option keeps its position. The reserved names `src`,
    /// `outDir` and `outFile` are ignored here; use [`CommandOptions::new`]
    /// and [`CommandOptions::with_destination`] instead.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: Option<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// In-place form of [`CommandOptions::set`].
    pub fn insert(&mut self, name: impl Into<String>, value: Option<OptionValue>) {
        let name = name.into();
        if matches!(name.as_str(), SRC_KEY | OUT_DIR_KEY | OUT_FILE_KEY) {
            tracing::warn!(option = %name, "Ignoring reserved option name");
            return;
        }
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up an option value; `None` when absent or undefined.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Options in render order, the destination included at its slot.
    ///
    /// `src` is not included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<Cow<'_, OptionValue>>)> {
        let destination = (
            self.destination.key(),
            Some(Cow::Owned(OptionValue::String(
                self.destination.path().to_string(),
            ))),
        );
        let slot = self.destination_slot.min(self.entries.len());
        let (before, after) = self.entries.split_at(slot);
        before
            .iter()
            .map(borrow_entry)
            .chain(std::iter::once(destination))
            .chain(after.iter().map(borrow_entry))
    }

    /// Build an option set from a dynamic key/value table, keeping key order.
    ///
    /// The destination renders where its key appears among the other
    /// options. Keys listed in `ignore` are skipped entirely.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` when `src` or the destination is missing or
    /// malformed, or when a value has an unsupported kind.
    pub fn from_map(map: Map<String, Value>, ignore: &[&str]) -> Result<Self, CommandError> {
        let mut src = None;
        let mut destination = None;
        let mut destination_slot = 0;
        let mut entries = Vec::new();

        for (key, value) in map {
            if ignore.contains(&key.as_str()) {
                continue;
            }
            match key.as_str() {
                SRC_KEY => match value {
                    Value::String(path) => src = Some(path),
                    _ => return Err(CommandError::unsupported(SRC_KEY)),
                },
                OUT_DIR_KEY | OUT_FILE_KEY => {
                    let Value::String(path) = value else {
                        return Err(CommandError::unsupported(key));
                    };
                    if destination.is_some() {
                        return Err(CommandError::ConflictingDestination);
                    }
                    destination_slot = entries.len();
                    destination = Some(if key == OUT_DIR_KEY {
                        Destination::OutDir(path)
                    } else {
                        Destination::OutFile(path)
                    });
                }
                _ => {
                    let value = OptionValue::from_json(&key, value)?;
                    entries.push((key, Some(value)));
                }
            }
        }

        Ok(Self {
            src: src.ok_or(CommandError::MissingSource)?,
            destination: destination.ok_or(CommandError::MissingDestination)?,
            destination_slot,
            entries,
        })
    }

    /// Parse an option set from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidOptionsDocument` for malformed JSON and
    /// any error of [`CommandOptions::from_map`].
    pub fn from_json_str(json: &str, ignore: &[&str]) -> Result<Self, CommandError> {
        let map = serde_json::from_str::<Map<String, Value>>(json)
            .map_err(|e| CommandError::InvalidOptionsDocument(e.to_string()))?;
        Self::from_map(map, ignore)
    }

    fn flag(self, name: &str, on: bool) -> Self {
        self.set(name, Some(OptionValue::Bool(on)))
    }

    fn text(self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, Some(OptionValue::String(value.into())))
    }

    fn list(self, name: &str, items: &[&str]) -> Self {
        self.set(name, Some(OptionValue::from(items)))
    }

    /// Filename to use when reading from stdin.
    #[must_use]
    pub fn filename(self, name: impl Into<String>) -> Self {
        self.text("filename", name)
    }

    /// Path to a `.swcrc` file.
    #[must_use]
    pub fn config_file(self, path: impl Into<String>) -> Self {
        self.text("configFile", path)
    }

    /// Name of the environment to use when loading configs.
    #[must_use]
    pub fn env_name(self, name: impl Into<String>) -> Self {
        self.text("envName", name)
    }

    /// Whether to skip looking up `.swcrc` files.
    #[must_use]
    pub fn no_swcrc(self, on: bool) -> Self {
        self.flag("noSwcrc", on)
    }

    /// Glob patterns that are not compiled.
    #[must_use]
    pub fn ignore(self, patterns: &[&str]) -> Self {
        self.list("ignore", patterns)
    }

    /// Only compile files matching these globs.
    #[must_use]
    pub fn only(self, patterns: &[&str]) -> Self {
        self.list("only", patterns)
    }

    /// Recompile on change.
    #[must_use]
    pub fn watch(self, on: bool) -> Self {
        self.flag("watch", on)
    }

    /// Suppress compilation output.
    #[must_use]
    pub fn quiet(self, on: bool) -> Self {
        self.flag("quiet", on)
    }

    /// Source map generation mode.
    #[must_use]
    pub fn source_maps(self, maps: SourceMaps) -> Self {
        self.set("sourceMaps", Some(maps.into()))
    }

    /// `file` field of the generated source map.
    #[must_use]
    pub fn source_map_target(self, target: impl Into<String>) -> Self {
        self.text("sourceMapTarget", target)
    }

    /// `sources` field of the generated source map.
    #[must_use]
    pub fn source_file_name(self, name: impl Into<String>) -> Self {
        self.text("sourceFileName", name)
    }

    /// Root from which all sources are relative.
    #[must_use]
    pub fn source_root(self, root: impl Into<String>) -> Self {
        self.text("sourceRoot", root)
    }

    /// Copy over non-compilable files.
    #[must_use]
    pub fn copy_files(self, on: bool) -> Self {
        self.flag("copyFiles", on)
    }

    /// Include dotfiles when compiling and copying.
    #[must_use]
    pub fn include_dotfiles(self, on: bool) -> Self {
        self.flag("includeDotfiles", on)
    }

    /// Configuration overrides passed as `-C key=value`.
    #[must_use]
    pub fn config(self, tree: ConfigTree) -> Self {
        self.set(CONFIG_KEY, Some(OptionValue::Config(tree)))
    }

    /// Invoke swc synchronously.
    #[must_use]
    pub fn sync(self, on: bool) -> Self {
        self.flag("sync", on)
    }

    /// Log compilation results in watch mode.
    #[must_use]
    pub fn log_watch_compilation(self, on: bool) -> Self {
        self.flag("logWatchCompilation", on)
    }

    /// File extensions to compile.
    #[must_use]
    pub fn extensions(self, extensions: &[&str]) -> Self {
        self.list("extensions", extensions)
    }
}

fn borrow_entry(entry: &(String, Option<OptionValue>)) -> (&str, Option<Cow<'_, OptionValue>>) {
    (entry.0.as_str(), entry.1.as_ref().map(Cow::Borrowed))
}
