//! Run configuration file loader.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::command::{CommandError, CommandOptions, SPAWN_OPTIONS_KEY};
use crate::exec::{Capture, ExecOptions, PromiseOptions, ResolveEvent, SpawnOptions};

/// File name searched for in the current directory.
pub const CONFIG_FILE_NAME: &str = ".swc-command.toml";
/// Key selecting the resolving event.
pub const RESOLVE_EVENT_KEY: &str = "resolveEvent";
/// Key selecting the captured streams.
pub const CAPTURE_KEY: &str = "data";

/// A fully loaded run: command options plus process and promise settings.
///
/// The file is a TOML table of swc options in camelCase (`src`, `outDir`,
/// `[config.jsc.parser]`, ...). `spawnOptions`, `resolveEvent` and `data`
/// configure execution and are never rendered into the command.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Command and process settings.
    pub exec: ExecOptions,
    /// Event promise mode resolves on.
    pub resolve_event: ResolveEvent,
    /// Streams promise mode collects.
    pub capture: Capture,
}

impl RunConfig {
    /// Parse a run configuration from TOML text. `origin` is used in errors.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not valid TOML, an execution
    /// table is malformed, or the options do not form a valid command.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let mut table: Map<String, Value> =
            toml::from_str(content).map_err(|e| ConfigError::ParseError {
                path: origin.to_path_buf(),
                source: e,
            })?;

        let spawn: SpawnOptions = take_field(&mut table, SPAWN_OPTIONS_KEY, origin)?;
        let resolve_event: ResolveEvent = take_field(&mut table, RESOLVE_EVENT_KEY, origin)?;
        let capture: Capture = take_field(&mut table, CAPTURE_KEY, origin)?;

        let command = CommandOptions::from_map(table, &[]).map_err(|e| {
            ConfigError::InvalidOptions {
                path: origin.to_path_buf(),
                source: e,
            }
        })?;

        Ok(Self {
            exec: ExecOptions::new(command).spawn_options(spawn),
            resolve_event,
            capture,
        })
    }

    /// Promise-mode options for this run.
    #[must_use]
    pub fn promise_options(&self) -> PromiseOptions {
        PromiseOptions::from(self.exec.clone())
            .resolve_event(self.resolve_event)
            .capture(self.capture)
    }
}

/// Remove `key` from the table and deserialize it, defaulting when absent.
fn take_field<T>(
    table: &mut Map<String, Value>,
    key: &'static str,
    origin: &Path,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    match table.shift_remove(key) {
        Some(value) => serde_json::from_value(value).map_err(|e| ConfigError::InvalidField {
            path: origin.to_path_buf(),
            field: key,
            source: e,
        }),
        None => Ok(T::default()),
    }
}

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .swc-command.toml
        search_paths.push(PathBuf::from(CONFIG_FILE_NAME));

        // 2. User config directory: ~/.config/swc-command/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("swc-command").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load the run configuration from the first available file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no file exists, or an error if the
    /// file cannot be read or parsed.
    pub fn load(&self) -> Result<RunConfig, ConfigError> {
        let Some(path) = self.find_config_file() else {
            return Err(ConfigError::NotFound {
                searched: self.search_paths.clone(),
            });
        };

        tracing::debug!(path = %path.display(), "Loading config file");
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        RunConfig::parse(&content, &path)
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find the first config file that exists.
    #[must_use]
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|p| p.exists()).cloned()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No config file found (searched: {searched:?})")]
    NotFound { searched: Vec<PathBuf> },

    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid `{field}` in config file {path}: {source}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        source: serde_json::Error,
    },

    #[error("Invalid options in config file {path}: {source}")]
    InvalidOptions {
        path: PathBuf,
        source: CommandError,
    },
}
