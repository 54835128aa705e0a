//! Option to argument compiler.
//!
//! Two output forms are produced from the same [`CommandOptions`]:
//!
//! - a shell string (`npx swc "src" --out-dir="dist" --watch`), where values
//!   are quoted according to [`Quoting`] and flags use `--name=value`;
//! - a token vector (`["npx", "swc", "src", "--out-dir", "dist", "--watch",
//!   "true"]`) for direct execution without a shell. Every option becomes a
//!   flag/value pair here, booleans included.

use serde_json::{Map, Value};

use super::{CommandError, CommandOptions, ConfigTree, OptionValue, Quoting};
use super::{CONFIG_KEY, SCHEMA_KEY, SRC_KEY};

/// Package runner used to invoke swc.
pub const LAUNCHER: &str = "npx";
/// swc executable name passed to the launcher.
pub const SUBCOMMAND: &str = "swc";
/// Flag preceding each configuration override.
pub const CONFIG_FLAG: &str = "-C";

/// Convert a camelCase option name into a `--kebab-case` flag.
///
/// Every uppercase letter becomes `-` followed by its lowercase form; all
/// other characters pass through.
#[must_use]
pub fn option_prop_to_command_arg(prop: &str) -> String {
    let mut arg = String::with_capacity(prop.len() + 4);
    arg.push_str("--");
    for ch in prop.chars() {
        if ch.is_uppercase() {
            arg.push('-');
            arg.extend(ch.to_lowercase());
        } else {
            arg.push(ch);
        }
    }
    arg
}

/// Flatten a config tree into unquoted `key.path=value` assignments.
///
/// Depth-first, pre-order, in key insertion order. `$schema` keys are
/// skipped at every depth and arrays are leaves.
#[must_use]
pub fn config_assignments(tree: &ConfigTree) -> Vec<String> {
    let mut assignments = Vec::new();
    flatten(tree.as_map(), "", &mut assignments);
    assignments
}

fn flatten(map: &Map<String, Value>, path: &str, out: &mut Vec<String>) {
    for (key, value) in map {
        if key == SCHEMA_KEY {
            continue;
        }
        let key_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };
        match value {
            Value::Object(inner) => flatten(inner, &key_path, out),
            leaf => out.push(format!("{key_path}={}", stringify_leaf(leaf))),
        }
    }
}

/// Plain text of a config leaf. Arrays comma-join their elements.
fn stringify_leaf(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => stringify_number(number),
        Value::Array(items) => items
            .iter()
            .map(stringify_element)
            .collect::<Vec<_>>()
            .join(","),
        // bool, null, and objects nested inside arrays
        other => other.to_string(),
    }
}

/// Array elements render like leaves, except that `null` is empty.
fn stringify_element(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => stringify_leaf(other),
    }
}

/// Integral floats drop their fraction: `1.0` renders as `1`.
fn stringify_number(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() => float.to_string(),
        _ => number.to_string(),
    }
}

/// Render a config tree as `-C "a.b=c" -C "d=e"` with double quotes.
#[must_use]
pub fn build_config_option(tree: &ConfigTree) -> String {
    build_config_option_with(tree, Quoting::DoubleQuote)
}

/// Render a config tree as space-separated `-C <assignment>` pairs.
///
/// The quoting mode is applied to every assignment.
#[must_use]
pub fn build_config_option_with(tree: &ConfigTree, quoting: Quoting) -> String {
    config_assignments(tree)
        .iter()
        .map(|assignment| format!("{CONFIG_FLAG} {}", quoting.apply(assignment)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain string form of a non-config value, as used in the token vector.
fn plain_value(name: &str, value: &OptionValue) -> Result<String, CommandError> {
    match value {
        OptionValue::Bool(flag) => Ok(flag.to_string()),
        OptionValue::String(text) => Ok(text.clone()),
        OptionValue::List(items) => Ok(items.join(",")),
        OptionValue::Config(_) => Err(CommandError::unsupported(name)),
    }
}

/// Render one option in double-quote mode.
///
/// # Errors
///
/// See [`build_option_with`].
pub fn build_option(name: &str, value: Option<&OptionValue>) -> Result<String, CommandError> {
    build_option_with(name, value, Quoting::DoubleQuote)
}

/// Render one option as a command string fragment.
///
/// An undefined value renders as the empty string. `src` renders as its
/// quoted value alone. `true` renders as a bare flag, `false` as
/// `--name=false`, strings and lists as `--name=<quoted>`, and a config tree
/// under `config` as a series of `-C` overrides.
///
/// # Errors
///
/// Returns `CommandError::UnsupportedValueType` for a config tree under any
/// name other than `config`.
pub fn build_option_with(
    name: &str,
    value: Option<&OptionValue>,
    quoting: Quoting,
) -> Result<String, CommandError> {
    let Some(value) = value else {
        return Ok(String::new());
    };
    if name == SRC_KEY {
        return Ok(quoting.apply(&plain_value(name, value)?));
    }

    let flag = option_prop_to_command_arg(name);
    match value {
        OptionValue::Bool(true) => Ok(flag),
        OptionValue::Bool(false) => Ok(format!("{flag}=false")),
        OptionValue::String(text) => Ok(format!("{flag}={}", quoting.apply(text))),
        OptionValue::List(items) => Ok(format!("{flag}={}", quoting.apply(&items.join(",")))),
        OptionValue::Config(tree) if name == CONFIG_KEY => {
            Ok(build_config_option_with(tree, quoting))
        }
        OptionValue::Config(_) => Err(CommandError::unsupported(name)),
    }
}

fn is_rendered(name: &str, ignore: &[&str]) -> bool {
    name != SRC_KEY && name != SCHEMA_KEY && !ignore.contains(&name)
}

/// Build the full command string in double-quote mode.
///
/// # Errors
///
/// See [`build_command_with`].
pub fn build_command(options: &CommandOptions, ignore: &[&str]) -> Result<String, CommandError> {
    build_command_with(options, ignore, Quoting::DoubleQuote)
}

/// Build the full command string, `npx swc <src> [options...]`.
///
/// Options named in `ignore`, `src` and `$schema` are skipped; undefined
/// options contribute nothing.
///
/// # Errors
///
/// Returns `CommandError::UnsupportedValueType` if any option fails to render.
pub fn build_command_with(
    options: &CommandOptions,
    ignore: &[&str],
    quoting: Quoting,
) -> Result<String, CommandError> {
    let mut command = format!("{LAUNCHER} {SUBCOMMAND} {}", quoting.apply(options.src()));
    for (name, value) in options.iter() {
        if !is_rendered(name, ignore) {
            continue;
        }
        let fragment = build_option_with(name, value.as_deref(), quoting)?;
        if !fragment.is_empty() {
            command.push(' ');
            command.push_str(&fragment);
        }
    }
    Ok(command)
}

/// Build the argument vector: launcher, subcommand and raw `src`, followed by
/// flag/value token pairs.
///
/// No quoting is applied. A config tree under `config` expands into repeated
/// `-C` / `key.path=value` pairs; every other option yields its flag and its
/// plain value, so `watch: true` becomes `--watch`, `true`.
///
/// # Errors
///
/// Returns `CommandError::UnsupportedValueType` for a config tree under any
/// name other than `config`.
pub fn build_command_args(
    options: &CommandOptions,
    ignore: &[&str],
) -> Result<Vec<String>, CommandError> {
    let mut args = vec![
        LAUNCHER.to_string(),
        SUBCOMMAND.to_string(),
        options.src().to_string(),
    ];
    for (name, value) in options.iter() {
        if !is_rendered(name, ignore) {
            continue;
        }
        let Some(value) = value else {
            continue;
        };
        match &*value {
            OptionValue::Config(tree) if name == CONFIG_KEY => {
                for assignment in config_assignments(tree) {
                    args.push(CONFIG_FLAG.to_string());
                    args.push(assignment);
                }
            }
            other => {
                args.push(option_prop_to_command_arg(name));
                args.push(plain_value(name, other)?);
            }
        }
    }
    Ok(args)
}
