//! swc-command - Build and run swc CLI commands from typed options.
//!
//! [`command`] compiles a [`command::CommandOptions`] into either a shell
//! string or an argument vector; [`exec`] runs that vector as a child process
//! in handle, promise or blocking mode.

pub mod command;
pub mod config;
pub mod exec;
pub mod utils;

pub use command::{
    build_command, build_command_args, build_command_with, build_config_option,
    build_config_option_with, build_option, build_option_with, option_prop_to_command_arg,
    CommandError, CommandOptions, ConfigTree, Destination, OptionValue, Quoting,
};
pub use exec::{cp_swc, swc, swc_sync, swc_with, ExecOptions, PromiseOptions};
pub use utils::is_compilation_successful;
