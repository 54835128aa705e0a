//! Process execution adapters for compiled swc commands.
//!
//! Every adapter spawns from the token vector, never through a shell.

mod chunk;
mod error;
mod promise;
mod spawn;
mod sync;

pub use chunk::*;
pub use error::*;
pub use promise::*;
pub use spawn::*;
pub use sync::*;
