//! Run configuration module.

mod loader;

pub use loader::*;
