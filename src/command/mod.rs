//! Command compiler: turns typed swc options into a shell string or an
//! argument vector.

mod builder;
mod error;
mod options;
mod quoting;

pub use builder::*;
pub use error::*;
pub use options::*;
pub use quoting::*;
