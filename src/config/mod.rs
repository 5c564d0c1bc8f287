//! Configuration document loading.

mod env;
mod error;
mod file;
mod format;
mod load;

pub use env::{interpolate, interpolate_with};
pub use error::ConfigError;
pub use format::{parse, Format};
pub use load::{load, load_as, load_with, read, read_as, read_with};
