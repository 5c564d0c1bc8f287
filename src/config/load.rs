//! Entry points that parse a document and optionally bind it.

use std::path::Path;

use tracing::debug;

use super::file::parse_config_file;
use super::format::{parse, Format};
use crate::bind::{bind, bind_as, Bind, Bound, TypeDescriptor};
use crate::value::Value;
use crate::Error;

/// Parses `text` into an untyped document.
pub fn read(format: Format, text: &str) -> Result<Value, Error> {
    debug!(%format, bytes = text.len(), "reading configuration");
    Ok(parse(format, text)?)
}

/// Parses `text` and binds it against `descriptor`.
pub fn read_with(format: Format, text: &str, descriptor: &TypeDescriptor) -> Result<Bound, Error> {
    let value = read(format, text)?;
    Ok(bind(&value, descriptor)?)
}

/// Parses `text` and binds it into `T`.
///
/// ```
/// use config_binder::{bind_schema, read_as, Format};
///
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// bind_schema!(Server { host: String, port: u16 });
///
/// let server: Server = read_as(Format::Yaml, "host: localhost\nport: '8080'")?;
/// assert_eq!(server.port, 8080);
/// # Ok::<(), config_binder::Error>(())
/// ```
pub fn read_as<T: Bind>(format: Format, text: &str) -> Result<T, Error> {
    let value = read(format, text)?;
    Ok(bind_as(&value)?)
}

/// Loads the file at `path`, picking the format from its extension.
pub fn load(path: impl AsRef<Path>) -> Result<Value, Error> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading configuration");
    Ok(parse_config_file(path)?)
}

/// Loads the file at `path` and binds it against `descriptor`.
pub fn load_with(path: impl AsRef<Path>, descriptor: &TypeDescriptor) -> Result<Bound, Error> {
    let value = load(path)?;
    Ok(bind(&value, descriptor)?)
}

/// Loads the file at `path` and binds it into `T`.
pub fn load_as<T: Bind>(path: impl AsRef<Path>) -> Result<T, Error> {
    let value = load(path)?;
    Ok(bind_as(&value)?)
}
