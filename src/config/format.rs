//! Document formats and parsing.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use super::env::interpolate;
use super::ConfigError;
use crate::value::Value;

/// A supported document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Yaml, Format::Json, Format::Toml];

    /// File extensions recognized for this format, without the leading dot.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Format::Yaml => &["yaml", "yml"],
            Format::Json => &["json"],
            Format::Toml => &["toml"],
        }
    }

    /// Resolves a format from a file extension such as `yml` or `.json`.
    pub fn from_extension(extension: &str) -> Result<Self, ConfigError> {
        let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&normalized.as_str()))
            .ok_or_else(|| ConfigError::UnsupportedExtension {
                extension: extension.to_string(),
                supported: supported_extensions(),
            })
    }

    /// Resolves a format from the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path.extension().and_then(OsStr::to_str).unwrap_or_default();
        Self::from_extension(extension)
    }

    fn parse_raw(self, text: &str) -> Result<Value, ConfigError> {
        Ok(match self {
            Format::Yaml => serde_yaml::from_str(text)?,
            Format::Json => serde_json::from_str(text)?,
            Format::Toml => toml::from_str(text)?,
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::Toml => "toml",
        })
    }
}

fn supported_extensions() -> String {
    Format::ALL
        .iter()
        .flat_map(|format| format.extensions())
        .map(|extension| format!(".{extension}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses `text` as `format` and resolves environment placeholders in string scalars.
///
/// Blank input, and documents that parse to nothing (e.g. a YAML file holding
/// only comments), are rejected as empty.
pub fn parse(format: Format, text: &str) -> Result<Value, ConfigError> {
    if text.trim().is_empty() {
        return Err(ConfigError::EmptyInput);
    }

    let mut value = format.parse_raw(text)?;
    if value.is_null() {
        return Err(ConfigError::EmptyInput);
    }

    interpolate(&mut value)?;
    Ok(value)
}
