use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: Box<ConfigError>,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("configuration data is empty")]
    EmptyInput,

    #[error("unsupported file extension '{extension}', supported extensions: {supported}")]
    UnsupportedExtension { extension: String, supported: String },

    #[error("unable to resolve placeholder {0}")]
    UnresolvedPlaceholder(String),

    #[error("unclosed placeholder (missing '}}')")]
    UnclosedPlaceholder,

    #[error("invalid placeholder '${{{0}}}'")]
    InvalidPlaceholder(String),
}
