use crate::bind::BindError;
use crate::config::ConfigError;
use thiserror::Error;

/// Top-level error type for the config-binder library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to load a configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load a configuration: {0}")]
    Bind(#[from] BindError),
}
