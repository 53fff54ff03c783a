// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::backup::JobState;

#[derive(Error, Debug)]
pub enum SnapctlError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Unsupported resource kind: {0}")]
    UnsupportedResourceKind(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Illegal snapshot job transition for '{resource_id}': {from:?} -> {to:?}")]
    InvalidTransition {
        resource_id: String,
        from: JobState,
        to: JobState,
    },

    #[error("AWS error: {0}")]
    Aws(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SnapctlError>;
