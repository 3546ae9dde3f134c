// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::Pk;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Process not found: {0}")]
    ProcessNotFound(Pk),

    /// A candidate's derived field could not be computed. Surfaced to the
    /// caller instead of being replaced with an empty value.
    #[error("Data integrity error for process {pk}: {reason}")]
    DataIntegrity { pk: Pk, reason: String },

    #[error("Registry error: {0}")]
    RegistryError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
