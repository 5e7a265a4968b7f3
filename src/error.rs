//! Error types for capacity sampling.
//!
//! Two layers are kept apart: [`StatsError`] is what a [`StatsSource`] call
//! returns and is usually absorbed by the samplers, while [`CapacityError`]
//! is what reaches the caller.
//!
//! [`StatsSource`]: crate::source::StatsSource

use thiserror::Error;

/// Failure of a single stats provider call.
#[derive(Error, Debug)]
pub enum StatsError {
    #[cfg(feature = "mongo")]
    #[error("driver error: {0}")]
    Driver(#[from] mongodb::error::Error),
    #[error("command `{command}` did not report ok")]
    NotOk { command: String },
    #[error("command `{command}` reply is missing `{field}`")]
    MissingField { command: String, field: String },
    #[error("stats unavailable: {0}")]
    Unavailable(String),
}

impl StatsError {
    pub fn not_ok(command: impl Into<String>) -> Self {
        Self::NotOk {
            command: command.into(),
        }
    }

    pub fn missing_field(command: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            command: command.into(),
            field: field.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CapacityError {
    /// Database enumeration failed; the whole pass is aborted.
    #[error("listDatabases failed: {0}")]
    Provider(#[source] StatsError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CapacityError>;
