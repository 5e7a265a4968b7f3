//! Sampler configuration
//!
//! Loadable from JSON, or TOML with the `toml` feature:
//!
//! ```rust
//! use mongo_capacity::Config;
//!
//! let json = r#"{
//!     "uri": "mongodb://db0.example.net:27017",
//!     "thresholds": { "document_count": 1000000 }
//! }"#;
//! let config = Config::from_json(json).unwrap();
//! assert_eq!(config.thresholds.document_count, 1_000_000);
//! assert_eq!(config.thresholds.logical_size_bytes, 50 * 1024 * 1024 * 1024);
//! ```
use crate::error::{CapacityError, Result};
use crate::types::Capacity;
use serde::{Deserialize, Serialize};
use std::path::Path;

const GIB: u64 = 1024 * 1024 * 1024;

/// Limits above which a collection is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapacityThresholds {
    /// Documents per collection (default: 5,000,000)
    #[serde(default = "CapacityThresholds::default_document_count")]
    pub document_count: u64,

    /// Data plus index bytes per collection (default: 50 GiB)
    #[serde(default = "CapacityThresholds::default_logical_size_bytes")]
    pub logical_size_bytes: u64,
}

impl CapacityThresholds {
    const fn default_document_count() -> u64 {
        5_000_000
    }

    const fn default_logical_size_bytes() -> u64 {
        50 * GIB
    }

    pub fn with_document_count(mut self, count: u64) -> Self {
        self.document_count = count;
        self
    }

    pub fn with_logical_size_bytes(mut self, bytes: u64) -> Self {
        self.logical_size_bytes = bytes;
        self
    }

    /// Either limit alone qualifies a collection.
    pub fn is_exceeded_by(&self, document_count: u64, capacity: &Capacity) -> bool {
        document_count > self.document_count || capacity.logical_total() > self.logical_size_bytes
    }
}

impl Default for CapacityThresholds {
    fn default() -> Self {
        Self {
            document_count: Self::default_document_count(),
            logical_size_bytes: Self::default_logical_size_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// MongoDB connection string
    #[serde(default = "Config::default_uri")]
    pub uri: String,

    /// Application name reported to the server in the handshake
    #[serde(default = "Config::default_app_name")]
    pub app_name: String,

    #[serde(default)]
    pub thresholds: CapacityThresholds,
}

impl Config {
    fn default_uri() -> String {
        "mongodb://localhost:27017".to_string()
    }

    fn default_app_name() -> String {
        "mongo-capacity".to_string()
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_thresholds(mut self, thresholds: CapacityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.uri.trim().is_empty() {
            return Err("Connection URI must not be empty".to_string());
        }

        if !self.uri.starts_with("mongodb://") && !self.uri.starts_with("mongodb+srv://") {
            return Err(format!(
                "Connection URI must use the mongodb:// or mongodb+srv:// scheme, got {:?}",
                self.uri
            ));
        }

        if self.app_name.is_empty() {
            return Err("Application name must not be empty".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate().map_err(CapacityError::Config)?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)?;
        config.validate().map_err(CapacityError::Config)?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a config file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents),
            #[cfg(feature = "toml")]
            Some("toml") => Self::from_toml(&contents),
            other => Err(CapacityError::Config(format!(
                "unsupported config file extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uri: Self::default_uri(),
            app_name: Self::default_app_name(),
            thresholds: CapacityThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.uri, "mongodb://localhost:27017");
        assert_eq!(config.app_name, "mongo-capacity");
        assert_eq!(config.thresholds.document_count, 5_000_000);
        assert_eq!(config.thresholds.logical_size_bytes, 53_687_091_200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_uri("mongodb+srv://cluster0.example.net")
            .with_thresholds(
                CapacityThresholds::default()
                    .with_document_count(10)
                    .with_logical_size_bytes(2048),
            );

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();

        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let err = Config::from_json(r#"{"url": "mongodb://x"}"#).unwrap_err();
        assert!(matches!(err, CapacityError::Json(_)));
    }

    #[test]
    fn test_config_validation() {
        let empty = Config::default().with_uri("  ");
        assert!(empty.validate().is_err());

        let wrong_scheme = Config::default().with_uri("postgres://localhost");
        assert!(wrong_scheme.validate().is_err());

        let err = Config::from_json(r#"{"uri": "http://localhost"}"#).unwrap_err();
        assert!(matches!(err, CapacityError::Config(_)));
    }

    #[test]
    fn test_thresholds_either_limit() {
        let thresholds = CapacityThresholds::default()
            .with_document_count(100)
            .with_logical_size_bytes(1000);

        assert!(!thresholds.is_exceeded_by(100, &Capacity::new(900, 100, 0)));
        assert!(thresholds.is_exceeded_by(101, &Capacity::new(0, 0, 0)));
        assert!(thresholds.is_exceeded_by(0, &Capacity::new(900, 101, 0)));
        // Physical size is not a criterion.
        assert!(!thresholds.is_exceeded_by(0, &Capacity::new(10, 10, 1 << 40)));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml() {
        let config = Config::from_toml(
            r#"
            uri = "mongodb://replica.example.net:27017/?replicaSet=rs0"

            [thresholds]
            logical_size_bytes = 1073741824
            "#,
        )
        .unwrap();

        assert_eq!(config.thresholds.document_count, 5_000_000);
        assert_eq!(config.thresholds.logical_size_bytes, 1 << 30);

        let round_trip = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(round_trip, config);
    }

    #[cfg(not(feature = "toml"))]
    #[test]
    fn test_toml_file_needs_feature() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "uri = \"mongodb://localhost\"").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, CapacityError::Config(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"thresholds": {{"document_count": 42}}}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.thresholds.document_count, 42);

        let other = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = Config::from_file(other.path()).unwrap_err();
        assert!(matches!(err, CapacityError::Config(_)));
    }
}
