//! Facade factory configuration
//!
//! Every option has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! base_path = "person"
//! rewrap_results = true
//! bind_rewrapped_parent = true
//! synthesize_defaults = true
//! ```

use crate::error::{FacadeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling how facades are built and how they treat returned values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacadeConfig {
    /// Prefix of every path rendered by trackers the factory creates
    pub base_path: String,
    /// Wrap inheritable objects returned from facade calls in facades of their own
    pub rewrap_results: bool,
    /// Make the calling facade the parent of facades wrapped around its results
    pub bind_rewrapped_parent: bool,
    /// Synthesize nested values for required accessors on store-backed facades
    pub synthesize_defaults: bool,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            rewrap_results: true,
            bind_rewrapped_parent: true,
            synthesize_defaults: true,
        }
    }
}

impl FacadeConfig {
    /// Parse a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| FacadeError::InvalidConfig(e.to_string()))
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            FacadeError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| FacadeError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(FacadeConfig::from_toml_str("").unwrap(), FacadeConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = FacadeConfig::from_toml_str(
            r#"
            base_path = "order"
            rewrap_results = false
            "#,
        )
        .unwrap();
        assert_eq!(config.base_path, "order");
        assert!(!config.rewrap_results);
        assert!(config.synthesize_defaults);
    }

    #[test]
    fn test_rejects_wrong_types() {
        let err = FacadeConfig::from_toml_str("rewrap_results = \"yes\"").unwrap_err();
        assert!(matches!(err, FacadeError::InvalidConfig(_)));
    }

    #[test]
    fn test_json_round_trip_through_serde() {
        let config: FacadeConfig =
            serde_json::from_str(r#"{"bind_rewrapped_parent": false}"#).unwrap();
        assert!(!config.bind_rewrapped_parent);
        assert!(config.rewrap_results);

        let rendered = config.to_toml_string().unwrap();
        assert_eq!(FacadeConfig::from_toml_str(&rendered).unwrap(), config);
    }
}
