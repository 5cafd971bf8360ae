//! Store configuration.
//!
//! Values that the surrounding system would otherwise hard-code as process
//! constants (the default partition scope in particular) are passed in
//! explicitly through [`StoreConfig`].

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid store config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("store scope must not be empty")]
    EmptyScope,
}

///
/// Scope
///
/// Partition identifier for a table. Two tables holding the same record
/// type under different scopes are fully independent.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub const GLOBAL: &'static str = "global";

    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyScope);
        }

        Ok(Self(name))
    }

    #[must_use]
    pub fn global() -> Self {
        Self(Self::GLOBAL.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::global()
    }
}

///
/// StoreConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Partition the table lives in.
    pub scope: Scope,

    /// Re-derive and cross-check every index after each write.
    /// Intended for tests; costs a full scan per write. A failed check
    /// is returned as the write's error, but the write stays applied.
    pub verify_indexes: bool,
}

impl StoreConfig {
    /// Parse a config from TOML text. Missing keys fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        if config.scope.as_str().is_empty() {
            return Err(ConfigError::EmptyScope);
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub const fn with_verify_indexes(mut self, verify: bool) -> Self {
        self.verify_indexes = verify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_global_scope() {
        let config = StoreConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.scope.as_str(), Scope::GLOBAL);
        assert!(!config.verify_indexes);
    }

    #[test]
    fn toml_overrides_scope_and_verification() {
        let config = StoreConfig::from_toml_str("scope = \"carrier.one\"\nverify_indexes = true\n")
            .expect("config should parse");

        assert_eq!(config.scope.as_str(), "carrier.one");
        assert!(config.verify_indexes);
    }

    #[test]
    fn empty_scope_is_rejected() {
        let err = StoreConfig::from_toml_str("scope = \"\"").expect_err("empty scope must fail");
        assert!(matches!(err, ConfigError::EmptyScope));

        assert!(matches!(Scope::new(""), Err(ConfigError::EmptyScope)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = StoreConfig::from_toml_str("partition = \"x\"").expect_err("unknown key must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn config_serializes_scope_transparently() {
        let config = StoreConfig::default().with_scope(Scope::new("alice").expect("valid scope"));
        let json = serde_json::to_value(&config).expect("config should serialize");

        assert_eq!(json["scope"], "alice");
    }
}
