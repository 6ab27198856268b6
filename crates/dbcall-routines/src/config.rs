//! Invoker configuration

use serde::{Deserialize, Serialize};

use crate::{CallError, Result};

/// What to do when an output value cannot be coerced to its declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionPolicy {
    /// Keep the slot and tag it as `OutputValue::ConversionFailed`
    #[default]
    Tag,
    /// Abort the call with `CallError::Conversion`
    Fail,
}

/// Configuration for a `RoutineInvoker`
///
/// Loaded from TOML, every field optional:
///
/// ```toml
/// bind_prefix = "@"
/// conversion_policy = "tag"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvokerConfig {
    /// Prefix put in front of every bind parameter name
    bind_prefix: String,
    /// Handling of output conversion failures
    conversion_policy: ConversionPolicy,
}

impl InvokerConfig {
    /// Create a configuration with the default `@` prefix and tagging policy
    pub fn new() -> Self {
        Self {
            bind_prefix: "@".to_string(),
            conversion_policy: ConversionPolicy::Tag,
        }
    }

    /// Set the bind parameter prefix
    ///
    /// # Panics
    ///
    /// Panics if the prefix is empty or contains whitespace.
    pub fn with_bind_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        assert!(
            is_valid_prefix(&prefix),
            "bind prefix must be non-empty and free of whitespace, got {:?}",
            prefix
        );
        self.bind_prefix = prefix;
        self
    }

    /// Set the conversion failure policy
    pub fn with_conversion_policy(mut self, policy: ConversionPolicy) -> Self {
        self.conversion_policy = policy;
        self
    }

    /// Get the bind parameter prefix
    pub fn bind_prefix(&self) -> &str {
        &self.bind_prefix
    }

    /// Get the conversion failure policy
    pub fn conversion_policy(&self) -> ConversionPolicy {
        self.conversion_policy
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| CallError::Configuration(format!("invalid invoker config: {}", e)))?;
        if !is_valid_prefix(&config.bind_prefix) {
            return Err(CallError::Configuration(format!(
                "bind_prefix must be non-empty and free of whitespace, got {:?}",
                config.bind_prefix
            )));
        }
        Ok(config)
    }
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A bind prefix must be non-empty and free of whitespace
pub(crate) fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && !prefix.chars().any(char::is_whitespace)
}
