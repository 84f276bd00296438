// Validator configuration loading

use crate::{ErrorPolicy, PatternRegistry, ValidatorError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Prefix for environment variables read by [`ValidatorConfig::from_env`].
pub const ENV_PREFIX: &str = "FIELDCHECK_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Unknown error policy: {0}")]
    InvalidPolicy(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// Settings a [`Validator`](crate::Validator) is built from.
///
/// ```toml
/// policy = "collect_all"
/// replace_default_patterns = false
///
/// [patterns]
/// zip = '^\d{5}$'
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// What happens when a field fails more than once
    pub policy: ErrorPolicy,
    /// Start from an empty registry instead of the built-in patterns
    pub replace_default_patterns: bool,
    /// Extra or overriding patterns, by name
    pub patterns: BTreeMap<String, String>,
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML configuration.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))
    }

    /// Parse JSON configuration.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))
    }

    /// Load a configuration file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::LoadError(format!("Unsupported format: {}", ext)))?;

        let content = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), ?format, "loading validator configuration");

        match format {
            FileFormat::Json => Self::from_json_str(&content),
            FileFormat::Toml => Self::from_toml_str(&content),
        }
    }

    /// Read `FIELDCHECK_ERROR_POLICY` and `FIELDCHECK_PATTERN_<NAME>` from the
    /// process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars())
    }

    /// Same as [`from_env`](Self::from_env) over an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();

        for (key, value) in vars {
            let Some(key) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };

            if key == "ERROR_POLICY" {
                let value: String = value.into();
                config.policy =
                    ErrorPolicy::from_name(&value).ok_or(ConfigError::InvalidPolicy(value))?;
            } else if let Some(name) = key.strip_prefix("PATTERN_") {
                if !name.is_empty() {
                    config.patterns.insert(name.to_lowercase(), value.into());
                }
            }
        }

        Ok(config)
    }

    /// Add or override a pattern.
    pub fn with_pattern(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.patterns.insert(name.into(), source.into());
        self
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Compile the configured pattern registry.
    pub fn pattern_registry(&self) -> Result<PatternRegistry, ValidatorError> {
        let mut builder = PatternRegistry::builder();
        if self.replace_default_patterns {
            builder = builder.clear();
        }
        builder
            .patterns(self.patterns.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_toml() {
        let config = ValidatorConfig::from_toml_str(
            r#"
            policy = "collect_all"

            [patterns]
            zip = '^\d{5}$'
            "#,
        )
        .unwrap();

        assert_eq!(config.policy, ErrorPolicy::CollectAll);
        assert_eq!(config.patterns.get("zip").map(String::as_str), Some(r"^\d{5}$"));
        assert!(!config.replace_default_patterns);
    }

    #[test]
    fn test_from_json() {
        let config =
            ValidatorConfig::from_json_str(r#"{"replace_default_patterns": true}"#).unwrap();
        assert_eq!(config.policy, ErrorPolicy::Overwrite);
        assert!(config.replace_default_patterns);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ValidatorConfig::from_toml_str("policy = 3"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            ValidatorConfig::from_json_str(r#"{"policy": "sometimes"}"#),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "policy = \"overwrite\"").unwrap();
        writeln!(file, "[patterns]").unwrap();
        writeln!(file, "code = '^[A-Z]{{3}}$'").unwrap();

        let config = ValidatorConfig::load(file.path()).unwrap();
        assert!(config.patterns.contains_key("code"));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(
            ValidatorConfig::load(file.path()),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn test_from_vars() {
        let config = ValidatorConfig::from_vars([
            ("FIELDCHECK_ERROR_POLICY", "collect-all"),
            ("FIELDCHECK_PATTERN_ZIP", r"^\d{5}$"),
            ("UNRELATED", "x"),
        ])
        .unwrap();

        assert_eq!(config.policy, ErrorPolicy::CollectAll);
        assert!(config.patterns.contains_key("zip"));
        assert_eq!(config.patterns.len(), 1);
    }

    #[test]
    fn test_from_vars_rejects_bad_policy() {
        let result = ValidatorConfig::from_vars([("FIELDCHECK_ERROR_POLICY", "maybe")]);
        assert!(matches!(result, Err(ConfigError::InvalidPolicy(p)) if p == "maybe"));
    }

    #[test]
    fn test_pattern_registry() {
        let registry = ValidatorConfig::new()
            .with_pattern("zip", r"^\d{5}$")
            .pattern_registry()
            .unwrap();
        assert!(registry.contains("zip"));
        assert!(registry.contains("email"));

        let config = ValidatorConfig {
            replace_default_patterns: true,
            ..ValidatorConfig::new().with_pattern("zip", r"^\d{5}$")
        };
        let registry = config.pattern_registry().unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["zip"]);
    }

    #[test]
    fn test_pattern_registry_bad_regex() {
        let result = ValidatorConfig::new()
            .with_pattern("broken", "[")
            .pattern_registry();
        assert!(matches!(result, Err(ValidatorError::InvalidPattern { .. })));
    }
}
