//! Configuration types for Shield.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shield_sanitizer::SanitizerConfig;
use tracing::info;

use crate::{error::ShieldError, Result};

/// Configuration for the request shield.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldConfig {
    /// Middleware behaviour.
    pub middleware: MiddlewareConfig,

    /// Sanitizer rules: operator allow-list, dangerous keys, SQL heuristics.
    pub sanitizer: SanitizerConfig,
}

/// Middleware behaviour switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiddlewareConfig {
    /// Also run the query-filter sanitizer over the escaped `body` and `query`.
    /// Off by default: the plain middleware output is the structural pass only.
    pub filter_query_operators: bool,

    /// Screening turns SQL heuristic hits into a Block instead of a Review.
    pub block_sql_patterns: bool,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            filter_query_operators: false,
            block_sql_patterns: false,
        }
    }
}

impl ShieldConfig {
    /// Load and validate a TOML config file.
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ShieldError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&text)?;
        info!("Loaded shield config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<()> {
        self.sanitizer
            .validate()
            .map_err(|e| ShieldError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShieldConfig::default();
        assert!(!config.middleware.filter_query_operators);
        assert!(!config.middleware.block_sql_patterns);
        assert_eq!(config.sanitizer, SanitizerConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = ShieldConfig::from_toml_str("").unwrap();
        assert_eq!(config, ShieldConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = ShieldConfig::from_toml_str(
            r#"
            [middleware]
            block_sql_patterns = true

            [sanitizer]
            max_depth = 32
            allowed_operators = ["$eq", "$in"]
            "#,
        )
        .unwrap();

        assert!(config.middleware.block_sql_patterns);
        assert!(!config.middleware.filter_query_operators);
        assert_eq!(config.sanitizer.max_depth, 32);
        assert_eq!(config.sanitizer.allowed_operators.len(), 2);
        assert!(config.sanitizer.dangerous_keys.contains("__proto__"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = ShieldConfig::from_toml_str("[sanitizer]\nmax_depth = 0\n");
        assert!(matches!(result, Err(ShieldError::Config(_))));

        let result = ShieldConfig::from_toml_str("[sanitizer]\nallowed_operators = [\"where\"]\n");
        assert!(matches!(result, Err(ShieldError::Config(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = ShieldConfig::from_toml_str("[middleware\n");
        assert!(matches!(result, Err(ShieldError::Parse(_))));
    }

    #[test]
    fn test_config_serialization() {
        let config = ShieldConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ShieldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
