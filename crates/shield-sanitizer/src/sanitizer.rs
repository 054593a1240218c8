//! Main sanitizer facade
//!
//! Binds a [`SanitizerConfig`] to the escaping, structural, query and
//! validation routines so callers configure once and share the result.

use serde_json::Value;
use tracing::debug;

use crate::config::SanitizerConfig;
use crate::escape;
use crate::models::{QueryOutcome, SanitizeError};
use crate::query;
use crate::structure;
use crate::url;
use crate::validate::FormatValidator;

/// The input sanitizer - main interface
///
/// Immutable after construction, so a single instance can be shared across
/// threads (e.g. behind an `Arc`).
#[derive(Debug, Clone)]
pub struct Sanitizer {
    config: SanitizerConfig,
    validator: FormatValidator,
}

impl Sanitizer {
    /// Create a sanitizer with the default configuration.
    ///
    /// # Panics
    ///
    /// Never in practice: the built-in configuration is covered by tests.
    pub fn new() -> Self {
        Self::with_config(SanitizerConfig::default())
            .expect("built-in sanitizer configuration is valid")
    }

    /// Create a sanitizer with a custom configuration.
    ///
    /// Fails if the configuration is inconsistent or a SQL pattern does not
    /// compile.
    pub fn with_config(config: SanitizerConfig) -> Result<Self, SanitizeError> {
        config.validate()?;
        let validator = FormatValidator::new(&config.sql_patterns)?;

        debug!(
            operators = config.allowed_operators.len(),
            dangerous_keys = config.dangerous_keys.len(),
            sql_patterns = validator.sql_pattern_count(),
            "Sanitizer initialized"
        );

        Ok(Self { config, validator })
    }

    /// Get the active configuration
    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Escape a string. See [`escape::escape_str`].
    pub fn escape(&self, input: &str) -> String {
        escape::escape_str(input)
    }

    /// Escape a value if it is a string. See [`escape::sanitize_string`].
    pub fn sanitize_string(&self, value: &Value) -> Value {
        escape::sanitize_string(value)
    }

    /// Recursively sanitize a document: escape strings, drop dangerous keys.
    pub fn sanitize_object(&self, value: &Value) -> Value {
        structure::sanitize_structure(value, &self.config)
    }

    /// Filter a query document, reporting what was removed.
    pub fn filter_query(&self, query: &Value) -> QueryOutcome {
        query::filter_query(query, &self.config)
    }

    /// Filter a query document, keeping only the sanitized filter.
    pub fn sanitize_mongo_query(&self, query: &Value) -> Value {
        self.filter_query(query).into_sanitized()
    }

    /// Gate a URL. See [`url::sanitize_url`].
    pub fn sanitize_url(&self, input: &str) -> String {
        url::sanitize_url(input)
    }

    /// Coarse email syntax check.
    pub fn is_valid_email(&self, input: &str) -> bool {
        self.validator.is_valid_email(input)
    }

    /// Coarse phone number syntax check.
    pub fn is_valid_phone(&self, input: &str) -> bool {
        self.validator.is_valid_phone(input)
    }

    /// Heuristic SQL-injection check.
    pub fn has_sql_injection(&self, input: &str) -> bool {
        self.validator.has_sql_injection(input)
    }

    /// Description of the first matching SQL heuristic.
    pub fn detect_sql_injection(&self, input: &str) -> Option<&str> {
        self.validator.detect_sql_injection(input)
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
