//! Sanitizer configuration.
//!
//! The operator allow-list, the dangerous key list and the SQL heuristics are
//! plain data so each deployment can inspect and override them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::SanitizeError;

/// Default reserved marker for query operators.
pub const DEFAULT_OPERATOR_PREFIX: char = '$';

/// Default recursion bound for structural walks.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Operators a query filter may use unless configured otherwise.
pub const DEFAULT_ALLOWED_OPERATORS: &[&str] = &[
    "$eq", "$ne", "$gt", "$gte", "$lt", "$lte", "$in", "$nin", "$and", "$or", "$not", "$exists",
];

/// Keys that are never copied into a sanitized mapping.
pub const DEFAULT_DANGEROUS_KEYS: &[&str] = &["__proto__", "constructor", "prototype"];

/// A single SQL-injection heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlPatternConfig {
    /// Regular expression, `regex` crate syntax
    pub pattern: String,
    /// Human-readable label reported on a match
    pub description: String,
}

impl SqlPatternConfig {
    /// Create a pattern entry.
    pub fn new(pattern: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            description: description.into(),
        }
    }
}

/// Built-in SQL heuristics.
///
/// These are defense-in-depth only. Both false positives and false negatives
/// are expected; parameterized queries remain the actual protection.
pub fn default_sql_patterns() -> Vec<SqlPatternConfig> {
    vec![
        SqlPatternConfig::new(
            r"(?i)\b(or|and)\b\s+\d+\s*=\s*\d+",
            "Tautological numeric comparison",
        ),
        SqlPatternConfig::new(r"(?i)\bunion\s+(all\s+)?select\b", "UNION SELECT"),
        SqlPatternConfig::new(r"(?i)\bdrop\s+table\b", "DROP TABLE"),
        SqlPatternConfig::new(r"(?i)\binsert\s+into\b", "INSERT INTO"),
        SqlPatternConfig::new(r"(?i)\bdelete\s+from\b", "DELETE FROM"),
        SqlPatternConfig::new(r"(?i)\bupdate\s+\w+\s+set\b", "UPDATE ... SET"),
        SqlPatternConfig::new(r"--|/\*|\*/", "SQL comment marker"),
        SqlPatternConfig::new(r"(?i)'\s*or\s*'1'\s*=\s*'1", "Quoted OR '1'='1' tautology"),
    ]
}

/// Configuration for a [`Sanitizer`](crate::Sanitizer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Marker that makes a key operator-shaped
    pub operator_prefix: char,
    /// Operator tokens the query filter lets through
    pub allowed_operators: BTreeSet<String>,
    /// Keys dropped from every mapping
    pub dangerous_keys: BTreeSet<String>,
    /// Nesting depth past which subtrees are replaced by `null`
    pub max_depth: usize,
    /// SQL-injection heuristics, checked in order
    pub sql_patterns: Vec<SqlPatternConfig>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            operator_prefix: DEFAULT_OPERATOR_PREFIX,
            allowed_operators: DEFAULT_ALLOWED_OPERATORS
                .iter()
                .map(|op| op.to_string())
                .collect(),
            dangerous_keys: DEFAULT_DANGEROUS_KEYS
                .iter()
                .map(|key| key.to_string())
                .collect(),
            max_depth: DEFAULT_MAX_DEPTH,
            sql_patterns: default_sql_patterns(),
        }
    }
}

impl SanitizerConfig {
    /// Add an operator to the allow-list.
    pub fn allow_operator(mut self, operator: impl Into<String>) -> Self {
        self.allowed_operators.insert(operator.into());
        self
    }

    /// Remove an operator from the allow-list.
    pub fn deny_operator(mut self, operator: &str) -> Self {
        self.allowed_operators.remove(operator);
        self
    }

    /// Add a key to the dangerous key list.
    pub fn with_dangerous_key(mut self, key: impl Into<String>) -> Self {
        self.dangerous_keys.insert(key.into());
        self
    }

    /// Append a SQL heuristic.
    pub fn with_sql_pattern(mut self, pattern: SqlPatternConfig) -> Self {
        self.sql_patterns.push(pattern);
        self
    }

    /// Set the recursion bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Check the configuration for internal consistency.
    ///
    /// Regex syntax is checked separately, when the patterns are compiled.
    pub fn validate(&self) -> Result<(), SanitizeError> {
        if self.max_depth == 0 {
            return Err(SanitizeError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }

        if let Some(op) = self
            .allowed_operators
            .iter()
            .find(|op| !op.starts_with(self.operator_prefix))
        {
            return Err(SanitizeError::InvalidConfig(format!(
                "allowed operator '{}' does not start with '{}'",
                op, self.operator_prefix
            )));
        }

        Ok(())
    }

    /// Returns true if `key` uses the operator marker.
    #[inline]
    pub fn is_operator(&self, key: &str) -> bool {
        key.starts_with(self.operator_prefix)
    }
}
