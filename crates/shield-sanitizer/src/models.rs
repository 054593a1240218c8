//! # Core Types for the Input Sanitizer
//!
//! Result and error types shared by the sanitizer modules.
//!
//! ## Design Principles
//!
//! 1. **Total Operations** - Sanitization itself never fails; only building a
//!    [`Sanitizer`](crate::Sanitizer) from a bad configuration can.
//! 2. **Visible Truncation** - Whatever the query filter removes is reported
//!    back in [`QueryOutcome::dropped`] instead of disappearing silently.
//! 3. **Serializable** - Outcomes derive Serde traits for logging and audit trails.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// An operator removed by the query filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedOperator {
    /// Dotted location of the operator inside the filter (`status.$where`).
    pub path: String,
    /// The operator token as it appeared in the filter.
    pub operator: String,
}

/// Result of filtering a query document.
///
/// `sanitized` is always safe to hand to the persistence layer. `dropped`
/// lets the caller tell "nothing matched" apart from "part of the filter
/// was stripped".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// The filter with every disallowed operator removed.
    pub sanitized: Value,
    /// Operators that were removed, in traversal order.
    pub dropped: Vec<DroppedOperator>,
}

impl QueryOutcome {
    /// Returns true if the filter came through untouched.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }

    /// Consumes the outcome, keeping only the sanitized filter.
    #[inline]
    pub fn into_sanitized(self) -> Value {
        self.sanitized
    }
}

/// Errors raised while building a sanitizer.
///
/// None of the sanitization operations return these; they are total over
/// their input. A configuration problem surfaces once, at construction.
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// A configured SQL heuristic is not a valid regular expression.
    #[error("Invalid pattern '{description}': {source}")]
    InvalidPattern {
        /// Description attached to the offending pattern
        description: String,
        /// Underlying regex compilation error
        #[source]
        source: regex::Error,
    },

    /// The configuration is internally inconsistent.
    #[error("Invalid sanitizer configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_clean() {
        let outcome = QueryOutcome {
            sanitized: json!({"a": 1}),
            dropped: vec![],
        };
        assert!(outcome.is_clean());
        assert_eq!(outcome.into_sanitized(), json!({"a": 1}));
    }

    #[test]
    fn test_outcome_serializes_dropped() {
        let outcome = QueryOutcome {
            sanitized: json!({}),
            dropped: vec![DroppedOperator {
                path: "$where".to_string(),
                operator: "$where".to_string(),
            }],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["dropped"][0]["operator"], "$where");
    }

    #[test]
    fn test_error_display() {
        let err = SanitizeError::InvalidConfig("max_depth must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid sanitizer configuration: max_depth must be positive"
        );
    }
}
