//! Format Validators
//!
//! Coarse syntactic predicates for common form fields, plus a heuristic
//! SQL-injection detector. None of these replace real validation: the email
//! check is not RFC 5322, and the SQL heuristics are defense-in-depth only.

use regex::Regex;

use crate::config::SqlPatternConfig;
use crate::models::SanitizeError;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s]+$";

const PHONE_PATTERN: &str = r"^[0-9+\-\s()]{10,20}$";

/// Compiled SQL heuristic
#[derive(Debug, Clone)]
struct SqlPattern {
    pattern: Regex,
    description: String,
}

/// Compiled validators.
#[derive(Debug, Clone)]
pub struct FormatValidator {
    email: Regex,
    phone: Regex,
    sql_patterns: Vec<SqlPattern>,
}

impl FormatValidator {
    /// Compile the validators with the given SQL heuristics.
    pub fn new(sql_patterns: &[SqlPatternConfig]) -> Result<Self, SanitizeError> {
        let sql_patterns = sql_patterns
            .iter()
            .map(|p| -> Result<SqlPattern, SanitizeError> {
                Ok(SqlPattern {
                    pattern: compile(&p.pattern, &p.description)?,
                    description: p.description.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            email: compile(EMAIL_PATTERN, "email")?,
            phone: compile(PHONE_PATTERN, "phone")?,
            sql_patterns,
        })
    }

    /// `local@domain.tld`, with no whitespace and a single `@`.
    pub fn is_valid_email(&self, input: &str) -> bool {
        self.email.is_match(input)
    }

    /// 10 to 20 characters of digits, `+`, `-`, whitespace and parentheses.
    pub fn is_valid_phone(&self, input: &str) -> bool {
        self.phone.is_match(input)
    }

    /// Returns true if any SQL heuristic matches.
    pub fn has_sql_injection(&self, input: &str) -> bool {
        self.detect_sql_injection(input).is_some()
    }

    /// Description of the first SQL heuristic that matches, if any.
    pub fn detect_sql_injection(&self, input: &str) -> Option<&str> {
        self.sql_patterns
            .iter()
            .find(|p| p.pattern.is_match(input))
            .map(|p| p.description.as_str())
    }

    /// Number of compiled SQL heuristics.
    pub fn sql_pattern_count(&self) -> usize {
        self.sql_patterns.len()
    }
}

fn compile(pattern: &str, description: &str) -> Result<Regex, SanitizeError> {
    Regex::new(pattern).map_err(|source| SanitizeError::InvalidPattern {
        description: description.to_string(),
        source,
    })
}
