//! # Shield Sanitizer - Request Input Hardening
//!
//! The sanitizer sits between the HTTP layer and business logic of the ICU
//! management backend. Every request body, query string and path parameter
//! passes through it before a handler or the persistence layer sees it.
//!
//! ## Purpose
//!
//! This crate implements five stateless defensive routines:
//!
//! 1. **String Escaping** - HTML entity substitution and NUL stripping.
//! 2. **Structural Sanitization** - Recursive escaping of whole documents,
//!    with prototype-pollution keys removed.
//! 3. **Query-Filter Sanitization** - Operator allow-listing for document
//!    database filters.
//! 4. **URL Gatekeeping** - Only relative paths and `http(s)` URLs pass.
//! 5. **Format Validation** - Email, phone and SQL-injection heuristics.
//!
//! ## Threat Model
//!
//! | Threat | Description | Defense |
//! |--------|-------------|---------|
//! | Stored XSS | Markup saved and rendered later | String escaping |
//! | Prototype pollution | `__proto__` keys reaching a JS consumer | Dangerous key removal |
//! | NoSQL injection | `$where`, `$expr` in client filters | Operator allow-list |
//! | Open redirect / script URLs | `javascript:`, foreign schemes | URL gatekeeper |
//! | SQL injection | Tautologies, stacked statements | Heuristic detection (flag only) |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        SANITIZER                                │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  SanitizerConfig ──► allow-list, dangerous keys, SQL patterns   │
//! │                                                                 │
//! │  ┌──────────┐  ┌────────────┐  ┌──────────┐  ┌─────────────┐    │
//! │  │  ESCAPE  │◄─│ STRUCTURE  │  │  QUERY   │  │  VALIDATE   │    │
//! │  │ entities │  │ recursive  │  │ operator │  │ email/phone │    │
//! │  │ NUL strip│  │ key filter │  │ filter   │  │ SQL heurist.│    │
//! │  └──────────┘  └────────────┘  └──────────┘  └─────────────┘    │
//! │                       ┌──────────┐                              │
//! │                       │   URL    │                              │
//! │                       └──────────┘                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All operations are total: they never fail on any input. Only building a
//! [`Sanitizer`] from a custom configuration can return an error.
//!
//! ## References
//!
//! - **OWASP XSS Prevention Cheat Sheet** - Output encoding rules.
//!   <https://cheatsheetseries.owasp.org/cheatsheets/Cross_Site_Scripting_Prevention_Cheat_Sheet.html>
//! - **OWASP NoSQL Injection** - Operator injection in document stores.
//!   <https://owasp.org/www-project-web-security-testing-guide/>
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use shield_sanitizer::Sanitizer;
//!
//! let sanitizer = Sanitizer::new();
//!
//! let body = json!({"name": "<script>x</script>", "__proto__": {"admin": true}});
//! assert_eq!(
//!     sanitizer.sanitize_object(&body),
//!     json!({"name": "&lt;script&gt;x&lt;&#x2F;script&gt;"})
//! );
//!
//! let outcome = sanitizer.filter_query(&json!({"room": {"$where": "1"}}));
//! assert_eq!(outcome.sanitized, json!({"room": {}}));
//! assert_eq!(outcome.dropped[0].operator, "$where");
//! ```

use std::sync::LazyLock;

use serde_json::Value;

pub mod config;
pub mod escape;
pub mod models;
pub mod query;
pub mod sanitizer;
pub mod structure;
pub mod url;
pub mod validate;

pub use config::{SanitizerConfig, SqlPatternConfig};
pub use escape::{escape_str, sanitize_string, unescape_str};
pub use models::{DroppedOperator, QueryOutcome, SanitizeError};
pub use sanitizer::Sanitizer;
pub use url::{sanitize_url, sanitize_url_value};
pub use validate::FormatValidator;

static DEFAULT_SANITIZER: LazyLock<Sanitizer> = LazyLock::new(Sanitizer::new);

/// Shared sanitizer with the default configuration.
pub fn default_sanitizer() -> &'static Sanitizer {
    &DEFAULT_SANITIZER
}

/// [`Sanitizer::sanitize_object`] with the default configuration.
pub fn sanitize_object(value: &Value) -> Value {
    default_sanitizer().sanitize_object(value)
}

/// [`Sanitizer::sanitize_mongo_query`] with the default configuration.
pub fn sanitize_mongo_query(query: &Value) -> Value {
    default_sanitizer().sanitize_mongo_query(query)
}

/// [`Sanitizer::is_valid_email`] with the default configuration.
pub fn is_valid_email(input: &str) -> bool {
    default_sanitizer().is_valid_email(input)
}

/// [`Sanitizer::is_valid_phone`] with the default configuration.
pub fn is_valid_phone(input: &str) -> bool {
    default_sanitizer().is_valid_phone(input)
}

/// [`Sanitizer::has_sql_injection`] with the default configuration.
pub fn has_sql_injection(input: &str) -> bool {
    default_sanitizer().has_sql_injection(input)
}
