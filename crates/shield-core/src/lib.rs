//! # Shield Core
//!
//! Request sanitization middleware for the ICU management backend.
//! Wraps the [`shield_sanitizer`] routines in a framework-agnostic adapter
//! that rewrites a request's body, query and path parameters before any
//! handler runs.
//!
//! ## Threat Coverage
//!
//! | Field | Query filter | Structural sanitizer | Screening |
//! |-------|--------------|----------------------|-----------|
//! | `body` | opt-in | yes | SQL heuristics, dropped operators when filtering |
//! | `query` | opt-in | yes | SQL heuristics, dropped operators when filtering |
//! | `params` | no | yes | SQL heuristics |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        SHIELD CORE                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ShieldConfig (TOML) ──► RequestSanitizer                      │
//! │                              │                                  │
//! │            ┌─────────────────┼──────────────────┐               │
//! │            ▼                 ▼                  ▼               │
//! │     ┌────────────┐   ┌──────────────┐   ┌─────────────┐         │
//! │     │   screen   │   │   sanitize   │   │   handle    │         │
//! │     │  Verdict   │   │ Sanitized-   │   │ sanitize +  │         │
//! │     │            │   │   Request    │   │ next(parts) │         │
//! │     └────────────┘   └──────────────┘   └─────────────┘         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use shield_core::{RequestParts, RequestSanitizer, ShieldConfig};
//!
//! let mut config = ShieldConfig::default();
//! config.middleware.filter_query_operators = true;
//! let shield = RequestSanitizer::new(config)?;
//!
//! let request = RequestParts::new()
//!     .with_body(json!({"name": "<b>Ann</b>"}))
//!     .with_query(json!({"ward": {"$where": "sleep(100)"}}));
//!
//! let verdict = shield.screen(&request);
//! assert_eq!(verdict.flags().len(), 1);
//!
//! let sanitized = shield.handle(request, |parts| parts);
//! assert_eq!(sanitized.body, Some(json!({"name": "&lt;b&gt;Ann&lt;&#x2F;b&gt;"})));
//! assert_eq!(sanitized.query, Some(json!({"ward": {}})));
//! # Ok::<(), shield_core::ShieldError>(())
//! ```
//!
//! ## Security Notes
//!
//! - Sanitization is total: every request comes out the other side
//! - Screening looks at the raw request, before escaping
//! - Screening only blocks when `block_sql_patterns` is enabled
//! - Operator filtering runs after escaping, on the keys handlers will see

mod config;
mod error;
mod request;
mod verdict;

pub use config::{MiddlewareConfig, ShieldConfig};
pub use error::ShieldError;
pub use request::{RequestParts, RequestSanitizer, SanitizedRequest};
pub use verdict::{BlockReason, ReviewFlag, Verdict};

// Re-export sanitizer types for convenience
pub use shield_sanitizer::{DroppedOperator, QueryOutcome, Sanitizer, SanitizerConfig};

/// Core result type for shield operations.
pub type Result<T> = std::result::Result<T, ShieldError>;

#[cfg(test)]
mod tests;
