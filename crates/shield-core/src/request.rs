//! The request sanitization middleware.
//!
//! This module is the only place the sanitizer meets the web framework. A
//! framework adapter converts its request into [`RequestParts`], calls
//! [`RequestSanitizer::handle`], and continues with the sanitized parts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shield_sanitizer::{DroppedOperator, Sanitizer};
use tracing::{debug, warn};

use crate::{
    config::{MiddlewareConfig, ShieldConfig},
    verdict::{BlockReason, ReviewFlag, Verdict},
    Result,
};

/// The request fields the sanitizer rewrites.
///
/// Each field is optional; absent fields are left absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestParts {
    /// Parsed request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// Parsed query string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,

    /// Path parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RequestParts {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the query.
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Set the path parameters.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Present fields with their names.
    fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        [
            ("body", self.body.as_ref()),
            ("query", self.query.as_ref()),
            ("params", self.params.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// A sanitized request plus the operators removed on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizedRequest {
    /// The rewritten request.
    pub request: RequestParts,

    /// Operators removed by the query filter; paths start with the field name.
    pub dropped: Vec<DroppedOperator>,
}

/// Framework-agnostic request sanitization middleware.
///
/// Cheap to clone; clones share the underlying [`Sanitizer`].
#[derive(Debug, Clone)]
pub struct RequestSanitizer {
    sanitizer: Arc<Sanitizer>,
    config: MiddlewareConfig,
}

impl RequestSanitizer {
    /// Build the middleware from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the sanitizer configuration is invalid.
    pub fn new(config: ShieldConfig) -> Result<Self> {
        let sanitizer = Sanitizer::with_config(config.sanitizer)?;
        Ok(Self::with_sanitizer(Arc::new(sanitizer), config.middleware))
    }

    /// Build the middleware around an existing sanitizer.
    pub fn with_sanitizer(sanitizer: Arc<Sanitizer>, config: MiddlewareConfig) -> Self {
        Self { sanitizer, config }
    }

    /// The underlying sanitizer.
    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    /// The middleware switches.
    pub fn config(&self) -> &MiddlewareConfig {
        &self.config
    }

    /// Sanitize every present field of a request.
    ///
    /// Every present field goes through the structural sanitizer. With
    /// `filter_query_operators` on, the sanitized `body` and `query` then go
    /// through the query filter; escaping leaves `$` alone, so filtering the
    /// escaped keys sees exactly the keys the handler will get.
    pub fn sanitize(&self, request: RequestParts) -> SanitizedRequest {
        let mut dropped = Vec::new();

        let body = request
            .body
            .map(|v| self.sanitize_field("body", v, true, &mut dropped));
        let query = request
            .query
            .map(|v| self.sanitize_field("query", v, true, &mut dropped));
        let params = request
            .params
            .map(|v| self.sanitize_field("params", v, false, &mut dropped));

        debug!(dropped = dropped.len(), "Request sanitized");

        SanitizedRequest {
            request: RequestParts { body, query, params },
            dropped,
        }
    }

    /// Sanitize a request, then hand it to the next stage of the pipeline.
    pub fn handle<F, R>(&self, request: RequestParts, next: F) -> R
    where
        F: FnOnce(RequestParts) -> R,
    {
        next(self.sanitize(request).request)
    }

    /// Screen a raw (unsanitized) request for suspicious input.
    ///
    /// Never modifies the request. SQL heuristic hits produce a Review, or a
    /// Block when `block_sql_patterns` is set. With `filter_query_operators`
    /// on, operators the query filter would drop also produce a Review.
    pub fn screen(&self, request: &RequestParts) -> Verdict {
        let mut flags = Vec::new();

        for (name, value) in request.fields() {
            self.collect_sql_hits(value, name, 0, &mut flags);

            if self.config.filter_query_operators && name != "params" {
                let outcome = self.sanitizer.filter_query(value);
                flags.extend(outcome.dropped.into_iter().map(|d| ReviewFlag::OperatorDropped {
                    location: format!("{}.{}", name, d.path),
                    operator: d.operator,
                }));
            }
        }

        if self.config.block_sql_patterns {
            let first_hit = flags.iter().find_map(|flag| match flag {
                ReviewFlag::SqlPattern {
                    location,
                    description,
                } => Some(BlockReason::SqlInjection {
                    location: location.clone(),
                    description: description.clone(),
                }),
                ReviewFlag::OperatorDropped { .. } => None,
            });
            if let Some(reason) = first_hit {
                return Verdict::Block { reason };
            }
        }

        Verdict::from_flags(flags)
    }

    fn sanitize_field(
        &self,
        name: &str,
        value: Value,
        filter: bool,
        dropped: &mut Vec<DroppedOperator>,
    ) -> Value {
        let value = self.sanitizer.sanitize_object(&value);

        if !(filter && self.config.filter_query_operators) {
            return value;
        }

        let outcome = self.sanitizer.filter_query(&value);
        dropped.extend(outcome.dropped.into_iter().map(|d| DroppedOperator {
            path: format!("{}.{}", name, d.path),
            operator: d.operator,
        }));
        outcome.sanitized
    }

    fn collect_sql_hits(&self, value: &Value, path: &str, depth: usize, flags: &mut Vec<ReviewFlag>) {
        if depth > self.sanitizer.config().max_depth {
            return;
        }

        match value {
            Value::String(s) => {
                if let Some(description) = self.sanitizer.detect_sql_injection(s) {
                    warn!(location = %path, pattern = %description, "SQL pattern in request");
                    flags.push(ReviewFlag::SqlPattern {
                        location: path.to_string(),
                        description: description.to_string(),
                    });
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.collect_sql_hits(item, &format!("{}.{}", path, index), depth + 1, flags);
                }
            }
            Value::Object(map) => {
                for (key, item) in map {
                    self.collect_sql_hits(item, &format!("{}.{}", path, key), depth + 1, flags);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }
}

impl Default for RequestSanitizer {
    fn default() -> Self {
        Self::with_sanitizer(Arc::new(Sanitizer::new()), MiddlewareConfig::default())
    }
}
