//! # Shield Integration Tests
//!
//! End-to-end tests of config loading and the request middleware.
//!
//! ## Coverage
//!
//! | Area | Test |
//! |------|------|
//! | Config file loading | `test_config_from_file` |
//! | Missing file | `test_missing_config_file` |
//! | Registration form | `test_registration_request` |
//! | Vacation request search | `test_vacation_search_query` |
//! | Deployment overrides | `test_custom_rules_from_file` |

use std::io::Write;

use serde_json::json;
use shield_core::{
    BlockReason, RequestParts, RequestSanitizer, ReviewFlag, ShieldConfig, ShieldError, Verdict,
};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[test]
fn test_config_from_file() {
    let file = write_config(
        r#"
        [middleware]
        block_sql_patterns = true
        "#,
    );

    let config = ShieldConfig::from_file(file.path()).unwrap();
    assert!(config.middleware.block_sql_patterns);
    assert!(!config.middleware.filter_query_operators);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ShieldConfig::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ShieldError::Io { .. })));
}

#[test]
fn test_bad_pattern_in_file_fails_construction() {
    let file = write_config(
        r#"
        [[sanitizer.sql_patterns]]
        pattern = "(unclosed"
        description = "broken"
        "#,
    );

    let config = ShieldConfig::from_file(file.path()).unwrap();
    let result = RequestSanitizer::new(config);
    assert!(matches!(result, Err(ShieldError::Sanitizer(_))));
}

#[test]
fn test_custom_rules_from_file() {
    let file = write_config(
        r#"
        [middleware]
        filter_query_operators = true

        [sanitizer]
        allowed_operators = ["$eq", "$in", "$regex"]
        dangerous_keys = ["__proto__", "constructor", "prototype", "role"]
        "#,
    );

    let shield = RequestSanitizer::new(ShieldConfig::from_file(file.path()).unwrap()).unwrap();
    let request = RequestParts::new()
        .with_body(json!({"name": "Ann", "role": "admin"}))
        .with_query(json!({"name": {"$regex": "^A"}, "age": {"$gt": 30}}));

    let result = shield.sanitize(request);
    assert_eq!(result.request.body, Some(json!({"name": "Ann"})));
    assert_eq!(result.request.query, Some(json!({"name": {"$regex": "^A"}, "age": {}})));
    assert_eq!(result.dropped[0].path, "query.age.$gt");
}

// =============================================================================
// MIDDLEWARE SCENARIOS
// =============================================================================

#[test]
fn test_registration_request() {
    let shield = RequestSanitizer::new(ShieldConfig::default()).unwrap();
    let request = RequestParts::new().with_body(json!({
        "email": "nurse@hospital.org",
        "phone": "+1 (555) 123-4567",
        "name": "<script>steal()</script>",
        "__proto__": {"isAdmin": true}
    }));

    assert_eq!(shield.screen(&request), Verdict::Allow);

    let body = shield.handle(request, |parts| parts.body).unwrap();
    assert_eq!(body["email"], "nurse@hospital.org");
    assert_eq!(body["name"], "&lt;script&gt;steal()&lt;&#x2F;script&gt;");
    assert!(body.get("__proto__").is_none());
    assert!(shield.sanitizer().is_valid_email("nurse@hospital.org"));
    assert!(shield.sanitizer().is_valid_phone("+1 (555) 123-4567"));
}

#[test]
fn test_vacation_search_query() {
    let mut config = ShieldConfig::default();
    config.middleware.filter_query_operators = true;
    let shield = RequestSanitizer::new(config).unwrap();
    let request = RequestParts::new()
        .with_query(json!({
            "employee": "e-17",
            "days": {"$gte": 3, "$lte": 10},
            "$where": "this.days > 0"
        }))
        .with_params(json!({"ward": "icu-2"}));

    let verdict = shield.screen(&request);
    assert_eq!(
        verdict,
        Verdict::Review {
            flags: vec![ReviewFlag::OperatorDropped {
                location: "query.$where".to_string(),
                operator: "$where".to_string(),
            }]
        }
    );

    let sanitized = shield.sanitize(request);
    assert_eq!(
        sanitized.request.query,
        Some(json!({"employee": "e-17", "days": {"$gte": 3, "$lte": 10}}))
    );
    assert_eq!(sanitized.request.params, Some(json!({"ward": "icu-2"})));
}

#[test]
fn test_blocking_deployment() {
    let mut config = ShieldConfig::default();
    config.middleware.block_sql_patterns = true;
    let shield = RequestSanitizer::new(config).unwrap();

    let request = RequestParts::new().with_body(json!({"search": ["ok", "x' UNION SELECT pw FROM users"]}));
    match shield.screen(&request) {
        Verdict::Block {
            reason: BlockReason::SqlInjection { location, description },
        } => {
            assert_eq!(location, "body.search.1");
            assert_eq!(description, "UNION SELECT");
        }
        other => panic!("expected block, got {:?}", other),
    }
}

#[test]
fn test_shared_middleware_across_threads() {
    let shield = RequestSanitizer::new(ShieldConfig::default()).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let shield = shield.clone();
            std::thread::spawn(move || {
                shield.handle(RequestParts::new().with_params(json!({"id": format!("<{}>", i)})), |p| p.params)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let params = handle.join().unwrap().unwrap();
        assert_eq!(params["id"], format!("&lt;{}&gt;", i));
    }
}
