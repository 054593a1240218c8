//! Unit tests for shield-core.

#[test]
fn test_crate_structure() {
    // Smoke test - verifies the module structure compiles
    use crate::{BlockReason, RequestParts, RequestSanitizer, ReviewFlag, ShieldConfig, Verdict};

    let _config = ShieldConfig::default();
    let _shield = RequestSanitizer::new(ShieldConfig::default()).unwrap();
    let _parts = RequestParts::new();
    let _verdict = Verdict::from_flags(vec![]);
    let _block = BlockReason::SqlInjection {
        location: "body".to_string(),
        description: "DROP TABLE".to_string(),
    };
    let _flag = ReviewFlag::OperatorDropped {
        location: "query.$where".to_string(),
        operator: "$where".to_string(),
    };
}
