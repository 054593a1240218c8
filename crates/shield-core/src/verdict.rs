//! Verdict types for request screening results.

use serde::{Deserialize, Serialize};

/// The outcome of screening a raw request.
///
/// - `Allow`: nothing suspicious was found
/// - `Block`: a configured hard rule matched; the caller should reject
/// - `Review`: suspicious input was found; log it and continue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Request passed every check.
    Allow,

    /// Request should be rejected.
    Block {
        /// The reason for blocking.
        reason: BlockReason,
    },

    /// Request is suspicious but may proceed.
    Review {
        /// Flags indicating why review is needed.
        flags: Vec<ReviewFlag>,
    },
}

impl Verdict {
    /// Fold screening findings into a verdict: none is Allow, any is Review.
    pub fn from_flags(flags: Vec<ReviewFlag>) -> Self {
        if flags.is_empty() {
            Self::Allow
        } else {
            Self::Review { flags }
        }
    }

    /// Whether the host framework should answer with an error instead of
    /// calling the handler.
    pub fn should_reject(&self) -> bool {
        matches!(self, Self::Block { .. })
    }

    /// The rule that blocked the request, if any.
    pub fn block_reason(&self) -> Option<&BlockReason> {
        match self {
            Self::Block { reason } => Some(reason),
            Self::Allow | Self::Review { .. } => None,
        }
    }

    /// Review flags; empty for Allow and Block.
    pub fn flags(&self) -> &[ReviewFlag] {
        match self {
            Self::Review { flags } => flags,
            Self::Allow | Self::Block { .. } => &[],
        }
    }
}

/// Reasons for blocking a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    /// A SQL-injection heuristic matched and blocking is enabled.
    SqlInjection {
        /// Location of the string, e.g. `body.user.name`.
        location: String,
        /// Description of the matching heuristic.
        description: String,
    },
}

/// Flags explaining a Review verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewFlag {
    /// A SQL-injection heuristic matched a string value.
    SqlPattern {
        /// Location of the string.
        location: String,
        /// Description of the matching heuristic.
        description: String,
    },

    /// The query filter removed a disallowed operator.
    OperatorDropped {
        /// Location of the operator.
        location: String,
        /// The operator token.
        operator: String,
    },
}
