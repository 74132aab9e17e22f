//! Error types for colour rule validation.

use thiserror::Error;

/// Errors returned while validating colour rules for storage or display.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ColorRuleError {
    /// The rule identifier is empty after trimming.
    #[error("colour rule id must not be empty")]
    EmptyId,

    /// The rule pattern is not a valid regular expression.
    #[error("colour rule '{id}' has an invalid regular expression: {reason}")]
    InvalidRegex {
        /// Identifier of the offending rule.
        id: String,
        /// Compiler diagnostic for the pattern.
        reason: String,
    },

    /// The display colour is empty.
    #[error("colour rule '{0}' has no display colour")]
    EmptyColor(String),

    /// The opacity lies outside `0.0..=1.0`.
    #[error("colour rule '{id}' opacity {opacity} is outside 0.0..=1.0")]
    OpacityOutOfRange {
        /// Identifier of the offending rule.
        id: String,
        /// Rejected opacity value.
        opacity: f32,
    },

    /// Two rules share one identifier.
    #[error("duplicate colour rule id: {0}")]
    DuplicateId(String),
}
