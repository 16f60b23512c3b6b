// SPDX-License-Identifier: MIT

//! Outcome of validating a condition expression

use serde::{Deserialize, Serialize};

use crate::error::ConditionError;

/// Result of a validation check
///
/// `Invalid` always carries a non-empty, human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    /// Create an invalid result
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The rejection reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(reason),
        }
    }

    /// Convert into a `Result` for callers that propagate with `?`
    pub fn into_result(self) -> Result<(), ConditionError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(reason) => Err(ConditionError::rejected(reason)),
        }
    }
}

impl From<ConditionError> for ValidationResult {
    fn from(err: ConditionError) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid(reason) => write!(f, "invalid: {}", reason),
        }
    }
}
