// SPDX-License-Identifier: MIT

//! Advisory pre-check on raw condition text
//!
//! Runs on every edit, before binding substitution, to flag obviously unsafe
//! keywords early. It is not a security boundary: expressions must still pass
//! `validate_condition_expression` before they are stored or evaluated.

use serde_json::Value;

use super::result::ValidationResult;
use super::rules;

const NOT_A_STRING: &str = "Condition must be a non-empty string";

/// Pre-check an arbitrary input value
///
/// Anything other than a non-empty JSON string is rejected without looking at
/// its contents.
pub fn pre_validate_condition_expression(raw: &Value) -> ValidationResult {
    match raw {
        Value::String(text) => pre_validate_text(text),
        _ => ValidationResult::invalid(NOT_A_STRING),
    }
}

/// Pre-check raw condition text
pub fn pre_validate_text(raw: &str) -> ValidationResult {
    if raw.is_empty() {
        return ValidationResult::invalid(NOT_A_STRING);
    }

    match rules::find_precheck_keyword(raw) {
        Some(keyword) => {
            log::debug!("Pre-check flagged keyword \"{}\"", keyword);
            ValidationResult::invalid(format!(
                "Condition contains disallowed keyword \"{}\"",
                keyword
            ))
        }
        None => ValidationResult::Valid,
    }
}
