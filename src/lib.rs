// SPDX-License-Identifier: MIT

//! Validation gate for user-authored workflow branch conditions

pub mod condition;
pub mod error;
pub mod sanitize;

pub use condition::{
    pre_validate_condition_expression, pre_validate_text, validate_condition_expression,
    ConditionValidator, ValidationResult,
};
pub use error::ConditionError;
pub use sanitize::sanitize_for_display;
