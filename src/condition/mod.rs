// SPDX-License-Identifier: MIT

//! Condition expression validation for workflow branch nodes
//!
//! Conditions are short boolean expressions over workflow variables such as:
//! - `__v0 === 'paid'`
//! - `__v1 > 3 && __v0.toLowerCase().includes('yes')`
//! - `__v2['status'] !== null`
//!
//! `pre_validate_condition_expression` is a fast advisory check on raw text.
//! `validate_condition_expression` is the gate every expression must pass
//! before it is stored or evaluated.

mod ast;
mod checks;
mod lexer;
mod parser;
mod precheck;
mod result;
pub mod rules;
mod validator;

pub use ast::{CompareOp, Expression, IndexKey, Literal};
pub use lexer::{tokenize, Token, TokenKind};
pub use precheck::{pre_validate_condition_expression, pre_validate_text};
pub use result::ValidationResult;
pub use validator::{validate_condition_expression, ConditionValidator, DEFAULT_MAX_LENGTH};
