// SPDX-License-Identifier: MIT

//! Typed error handling for condition-gate
//!
//! Validation failures reach callers as `ValidationResult::Invalid`; the
//! types here cover the internal stages (lexing, parsing) and the
//! `Result`-flavoured API on `ConditionValidator`.

use thiserror::Error;

/// Top-level error type for condition-gate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    /// The expression could not be tokenized
    #[error("Invalid syntax: {0}")]
    Lex(#[from] LexError),

    /// The token stream does not form an allowed expression
    #[error("Invalid syntax: {0}")]
    Parse(#[from] ParseError),

    /// One of the validation checks rejected the expression
    #[error("{reason}")]
    Rejected { reason: String },
}

/// Tokenizer errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// Character outside the condition alphabet
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    /// String literal without a closing quote
    #[error("unterminated string literal starting at position {pos}")]
    UnterminatedString { pos: usize },

    /// Number immediately followed by identifier characters (e.g. `0x1f`, `1e5`)
    #[error("invalid number literal '{text}' at position {pos}")]
    InvalidNumber { text: String, pos: usize },
}

/// Parser errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A token that cannot appear at this point
    #[error("unexpected token '{found}' at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    /// Input ended while an operand or closing symbol was expected
    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: String },

    /// Grouping, operator chains or member chains nest past the limit
    #[error("expression is nested too deeply (limit {limit})")]
    TooDeep { limit: usize },
}

impl ConditionError {
    /// Create a rejection error
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}
