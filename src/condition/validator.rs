// SPDX-License-Identifier: MIT

//! Authoritative condition validator
//!
//! Runs on the expression after binding substitution has replaced author
//! tokens with workflow variables. Checks run in a fixed order and the first
//! failure wins:
//!
//! 1. emptiness, then length
//! 2. denylist scan
//! 3. parenthesis balance
//! 4. bracket notation
//! 5. method whitelist
//! 6. identifier resolution
//! 7. grammar
//!
//! Steps 4 to 6 work on tokens, so the text is tokenized after step 3. A
//! character outside the grammar (`+`, `*`, `?`) is therefore reported as
//! "Invalid syntax" before any bracket, method or identifier problem.
//!
//! Arrow functions such as `.map(x => x)` are rejected in step 2 because `=>`
//! contains a bare `=`, so they report "disallowed syntax" rather than a
//! method error.

use std::collections::HashSet;

use super::ast::Expression;
use super::checks;
use super::lexer::tokenize;
use super::parser::parse_tokens_with;
use super::result::ValidationResult;
use super::rules;
use crate::error::ConditionError;

/// Default upper bound on expression length, in characters
pub const DEFAULT_MAX_LENGTH: usize = 4096;

/// Validates substituted condition expressions
#[derive(Debug, Clone)]
pub struct ConditionValidator {
    max_length: usize,
    extra_methods: HashSet<String>,
}

impl Default for ConditionValidator {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            extra_methods: HashSet::new(),
        }
    }
}

impl ConditionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum expression length in characters
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Allow an additional read-only method on top of the built-in whitelist
    pub fn allow_method(mut self, name: impl Into<String>) -> Self {
        self.extra_methods.insert(name.into());
        self
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    fn is_method_allowed(&self, name: &str) -> bool {
        rules::is_whitelisted_method(name) || self.extra_methods.contains(name)
    }

    /// Validate an expression, reporting the first failing check
    pub fn validate(&self, expression: &str) -> ValidationResult {
        match self.parse(expression) {
            Ok(_) => {
                log::trace!("Condition accepted");
                ValidationResult::Valid
            }
            Err(e) => {
                log::debug!("Condition rejected: {}", e);
                e.into()
            }
        }
    }

    /// Validate an expression and return its AST
    pub fn parse(&self, expression: &str) -> Result<Expression, ConditionError> {
        let expression = expression.trim();

        if expression.is_empty() {
            return Err(ConditionError::rejected(
                "Condition expression cannot be empty",
            ));
        }
        if expression.chars().count() > self.max_length {
            return Err(ConditionError::rejected(format!(
                "Condition expression is too long (max {} characters)",
                self.max_length
            )));
        }

        if let Some(rule) = rules::first_denylist_match(expression) {
            return Err(ConditionError::rejected(rule.message()));
        }

        checks::check_parentheses(expression)?;

        let tokens = tokenize(expression)?;
        let allow = |name: &str| self.is_method_allowed(name);

        checks::check_brackets(&tokens)?;
        checks::check_method_calls(&tokens, &allow)?;
        checks::check_identifiers(&tokens)?;

        Ok(parse_tokens_with(&tokens, &allow)?)
    }
}

/// Authoritative validation with the default configuration
pub fn validate_condition_expression(expression: &str) -> ValidationResult {
    ConditionValidator::default().validate(expression)
}
