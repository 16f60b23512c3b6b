// SPDX-License-Identifier: MIT

//! Individual structural checks run by the authoritative validator
//!
//! Parenthesis balance is counted on the raw text. The other checks walk the
//! token stream, so string literal contents never look like code.

use super::lexer::{Token, TokenKind};
use super::rules;
use crate::error::ConditionError;

/// Open and close parentheses must occur equally often
pub fn check_parentheses(input: &str) -> Result<(), ConditionError> {
    let open = input.matches('(').count();
    let close = input.matches(')').count();
    if open != close {
        return Err(ConditionError::rejected("Unbalanced parentheses"));
    }
    Ok(())
}

fn follows_dot(tokens: &[Token], i: usize) -> bool {
    i > 0 && tokens[i - 1].kind == TokenKind::Dot
}

/// `x[...]` only on workflow variables, holding a small integer or a plain quoted key
pub fn check_brackets(tokens: &[Token]) -> Result<(), ConditionError> {
    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::LBracket {
            continue;
        }

        let base = i.checked_sub(1).map(|b| &tokens[b].kind);
        let on_variable = matches!(base, Some(TokenKind::Ident(name)) if rules::is_workflow_variable(name))
            && !follows_dot(tokens, i - 1);
        if !on_variable {
            let found = base.map(|k| k.to_string()).unwrap_or_default();
            return Err(ConditionError::rejected(format!(
                "Bracket notation is only allowed on workflow variables (found \"{}[...]\")",
                found
            )));
        }

        let content_ok = match tokens.get(i + 1).map(|t| &t.kind) {
            Some(TokenKind::Number(text)) => rules::is_bracket_index(text),
            Some(TokenKind::Str(text)) => rules::is_bracket_key(text),
            _ => false,
        };
        let closed = tokens.get(i + 2).map(|t| &t.kind) == Some(&TokenKind::RBracket);
        if !content_ok || !closed {
            return Err(ConditionError::rejected(
                "Invalid bracket notation: index must be a non-negative integer or a quoted key of letters, digits, spaces, '_' or '-'",
            ));
        }
    }
    Ok(())
}

/// Every `.name(` call site must name an allowed method
pub fn check_method_calls(
    tokens: &[Token],
    allow_method: &dyn Fn(&str) -> bool,
) -> Result<(), ConditionError> {
    for window in tokens.windows(3) {
        if let [Token {
            kind: TokenKind::Dot,
            ..
        }, Token {
            kind: TokenKind::Ident(name),
            ..
        }, Token {
            kind: TokenKind::LParen,
            ..
        }] = window
        {
            if !allow_method(name.as_str()) {
                return Err(ConditionError::rejected(format!(
                    "Method \"{}\" is not allowed",
                    name
                )));
            }
        }
    }
    Ok(())
}

/// Every bare word must be a reserved literal or a workflow variable
pub fn check_identifiers(tokens: &[Token]) -> Result<(), ConditionError> {
    for (i, token) in tokens.iter().enumerate() {
        let TokenKind::Ident(name) = &token.kind else {
            continue;
        };
        if follows_dot(tokens, i)
            || rules::is_reserved_literal(name)
            || rules::is_workflow_variable(name)
        {
            continue;
        }
        return Err(ConditionError::rejected(format!(
            "Unknown identifier \"{}\"",
            name
        )));
    }
    Ok(())
}
