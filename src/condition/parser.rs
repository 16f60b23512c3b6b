//! Restricted recursive-descent parser for condition expressions
//!
//! Accepts only:
//! - literals: `'text'`, `"text"`, `10`, `0.5`, `true`, `false`, `null`, `undefined`
//! - workflow variables: `__v0`, optionally indexed as `__v0[1]` or `__v0['key']`
//! - member access `.name` and whitelisted method calls `.name(arg?)`
//! - `!` and unary `-`
//! - `===`, `!==`, `==`, `!=`, `<`, `<=`, `>`, `>=`, `&&`, `||`
//! - parenthesised grouping
//!
//! Anything else fails to parse. Nesting is capped at `MAX_DEPTH` so neither
//! parsing nor dropping the AST can exhaust the stack.

use super::ast::{CompareOp, Expression, IndexKey, Literal};
use super::lexer::{Token, TokenKind};
use super::rules;
use crate::error::ParseError;

/// Deepest AST the parser will build
///
/// Counts grouping, unary operators, chained operators and member/method chains.
pub const MAX_DEPTH: usize = 100;

/// Parse a token stream, using `allow_method` to decide which method calls are permitted
pub fn parse_tokens_with(
    tokens: &[Token],
    allow_method: &dyn Fn(&str) -> bool,
) -> Result<Expression, ParseError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        allow_method,
    };
    let expr = parser.or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(unexpected(token)),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    allow_method: &'a dyn Fn(&str) -> bool,
}

fn unexpected(token: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        found: token.kind.to_string(),
        pos: token.pos,
    }
}

fn end(expected: &str) -> ParseError {
    ParseError::UnexpectedEnd {
        expected: expected.to_string(),
    }
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&'a TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<(), ParseError> {
        match self.advance() {
            Some(token) if token.kind == kind => Ok(()),
            Some(token) => Err(unexpected(token)),
            None => Err(end(expected)),
        }
    }

    /// One more level of nesting; fails past `MAX_DEPTH`
    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    /// Restore the depth saved on entry and hand back the finished node
    fn ascend(&mut self, base: usize, expr: Expression) -> Result<Expression, ParseError> {
        self.depth = base;
        Ok(expr)
    }

    fn or(&mut self) -> Result<Expression, ParseError> {
        let base = self.depth;
        let mut left = self.and()?;
        while self.peek_kind() == Some(&TokenKind::Or) {
            self.pos += 1;
            self.descend()?;
            let right = self.and()?;
            left = Expression::Or(Box::new(left), Box::new(right));
        }
        self.ascend(base, left)
    }

    fn and(&mut self) -> Result<Expression, ParseError> {
        let base = self.depth;
        let mut left = self.equality()?;
        while self.peek_kind() == Some(&TokenKind::And) {
            self.pos += 1;
            self.descend()?;
            let right = self.equality()?;
            left = Expression::And(Box::new(left), Box::new(right));
        }
        self.ascend(base, left)
    }

    fn equality(&mut self) -> Result<Expression, ParseError> {
        let base = self.depth;
        let mut left = self.relational()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::StrictEq) => CompareOp::StrictEq,
                Some(TokenKind::StrictNotEq) => CompareOp::StrictNotEq,
                Some(TokenKind::Eq) => CompareOp::Eq,
                Some(TokenKind::NotEq) => CompareOp::NotEq,
                _ => return self.ascend(base, left),
            };
            self.pos += 1;
            self.descend()?;
            let right = self.relational()?;
            left = Expression::Compare {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn relational(&mut self) -> Result<Expression, ParseError> {
        let base = self.depth;
        let mut left = self.unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Lt) => CompareOp::Lt,
                Some(TokenKind::Lte) => CompareOp::Lte,
                Some(TokenKind::Gt) => CompareOp::Gt,
                Some(TokenKind::Gte) => CompareOp::Gte,
                _ => return self.ascend(base, left),
            };
            self.pos += 1;
            self.descend()?;
            let right = self.unary()?;
            left = Expression::Compare {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn unary(&mut self) -> Result<Expression, ParseError> {
        let base = self.depth;
        let expr = match self.peek_kind() {
            Some(TokenKind::Not) => {
                self.pos += 1;
                self.descend()?;
                Expression::Not(Box::new(self.unary()?))
            }
            Some(TokenKind::Minus) => {
                self.pos += 1;
                self.descend()?;
                Expression::Negate(Box::new(self.unary()?))
            }
            _ => self.postfix()?,
        };
        self.ascend(base, expr)
    }

    fn postfix(&mut self) -> Result<Expression, ParseError> {
        let base = self.depth;
        let mut expr = self.primary()?;

        // Numbers take no members: `1.toFixed()` is not valid in the evaluator either
        if matches!(expr, Expression::Literal(Literal::Number(_))) {
            return self.ascend(base, expr);
        }

        while self.peek_kind() == Some(&TokenKind::Dot) {
            self.pos += 1;
            self.descend()?;
            let name = match self.advance() {
                Some(Token {
                    kind: TokenKind::Ident(name),
                    ..
                }) => name,
                Some(token) => return Err(unexpected(token)),
                None => return Err(end("a property name")),
            };

            if self.peek_kind() != Some(&TokenKind::LParen) {
                expr = Expression::Member {
                    object: Box::new(expr),
                    property: name.clone(),
                };
                continue;
            }

            if !(self.allow_method)(name.as_str()) {
                return Err(unexpected(&self.tokens[self.pos - 1]));
            }
            self.pos += 1;

            let mut args = Vec::new();
            if self.peek_kind() != Some(&TokenKind::RParen) {
                args.push(self.or()?);
            }
            self.expect(TokenKind::RParen, "')'")?;

            expr = Expression::MethodCall {
                receiver: Box::new(expr),
                method: name.clone(),
                args,
            };
        }

        self.ascend(base, expr)
    }

    fn primary(&mut self) -> Result<Expression, ParseError> {
        let token = self.advance().ok_or_else(|| end("an operand"))?;
        match &token.kind {
            TokenKind::Number(text) => text
                .parse::<f64>()
                .map(|n| Expression::Literal(Literal::Number(n)))
                .map_err(|_| unexpected(token)),
            TokenKind::Str(text) => Ok(Expression::Literal(Literal::String(text.clone()))),
            TokenKind::Ident(name) => match name.as_str() {
                "true" => Ok(Expression::Literal(Literal::Boolean(true))),
                "false" => Ok(Expression::Literal(Literal::Boolean(false))),
                "null" => Ok(Expression::Literal(Literal::Null)),
                "undefined" => Ok(Expression::Literal(Literal::Undefined)),
                _ if rules::is_workflow_variable(name) => self.variable(name),
                _ => Err(unexpected(token)),
            },
            TokenKind::LParen => {
                let base = self.depth;
                self.descend()?;
                let inner = self.or()?;
                self.expect(TokenKind::RParen, "')'")?;
                self.ascend(base, inner)
            }
            _ => Err(unexpected(token)),
        }
    }

    fn variable(&mut self, name: &str) -> Result<Expression, ParseError> {
        if self.peek_kind() != Some(&TokenKind::LBracket) {
            return Ok(Expression::Variable(name.to_string()));
        }
        self.pos += 1;

        let token = self.advance().ok_or_else(|| end("an index"))?;
        let key = match &token.kind {
            TokenKind::Number(text) if rules::is_bracket_index(text) => text
                .parse::<u32>()
                .map(IndexKey::Position)
                .map_err(|_| unexpected(token))?,
            TokenKind::Str(text) if rules::is_bracket_key(text) => IndexKey::Key(text.clone()),
            _ => return Err(unexpected(token)),
        };
        self.expect(TokenKind::RBracket, "']'")?;

        Ok(Expression::Index {
            variable: name.to_string(),
            key,
        })
    }
}
