//! Tokenizer for condition expressions
//!
//! Only the characters the condition grammar can use are recognised;
//! everything else is a `LexError`.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::LexError;

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// Raw number text, e.g. `10` or `0.5`
    Number(String),
    /// String contents without the surrounding quotes, escapes kept as written
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    /// ===
    StrictEq,
    /// !==
    StrictNotEq,
    /// ==
    Eq,
    /// !=
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    /// &&
    And,
    /// ||
    Or,
    /// !
    Not,
    /// unary -
    Minus,
}

/// A token and the byte offset where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "{}", name),
            TokenKind::Number(text) => write!(f, "{}", text),
            TokenKind::Str(text) => write!(f, "'{}'", text),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::StrictEq => write!(f, "==="),
            TokenKind::StrictNotEq => write!(f, "!=="),
            TokenKind::Eq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Lte => write!(f, "<="),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::Gte => write!(f, ">="),
            TokenKind::And => write!(f, "&&"),
            TokenKind::Or => write!(f, "||"),
            TokenKind::Not => write!(f, "!"),
            TokenKind::Minus => write!(f, "-"),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Split an expression into tokens
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer {
        input,
        chars: input.char_indices().peekable(),
    };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let Some((pos, c)) = self.chars.next() else {
            return Ok(None);
        };

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '.' => TokenKind::Dot,
            '-' => TokenKind::Minus,
            '\'' | '"' => self.string(pos, c)?,
            '=' => {
                if !self.eat('=') {
                    return Err(LexError::UnexpectedChar { ch: c, pos });
                }
                if self.eat('=') {
                    TokenKind::StrictEq
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::StrictNotEq
                    } else {
                        TokenKind::NotEq
                    }
                } else {
                    TokenKind::Not
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::Lte
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::Gte
                } else {
                    TokenKind::Gt
                }
            }
            '&' if self.eat('&') => TokenKind::And,
            '|' if self.eat('|') => TokenKind::Or,
            c if c.is_ascii_digit() => self.number(pos)?,
            c if is_ident_start(c) => {
                let end = self.consume_while(is_ident_char);
                TokenKind::Ident(self.input[pos..end].to_string())
            }
            _ => return Err(LexError::UnexpectedChar { ch: c, pos }),
        };

        Ok(Some(Token { kind, pos }))
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if(|(_, c)| *c == expected).is_some()
    }

    /// Advance while `pred` holds; returns the byte offset just past the run
    fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        while self.chars.next_if(|(_, c)| pred(*c)).is_some() {}
        self.offset()
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(i, _)| *i)
            .unwrap_or(self.input.len())
    }

    fn number(&mut self, start: usize) -> Result<TokenKind, LexError> {
        let mut end = self.consume_while(|c| c.is_ascii_digit());

        // Fraction only when a digit follows the dot; `1.x` stays Number, Dot, Ident
        if self.input[end..].starts_with('.')
            && self.input[end + 1..].starts_with(|c: char| c.is_ascii_digit())
        {
            self.chars.next();
            end = self.consume_while(|c| c.is_ascii_digit());
        }

        if self.chars.peek().is_some_and(|(_, c)| is_ident_char(*c)) {
            let end = self.consume_while(is_ident_char);
            return Err(LexError::InvalidNumber {
                text: self.input[start..end].to_string(),
                pos: start,
            });
        }

        Ok(TokenKind::Number(self.input[start..end].to_string()))
    }

    fn string(&mut self, start: usize, quote: char) -> Result<TokenKind, LexError> {
        let body_start = start + quote.len_utf8();
        loop {
            match self.chars.next() {
                Some((i, c)) if c == quote => {
                    return Ok(TokenKind::Str(self.input[body_start..i].to_string()));
                }
                Some((_, '\\')) => {
                    if self.chars.next().is_none() {
                        break;
                    }
                }
                Some((_, '\n')) | Some((_, '\r')) | None => break,
                Some(_) => {}
            }
        }
        Err(LexError::UnterminatedString { pos: start })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_comparison() {
        assert_eq!(
            kinds("__v0 === 'test'"),
            vec![
                TokenKind::Ident("__v0".to_string()),
                TokenKind::StrictEq,
                TokenKind::Str("test".to_string()),
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("== != !== < <= > >= && || ! -"),
            vec![
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::StrictNotEq,
                TokenKind::Lt,
                TokenKind::Lte,
                TokenKind::Gt,
                TokenKind::Gte,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Minus,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("10 0.5"),
            vec![
                TokenKind::Number("10".to_string()),
                TokenKind::Number("0.5".to_string()),
            ]
        );
        assert_eq!(
            kinds("1.x"),
            vec![
                TokenKind::Number("1".to_string()),
                TokenKind::Dot,
                TokenKind::Ident("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_number() {
        assert_eq!(
            tokenize("0x1f"),
            Err(LexError::InvalidNumber {
                text: "0x1f".to_string(),
                pos: 0
            })
        );
    }

    #[test]
    fn test_string_escapes_and_quotes() {
        assert_eq!(
            kinds(r#""it's" 'a\'b'"#),
            vec![
                TokenKind::Str("it's".to_string()),
                TokenKind::Str(r"a\'b".to_string()),
            ]
        );
    }

    #[test]
    fn test_string_hides_syntax() {
        assert_eq!(
            kinds("'myVar[0].map()'"),
            vec![TokenKind::Str("myVar[0].map()".to_string())]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            tokenize("__v0 === 'abc"),
            Err(LexError::UnterminatedString { pos: 9 })
        );
        assert!(tokenize(r"'abc\").is_err());
    }

    #[test]
    fn test_unexpected_characters() {
        assert_eq!(
            tokenize("__v0 + 1"),
            Err(LexError::UnexpectedChar { ch: '+', pos: 5 })
        );
        assert!(tokenize("__v0 & 1").is_err());
        assert!(tokenize("__v0 = 1").is_err());
        assert!(tokenize("__v0 ? 1 : 2").is_err());
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("__v0.trim()").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.pos).collect();
        assert_eq!(positions, vec![0, 4, 5, 9, 10]);
    }
}
