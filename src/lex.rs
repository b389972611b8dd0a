use std::fmt::Display;
use std::ops::Range;

use unicode_general_category::{GeneralCategory, get_general_category};

use crate::{
    diagnostic::{Diagnostic, DiagnosticBag},
    rules,
    value::Value,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    /// Byte offset of the first character of `literal` in the input.
    pub position: usize,
    pub literal: &'de str,
    pub value: Option<Value>,
}

impl<'de> Token<'de> {
    pub fn new(kind: TokenKind, position: usize, literal: &'de str) -> Self {
        Token {
            kind,
            position,
            literal,
            value: None,
        }
    }

    /// Stand-in for a token the parser expected but did not find.
    pub fn missing(kind: TokenKind, position: usize) -> Self {
        Token::new(kind, position, "")
    }

    pub fn span(&self) -> Range<usize> {
        self.position..self.position + self.literal.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Whitespace,
    Plus,
    Minus,
    Times,
    Slash,
    Modulo,
    Exponent,
    OpenParen,
    CloseParen,
    Bang,
    And,
    Or,
    True,
    False,
    Sqr,
    Sqrt,
    Identifier,
    BadToken,
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenKind::Number => "NUMBER",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Times => "TIMES",
            TokenKind::Slash => "SLASH",
            TokenKind::Modulo => "MODULO",
            TokenKind::Exponent => "EXPONENT",
            TokenKind::OpenParen => "OPEN_PAREN",
            TokenKind::CloseParen => "CLOSE_PAREN",
            TokenKind::Bang => "BANG",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::True => "TRUE_KEYWORD",
            TokenKind::False => "FALSE_KEYWORD",
            TokenKind::Sqr => "SQR_KEYWORD",
            TokenKind::Sqrt => "SQRT_KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::BadToken => "BAD_TOKEN",
            TokenKind::Eof => "EOF",
        })
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = self.kind;
        let lit = self.literal.escape_debug();
        match &self.value {
            Some(value) => write!(f, "{kind} {lit} {value}"),
            None => write!(f, "{kind} {lit} null"),
        }
    }
}

/// Splits one line of input into tokens.
///
/// Lexing never fails: malformed input becomes a `BadToken` plus a
/// diagnostic, and scanning carries on to the end of the line.
pub struct Lexer<'de> {
    rest: &'de str,
    byte: usize,
    finished: bool,
    diagnostics: DiagnosticBag,
}

impl<'de> Lexer<'de> {
    pub fn new(input: &'de str) -> Self {
        Lexer {
            rest: input,
            byte: 0,
            finished: false,
            diagnostics: DiagnosticBag::new(),
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_vec()
    }

    /// Returns the next token; once the input is exhausted every call
    /// returns an `Eof` token.
    pub fn next_token(&mut self) -> Token<'de> {
        let Some(c) = self.rest.chars().next() else {
            return Token::new(TokenKind::Eof, self.byte, "");
        };
        let start = self.byte;
        let cur = self.rest;

        enum Start {
            Number,
            Whitespace,
            Word,
            DoubleOrBad(char, TokenKind),
        }

        let started = match c {
            '0'..='9' => Start::Number,
            c if c.is_whitespace() => Start::Whitespace,
            c if is_letter(c) => Start::Word,
            '+' => return self.single(TokenKind::Plus),
            '-' => return self.single(TokenKind::Minus),
            '*' => return self.single(TokenKind::Times),
            '/' => return self.single(TokenKind::Slash),
            '%' => return self.single(TokenKind::Modulo),
            '^' => return self.single(TokenKind::Exponent),
            '(' => return self.single(TokenKind::OpenParen),
            ')' => return self.single(TokenKind::CloseParen),
            '!' => return self.single(TokenKind::Bang),
            '&' => Start::DoubleOrBad('&', TokenKind::And),
            '|' => Start::DoubleOrBad('|', TokenKind::Or),
            _ => return self.bad_character(c),
        };

        match started {
            Start::Number => {
                let literal = self.advance_while(|c| c.is_ascii_digit());
                // a run that does not print back as itself either overflowed
                // or carries leading zeros
                let value = wrapping_parse(literal);
                if value.to_string() != literal {
                    self.diagnostics
                        .report_invalid_number(start..self.byte, literal);
                }
                Token {
                    kind: TokenKind::Number,
                    position: start,
                    literal,
                    value: Some(Value::Integer(value)),
                }
            }
            Start::Whitespace => {
                let literal = self.advance_while(char::is_whitespace);
                Token::new(TokenKind::Whitespace, start, literal)
            }
            Start::Word => {
                let literal = self.advance_while(is_letter);
                let kind = rules::keyword_kind(literal);
                let value = match kind {
                    TokenKind::True => Some(Value::Boolean(true)),
                    TokenKind::False => Some(Value::Boolean(false)),
                    _ => None,
                };
                Token {
                    kind,
                    position: start,
                    literal,
                    value,
                }
            }
            Start::DoubleOrBad(second, kind) => {
                if cur[c.len_utf8()..].starts_with(second) {
                    let literal = &cur[..c.len_utf8() + second.len_utf8()];
                    self.bump(literal.len());
                    Token::new(kind, start, literal)
                } else {
                    self.bad_character(c)
                }
            }
        }
    }

    fn bump(&mut self, bytes: usize) {
        self.rest = &self.rest[bytes..];
        self.byte += bytes;
    }

    fn advance_while(&mut self, keep: impl Fn(char) -> bool) -> &'de str {
        let cur = self.rest;
        let end = cur.find(|c| !keep(c)).unwrap_or(cur.len());
        self.bump(end);
        &cur[..end]
    }

    fn single(&mut self, kind: TokenKind) -> Token<'de> {
        let start = self.byte;
        let literal = &self.rest[..1];
        self.bump(1);
        Token::new(kind, start, literal)
    }

    fn bad_character(&mut self, c: char) -> Token<'de> {
        let start = self.byte;
        self.diagnostics.report_bad_character(start, c);
        let literal = &self.rest[..c.len_utf8()];
        self.bump(c.len_utf8());
        Token::new(TokenKind::BadToken, start, literal)
    }
}

/// Yields every token up to and including the first `Eof`.
impl<'de> Iterator for Lexer<'de> {
    type Item = Token<'de>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

// Letters proper: no letter-like numerals (`Ⅷ`) and no combining marks.
fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

// Matches the two's-complement wrap an overflowing 32-bit parse would give.
fn wrapping_parse(digits: &str) -> i32 {
    digits.bytes().fold(0i32, |acc, digit| {
        acc.wrapping_mul(10).wrapping_add(i32::from(digit - b'0'))
    })
}
