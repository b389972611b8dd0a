//! Operator precedence and keyword classification.
//!
//! Higher numbers bind tighter; `0` means "not an operator in this
//! position".

use crate::lex::TokenKind;

pub fn unary_operator_precedence(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Plus | TokenKind::Minus | TokenKind::Bang => 7,
        TokenKind::Sqr | TokenKind::Sqrt => 5,
        _ => 0,
    }
}

pub fn binary_operator_precedence(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Exponent => 6,
        TokenKind::Times | TokenKind::Slash | TokenKind::Modulo => 4,
        TokenKind::Plus | TokenKind::Minus => 3,
        TokenKind::And => 2,
        TokenKind::Or => 1,
        _ => 0,
    }
}

pub fn keyword_kind(text: &str) -> TokenKind {
    match text {
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "sqr" => TokenKind::Sqr,
        "sqrt" => TokenKind::Sqrt,
        _ => TokenKind::Identifier,
    }
}
