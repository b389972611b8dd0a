use std::ops::Range;

use miette::SourceSpan;
use thiserror::Error;

use crate::{lex::TokenKind, value::Type};

/// A recoverable problem found while lexing, parsing or binding one line.
///
/// `Display` yields only the message; the span is there so a front end can
/// attach the input line and point at the offending bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq, miette::Diagnostic)]
#[error("{message}")]
pub struct Diagnostic {
    pub message: String,

    #[label("here")]
    pub span: SourceSpan,
}

impl Diagnostic {
    pub fn new(span: Range<usize>, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            span: SourceSpan::from(span),
        }
    }
}

/// Append-only, ordered collection of diagnostics owned by one stage.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(other);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn report(&mut self, span: Range<usize>, message: String) {
        self.diagnostics.push(Diagnostic::new(span, message));
    }

    pub fn report_invalid_number(&mut self, span: Range<usize>, text: &str) {
        self.report(
            span,
            format!("the number {text} can't be represented by a 32-bit integer"),
        );
    }

    pub fn report_bad_character(&mut self, position: usize, character: char) {
        self.report(
            position..position + character.len_utf8(),
            format!("bad character input: '{character}' at position {position}"),
        );
    }

    pub fn report_unexpected_token(
        &mut self,
        span: Range<usize>,
        actual: TokenKind,
        expected: TokenKind,
    ) {
        self.report(
            span,
            format!("unexpected token of type <{actual}>, expected <{expected}>"),
        );
    }

    pub fn report_nesting_too_deep(&mut self, span: Range<usize>, limit: usize) {
        self.report(
            span,
            format!("expression nests deeper than {limit} levels"),
        );
    }

    pub fn report_undefined_unary_operator(
        &mut self,
        span: Range<usize>,
        operator: &str,
        operand: Type,
    ) {
        self.report(
            span,
            format!("unary operator '{operator}' is not defined for type {operand}"),
        );
    }

    pub fn report_undefined_binary_operator(
        &mut self,
        span: Range<usize>,
        operator: &str,
        left: Type,
        right: Type,
    ) {
        self.report(
            span,
            format!("binary operator '{operator}' is not defined for types {left} and {right}"),
        );
    }
}

impl IntoIterator for DiagnosticBag {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let mut bag = DiagnosticBag::new();
        bag.report_bad_character(3, '$');
        let diagnostics = bag.into_vec();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].to_string(),
            "bad character input: '$' at position 3"
        );
        assert_eq!(diagnostics[0].span, SourceSpan::from(3..4));
    }

    #[test]
    fn bags_keep_insertion_order() {
        let mut first = DiagnosticBag::new();
        first.report_invalid_number(0..10, "9999999999");
        let mut second = DiagnosticBag::new();
        second.report_unexpected_token(10..10, TokenKind::Eof, TokenKind::Number);
        first.extend(second);

        let messages: Vec<_> = first.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            [
                "the number 9999999999 can't be represented by a 32-bit integer",
                "unexpected token of type <EOF>, expected <NUMBER>",
            ]
        );
    }
}
