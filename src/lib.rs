//! Evaluator for one-line arithmetic and boolean expressions.
//!
//! A line goes through [`lex::Lexer`], [`parse::Parser`], [`bind::Binder`]
//! and finally [`eval::Evaluator`]. Every stage records recoverable problems
//! as [`Diagnostic`]s and keeps going; any diagnostic at all means the line
//! is not evaluated.

pub mod bind;
pub mod diagnostic;
pub mod eval;
pub mod lex;
pub mod parse;
pub mod rules;
pub mod tree;
pub mod value;

pub use bind::{Binder, BoundExpression};
pub use diagnostic::Diagnostic;
pub use eval::{EvalError, Evaluator};
pub use lex::{Lexer, Token, TokenKind};
pub use parse::{Expression, Parser, SyntaxKind, SyntaxNode, SyntaxTree};
pub use value::{Type, Value};

use tracing::debug;

/// What a line evaluates to: a value, or the reasons it could not be
/// evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Value(Value),
    Diagnostics(Vec<Diagnostic>),
}

/// A parsed and bound line, ready to evaluate.
pub struct Compilation<'de> {
    syntax: SyntaxTree<'de>,
    bound: BoundExpression,
    diagnostics: Vec<Diagnostic>,
}

impl<'de> Compilation<'de> {
    pub fn new(input: &'de str) -> Self {
        let syntax = SyntaxTree::parse(input);
        let mut binder = Binder::new();
        let bound = binder.bind_expression(&syntax.root);
        debug!(
            ty = %bound.ty(),
            diagnostics = binder.diagnostics().len(),
            "bound expression"
        );

        let mut diagnostics = syntax.diagnostics.clone();
        diagnostics.extend(binder.into_diagnostics());

        Compilation {
            syntax,
            bound,
            diagnostics,
        }
    }

    pub fn syntax(&self) -> &SyntaxTree<'de> {
        &self.syntax
    }

    pub fn bound(&self) -> &BoundExpression {
        &self.bound
    }

    /// Lexer, parser and binder diagnostics, in that order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn evaluate(&self) -> Result<Evaluation, EvalError> {
        if !self.diagnostics.is_empty() {
            return Ok(Evaluation::Diagnostics(self.diagnostics.clone()));
        }
        Evaluator::new(&self.bound)
            .evaluate()
            .map(Evaluation::Value)
    }
}

/// Runs the whole pipeline over one line.
pub fn evaluate(input: &str) -> Result<Evaluation, EvalError> {
    Compilation::new(input).evaluate()
}
