use std::fmt::Display;

use tracing::{debug, trace, warn};

use crate::{
    diagnostic::{Diagnostic, DiagnosticBag},
    lex::{Lexer, Token, TokenKind},
    rules,
};

/// Tallest syntax tree the parser will build. Binding and evaluation walk
/// the tree recursively, so deeper input is rejected with a diagnostic.
pub const MAX_DEPTH: usize = 256;

/// Recursive-descent parser using precedence climbing.
///
/// The whole line is lexed up front; whitespace and bad tokens are dropped
/// from the buffer but their diagnostics are kept.
pub struct Parser<'de> {
    tokens: Vec<Token<'de>>,
    position: usize,
    depth: usize,
    abandoned: bool,
    diagnostics: DiagnosticBag,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression<'de> {
    Literal(Token<'de>),
    Unary {
        operator: Token<'de>,
        operand: Box<Expression<'de>>,
    },
    Binary {
        left: Box<Expression<'de>>,
        operator: Token<'de>,
        right: Box<Expression<'de>>,
    },
    Parenthesized {
        open: Token<'de>,
        inner: Box<Expression<'de>>,
        close: Token<'de>,
    },
}

/// Result of parsing one line.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree<'de> {
    pub root: Expression<'de>,
    pub eof: Token<'de>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'de> SyntaxTree<'de> {
    pub fn parse(input: &'de str) -> Self {
        Parser::new(input).parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Token(TokenKind),
    LiteralExpression,
    UnaryExpression,
    BinaryExpression,
    ParenthesizedExpression,
}

impl Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxKind::Token(kind) => write!(f, "{kind}"),
            SyntaxKind::LiteralExpression => write!(f, "LITERAL_EXPRESSION"),
            SyntaxKind::UnaryExpression => write!(f, "UNARY_EXPRESSION"),
            SyntaxKind::BinaryExpression => write!(f, "BINARY_EXPRESSION"),
            SyntaxKind::ParenthesizedExpression => write!(f, "PARENTHESIZED_EXPRESSION"),
        }
    }
}

/// Borrowed view over anything that can appear in a syntax tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntaxNode<'a, 'de> {
    Token(&'a Token<'de>),
    Expression(&'a Expression<'de>),
}

impl<'a, 'de> SyntaxNode<'a, 'de> {
    pub fn kind(&self) -> SyntaxKind {
        match *self {
            SyntaxNode::Token(token) => SyntaxKind::Token(token.kind),
            SyntaxNode::Expression(expression) => expression.kind(),
        }
    }

    /// Children in source order; tokens are leaves.
    pub fn children(&self) -> Vec<SyntaxNode<'a, 'de>> {
        match *self {
            SyntaxNode::Token(_) => Vec::new(),
            SyntaxNode::Expression(expression) => expression.children(),
        }
    }
}

impl<'de> Expression<'de> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Expression::Literal(_) => SyntaxKind::LiteralExpression,
            Expression::Unary { .. } => SyntaxKind::UnaryExpression,
            Expression::Binary { .. } => SyntaxKind::BinaryExpression,
            Expression::Parenthesized { .. } => SyntaxKind::ParenthesizedExpression,
        }
    }

    pub fn children(&self) -> Vec<SyntaxNode<'_, 'de>> {
        match self {
            Expression::Literal(token) => vec![SyntaxNode::Token(token)],
            Expression::Unary { operator, operand } => vec![
                SyntaxNode::Token(operator),
                SyntaxNode::Expression(operand),
            ],
            Expression::Binary {
                left,
                operator,
                right,
            } => vec![
                SyntaxNode::Expression(left),
                SyntaxNode::Token(operator),
                SyntaxNode::Expression(right),
            ],
            Expression::Parenthesized { open, inner, close } => vec![
                SyntaxNode::Token(open),
                SyntaxNode::Expression(inner),
                SyntaxNode::Token(close),
            ],
        }
    }
}

impl<'de> Parser<'de> {
    pub fn new(input: &'de str) -> Self {
        let mut lexer = Lexer::new(input);
        let tokens: Vec<_> = lexer
            .by_ref()
            .filter(|token| !matches!(token.kind, TokenKind::Whitespace | TokenKind::BadToken))
            .collect();

        let mut diagnostics = DiagnosticBag::new();
        diagnostics.extend(lexer.into_diagnostics());
        debug!(
            tokens = tokens.len(),
            diagnostics = diagnostics.len(),
            "lexed input"
        );

        Parser {
            tokens,
            position: 0,
            depth: 0,
            abandoned: false,
            diagnostics,
        }
    }

    pub fn parse(mut self) -> SyntaxTree<'de> {
        let root = self.parse_expression_within(0);
        let eof = self.match_token(TokenKind::Eof);
        debug!(diagnostics = self.diagnostics.len(), "parsed input");
        SyntaxTree {
            root,
            eof,
            diagnostics: self.diagnostics.into_vec(),
        }
    }

    fn peek(&self, offset: usize) -> &Token<'de> {
        // the lexer always ends the buffer with EOF, so it is never empty
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + offset).min(last)]
    }

    fn current(&self) -> &Token<'de> {
        self.peek(0)
    }

    fn next_token(&mut self) -> Token<'de> {
        let token = self.current().clone();
        self.position += 1;
        token
    }

    fn match_token(&mut self, kind: TokenKind) -> Token<'de> {
        if self.current().kind == kind {
            return self.next_token();
        }
        if self.abandoned {
            return Token::missing(kind, self.current().position);
        }
        let current = self.current();
        let (span, actual, position) = (current.span(), current.kind, current.position);
        self.diagnostics.report_unexpected_token(span, actual, kind);
        Token::missing(kind, position)
    }

    pub fn parse_expression_within(&mut self, min_precedence: u8) -> Expression<'de> {
        self.parse_nested(min_precedence).0
    }

    // Returns the expression together with its height.
    fn parse_nested(&mut self, min_precedence: u8) -> (Expression<'de>, usize) {
        if self.depth >= MAX_DEPTH {
            let position = self.current().position;
            self.abandon();
            return (Expression::Literal(Token::missing(TokenKind::Number, position)), 1);
        }
        self.depth += 1;

        let unary = rules::unary_operator_precedence(self.current().kind);
        let (mut left, mut height) = if unary != 0 && unary >= min_precedence {
            let operator = self.next_token();
            trace!(operator = %operator.kind, "unary operator");
            let (operand, operand_height) = self.parse_nested(unary);
            let expression = Expression::Unary {
                operator,
                operand: Box::new(operand),
            };
            (expression, operand_height + 1)
        } else {
            self.parse_primary_expression()
        };

        loop {
            let precedence = rules::binary_operator_precedence(self.current().kind);
            if precedence == 0 || precedence <= min_precedence {
                break;
            }
            if height >= MAX_DEPTH {
                self.abandon();
                break;
            }
            let operator = self.next_token();
            trace!(operator = %operator.kind, "binary operator");
            let (right, right_height) = self.parse_nested(precedence);
            left = Expression::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
            height = height.max(right_height) + 1;
        }

        self.depth -= 1;
        (left, height)
    }

    fn parse_primary_expression(&mut self) -> (Expression<'de>, usize) {
        match self.current().kind {
            TokenKind::OpenParen => {
                let open = self.next_token();
                let (inner, height) = self.parse_nested(0);
                let close = self.match_token(TokenKind::CloseParen);
                let parenthesized = Expression::Parenthesized {
                    open,
                    inner: Box::new(inner),
                    close,
                };
                (parenthesized, height + 1)
            }
            TokenKind::True | TokenKind::False => (Expression::Literal(self.next_token()), 1),
            _ => (Expression::Literal(self.match_token(TokenKind::Number)), 1),
        }
    }

    /// Reports the nesting limit once and skips to the end of the line; the
    /// enclosing levels then close without further diagnostics.
    fn abandon(&mut self) {
        if !self.abandoned {
            let span = self.current().span();
            warn!(limit = MAX_DEPTH, "expression nested too deeply");
            self.diagnostics.report_nesting_too_deep(span, MAX_DEPTH);
            self.abandoned = true;
        }
        self.position = self.tokens.len() - 1;
    }
}
