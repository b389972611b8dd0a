use crate::{
    diagnostic::{Diagnostic, DiagnosticBag},
    lex::TokenKind,
    parse::Expression,
    value::{Type, Value},
};

use BoundBinaryOperatorKind as BinaryKind;
use BoundUnaryOperatorKind as UnaryKind;

/// Typed counterpart of [`Expression`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpression {
    Literal(Value),
    Unary {
        operator: &'static BoundUnaryOperator,
        operand: Box<BoundExpression>,
    },
    Binary {
        left: Box<BoundExpression>,
        operator: &'static BoundBinaryOperator,
        right: Box<BoundExpression>,
    },
    Parenthesized(Box<BoundExpression>),
}

impl BoundExpression {
    pub fn ty(&self) -> Type {
        match self {
            BoundExpression::Literal(value) => value.ty(),
            BoundExpression::Unary { operator, .. } => operator.result_type,
            BoundExpression::Binary { operator, .. } => operator.result_type,
            BoundExpression::Parenthesized(inner) => inner.ty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundUnaryOperatorKind {
    Identity,
    Negation,
    LogicalNegation,
    Square,
    SquareRoot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundBinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    Exponentiation,
    LogicalAnd,
    LogicalOr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct BoundUnaryOperator {
    pub token: TokenKind,
    pub kind: BoundUnaryOperatorKind,
    pub operand_type: Type,
    pub result_type: Type,
}

#[derive(Debug, PartialEq, Eq)]
pub struct BoundBinaryOperator {
    pub token: TokenKind,
    pub kind: BoundBinaryOperatorKind,
    pub left_type: Type,
    pub right_type: Type,
    pub result_type: Type,
}

const fn unary(
    token: TokenKind,
    kind: UnaryKind,
    operand_type: Type,
    result_type: Type,
) -> BoundUnaryOperator {
    BoundUnaryOperator {
        token,
        kind,
        operand_type,
        result_type,
    }
}

const fn binary(
    token: TokenKind,
    kind: BinaryKind,
    operands: Type,
    result_type: Type,
) -> BoundBinaryOperator {
    BoundBinaryOperator {
        token,
        kind,
        left_type: operands,
        right_type: operands,
        result_type,
    }
}

static UNARY_OPERATORS: [BoundUnaryOperator; 9] = [
    unary(TokenKind::Plus, UnaryKind::Identity, Type::Integer, Type::Integer),
    unary(TokenKind::Plus, UnaryKind::Identity, Type::Double, Type::Double),
    unary(TokenKind::Minus, UnaryKind::Negation, Type::Integer, Type::Integer),
    unary(TokenKind::Minus, UnaryKind::Negation, Type::Double, Type::Double),
    unary(TokenKind::Bang, UnaryKind::LogicalNegation, Type::Boolean, Type::Boolean),
    unary(TokenKind::Sqr, UnaryKind::Square, Type::Integer, Type::Integer),
    unary(TokenKind::Sqr, UnaryKind::Square, Type::Double, Type::Double),
    unary(TokenKind::Sqrt, UnaryKind::SquareRoot, Type::Integer, Type::Double),
    unary(TokenKind::Sqrt, UnaryKind::SquareRoot, Type::Double, Type::Double),
];

static BINARY_OPERATORS: [BoundBinaryOperator; 14] = [
    binary(TokenKind::Plus, BinaryKind::Addition, Type::Integer, Type::Integer),
    binary(TokenKind::Minus, BinaryKind::Subtraction, Type::Integer, Type::Integer),
    binary(TokenKind::Times, BinaryKind::Multiplication, Type::Integer, Type::Integer),
    binary(TokenKind::Slash, BinaryKind::Division, Type::Integer, Type::Integer),
    binary(TokenKind::Modulo, BinaryKind::Modulo, Type::Integer, Type::Integer),
    binary(TokenKind::Exponent, BinaryKind::Exponentiation, Type::Integer, Type::Integer),
    binary(TokenKind::Plus, BinaryKind::Addition, Type::Double, Type::Double),
    binary(TokenKind::Minus, BinaryKind::Subtraction, Type::Double, Type::Double),
    binary(TokenKind::Times, BinaryKind::Multiplication, Type::Double, Type::Double),
    binary(TokenKind::Slash, BinaryKind::Division, Type::Double, Type::Double),
    binary(TokenKind::Modulo, BinaryKind::Modulo, Type::Double, Type::Double),
    binary(TokenKind::Exponent, BinaryKind::Exponentiation, Type::Double, Type::Double),
    binary(TokenKind::And, BinaryKind::LogicalAnd, Type::Boolean, Type::Boolean),
    binary(TokenKind::Or, BinaryKind::LogicalOr, Type::Boolean, Type::Boolean),
];

impl BoundUnaryOperator {
    pub fn bind(token: TokenKind, operand_type: Type) -> Option<&'static Self> {
        UNARY_OPERATORS
            .iter()
            .find(|op| op.token == token && op.operand_type == operand_type)
    }
}

impl BoundBinaryOperator {
    pub fn bind(token: TokenKind, left_type: Type, right_type: Type) -> Option<&'static Self> {
        BINARY_OPERATORS.iter().find(|op| {
            op.token == token && op.left_type == left_type && op.right_type == right_type
        })
    }
}

/// Resolves literal types and operator overloads.
///
/// An operator with no overload for its operand types is reported and the
/// operand (the left one, for binary operators) is returned in its place,
/// so one line can surface several type errors.
#[derive(Debug, Default)]
pub struct Binder {
    diagnostics: DiagnosticBag,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_vec()
    }

    pub fn bind_expression(&mut self, syntax: &Expression<'_>) -> BoundExpression {
        match syntax {
            // a token synthesized by the parser has no value; it only shows
            // up alongside a parse diagnostic
            Expression::Literal(token) => {
                BoundExpression::Literal(token.value.clone().unwrap_or(Value::Integer(0)))
            }
            Expression::Unary { operator, operand } => {
                let operand = self.bind_expression(operand);
                match BoundUnaryOperator::bind(operator.kind, operand.ty()) {
                    Some(bound) => BoundExpression::Unary {
                        operator: bound,
                        operand: Box::new(operand),
                    },
                    None => {
                        self.diagnostics.report_undefined_unary_operator(
                            operator.span(),
                            operator.literal,
                            operand.ty(),
                        );
                        operand
                    }
                }
            }
            Expression::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.bind_expression(left);
                let right = self.bind_expression(right);
                match BoundBinaryOperator::bind(operator.kind, left.ty(), right.ty()) {
                    Some(bound) => BoundExpression::Binary {
                        left: Box::new(left),
                        operator: bound,
                        right: Box::new(right),
                    },
                    None => {
                        self.diagnostics.report_undefined_binary_operator(
                            operator.span(),
                            operator.literal,
                            left.ty(),
                            right.ty(),
                        );
                        left
                    }
                }
            }
            Expression::Parenthesized { inner, .. } => {
                BoundExpression::Parenthesized(Box::new(self.bind_expression(inner)))
            }
        }
    }
}
