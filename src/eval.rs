use miette::Diagnostic;
use thiserror::Error;

use crate::{
    bind::{
        BoundBinaryOperatorKind as BinaryKind, BoundExpression, BoundUnaryOperatorKind as UnaryKind,
    },
    value::Value,
};

/// Fault raised while evaluating a well-typed tree.
///
/// These are never diagnostics: the binder does not look at operand values,
/// so a zero divisor is only discovered here.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum EvalError {
    #[error("attempt to compute `{dividend} {operator} 0`")]
    #[diagnostic(
        code(eval::division_by_zero),
        help("integer division and remainder are undefined for a zero divisor")
    )]
    DivisionByZero {
        dividend: i32,
        operator: &'static str,
    },
}

/// Walks a bound tree and computes its value.
///
/// Both operands of `&&` and `||` are always evaluated.
pub struct Evaluator<'a> {
    root: &'a BoundExpression,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a BoundExpression) -> Self {
        Evaluator { root }
    }

    pub fn evaluate(&self) -> Result<Value, EvalError> {
        evaluate_expression(self.root)
    }
}

fn evaluate_expression(expression: &BoundExpression) -> Result<Value, EvalError> {
    Ok(match expression {
        BoundExpression::Literal(value) => value.clone(),
        BoundExpression::Parenthesized(inner) => evaluate_expression(inner)?,
        BoundExpression::Unary { operator, operand } => {
            let operand = evaluate_expression(operand)?;
            match (operator.kind, operand) {
                (UnaryKind::Identity, value @ (Value::Integer(_) | Value::Double(_))) => value,
                (UnaryKind::Negation, Value::Integer(n)) => Value::Integer(n.wrapping_neg()),
                (UnaryKind::Negation, Value::Double(n)) => Value::Double(-n),
                (UnaryKind::LogicalNegation, Value::Boolean(b)) => Value::Boolean(!b),
                (UnaryKind::Square, Value::Integer(n)) => Value::Integer(n.wrapping_mul(n)),
                (UnaryKind::Square, Value::Double(n)) => Value::Double(n * n),
                (UnaryKind::SquareRoot, Value::Integer(n)) => Value::Double(f64::from(n).sqrt()),
                (UnaryKind::SquareRoot, Value::Double(n)) => Value::Double(n.sqrt()),
                (kind, operand) => {
                    unreachable!("binder produced {kind:?} for operand {operand:?}")
                }
            }
        }
        BoundExpression::Binary {
            left,
            operator,
            right,
        } => {
            let left = evaluate_expression(left)?;
            let right = evaluate_expression(right)?;
            match (left, right) {
                (Value::Integer(lhs), Value::Integer(rhs)) => {
                    Value::Integer(integer_arithmetic(operator.kind, lhs, rhs)?)
                }
                (Value::Double(lhs), Value::Double(rhs)) => {
                    Value::Double(double_arithmetic(operator.kind, lhs, rhs))
                }
                (Value::Boolean(lhs), Value::Boolean(rhs)) => match operator.kind {
                    BinaryKind::LogicalAnd => Value::Boolean(lhs && rhs),
                    BinaryKind::LogicalOr => Value::Boolean(lhs || rhs),
                    kind => unreachable!("binder produced {kind:?} for boolean operands"),
                },
                (left, right) => {
                    unreachable!("binder produced {:?} for {left:?} and {right:?}", operator.kind)
                }
            }
        }
    })
}

fn integer_arithmetic(kind: BinaryKind, lhs: i32, rhs: i32) -> Result<i32, EvalError> {
    Ok(match kind {
        BinaryKind::Addition => lhs.wrapping_add(rhs),
        BinaryKind::Subtraction => lhs.wrapping_sub(rhs),
        BinaryKind::Multiplication => lhs.wrapping_mul(rhs),
        BinaryKind::Division | BinaryKind::Modulo if rhs == 0 => {
            return Err(EvalError::DivisionByZero {
                dividend: lhs,
                operator: if kind == BinaryKind::Division { "/" } else { "%" },
            });
        }
        BinaryKind::Division => lhs.wrapping_div(rhs),
        BinaryKind::Modulo => lhs.wrapping_rem(rhs),
        // saturating float-to-int cast, NaN becomes 0
        BinaryKind::Exponentiation => f64::from(lhs).powf(f64::from(rhs)) as i32,
        kind => unreachable!("binder produced {kind:?} for integer operands"),
    })
}

fn double_arithmetic(kind: BinaryKind, lhs: f64, rhs: f64) -> f64 {
    match kind {
        BinaryKind::Addition => lhs + rhs,
        BinaryKind::Subtraction => lhs - rhs,
        BinaryKind::Multiplication => lhs * rhs,
        BinaryKind::Division => lhs / rhs,
        BinaryKind::Modulo => lhs % rhs,
        BinaryKind::Exponentiation => lhs.powf(rhs),
        kind => unreachable!("binder produced {kind:?} for double operands"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bind::Binder, parse::SyntaxTree};

    fn bound(input: &str) -> BoundExpression {
        let tree = SyntaxTree::parse(input);
        assert!(tree.diagnostics.is_empty(), "{:?}", tree.diagnostics);
        let mut binder = Binder::new();
        let bound = binder.bind_expression(&tree.root);
        assert!(binder.diagnostics().is_empty());
        bound
    }

    fn eval(input: &str) -> Result<Value, EvalError> {
        Evaluator::new(&bound(input)).evaluate()
    }

    #[test]
    fn integer_arithmetic_follows_precedence() {
        assert_eq!(eval("2 + 3 * 4"), Ok(Value::Integer(14)));
        assert_eq!(eval("(2 + 3) * 4"), Ok(Value::Integer(20)));
        assert_eq!(eval("1 - 2 - 3"), Ok(Value::Integer(-4)));
        assert_eq!(eval("2 ^ 3 ^ 2"), Ok(Value::Integer(64)));
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(eval("10 / 3"), Ok(Value::Integer(3)));
        assert_eq!(eval("-7 / 2"), Ok(Value::Integer(-3)));
        assert_eq!(eval("-7 % 3"), Ok(Value::Integer(-1)));
    }

    #[test]
    fn division_by_zero_is_a_fault() {
        assert_eq!(
            eval("10 / 0"),
            Err(EvalError::DivisionByZero {
                dividend: 10,
                operator: "/"
            })
        );
        assert!(matches!(
            eval("1 % (2 - 2)"),
            Err(EvalError::DivisionByZero { operator: "%", .. })
        ));
    }

    #[test]
    fn unary_operators() {
        assert_eq!(eval("-2 ^ 2"), Ok(Value::Integer(4)));
        assert_eq!(eval("+-5"), Ok(Value::Integer(-5)));
        assert_eq!(eval("sqr 7"), Ok(Value::Integer(49)));
        assert_eq!(eval("sqrt 4 ^ 2"), Ok(Value::Double(4.0)));
        assert_eq!(eval("sqr sqrt 9"), Ok(Value::Double(9.0)));
        assert_eq!(eval("!false"), Ok(Value::Boolean(true)));
    }

    #[test]
    fn doubles_use_floating_point_arithmetic() {
        assert_eq!(eval("sqrt 9 / sqrt 4"), Ok(Value::Double(1.5)));
        assert_eq!(eval("sqrt 1 / sqrt 0"), Ok(Value::Double(f64::INFINITY)));
    }

    #[test]
    fn exponent_rounds_back_to_an_integer() {
        assert_eq!(eval("2 ^ 10"), Ok(Value::Integer(1024)));
        assert_eq!(eval("2 ^ -1"), Ok(Value::Integer(0)));
        assert_eq!(eval("2 ^ 40"), Ok(Value::Integer(i32::MAX)));
    }

    #[test]
    fn integer_overflow_wraps() {
        assert_eq!(eval("2147483647 + 1"), Ok(Value::Integer(i32::MIN)));
        assert_eq!(
            eval("(0 - 2147483647 - 1) / -1"),
            Ok(Value::Integer(i32::MIN))
        );
    }

    #[test]
    fn logical_operators() {
        assert_eq!(eval("true && false"), Ok(Value::Boolean(false)));
        assert_eq!(eval("false || true"), Ok(Value::Boolean(true)));
        assert_eq!(eval("!(true && !false) || false"), Ok(Value::Boolean(false)));
    }

    #[test]
    fn evaluation_does_not_consume_the_tree() {
        let tree = bound("(8 - 3) * 2 % 7");
        let evaluator = Evaluator::new(&tree);
        assert_eq!(evaluator.evaluate(), Ok(Value::Integer(3)));
        assert_eq!(evaluator.evaluate(), Ok(Value::Integer(3)));
    }
}
