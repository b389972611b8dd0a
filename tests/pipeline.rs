use arith_eval::{Compilation, EvalError, Evaluation, Evaluator, Value, evaluate};

fn value(input: &str) -> Value {
    match evaluate(input) {
        Ok(Evaluation::Value(value)) => value,
        other => panic!("`{input}` did not evaluate cleanly: {other:?}"),
    }
}

fn messages(input: &str) -> Vec<String> {
    match evaluate(input) {
        Ok(Evaluation::Diagnostics(diagnostics)) => {
            diagnostics.iter().map(ToString::to_string).collect()
        }
        other => panic!("`{input}` was expected to produce diagnostics: {other:?}"),
    }
}

#[test]
fn precedence_and_associativity() {
    assert_eq!(value("2 + 3 * 4"), Value::Integer(14));
    assert_eq!(value("(2 + 3) * 4"), Value::Integer(20));
    assert_eq!(value("1 - 2 - 3"), Value::Integer(-4));
    assert_eq!(value("100 / 10 / 5"), Value::Integer(2));
    assert_eq!(value("2 * 3 ^ 2"), Value::Integer(18));
    assert_eq!(value("17 % 5 * 2"), Value::Integer(4));
}

#[test]
fn unary_minus_binds_inside_the_exponent() {
    assert_eq!(value("-2 ^ 2"), Value::Integer(4));
    assert_eq!(value("0 - 2 ^ 2"), Value::Integer(-4));
}

#[test]
fn integer_division_truncates() {
    assert_eq!(value("10 / 3"), Value::Integer(3));
}

#[test]
fn division_by_zero_is_not_a_diagnostic() {
    assert_eq!(
        evaluate("10 / 0"),
        Err(EvalError::DivisionByZero {
            dividend: 10,
            operator: "/",
        })
    );
}

#[test]
fn boolean_expressions() {
    assert_eq!(value("true && !false"), Value::Boolean(true));
    assert_eq!(value("false || false"), Value::Boolean(false));
    assert_eq!(value("(true)"), Value::Boolean(true));
}

#[test]
fn whitespace_is_ignored() {
    assert_eq!(value("\t 1+\n2 "), Value::Integer(3));
}

#[test]
fn incomplete_input_is_not_evaluated() {
    let messages = messages("1 + ");
    assert!(!messages.is_empty());
    assert_eq!(messages[0], "unexpected token of type <EOF>, expected <NUMBER>");
}

#[test]
fn diagnostics_are_ordered_by_stage() {
    assert_eq!(
        messages("(1 + true) * 99999999999 $"),
        [
            "the number 99999999999 can't be represented by a 32-bit integer",
            "bad character input: '$' at position 25",
            "binary operator '+' is not defined for types INTEGER and BOOLEAN",
        ]
    );
}

#[test]
fn every_type_error_is_reported() {
    assert_eq!(
        messages("-true + !1"),
        [
            "unary operator '-' is not defined for type BOOLEAN",
            "unary operator '!' is not defined for type INTEGER",
            "binary operator '+' is not defined for types BOOLEAN and INTEGER",
        ]
    );
}

#[test]
fn bad_characters_gate_evaluation() {
    assert_eq!(
        messages("1 @ 2"),
        [
            "bad character input: '@' at position 2",
            "unexpected token of type <NUMBER>, expected <EOF>",
        ]
    );
}

#[test]
fn a_compilation_can_be_evaluated_repeatedly() {
    let compilation = Compilation::new("sqr (3 + 4) - 9 % 4");
    assert!(compilation.diagnostics().is_empty());
    let first = compilation.evaluate();
    let second = compilation.evaluate();
    assert_eq!(first, Ok(Evaluation::Value(Value::Integer(48))));
    assert_eq!(first, second);

    let evaluator = Evaluator::new(compilation.bound());
    assert_eq!(evaluator.evaluate(), Ok(Value::Integer(48)));
}

#[test]
fn syntax_tree_is_kept_alongside_the_bound_tree() {
    let compilation = Compilation::new("(1)");
    assert_eq!(compilation.syntax().root.children().len(), 3);
    assert_eq!(compilation.bound().ty(), arith_eval::Type::Integer);
}

#[test]
fn leading_zeros_are_reported() {
    assert_eq!(
        messages("007 + 1"),
        ["the number 007 can't be represented by a 32-bit integer"]
    );
}

#[test]
fn deep_nesting_is_a_diagnostic_not_a_crash() {
    let parentheses = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
    assert_eq!(
        messages(&parentheses),
        ["expression nests deeper than 256 levels"]
    );

    let negations = format!("{}1", "-".repeat(100_000));
    assert_eq!(
        messages(&negations),
        ["expression nests deeper than 256 levels"]
    );

    let nested = format!("{}1{}", "(".repeat(200), ")".repeat(200));
    assert_eq!(value(&nested), Value::Integer(1));
}
