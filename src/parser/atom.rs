use super::ExpressionBody;
use crate::values::Number;

/// Classifies an atom token as an integer, a real number or a symbol.
///
/// ```
/// use framelisp::{parser::{classify_atom, ExpressionBody}, values::Number};
/// assert_eq!(classify_atom("8"), ExpressionBody::Number(Number::Integer(8)));
/// assert_eq!(classify_atom("-5.32"), ExpressionBody::Number(Number::Real(-5.32)));
/// assert_eq!(classify_atom("1.2.3.4"), ExpressionBody::Symbol("1.2.3.4".to_string()));
/// ```
pub fn classify_atom(atom: &str) -> ExpressionBody {
    if let Ok(integer) = atom.parse::<i64>() {
        ExpressionBody::Number(Number::Integer(integer))
    } else if let Ok(real) = atom.parse::<f64>() {
        ExpressionBody::Number(Number::Real(real))
    } else {
        ExpressionBody::Symbol(atom.to_string())
    }
}

#[test]
fn integers() {
    assert_eq!(
        classify_atom("0"),
        ExpressionBody::Number(Number::Integer(0))
    );
    assert_eq!(
        classify_atom("-17"),
        ExpressionBody::Number(Number::Integer(-17))
    );
    assert_eq!(
        classify_atom("+4"),
        ExpressionBody::Number(Number::Integer(4))
    );
}

#[test]
fn reals() {
    assert_eq!(
        classify_atom("2.5"),
        ExpressionBody::Number(Number::Real(2.5))
    );
    assert_eq!(
        classify_atom("1e3"),
        ExpressionBody::Number(Number::Real(1000.0))
    );
    // too large for an i64
    assert_eq!(
        classify_atom("100000000000000000000"),
        ExpressionBody::Number(Number::Real(1e20))
    );
}

#[test]
fn symbols() {
    for symbol in ["x", "+", "-", "list-ref", "#t", "nil", "1+", "2x"] {
        assert_eq!(
            classify_atom(symbol),
            ExpressionBody::Symbol(symbol.to_string())
        );
    }
}
