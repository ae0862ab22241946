use super::{expect_arguments, Result};
use crate::interpreter::error::EvaluationError;
use crate::values::{ArgVec, Number, Value};

pub(super) fn add(arguments: ArgVec) -> Result<Value> {
    arguments
        .into_iter()
        .try_fold(Number::Integer(0), |a, b| a + b.expect_number()?)
        .map(Value::Number)
}

pub(super) fn mul(arguments: ArgVec) -> Result<Value> {
    arguments
        .into_iter()
        .try_fold(Number::Integer(1), |a, b| a * b.expect_number()?)
        .map(Value::Number)
}

pub(super) fn sub(arguments: ArgVec) -> Result<Value> {
    let mut iter = arguments.into_iter();
    let first = match iter.next() {
        Some(first) => first.expect_number()?,
        None => {
            return error!(EvaluationError::ArgumentMismatch(
                append_variadic_param!(param_fixed!["x1"], "x"),
                0
            ))
        }
    };
    let init = match iter.next() {
        Some(value) => (first - value.expect_number()?)?,
        None => (Number::Integer(0) - first)?,
    };
    iter.try_fold(init, |a, b| a - b.expect_number()?)
        .map(Value::Number)
}

pub(super) fn div(arguments: ArgVec) -> Result<Value> {
    let mut iter = arguments.into_iter();
    let first = match iter.next() {
        Some(first) => first.expect_number()?,
        None => {
            return error!(EvaluationError::ArgumentMismatch(
                append_variadic_param!(param_fixed!["x1"], "x"),
                0
            ))
        }
    };
    let init = match iter.next() {
        Some(value) => (first / value.expect_number()?)?,
        None => (Number::Integer(1) / first)?,
    };
    iter.try_fold(init, |a, b| a / b.expect_number()?)
        .map(Value::Number)
}

macro_rules! typed_comparision {
    ($name:tt, $operator:tt, $expect_type: tt) => {
        pub(super) fn $name(arguments: ArgVec) -> Result<Value> {
            let mut iter = arguments.into_iter();
            match iter.next() {
                None => Ok(Value::Boolean(true)),
                Some(first) => {
                    let mut last = first.$expect_type()?;
                    for current in iter {
                        let current = current.$expect_type()?;
                        if !(last $operator current) {
                            return Ok(Value::Boolean(false));
                        }
                        last = current;
                    }
                    Ok(Value::Boolean(true))
                }
            }
        }
    };
}

typed_comparision!(greater, >, expect_number);
typed_comparision!(greater_equal, >=, expect_number);
typed_comparision!(less, <, expect_number);
typed_comparision!(less_equal, <=, expect_number);

pub(super) fn equal(arguments: ArgVec) -> Result<Value> {
    Ok(Value::Boolean(
        arguments.windows(2).all(|pair| pair[0] == pair[1]),
    ))
}

pub(super) fn not(arguments: ArgVec) -> Result<Value> {
    let [value] = expect_arguments::<1>(arguments)?;
    Ok(Value::Boolean(value == Value::Boolean(false)))
}

#[cfg(test)]
use smallvec::smallvec;

#[cfg(test)]
fn integer(i: i64) -> Value {
    Value::Number(Number::Integer(i))
}

#[test]
fn builtin_add() {
    assert_eq!(add(smallvec![]), Ok(integer(0)));
    assert_eq!(add(smallvec![integer(2)]), Ok(integer(2)));
    assert_eq!(add(smallvec![integer(2), integer(3)]), Ok(integer(5)));
    assert_eq!(
        add(smallvec![integer(2), integer(3), integer(4)]),
        Ok(integer(9))
    );
    assert_eq!(
        add(smallvec![integer(1), Value::Number(Number::Real(0.5))]),
        Ok(Value::Number(Number::Real(1.5)))
    );
    assert_eq!(
        add(smallvec![integer(1), Value::Boolean(true)]),
        error!(EvaluationError::TypeMismatch(
            "#t".to_string(),
            crate::values::Type::Number
        ))
    );
}

#[test]
fn builtin_sub() {
    assert_eq!(sub(smallvec![integer(5)]), Ok(integer(-5)));
    assert_eq!(sub(smallvec![integer(2), integer(3)]), Ok(integer(-1)));
    assert_eq!(
        sub(smallvec![integer(10), integer(2), integer(3)]),
        Ok(integer(5))
    );
    assert_eq!(
        sub(smallvec![integer(i64::MIN), integer(1)]),
        error!(EvaluationError::IntegerOverflow)
    );
}

#[test]
fn builtin_mul() {
    assert_eq!(mul(smallvec![]), Ok(integer(1)));
    assert_eq!(mul(smallvec![integer(2)]), Ok(integer(2)));
    assert_eq!(
        mul(smallvec![integer(2), integer(3), integer(4)]),
        Ok(integer(24))
    );
}

#[test]
fn builtin_div() {
    assert_eq!(
        div(smallvec![integer(2)]),
        Ok(Value::Number(Number::Real(0.5)))
    );
    assert_eq!(div(smallvec![integer(8), integer(2), integer(2)]), Ok(integer(2)));
    assert_eq!(
        div(smallvec![integer(2), integer(8)]),
        Ok(Value::Number(Number::Real(0.25)))
    );
    assert_eq!(
        div(smallvec![
            integer(2),
            integer(8),
            Value::Number(Number::Real(0.125))
        ]),
        Ok(Value::Number(Number::Real(2.)))
    );
    assert_eq!(
        div(smallvec![]),
        error!(EvaluationError::ArgumentMismatch(
            append_variadic_param!(param_fixed!["x1"], "x"),
            0
        ))
    );
    assert_eq!(
        div(smallvec![integer(2), integer(0)]),
        error!(EvaluationError::DivisionByZero)
    );
}

#[test]
fn builtin_greater() {
    assert_eq!(greater(smallvec![]), Ok(Value::Boolean(true)));
    assert_eq!(greater(smallvec![integer(2)]), Ok(Value::Boolean(true)));
    assert_eq!(
        greater(smallvec![integer(4), integer(2), integer(1)]),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        greater(smallvec![integer(4), integer(2), integer(2)]),
        Ok(Value::Boolean(false))
    );
    assert_eq!(
        greater_equal(smallvec![integer(4), integer(2), integer(2)]),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        less(smallvec![integer(1), Value::Number(Number::Real(1.5)), integer(2)]),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        less_equal(smallvec![integer(3), integer(2)]),
        Ok(Value::Boolean(false))
    );
}

#[test]
fn builtin_equal_and_not() {
    assert_eq!(equal(smallvec![]), Ok(Value::Boolean(true)));
    assert_eq!(
        equal(smallvec![integer(1), Value::Number(Number::Real(1.0)), integer(1)]),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        equal(smallvec![integer(1), Value::Boolean(true)]),
        Ok(Value::Boolean(false))
    );
    let list = || Value::cons(integer(1), Value::cons(integer(2), Value::EmptyList));
    assert_eq!(equal(smallvec![list(), list()]), Ok(Value::Boolean(true)));

    assert_eq!(not(smallvec![Value::Boolean(false)]), Ok(Value::Boolean(true)));
    assert_eq!(not(smallvec![Value::Boolean(true)]), Ok(Value::Boolean(false)));
    assert_eq!(not(smallvec![integer(0)]), Ok(Value::Boolean(false)));
    assert_eq!(
        not(smallvec![]),
        error!(EvaluationError::ArgumentMismatch(param_fixed!["x1"], 0))
    );
}
