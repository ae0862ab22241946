use super::{expect_arguments, Result};
use crate::values::{ArgVec, Number, Value};

pub(super) fn car(arguments: ArgVec) -> Result<Value> {
    let [pair] = expect_arguments::<1>(arguments)?;
    Ok(pair.expect_pair()?.car.clone())
}

pub(super) fn cdr(arguments: ArgVec) -> Result<Value> {
    let [pair] = expect_arguments::<1>(arguments)?;
    Ok(pair.expect_pair()?.cdr.clone())
}

pub(super) fn is_list(arguments: ArgVec) -> Result<Value> {
    let [value] = expect_arguments::<1>(arguments)?;
    Ok(Value::Boolean(value.is_proper_list()))
}

pub(super) fn length(arguments: ArgVec) -> Result<Value> {
    let [list] = expect_arguments::<1>(arguments)?;
    Ok(Value::Number(Number::Integer(list.list_length()? as i64)))
}

pub(super) fn list_ref(arguments: ArgVec) -> Result<Value> {
    let [list, index] = expect_arguments::<2>(arguments)?;
    list.list_ref(index.expect_integer()?)
}

pub(super) fn append(arguments: ArgVec) -> Result<Value> {
    let mut elements = vec![];
    for list in arguments {
        elements.extend(list.list_elements()?);
    }
    Ok(Value::list_with_tail(elements, Value::EmptyList))
}

#[cfg(test)]
use crate::interpreter::error::EvaluationError;
#[cfg(test)]
use crate::values::Type;
#[cfg(test)]
use smallvec::smallvec;
#[cfg(test)]
use std::rc::Rc;

#[cfg(test)]
fn list_of(items: &[i64]) -> Value {
    items
        .iter()
        .map(|i| Value::Number(Number::Integer(*i)))
        .collect()
}

#[test]
fn builtin_car_cdr() {
    let pair = Value::cons(Value::Boolean(true), Value::Boolean(false));
    assert_eq!(car(smallvec![pair.clone()]), Ok(Value::Boolean(true)));
    assert_eq!(cdr(smallvec![pair]), Ok(Value::Boolean(false)));
    assert_eq!(cdr(smallvec![list_of(&[1, 2])]), Ok(list_of(&[2])));
    assert_eq!(
        car(smallvec![Value::Number(Number::Integer(5))]),
        error!(EvaluationError::TypeMismatch("5".to_string(), Type::Pair))
    );
    assert_eq!(
        car(smallvec![Value::EmptyList]),
        error!(EvaluationError::TypeMismatch("nil".to_string(), Type::Pair))
    );
}

#[test]
fn builtin_list_queries() {
    assert_eq!(is_list(smallvec![list_of(&[1, 2])]), Ok(Value::Boolean(true)));
    assert_eq!(is_list(smallvec![Value::EmptyList]), Ok(Value::Boolean(true)));
    assert_eq!(
        is_list(smallvec![Value::cons(Value::EmptyList, Value::Boolean(true))]),
        Ok(Value::Boolean(false))
    );
    assert_eq!(
        length(smallvec![list_of(&[1, 2, 3])]),
        Ok(Value::Number(Number::Integer(3)))
    );
    assert_eq!(
        list_ref(smallvec![list_of(&[7, 8, 9]), Value::Number(Number::Integer(1))]),
        Ok(Value::Number(Number::Integer(8)))
    );
    assert_eq!(
        list_ref(smallvec![list_of(&[7]), Value::Number(Number::Real(0.0))]),
        error!(EvaluationError::TypeMismatch("0.0".to_string(), Type::Integer))
    );
}

#[test]
fn builtin_append() {
    assert_eq!(append(smallvec![]), Ok(Value::EmptyList));
    assert_eq!(append(smallvec![list_of(&[1, 2])]), Ok(list_of(&[1, 2])));
    assert_eq!(
        append(smallvec![
            list_of(&[1, 2]),
            Value::EmptyList,
            list_of(&[3]),
            list_of(&[4, 5])
        ]),
        Ok(list_of(&[1, 2, 3, 4, 5]))
    );
    assert_eq!(
        append(smallvec![
            Value::cons(Value::Boolean(true), Value::Boolean(false)),
            list_of(&[1])
        ]),
        error!(EvaluationError::ImproperList("(#t . #f)".to_string()))
    );
    assert_eq!(
        append(smallvec![Value::Number(Number::Integer(5))]),
        error!(EvaluationError::ImproperList("5".to_string()))
    );
    assert_eq!(
        append(smallvec![list_of(&[1]), Value::Number(Number::Integer(5))]),
        error!(EvaluationError::ImproperList("5".to_string()))
    );
    // the result never shares structure with the last argument
    let last = list_of(&[2, 3]);
    match append(smallvec![list_of(&[1]), last.clone()]) {
        Ok(Value::Pair(result)) => match (&result.cdr, &last) {
            (Value::Pair(tail), Value::Pair(last)) => assert!(!Rc::ptr_eq(tail, last)),
            _ => panic!("expected pairs"),
        },
        other => panic!("unexpected {:?}", other),
    }
}
