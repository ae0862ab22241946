use std::{fmt::Display, iter::FromIterator, rc::Rc};

use super::error::EvaluationError;
use crate::error::SchemeError;
use crate::values::{Type, Value};

type Result<T> = std::result::Result<T, SchemeError>;

/// An immutable cons cell. Lists are chains of pairs ending in `nil`.
#[derive(Debug, Clone)]
pub struct Pair {
    pub car: Value,
    pub cdr: Value,
}

impl Pair {
    pub fn new(car: Value, cdr: Value) -> Self {
        Self { car, cdr }
    }

    pub fn iter(&self) -> PairIter<'_> {
        PairIter {
            pair: Some(self),
            rest: &self.cdr,
        }
    }
}

// compares the spine iteratively, only nested cars recurse
impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        let (mut a, mut b) = (self, other);
        loop {
            if a.car != b.car {
                return false;
            }
            match (&a.cdr, &b.cdr) {
                (Value::Pair(next_a), Value::Pair(next_b)) => {
                    if Rc::ptr_eq(next_a, next_b) {
                        return true;
                    }
                    a = next_a;
                    b = next_b;
                }
                (cdr_a, cdr_b) => return cdr_a == cdr_b,
            }
        }
    }
}

// a long list would otherwise be dropped one stack frame per pair
impl Drop for Pair {
    fn drop(&mut self) {
        let mut next = std::mem::replace(&mut self.cdr, Value::EmptyList);
        while let Value::Pair(pair) = next {
            match Rc::try_unwrap(pair) {
                Ok(mut pair) => next = std::mem::replace(&mut pair.cdr, Value::EmptyList),
                Err(_) => break,
            }
        }
    }
}

impl Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}", self.car)?;
        let mut current_value = &self.cdr;
        loop {
            match current_value {
                Value::Pair(next_pair) => {
                    write!(f, " {}", next_pair.car)?;
                    current_value = &next_pair.cdr;
                }
                Value::EmptyList => break,
                other => {
                    write!(f, " . {}", other)?;
                    break;
                }
            };
        }
        write!(f, ")")
    }
}

/// Walks the cars of a pair chain. Once exhausted, `rest` is whatever ended the chain.
pub struct PairIter<'a> {
    pair: Option<&'a Pair>,
    rest: &'a Value,
}

impl<'a> PairIter<'a> {
    pub fn rest(&self) -> &'a Value {
        self.rest
    }
}

impl<'a> Iterator for PairIter<'a> {
    type Item = &'a Value;
    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.pair.take()?;
        self.rest = &pair.cdr;
        if let Value::Pair(next) = &pair.cdr {
            self.pair = Some(next);
        }
        Some(&pair.car)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::list_with_tail(iter.into_iter().collect::<Vec<_>>(), Value::EmptyList)
    }
}

impl Value {
    /// Builds `(v1 v2 ... . tail)`; with a `nil` tail this is a proper list.
    pub fn list_with_tail(items: Vec<Value>, tail: Value) -> Value {
        items
            .into_iter()
            .rev()
            .fold(tail, |cdr, car| Value::cons(car, cdr))
    }

    pub fn is_proper_list(&self) -> bool {
        match self {
            Value::EmptyList => true,
            Value::Pair(pair) => {
                let mut iter = pair.iter();
                iter.by_ref().for_each(drop);
                matches!(iter.rest(), Value::EmptyList)
            }
            _ => false,
        }
    }

    /// Elements of a proper list, cloned.
    pub fn list_elements(&self) -> Result<Vec<Value>> {
        match self {
            Value::EmptyList => Ok(vec![]),
            Value::Pair(pair) => {
                let mut iter = pair.iter();
                let elements: Vec<Value> = iter.by_ref().cloned().collect();
                match iter.rest() {
                    Value::EmptyList => Ok(elements),
                    _ => error!(EvaluationError::ImproperList(self.to_string())),
                }
            }
            other => error!(EvaluationError::ImproperList(other.to_string())),
        }
    }

    pub fn list_length(&self) -> Result<usize> {
        match self {
            Value::EmptyList => Ok(0),
            Value::Pair(pair) => {
                let mut iter = pair.iter();
                let length = iter.by_ref().count();
                match iter.rest() {
                    Value::EmptyList => Ok(length),
                    _ => error!(EvaluationError::ImproperList(self.to_string())),
                }
            }
            other => error!(EvaluationError::ImproperList(other.to_string())),
        }
    }

    /// Zero-based element access. An improper list only allows index 0.
    pub fn list_ref(&self, index: i64) -> Result<Value> {
        let pair = match self {
            Value::Pair(pair) => pair,
            Value::EmptyList => return error!(EvaluationError::IndexOutOfRange(index)),
            other => {
                return error!(EvaluationError::TypeMismatch(
                    other.to_string(),
                    Type::List
                ))
            }
        };
        if index == 0 {
            return Ok(pair.car.clone());
        }
        if index < 0 || !self.is_proper_list() {
            return error!(EvaluationError::IndexOutOfRange(index));
        }
        match pair.iter().nth(index as usize) {
            Some(value) => Ok(value.clone()),
            None => error!(EvaluationError::IndexOutOfRange(index)),
        }
    }
}

#[cfg(test)]
fn integer_list(items: &[i64]) -> Value {
    items
        .iter()
        .map(|i| Value::Number(crate::values::Number::Integer(*i)))
        .collect()
}

#[test]
fn list_display() {
    assert_eq!(integer_list(&[1, 2, 3]).to_string(), "(1 2 3)");
    assert_eq!(integer_list(&[]).to_string(), "nil");
    let improper = Value::list_with_tail(
        vec![Value::Boolean(true), Value::Boolean(false)],
        Value::Boolean(true),
    );
    assert_eq!(improper.to_string(), "(#t #f . #t)");
    let nested = Value::cons(integer_list(&[1]), Value::cons(Value::EmptyList, Value::EmptyList));
    assert_eq!(nested.to_string(), "((1) nil)");
}

#[test]
fn list_predicates() -> Result<()> {
    assert!(Value::EmptyList.is_proper_list());
    assert!(integer_list(&[1, 2]).is_proper_list());
    let improper = Value::cons(Value::Boolean(true), Value::Boolean(false));
    assert!(!improper.is_proper_list());
    assert!(!Value::Boolean(true).is_proper_list());

    assert_eq!(integer_list(&[4, 5, 6]).list_length()?, 3);
    assert_eq!(Value::EmptyList.list_length()?, 0);
    assert_eq!(
        improper.list_length(),
        error!(EvaluationError::ImproperList("(#t . #f)".to_string()))
    );
    Ok(())
}

#[test]
fn list_indexing() -> Result<()> {
    let list = integer_list(&[10, 20, 30]);
    assert_eq!(list.list_ref(0)?, integer_list(&[10, 20, 30]).list_elements()?[0]);
    assert_eq!(list.list_ref(2)?.to_string(), "30");
    assert_eq!(list.list_ref(3), error!(EvaluationError::IndexOutOfRange(3)));
    assert_eq!(list.list_ref(-1), error!(EvaluationError::IndexOutOfRange(-1)));

    let improper = Value::cons(Value::Boolean(true), Value::Boolean(false));
    assert_eq!(improper.list_ref(0)?, Value::Boolean(true));
    assert_eq!(
        improper.list_ref(1),
        error!(EvaluationError::IndexOutOfRange(1))
    );
    assert_eq!(
        Value::EmptyList.list_ref(0),
        error!(EvaluationError::IndexOutOfRange(0))
    );
    Ok(())
}

#[test]
fn structural_equality() {
    assert_eq!(integer_list(&[1, 2, 3]), integer_list(&[1, 2, 3]));
    assert_ne!(integer_list(&[1, 2, 3]), integer_list(&[1, 2]));
    assert_ne!(integer_list(&[1, 2]), integer_list(&[1, 3]));
}

#[test]
fn long_lists_drop_iteratively() {
    let long = (0..1_000_000)
        .map(|i| Value::Number(crate::values::Number::Integer(i)))
        .collect::<Value>();
    assert_eq!(long.list_length(), Ok(1_000_000));
    drop(long);
}
