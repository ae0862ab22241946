use thiserror::Error;

use crate::values::{ParameterFormals, Type};

#[derive(Error, Debug, PartialEq, Clone)]
pub enum EvaluationError {
    #[error("{0} is not {1:?}")]
    TypeMismatch(/* value string */ String, Type),
    #[error("expect {}{} arguments, got {}. parameter list is: {}",
    if (.0).1.is_some() { "at least " } else { "" },
    (.0).0.len(),
    .1,
    .0,)
    ]
    ArgumentMismatch(ParameterFormals, usize),
    #[error("cannot evaluate an empty combination ()")]
    EmptyCall,
    #[error("{0} is not callable")]
    NotCallable(String),
    #[error("malformed special form: {0}")]
    MalformedForm(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("index {0} out of range")]
    IndexOutOfRange(i64),
    #[error("{0} is not a proper list")]
    ImproperList(String),
    #[error("maximum recursion depth {0} exceeded")]
    RecursionDepthExceeded(usize),
}

#[test]
fn argument_mismatch_message() {
    let fixed = EvaluationError::ArgumentMismatch(crate::param_fixed!["x", "y"], 1);
    assert_eq!(
        fixed.to_string(),
        "expect 2 arguments, got 1. parameter list is: (x y)"
    );
    let variadic = EvaluationError::ArgumentMismatch(
        crate::append_variadic_param!(crate::param_fixed!["x"], "rest"),
        0,
    );
    assert_eq!(
        variadic.to_string(),
        "expect at least 1 arguments, got 0. parameter list is: (x . rest)"
    );
}
