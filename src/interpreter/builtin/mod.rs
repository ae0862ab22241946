use std::collections::HashMap;

use super::error::EvaluationError;
use crate::error::SchemeError;
use crate::values::{ArgVec, BuiltinProcedure, ParameterFormals, Value};

type Result<T> = std::result::Result<T, SchemeError>;

mod arithmetic;
mod list;

pub type BuiltinTable = HashMap<&'static str, BuiltinProcedure>;

macro_rules! function_mapping {
    ($ident:tt, $parameter:expr, $function:expr) => {
        (
            $ident,
            BuiltinProcedure {
                name: $ident,
                parameters: $parameter,
                body: $function,
            },
        )
    };
}

lazy_static! {
    static ref BUILTINS: BuiltinTable = vec![
        function_mapping!("+", append_variadic_param!(param_fixed![], "x"), arithmetic::add),
        function_mapping!("-", append_variadic_param!(param_fixed!["x1"], "x"), arithmetic::sub),
        function_mapping!("*", append_variadic_param!(param_fixed![], "x"), arithmetic::mul),
        function_mapping!("/", append_variadic_param!(param_fixed!["x1"], "x"), arithmetic::div),
        function_mapping!(">", append_variadic_param!(param_fixed![], "x"), arithmetic::greater),
        function_mapping!(
            ">=",
            append_variadic_param!(param_fixed![], "x"),
            arithmetic::greater_equal
        ),
        function_mapping!("<", append_variadic_param!(param_fixed![], "x"), arithmetic::less),
        function_mapping!(
            "<=",
            append_variadic_param!(param_fixed![], "x"),
            arithmetic::less_equal
        ),
        function_mapping!(
            "equal?",
            append_variadic_param!(param_fixed![], "obj"),
            arithmetic::equal
        ),
        function_mapping!("not", param_fixed!["obj"], arithmetic::not),
        function_mapping!("car", param_fixed!["pair"], list::car),
        function_mapping!("cdr", param_fixed!["pair"], list::cdr),
        function_mapping!("list?", param_fixed!["obj"], list::is_list),
        function_mapping!("length", param_fixed!["list"], list::length),
        function_mapping!("list-ref", param_fixed!["list", "k"], list::list_ref),
        function_mapping!(
            "append",
            append_variadic_param!(param_fixed![], "lists"),
            list::append
        ),
    ]
    .into_iter()
    .collect();
}

/// The builtin procedures, created once per process.
pub fn builtin_table() -> &'static BuiltinTable {
    &BUILTINS
}

/// Unpacks exactly `N` arguments.
pub fn expect_arguments<const N: usize>(arguments: ArgVec) -> Result<[Value; N]> {
    let count = arguments.len();
    match <[Value; N]>::try_from(arguments.into_vec()) {
        Ok(values) => Ok(values),
        Err(_) => error!(EvaluationError::ArgumentMismatch(
            ParameterFormals((1..=N).map(|i| format!("x{}", i)).collect(), None),
            count
        )),
    }
}

#[test]
fn builtin_parameters_length() {
    let table = builtin_table();
    assert_eq!(table.len(), 16);
    assert!(table["car"].parameters.accepts(1));
    assert!(!table["car"].parameters.accepts(2));
    assert!(table["-"].parameters.accepts(3));
    assert!(!table["-"].parameters.accepts(0));
    assert!(table["+"].parameters.accepts(0));
    assert_eq!(table["list-ref"].name, "list-ref");
}

#[test]
fn unpack_arguments() {
    use crate::values::Number;
    let arguments: ArgVec = smallvec::smallvec![Value::Boolean(true), Value::EmptyList];
    assert_eq!(
        expect_arguments::<2>(arguments.clone()),
        Ok([Value::Boolean(true), Value::EmptyList])
    );
    assert_eq!(
        expect_arguments::<1>(arguments),
        error!(EvaluationError::ArgumentMismatch(param_fixed!["x1"], 2))
    );
    let one: ArgVec = smallvec::smallvec![Value::Number(Number::Integer(3))];
    assert!(expect_arguments::<1>(one).is_ok());
}
