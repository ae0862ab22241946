use framelisp::{
    error::{ErrorData, SchemeError, ToLocated},
    interpreter::{error::EvaluationError, Interpreter},
    values::{Number, Type, Value},
};

fn integer(i: i64) -> Value {
    Value::Number(Number::Integer(i))
}

#[test]
fn arithmetic_identities() -> Result<(), SchemeError> {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval("(+)")?, integer(0));
    assert_eq!(interpreter.eval("(*)")?, integer(1));
    assert_eq!(interpreter.eval("(+ 1 2 3)")?, integer(6));
    assert_eq!(interpreter.eval("(- 5)")?, integer(-5));
    assert_eq!(interpreter.eval("(- 10 2 3)")?, integer(5));
    assert_eq!(interpreter.eval("(* 2 3 4)")?, integer(24));
    assert_eq!(interpreter.eval("(/ 8 2 2)")?, integer(2));
    assert_eq!(interpreter.eval("(/ 1 2)")?.to_string(), "0.5");
    assert_eq!(interpreter.eval("(/ 4)")?.to_string(), "0.25");
    assert_eq!(interpreter.eval("(- 1.5 0.5)")?.to_string(), "1.0");
    Ok(())
}

#[test]
fn arithmetic_errors() {
    let interpreter = Interpreter::new();
    assert_eq!(
        interpreter.eval("(+ 1 #t)"),
        Err(
            ErrorData::from(EvaluationError::TypeMismatch("#t".to_owned(), Type::Number))
                .no_locate()
        )
    );
    assert_eq!(
        interpreter.eval("(/ 5 0)"),
        Err(ErrorData::from(EvaluationError::DivisionByZero).no_locate())
    );
    assert_eq!(
        interpreter.eval("(* 9223372036854775807 2)"),
        Err(ErrorData::from(EvaluationError::IntegerOverflow).no_locate())
    );
    assert!(matches!(
        interpreter.eval("(-)").map_err(|e| e.extract_data()),
        Err(ErrorData::Evaluation(EvaluationError::ArgumentMismatch(_, 0)))
    ));
}

#[test]
fn chained_comparisons() -> Result<(), SchemeError> {
    let interpreter = Interpreter::new();
    for (source, expected) in [
        ("(> 3 2 1)", true),
        ("(> 3 2 2)", false),
        ("(>= 3 2 2)", true),
        ("(< 1 2 3.5)", true),
        ("(< 1 3 2)", false),
        ("(<= 1 1 1)", true),
        ("(<)", true),
        ("(> 1)", true),
        ("(equal? 1 1.0 1)", true),
        ("(equal? (list 1 2) (list 1 2))", true),
        ("(equal? (list 1 2) (list 1 2 3))", false),
        ("(equal? #t 1)", false),
        ("(equal? car car)", true),
        ("(equal? car cdr)", false),
    ] {
        assert_eq!(
            interpreter.eval(source)?,
            Value::Boolean(expected),
            "{}",
            source
        );
    }
    Ok(())
}

#[test]
fn not_only_inverts_false() -> Result<(), SchemeError> {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval("(not #f)")?, Value::Boolean(true));
    assert_eq!(interpreter.eval("(not #t)")?, Value::Boolean(false));
    assert_eq!(interpreter.eval("(not 0)")?, Value::Boolean(false));
    assert_eq!(interpreter.eval("(not (> 1 2))")?, Value::Boolean(true));
    assert!(interpreter.eval("(not #t #f)").is_err());
    Ok(())
}

#[test]
fn builtins_are_values() -> Result<(), SchemeError> {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval("car")?.to_string(), "<builtin procedure car>");
    interpreter.eval("(define plus +)")?;
    assert_eq!(interpreter.eval("(plus 2 2)")?, integer(4));
    interpreter.eval("(define (twice f x) (f (f x)))")?;
    assert_eq!(
        interpreter.eval("(twice cdr (list 1 2 3))")?.to_string(),
        "(3)"
    );
    Ok(())
}

#[test]
fn procedures_compare_by_identity() -> Result<(), SchemeError> {
    let interpreter = Interpreter::new();
    assert_eq!(
        interpreter.eval("(equal? (lambda (x) x) (lambda (x) x))")?,
        Value::Boolean(false)
    );
    interpreter.eval_program("(define (f x) x) (define (g x) x) (define h f)")?;
    assert_eq!(interpreter.eval("(equal? f g)")?, Value::Boolean(false));
    assert_eq!(interpreter.eval("(equal? f f)")?, Value::Boolean(true));
    assert_eq!(interpreter.eval("(equal? f h)")?, Value::Boolean(true));
    assert_eq!(interpreter.eval("(equal? (list f) (list f))")?, Value::Boolean(true));
    Ok(())
}
