use framelisp::{
    error::{ErrorData, SchemeError},
    interpreter::{error::EvaluationError, Interpreter},
    values::{Number, Value},
};

#[test]
fn pairs() -> Result<(), SchemeError> {
    let source = include_str!("pairs.scm");
    let it = Interpreter::new();
    let summary = it.eval_program(source)?.map(|value| value.to_string());
    assert_eq!(
        summary.as_deref(),
        Some("(#t #f 4 1 3 30 (1 2 3 4 1 4 9 16) (1 9) ((1 2) 3))")
    );
    Ok(())
}

#[test]
fn list_structure() -> Result<(), SchemeError> {
    let it = Interpreter::new();
    assert_eq!(
        it.eval("(list 1 2 3)")?,
        Value::cons(
            Value::Number(Number::Integer(1)),
            Value::cons(
                Value::Number(Number::Integer(2)),
                Value::cons(Value::Number(Number::Integer(3)), Value::EmptyList)
            )
        )
    );
    assert_eq!(it.eval("(cons 1 (cons 2 3))")?.to_string(), "(1 2 . 3)");
    assert_eq!(it.eval("(cdr (cons 1 2))")?, Value::Number(Number::Integer(2)));
    assert_eq!(it.eval("(car (cdr (list 1 2)))")?, Value::Number(Number::Integer(2)));
    Ok(())
}

#[test]
fn list_queries() -> Result<(), SchemeError> {
    let it = Interpreter::new();
    assert_eq!(it.eval("(list? nil)")?, Value::Boolean(true));
    assert_eq!(it.eval("(list? (list 1 2))")?, Value::Boolean(true));
    assert_eq!(it.eval("(list? (cons 1 2))")?, Value::Boolean(false));
    assert_eq!(it.eval("(list? 5)")?, Value::Boolean(false));
    assert_eq!(it.eval("(length nil)")?, Value::Number(Number::Integer(0)));
    assert_eq!(it.eval("(length (list 1 2 3))")?, Value::Number(Number::Integer(3)));
    assert_eq!(it.eval("(list-ref (cons 7 8) 0)")?, Value::Number(Number::Integer(7)));
    assert!(matches!(
        it.eval("(length (cons 1 2))").map_err(|e| e.extract_data()),
        Err(ErrorData::Evaluation(EvaluationError::ImproperList(_)))
    ));
    assert!(matches!(
        it.eval("(list-ref (list 1 2) 2)").map_err(|e| e.extract_data()),
        Err(ErrorData::Evaluation(EvaluationError::IndexOutOfRange(2)))
    ));
    assert!(matches!(
        it.eval("(list-ref (cons 7 8) 1)").map_err(|e| e.extract_data()),
        Err(ErrorData::Evaluation(EvaluationError::IndexOutOfRange(1)))
    ));
    assert!(matches!(
        it.eval("(car nil)").map_err(|e| e.extract_data()),
        Err(ErrorData::Evaluation(EvaluationError::TypeMismatch(..)))
    ));
    Ok(())
}

#[test]
fn append_copies_inputs() -> Result<(), SchemeError> {
    let it = Interpreter::new();
    it.eval_program("(define a (list 1 2)) (define b (list 3)) (define c (append a b))")?;
    assert_eq!(it.eval("c")?.to_string(), "(1 2 3)");
    assert_eq!(it.eval("a")?.to_string(), "(1 2)");
    assert_eq!(it.eval("b")?.to_string(), "(3)");
    assert_eq!(it.eval("(append)")?, Value::EmptyList);
    assert_eq!(it.eval("(append nil nil)")?, Value::EmptyList);
    assert_eq!(it.eval("(append (list 1) nil (list 2))")?.to_string(), "(1 2)");
    assert!(matches!(
        it.eval("(append 1 (list 2))").map_err(|e| e.extract_data()),
        Err(ErrorData::Evaluation(EvaluationError::ImproperList(_)))
    ));
    for source in ["(append 5)", "(append (list 1) 5)", "(append (list 1) (cons 2 3))"] {
        assert!(
            matches!(
                it.eval(source).map_err(|e| e.extract_data()),
                Err(ErrorData::Evaluation(EvaluationError::ImproperList(_)))
            ),
            "{} should fail",
            source
        );
    }
    assert_eq!(it.eval("(list? (append (list 1) (list 2)))")?, Value::Boolean(true));
    Ok(())
}
