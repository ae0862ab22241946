use framelisp::{
    error::{ErrorData, NameError, SchemeError},
    interpreter::{error::EvaluationError, Interpreter},
    parser::error::SyntaxError,
    values::{Number, Value},
};

fn category(result: Result<Value, SchemeError>) -> &'static str {
    match result {
        Ok(value) => panic!("expected an error, got {}", value),
        Err(e) => e.category(),
    }
}

#[test]
fn error_categories() {
    let it = Interpreter::new();
    assert_eq!(category(it.eval("(foo)")), "SchemeNameError");
    assert_eq!(category(it.eval(")(")), "SchemeSyntaxError");
    assert_eq!(category(it.eval("(car 5)")), "SchemeEvaluationError");
    assert_eq!(
        category(it.eval("((lambda (x y) x) 1)")),
        "SchemeEvaluationError"
    );
    assert_eq!(category(it.eval("()")), "SchemeEvaluationError");
    assert_eq!(category(it.eval("(1 2)")), "SchemeEvaluationError");
}

#[test]
fn syntax_errors() {
    let it = Interpreter::new();
    for (source, expected) in [
        ("", SyntaxError::UnexpectedEnd),
        (")(", SyntaxError::UnmatchedParentheses),
        ("(+ 1", SyntaxError::UnbalancedParentheses(1, 0)),
        ("(+ 1))", SyntaxError::UnbalancedParentheses(1, 2)),
        ("1 2", SyntaxError::UngroupedAtoms),
    ] {
        assert_eq!(
            it.eval(source).map_err(|e| e.extract_data()),
            Err(ErrorData::Syntax(expected)),
            "{:?}",
            source
        );
    }
    assert_eq!(
        it.eval_program("(define x 1) (+ x").map_err(|e| e.extract_data()),
        Err(ErrorData::Syntax(SyntaxError::UnbalancedParentheses(2, 1)))
    );
}

#[test]
fn errors_carry_locations() {
    let it = Interpreter::new();
    let error = it.eval("(+ 1\n   undefined)").unwrap_err();
    assert_eq!(
        error.data,
        ErrorData::Name(NameError::UnboundSymbol("undefined".to_string()))
    );
    assert_eq!(error.location, Some([2, 4]));
    assert!(error.to_string().ends_with("(at 2:4)"));
}

#[test]
fn failed_forms_keep_committed_bindings() -> Result<(), SchemeError> {
    let it = Interpreter::new();
    assert!(it.eval_program("(define a 1) (car a) (define b 2)").is_err());
    assert_eq!(it.eval("a")?, Value::Number(Number::Integer(1)));
    assert!(it.eval("b").is_err());
    Ok(())
}

#[test]
fn runaway_recursion_is_reported() {
    let it = Interpreter::new().with_max_depth(50);
    let result = it.eval_program("(define (forever n) (forever (+ n 1))) (forever 0)");
    assert_eq!(
        result.map_err(|e| e.extract_data()),
        Err(ErrorData::Evaluation(
            EvaluationError::RecursionDepthExceeded(50)
        ))
    );
}
