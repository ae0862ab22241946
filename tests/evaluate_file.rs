use std::{path::PathBuf, rc::Rc, thread};

use framelisp::{
    environment::Environment,
    error::{ErrorData, SchemeError},
    interpreter::{evaluate_file, Interpreter, DEFAULT_MAX_DEPTH},
    parser::error::SyntaxError,
    values::{Number, Value},
};

fn script(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("scripts")
        .join(name)
}

#[test]
fn file_bindings_persist() -> Result<(), SchemeError> {
    let env = Environment::global();
    assert_eq!(
        evaluate_file(&script("geometry.scm"), &env)?,
        Value::Number(Number::Integer(25))
    );
    let it = Interpreter::with_environment(Rc::clone(&env));
    assert_eq!(it.eval("(square 5)")?, Value::Number(Number::Integer(25)));
    assert_eq!(it.eval("hypotenuse-squared")?, Value::Number(Number::Integer(25)));
    Ok(())
}

#[test]
fn broken_file_is_a_syntax_error() {
    let env = Environment::global();
    assert_eq!(
        evaluate_file(&script("broken.scm"), &env).map_err(|e| e.extract_data()),
        Err(ErrorData::Syntax(SyntaxError::UnbalancedParentheses(3, 2)))
    );
    assert!(env.get("f").is_none());
}

#[test]
fn missing_file_is_an_io_error() {
    let env = Environment::global();
    assert!(matches!(
        evaluate_file(&script("missing.scm"), &env).map_err(|e| e.extract_data()),
        Err(ErrorData::Io(_))
    ));
}

#[test]
fn deep_recursion_within_limit() {
    // same stack size the binary runs the interpreter with
    let handle = thread::Builder::new()
        .stack_size(framelisp::options::DEFAULT_STACK_SIZE)
        .spawn(|| {
            let it = Interpreter::new();
            it.eval("(define (count n) (if (equal? n 0) 0 (+ 1 (count (- n 1)))))")
                .map(|_| ())
                .map_err(|e| e.to_string())?;
            it.eval("(define (range a b) (if (>= a b) nil (cons a (range (+ a 1) b))))")
                .map(|_| ())
                .map_err(|e| e.to_string())?;
            // values hold `Rc`s, so only their text leaves the thread
            let within = it.eval("(count 1000)").map_err(|e| e.to_string())?;
            let built = it
                .eval("(length (range 0 500))")
                .map_err(|e| e.to_string())?
                .to_string();
            let beyond = it
                .eval("(count 100000)")
                .map(|value| value.to_string())
                .map_err(|e| e.extract_data());
            let within = within.to_string();
            Ok::<_, String>((within, built, beyond))
        })
        .expect("spawn interpreter thread");
    let (within, built, beyond) = handle.join().expect("interpreter thread").unwrap();
    assert_eq!(within, "1000");
    assert_eq!(built, "500");
    assert!(matches!(
        beyond,
        Err(ErrorData::Evaluation(
            framelisp::interpreter::error::EvaluationError::RecursionDepthExceeded(
                DEFAULT_MAX_DEPTH
            )
        ))
    ));
}
