use framelisp::{
    error::SchemeError,
    interpreter::Interpreter,
    values::{Number, Value},
};

fn integer(i: i64) -> Value {
    Value::Number(Number::Integer(i))
}

#[test]
fn closures_see_later_redefinitions() -> Result<(), SchemeError> {
    let it = Interpreter::new();
    it.eval_program("(define y 1) (define (get-y) y)")?;
    assert_eq!(it.eval("(get-y)")?, integer(1));
    it.eval("(define y 2)")?;
    assert_eq!(it.eval("(get-y)")?, integer(2));
    Ok(())
}

#[test]
fn let_shadows_without_mutating() -> Result<(), SchemeError> {
    let it = Interpreter::new();
    it.eval("(define x 1)")?;
    assert_eq!(it.eval("(let ((x 5)) (* x 2))")?, integer(10));
    assert_eq!(it.eval("x")?, integer(1));
    Ok(())
}

#[test]
fn set_inside_closure_mutates_outer_binding() -> Result<(), SchemeError> {
    let it = Interpreter::new();
    it.eval_program(
        "(define count 0)
         (define (bump!) (set! count (+ count 1)))
         (bump!)
         (bump!)",
    )?;
    assert_eq!(it.eval("count")?, integer(2));
    Ok(())
}

#[test]
fn closures_capture_their_frame() -> Result<(), SchemeError> {
    let it = Interpreter::new();
    it.eval_program(
        "(define (make-counter)
           (let ((n 0))
             (lambda () (set! n (+ n 1)) n)))
         (define a (make-counter))
         (define b (make-counter))",
    )?;
    assert_eq!(it.eval("(a)")?, integer(1));
    assert_eq!(it.eval("(a)")?, integer(2));
    assert_eq!(it.eval("(b)")?, integer(1));
    Ok(())
}

#[test]
fn same_arguments_same_result() -> Result<(), SchemeError> {
    let it = Interpreter::new();
    it.eval("(define (adder n) (lambda (x) (+ x n)))")?;
    it.eval("(define add5 (adder 5))")?;
    assert_eq!(it.eval("(add5 10)")?, it.eval("(add5 10)")?);
    assert_eq!(it.eval("((adder 1) 1)")?, integer(2));
    Ok(())
}

#[test]
fn parameters_shadow_globals() -> Result<(), SchemeError> {
    let it = Interpreter::new();
    it.eval_program("(define x 100) (define (f x) (* x 2))")?;
    assert_eq!(it.eval("(f 3)")?, integer(6));
    assert_eq!(it.eval("x")?, integer(100));
    Ok(())
}

#[test]
fn builtins_can_be_shadowed() -> Result<(), SchemeError> {
    let it = Interpreter::new();
    it.eval("(define (car x) 42)")?;
    assert_eq!(it.eval("(car (list 1))")?, integer(42));
    it.eval("(del car)")?;
    assert_eq!(it.eval("(car (list 1))")?, integer(1));
    // special forms are recognized before any lookup
    it.eval("(define list 5)")?;
    assert_eq!(it.eval("(list 1 2)")?.to_string(), "(1 2)");
    assert_eq!(it.eval("list")?, integer(5));
    Ok(())
}

#[test]
fn environments_are_independent() -> Result<(), SchemeError> {
    let first = Interpreter::new();
    let second = Interpreter::new();
    first.eval("(set! + -)")?;
    assert_eq!(first.eval("(+ 5 3)")?, integer(2));
    assert_eq!(second.eval("(+ 5 3)")?, integer(8));
    Ok(())
}
