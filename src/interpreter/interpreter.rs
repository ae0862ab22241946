use std::{cell::Cell, path::Path, rc::Rc};

use super::error::EvaluationError;
use super::special_form::SpecialForm;
use super::Result;
use crate::environment::Environment;
use crate::file::file_char_stream;
use crate::parser::{parse, tokenize, validate, Expression, ExpressionBody, Lexer, Parser, Token};
use crate::values::{ArgVec, Procedure, SchemeProcedure, Value};

/// Nesting limit of user procedure applications before evaluation gives up.
pub const DEFAULT_MAX_DEPTH: usize = 3000;

pub struct Interpreter {
    pub env: Rc<Environment>,
    max_depth: usize,
    depth: Cell<usize>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_environment(Environment::global())
    }

    pub fn with_environment(env: Rc<Environment>) -> Self {
        Self {
            env,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: Cell::new(0),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn enter(&self) -> Result<DepthGuard<'_>> {
        let depth = self.depth.get() + 1;
        if depth > self.max_depth {
            return error!(EvaluationError::RecursionDepthExceeded(self.max_depth));
        }
        self.depth.set(depth);
        Ok(DepthGuard(&self.depth))
    }

    pub fn eval_expression(&self, expression: &Expression, env: &Rc<Environment>) -> Result<Value> {
        let result = match &expression.data {
            ExpressionBody::Number(number) => Ok(Value::Number(*number)),
            ExpressionBody::Symbol(name) => match name.as_str() {
                "#t" => Ok(Value::Boolean(true)),
                "#f" => Ok(Value::Boolean(false)),
                "nil" => Ok(Value::EmptyList),
                _ => env.lookup(name),
            },
            ExpressionBody::List(elements) => match elements.split_first() {
                None => error!(EvaluationError::EmptyCall),
                Some((head, operands)) => {
                    match head.as_symbol().and_then(SpecialForm::from_keyword) {
                        Some(form) => self.eval_special_form(form, operands, env),
                        None => self.eval_procedure_call(head, operands, env),
                    }
                }
            },
        };
        result.map_err(|e| e.or_locate(expression.location))
    }

    fn eval_procedure_call(
        &self,
        procedure_expr: &Expression,
        arguments: &[Expression],
        env: &Rc<Environment>,
    ) -> Result<Value> {
        let procedure = match self.eval_expression(procedure_expr, env)? {
            Value::Procedure(procedure) => procedure,
            other => {
                return located_error!(
                    EvaluationError::NotCallable(other.to_string()),
                    procedure_expr.location
                )
            }
        };
        let evaluated_args = arguments
            .iter()
            .map(|arg| self.eval_expression(arg, env))
            .collect::<Result<ArgVec>>()?;
        self.apply_procedure(&procedure, evaluated_args)
    }

    pub fn apply_procedure(&self, procedure: &Procedure, args: ArgVec) -> Result<Value> {
        let formals = procedure.get_parameters();
        if !formals.accepts(args.len()) {
            return error!(EvaluationError::ArgumentMismatch(
                formals.clone(),
                args.len()
            ));
        }
        log::trace!("applying {} to {} arguments", procedure, args.len());
        match procedure {
            Procedure::Builtin(builtin) => (builtin.body)(args),
            Procedure::User(user, closure) => {
                let _guard = self.enter()?;
                let SchemeProcedure(formals, body) = &**user;
                let local_env = Rc::new(Environment::new_child(closure.clone()));
                let mut arg_iter = args.into_iter();
                for (name, arg) in formals.0.iter().zip(arg_iter.by_ref()) {
                    local_env.define(name.clone(), arg);
                }
                if let Some(variadic) = &formals.1 {
                    local_env.define(variadic.clone(), arg_iter.collect());
                }
                self.eval_body(body, &local_env)
            }
        }
    }

    /// Evaluates expressions in order, yielding the last value.
    pub(crate) fn eval_body(&self, body: &[Expression], env: &Rc<Environment>) -> Result<Value> {
        match body.split_last() {
            Some((last, init)) => {
                for expression in init {
                    self.eval_expression(expression, env)?;
                }
                self.eval_expression(last, env)
            }
            None => error!(EvaluationError::MalformedForm("empty body".to_string())),
        }
    }

    /// Parses and evaluates the first expression of `source`.
    pub fn eval(&self, source: &str) -> Result<Value> {
        let expression = parse(&tokenize(source))?;
        self.eval_expression(&expression, &self.env)
    }

    /// Evaluates every top-level form of `source` in order.
    pub fn eval_program(&self, source: &str) -> Result<Option<Value>> {
        let tokens = tokenize(source);
        if tokens.is_empty() {
            return Ok(None);
        }
        validate(&tokens)?;
        Parser::from_lexer(tokens.into_iter()).try_fold(None, |_, expression| {
            self.eval_expression(&expression?, &self.env).map(Some)
        })
    }

    pub fn eval_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let expression = parse_file(path.as_ref())?;
        self.eval_expression(&expression, &self.env)
    }
}

fn parse_file(path: &Path) -> Result<Expression> {
    log::debug!("loading {}", path.display());
    let tokens: Vec<Token> = Lexer::from_char_stream(file_char_stream(path)?).collect();
    parse(&tokens)
}

/// Evaluates the expression stored in the file at `path` in `env`.
///
/// Bindings the file makes stay in `env` afterwards.
pub fn evaluate_file(path: &Path, env: &Rc<Environment>) -> Result<Value> {
    Interpreter::with_environment(env.clone()).eval_file(path)
}

#[cfg(test)]
use crate::error::*;
#[cfg(test)]
use crate::values::{Number, Type};

#[test]
fn number() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval("-1")?, Value::Number(Number::Integer(-1)));
    assert!(matches!(
        interpreter.eval("-3.45e-7")?,
        Value::Number(Number::Real(r)) if r == -3.45e-7
    ));
    Ok(())
}

#[test]
fn self_evaluating_symbols() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval("#t")?, Value::Boolean(true));
    assert_eq!(interpreter.eval("#f")?, Value::Boolean(false));
    assert_eq!(interpreter.eval("nil")?, Value::EmptyList);
    Ok(())
}

#[test]
fn arithmetic() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval("(+ 1 2 3)")?, Value::Number(Number::Integer(6)));
    assert_eq!(interpreter.eval("(- 5)")?, Value::Number(Number::Integer(-5)));
    assert_eq!(interpreter.eval("(- 10 2 3)")?, Value::Number(Number::Integer(5)));
    assert_eq!(interpreter.eval("(* 2 3 4)")?, Value::Number(Number::Integer(24)));
    assert_eq!(interpreter.eval("(/ 8 2 2)")?, Value::Number(Number::Integer(2)));
    assert_eq!(
        interpreter.eval("(/ 1 0)"),
        error!(EvaluationError::DivisionByZero)
    );
    assert_eq!(
        interpreter.eval("(+ 1 (* 2 1.5))")?.to_string(),
        "4.0"
    );
    Ok(())
}

#[test]
fn undefined() {
    let interpreter = Interpreter::new();
    assert_eq!(
        interpreter.eval("foo"),
        error!(NameError::UnboundSymbol("foo".to_string()))
    );
    assert_eq!(
        interpreter.eval("(foo 1)"),
        error!(NameError::UnboundSymbol("foo".to_string()))
    );
}

#[test]
fn empty_call() {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval("()"), error!(EvaluationError::EmptyCall));
}

#[test]
fn not_callable() {
    let interpreter = Interpreter::new();
    assert_eq!(
        interpreter.eval("(1 2)"),
        error!(EvaluationError::NotCallable("1".to_string()))
    );
    assert_eq!(
        interpreter.eval("((list 1) 2)"),
        error!(EvaluationError::NotCallable("(1)".to_string()))
    );
}

#[test]
fn variable_definition() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(
        interpreter.eval_program("(define a 1) (define b a) b")?,
        Some(Value::Number(Number::Integer(1)))
    );
    Ok(())
}

#[test]
fn builtin_procedural() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(
        interpreter.eval_program("(define (get-add) +) ((get-add) 1 2)")?,
        Some(Value::Number(Number::Integer(3)))
    );
    Ok(())
}

#[test]
fn procedure_definition() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(
        interpreter.eval_program("(define add (lambda (x y) (+ x y))) (add 1 2)")?,
        Some(Value::Number(Number::Integer(3)))
    );
    assert_eq!(
        interpreter.eval("(add 1)"),
        error!(EvaluationError::ArgumentMismatch(
            crate::param_fixed!["x", "y"],
            1
        ))
    );
    Ok(())
}

#[test]
fn procedure_debug() -> Result<()> {
    let interpreter = Interpreter::new();
    // the closure environment binds the procedure itself
    let value = interpreter.eval("(define (f x) (f x))")?;
    assert_eq!(format!("{}", value), "<procedure (lambda (x))>");
    println!("{:?}", value);
    Ok(())
}

#[test]
fn variadic_procedures() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(
        interpreter.eval("((lambda args args) 1 2 3)")?.to_string(),
        "(1 2 3)"
    );
    assert_eq!(
        interpreter.eval("((lambda args args))")?,
        Value::EmptyList
    );
    assert_eq!(
        interpreter.eval("((lambda (a . rest) rest) 1 2 3)")?.to_string(),
        "(2 3)"
    );
    assert_eq!(
        interpreter
            .eval_program("(define (tail first . rest) rest) (tail 1)")?
            .map(|v| v.to_string()),
        Some("nil".to_string())
    );
    Ok(())
}

#[test]
fn builtin_type_errors_are_located_at_call() {
    let interpreter = Interpreter::new();
    let error = interpreter.eval("(+ 1\n (car 5))").unwrap_err();
    assert_eq!(
        error,
        ErrorData::from(EvaluationError::TypeMismatch("5".to_string(), Type::Pair)).no_locate()
    );
    assert_eq!(error.location, Some([2, 2]));
}

#[test]
fn program_with_no_forms() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval_program("  ; nothing\n")?, None);
    Ok(())
}

#[test]
fn recursion() -> Result<()> {
    let interpreter = Interpreter::new();
    interpreter.eval("(define (fact n) (if (<= n 1) 1 (* n (fact (- n 1)))))")?;
    assert_eq!(
        interpreter.eval("(fact 10)")?,
        Value::Number(Number::Integer(3628800))
    );
    Ok(())
}

#[test]
fn depth_limit() -> Result<()> {
    let interpreter = Interpreter::new().with_max_depth(50);
    interpreter.eval("(define (loop n) (+ 1 (loop n)))")?;
    assert_eq!(
        interpreter.eval("(loop 0)"),
        error!(EvaluationError::RecursionDepthExceeded(50))
    );
    // the counter unwinds after a failure
    assert_eq!(
        interpreter.eval("(+ 1 2)")?,
        Value::Number(Number::Integer(3))
    );
    assert_eq!(interpreter.depth.get(), 0);
    Ok(())
}

#[test]
fn depth_counts_procedure_applications() -> Result<()> {
    let interpreter = Interpreter::new().with_max_depth(20);
    interpreter.eval("(define (count n) (if (equal? n 0) 0 (+ 1 (count (- n 1)))))")?;
    // deeply nested builtin calls do not count
    assert_eq!(
        interpreter.eval("(+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 0)))))))))))))))))))))")?,
        Value::Number(Number::Integer(21))
    );
    assert_eq!(
        interpreter.eval("(count 19)")?,
        Value::Number(Number::Integer(19))
    );
    assert_eq!(
        interpreter.eval("(count 20)"),
        error!(EvaluationError::RecursionDepthExceeded(20))
    );
    Ok(())
}
