use std::{collections::HashSet, fmt, rc::Rc};

use itertools::join;

use super::error::EvaluationError;
use super::{Interpreter, Result};
use crate::environment::Environment;
use crate::parser::{Expression, ExpressionBody};
use crate::values::{ParameterFormals, Procedure, SchemeProcedure, Value};

/// Keywords evaluated by their own rule instead of as procedure calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecialForm {
    Define,
    Lambda,
    If,
    Begin,
    And,
    Or,
    Let,
    Set,
    Del,
    Cons,
    List,
}

impl SpecialForm {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "define" => SpecialForm::Define,
            "lambda" => SpecialForm::Lambda,
            "if" => SpecialForm::If,
            "begin" => SpecialForm::Begin,
            "and" => SpecialForm::And,
            "or" => SpecialForm::Or,
            "let" => SpecialForm::Let,
            "set!" => SpecialForm::Set,
            "del" => SpecialForm::Del,
            "cons" => SpecialForm::Cons,
            "list" => SpecialForm::List,
            _ => return None,
        })
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SpecialForm::Define => "define",
            SpecialForm::Lambda => "lambda",
            SpecialForm::If => "if",
            SpecialForm::Begin => "begin",
            SpecialForm::And => "and",
            SpecialForm::Or => "or",
            SpecialForm::Let => "let",
            SpecialForm::Set => "set!",
            SpecialForm::Del => "del",
            SpecialForm::Cons => "cons",
            SpecialForm::List => "list",
        }
    }
}

impl fmt::Display for SpecialForm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

fn malformed<T>(form: SpecialForm, operands: &[Expression]) -> Result<T> {
    let text = match operands.is_empty() {
        true => format!("({})", form),
        false => format!("({} {})", form, join(operands.iter().map(|e| &e.data), " ")),
    };
    error!(EvaluationError::MalformedForm(text))
}

// literals evaluate to themselves and can never be rebound
fn is_bindable(name: &str) -> bool {
    !matches!(name, "#t" | "#f" | "nil" | ".")
}

fn bindable_name(expression: &Expression) -> Option<&str> {
    expression.as_symbol().filter(|name| is_bindable(name))
}

/// Reads `(a b)`, `(a b . rest)` or a single symbol `args`.
fn parse_formals(formals: &Expression) -> Option<ParameterFormals> {
    match &formals.data {
        ExpressionBody::Symbol(_) => {
            let variadic = bindable_name(formals)?;
            Some(ParameterFormals(vec![], Some(variadic.to_string())))
        }
        ExpressionBody::List(names) => parse_formal_list(names),
        ExpressionBody::Number(_) => None,
    }
}

fn parse_formal_list(names: &[Expression]) -> Option<ParameterFormals> {
    let mut formals = ParameterFormals::new();
    let mut iter = names.iter();
    while let Some(name) = iter.next() {
        if name.as_symbol() == Some(".") {
            formals.1 = Some(bindable_name(iter.next()?)?.to_string());
            if iter.next().is_some() {
                return None;
            }
            break;
        }
        formals.0.push(bindable_name(name)?.to_string());
    }
    let unique = {
        let mut seen = HashSet::new();
        formals.0.iter().chain(formals.1.iter()).all(|name| seen.insert(name))
    };
    match unique {
        true => Some(formals),
        false => None,
    }
}

impl Interpreter {
    pub(crate) fn eval_special_form(
        &self,
        form: SpecialForm,
        operands: &[Expression],
        env: &Rc<Environment>,
    ) -> Result<Value> {
        log::trace!("special form {}", form);
        match form {
            SpecialForm::Define => self.eval_define(operands, env),
            SpecialForm::Lambda => match operands.split_first() {
                Some((formals, body)) if !body.is_empty() => match parse_formals(formals) {
                    Some(formals) => Ok(Self::new_procedure(formals, body, env)),
                    None => malformed(form, operands),
                },
                _ => malformed(form, operands),
            },
            SpecialForm::If => match operands {
                [test, consequent, alternative] => {
                    if self.eval_expression(test, env)?.is_true() {
                        self.eval_expression(consequent, env)
                    } else {
                        self.eval_expression(alternative, env)
                    }
                }
                _ => malformed(form, operands),
            },
            SpecialForm::Begin => match operands.is_empty() {
                true => malformed(form, operands),
                false => self.eval_body(operands, env),
            },
            SpecialForm::And => {
                for operand in operands {
                    if self.eval_expression(operand, env)? == Value::Boolean(false) {
                        return Ok(Value::Boolean(false));
                    }
                }
                Ok(Value::Boolean(true))
            }
            SpecialForm::Or => {
                for operand in operands {
                    if self.eval_expression(operand, env)?.is_true() {
                        return Ok(Value::Boolean(true));
                    }
                }
                Ok(Value::Boolean(false))
            }
            SpecialForm::Let => self.eval_let(operands, env),
            SpecialForm::Set => match operands {
                [name, value_expr] => match bindable_name(name) {
                    Some(name) => {
                        let value = self.eval_expression(value_expr, env)?;
                        env.set(name, value.clone())?;
                        Ok(value)
                    }
                    None => malformed(form, operands),
                },
                _ => malformed(form, operands),
            },
            SpecialForm::Del => match operands {
                [name] => match bindable_name(name) {
                    Some(name) => env.delete(name),
                    None => malformed(form, operands),
                },
                _ => malformed(form, operands),
            },
            SpecialForm::Cons => match operands {
                [car, cdr] => Ok(Value::cons(
                    self.eval_expression(car, env)?,
                    self.eval_expression(cdr, env)?,
                )),
                _ => malformed(form, operands),
            },
            SpecialForm::List => operands
                .iter()
                .map(|operand| self.eval_expression(operand, env))
                .collect::<Result<Vec<_>>>()
                .map(|elements| elements.into_iter().collect()),
        }
    }

    fn new_procedure(
        formals: ParameterFormals,
        body: &[Expression],
        env: &Rc<Environment>,
    ) -> Value {
        Value::Procedure(Procedure::User(
            Rc::new(SchemeProcedure(formals, body.to_vec())),
            env.clone(),
        ))
    }

    // (define name expr) or (define (name . formals) body...)
    fn eval_define(&self, operands: &[Expression], env: &Rc<Environment>) -> Result<Value> {
        let (target, rest) = match operands.split_first() {
            Some(split) => split,
            None => return malformed(SpecialForm::Define, operands),
        };
        let (name, value) = match (&target.data, rest) {
            (ExpressionBody::Symbol(_), [value_expr]) => match bindable_name(target) {
                Some(name) => (name, self.eval_expression(value_expr, env)?),
                None => return malformed(SpecialForm::Define, operands),
            },
            (ExpressionBody::List(signature), body) if !body.is_empty() => {
                let parsed = signature.split_first().and_then(|(name, formals)| {
                    Some((bindable_name(name)?, parse_formal_list(formals)?))
                });
                match parsed {
                    Some((name, formals)) => (name, Self::new_procedure(formals, body, env)),
                    None => return malformed(SpecialForm::Define, operands),
                }
            }
            _ => return malformed(SpecialForm::Define, operands),
        };
        env.define(name.to_string(), value.clone());
        Ok(value)
    }

    // (let ((name expr) ...) body...)
    fn eval_let(&self, operands: &[Expression], env: &Rc<Environment>) -> Result<Value> {
        let (bindings, body) = match operands.split_first() {
            Some((bindings, body)) if !body.is_empty() => (bindings, body),
            _ => return malformed(SpecialForm::Let, operands),
        };
        let bindings = match &bindings.data {
            ExpressionBody::List(bindings) => bindings,
            _ => return malformed(SpecialForm::Let, operands),
        };
        let local_env = Rc::new(Environment::new_child(env.clone()));
        for binding in bindings {
            match &binding.data {
                ExpressionBody::List(pair) => match pair.as_slice() {
                    [name, value_expr] => match bindable_name(name) {
                        Some(name) => {
                            let value = self.eval_expression(value_expr, env)?;
                            local_env.define(name.to_string(), value);
                        }
                        None => return malformed(SpecialForm::Let, operands),
                    },
                    _ => return malformed(SpecialForm::Let, operands),
                },
                _ => return malformed(SpecialForm::Let, operands),
            }
        }
        self.eval_body(body, &local_env)
    }
}

#[cfg(test)]
use crate::{
    error::{ErrorData, NameError},
    values::Number,
};

#[cfg(test)]
fn integer(i: i64) -> Value {
    Value::Number(Number::Integer(i))
}

#[test]
fn keywords() {
    for keyword in [
        "define", "lambda", "if", "begin", "and", "or", "let", "set!", "del", "cons", "list",
    ] {
        let form = SpecialForm::from_keyword(keyword);
        assert_eq!(form.map(|form| form.keyword()), Some(keyword));
    }
    assert_eq!(SpecialForm::from_keyword("car"), None);
}

#[test]
fn define_returns_value() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval("(define x (+ 1 2))")?, integer(3));
    assert_eq!(interpreter.eval("x")?, integer(3));
    assert_eq!(
        interpreter.eval("(define (square x) (* x x))")?.to_string(),
        "<procedure (lambda (x))>"
    );
    assert_eq!(interpreter.eval("(square 4)")?, integer(16));
    Ok(())
}

#[test]
fn malformed_define() {
    let interpreter = Interpreter::new();
    for source in [
        "(define)",
        "(define x)",
        "(define x 1 2)",
        "(define 5 1)",
        "(define #t 1)",
        "(define (f x))",
        "(define () 1)",
        "(define (f 1) 1)",
        "(define . 5)",
        "(define (. x) 1)",
    ] {
        assert!(
            matches!(
                interpreter.eval(source).map_err(|e| e.extract_data()),
                Err(ErrorData::Evaluation(EvaluationError::MalformedForm(_)))
            ),
            "{} should be malformed",
            source
        );
    }
    assert_eq!(
        interpreter.eval("(define x)"),
        error!(EvaluationError::MalformedForm("(define x)".to_string()))
    );
}

#[test]
fn lambda_formals() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval("((lambda () 7))")?, integer(7));
    assert_eq!(
        interpreter.eval("((lambda (x y) (- x y)) 10 4)")?,
        integer(6)
    );
    assert_eq!(
        interpreter.eval("(lambda (x . rest) x)")?.to_string(),
        "<procedure (lambda (x . rest))>"
    );
    for source in [
        "(lambda (x))",
        "(lambda (x x) 1)",
        "(lambda (x .) 1)",
        "(lambda (x . y z) 1)",
        "(lambda 3 1)",
        "(lambda (nil) 1)",
        "(lambda (x . .) 1)",
        "(lambda . 1)",
    ] {
        assert!(
            matches!(
                interpreter.eval(source).map_err(|e| e.extract_data()),
                Err(ErrorData::Evaluation(EvaluationError::MalformedForm(_)))
            ),
            "{} should be malformed",
            source
        );
    }
    Ok(())
}

#[test]
fn lambda_body_runs_in_order() -> Result<()> {
    let interpreter = Interpreter::new();
    interpreter.eval("(define counter 0)")?;
    assert_eq!(
        interpreter.eval("((lambda () (set! counter (+ counter 1)) (set! counter (* counter 10)) counter))")?,
        integer(10)
    );
    Ok(())
}

#[test]
fn condition() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval("(if #t 1 2)")?, integer(1));
    assert_eq!(interpreter.eval("(if #f 1 2)")?, integer(2));
    // only #t selects the consequent
    assert_eq!(interpreter.eval("(if 0 1 2)")?, integer(2));
    assert_eq!(interpreter.eval("(if nil 1 2)")?, integer(2));
    // the branch not taken is never evaluated
    assert_eq!(interpreter.eval("(if (> 3 2) 1 undefined-name)")?, integer(1));
    assert_eq!(
        interpreter.eval("(if #t 1)"),
        error!(EvaluationError::MalformedForm("(if #t 1)".to_string()))
    );
    Ok(())
}

#[test]
fn begin() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(
        interpreter.eval("(begin (define a 1) (define b 2) (+ a b))")?,
        integer(3)
    );
    assert_eq!(interpreter.eval("b")?, integer(2));
    assert_eq!(
        interpreter.eval("(begin)"),
        error!(EvaluationError::MalformedForm("(begin)".to_string()))
    );
    Ok(())
}

#[test]
fn and_or_short_circuit() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval("(and)")?, Value::Boolean(true));
    assert_eq!(interpreter.eval("(or)")?, Value::Boolean(false));
    assert_eq!(interpreter.eval("(and #t (> 2 1))")?, Value::Boolean(true));
    assert_eq!(interpreter.eval("(and #f undefined-name)")?, Value::Boolean(false));
    assert_eq!(interpreter.eval("(or #t undefined-name)")?, Value::Boolean(true));
    assert_eq!(interpreter.eval("(or #f (< 2 1))")?, Value::Boolean(false));
    assert_eq!(
        interpreter.eval("(and #t undefined-name)"),
        error!(NameError::UnboundSymbol("undefined-name".to_string()))
    );
    Ok(())
}

#[test]
fn let_binds_in_child_frame() -> Result<()> {
    let interpreter = Interpreter::new();
    interpreter.eval("(define x 1)")?;
    assert_eq!(
        interpreter.eval("(let ((x 10) (y x)) (+ x y))")?,
        integer(11)
    );
    assert_eq!(interpreter.eval("x")?, integer(1));
    assert_eq!(
        interpreter.eval("y"),
        error!(NameError::UnboundSymbol("y".to_string()))
    );
    assert_eq!(interpreter.eval("(let () 5)")?, integer(5));
    assert!(matches!(
        interpreter.eval("(let ((x)) x)").map_err(|e| e.extract_data()),
        Err(ErrorData::Evaluation(EvaluationError::MalformedForm(_)))
    ));
    Ok(())
}

#[test]
fn set_and_del() -> Result<()> {
    let interpreter = Interpreter::new();
    interpreter.eval("(define x 1)")?;
    assert_eq!(interpreter.eval("(set! x 5)")?, integer(5));
    assert_eq!(interpreter.eval("x")?, integer(5));
    assert!(matches!(
        interpreter.eval("(set! . 5)").map_err(|e| e.extract_data()),
        Err(ErrorData::Evaluation(EvaluationError::MalformedForm(_)))
    ));
    assert_eq!(
        interpreter.eval("(set! y 5)"),
        error!(NameError::UnboundSymbol("y".to_string()))
    );
    assert_eq!(interpreter.eval("(del x)")?, integer(5));
    assert_eq!(
        interpreter.eval("(del x)"),
        error!(NameError::NotLocallyBound("x".to_string()))
    );
    assert_eq!(
        interpreter.eval("((lambda (z) (del x)) 1)"),
        error!(NameError::NotLocallyBound("x".to_string()))
    );
    Ok(())
}

#[test]
fn cons_and_list() -> Result<()> {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval("(cons 1 2)")?.to_string(), "(1 . 2)");
    assert_eq!(interpreter.eval("(cons 1 nil)")?.to_string(), "(1)");
    assert_eq!(interpreter.eval("(list 1 (+ 1 1) 3)")?.to_string(), "(1 2 3)");
    assert_eq!(interpreter.eval("(list)")?, Value::EmptyList);
    assert_eq!(
        interpreter.eval("(cons 1)"),
        error!(EvaluationError::MalformedForm("(cons 1)".to_string()))
    );
    Ok(())
}
