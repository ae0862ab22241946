use std::{
    cmp::Ordering,
    fmt::{self, Debug, Display, Formatter},
    rc::Rc,
};

use smallvec::SmallVec;

use crate::{
    environment::Environment, error::*, interpreter::error::EvaluationError,
    interpreter::pair::Pair, parser::Expression,
};

type Result<T> = std::result::Result<T, SchemeError>;

#[derive(Debug, Clone, Copy)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{}", n),
            Number::Real(n) => write!(f, "{:?}", n),
        }
    }
}

// numeric equality: 1 and 1.0 are the same number
impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        match upcast_oprands((*self, *other)) {
            NumberBinaryOperand::Integer(a, b) => a.eq(&b),
            NumberBinaryOperand::Real(a, b) => a.eq(&b),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
        match upcast_oprands((*self, *other)) {
            NumberBinaryOperand::Integer(a, b) => a.partial_cmp(&b),
            NumberBinaryOperand::Real(a, b) => a.partial_cmp(&b),
        }
    }
}

pub(crate) enum NumberBinaryOperand {
    Integer(i64, i64),
    Real(f64, f64),
}

// Integer => Real
pub(crate) fn upcast_oprands(operand: (Number, Number)) -> NumberBinaryOperand {
    match operand {
        (Number::Integer(a), Number::Integer(b)) => NumberBinaryOperand::Integer(a, b),
        (Number::Integer(a), Number::Real(b)) => NumberBinaryOperand::Real(a as f64, b),
        (Number::Real(a), Number::Integer(b)) => NumberBinaryOperand::Real(a, b as f64),
        (Number::Real(a), Number::Real(b)) => NumberBinaryOperand::Real(a, b),
    }
}

fn checked(result: Option<i64>) -> Result<Number> {
    match result {
        Some(n) => Ok(Number::Integer(n)),
        None => error!(EvaluationError::IntegerOverflow),
    }
}

impl std::ops::Add<Number> for Number {
    type Output = Result<Number>;
    fn add(self, rhs: Number) -> Self::Output {
        match upcast_oprands((self, rhs)) {
            NumberBinaryOperand::Integer(a, b) => checked(a.checked_add(b)),
            NumberBinaryOperand::Real(a, b) => Ok(Number::Real(a + b)),
        }
    }
}

impl std::ops::Sub<Number> for Number {
    type Output = Result<Number>;
    fn sub(self, rhs: Number) -> Self::Output {
        match upcast_oprands((self, rhs)) {
            NumberBinaryOperand::Integer(a, b) => checked(a.checked_sub(b)),
            NumberBinaryOperand::Real(a, b) => Ok(Number::Real(a - b)),
        }
    }
}

impl std::ops::Mul<Number> for Number {
    type Output = Result<Number>;
    fn mul(self, rhs: Number) -> Self::Output {
        match upcast_oprands((self, rhs)) {
            NumberBinaryOperand::Integer(a, b) => checked(a.checked_mul(b)),
            NumberBinaryOperand::Real(a, b) => Ok(Number::Real(a * b)),
        }
    }
}

impl std::ops::Div<Number> for Number {
    type Output = Result<Number>;
    /// Exact integer quotients stay integers, anything else becomes a real.
    fn div(self, rhs: Number) -> Self::Output {
        match upcast_oprands((self, rhs)) {
            NumberBinaryOperand::Integer(_, 0) => error!(EvaluationError::DivisionByZero),
            NumberBinaryOperand::Integer(a, b) => match a.checked_rem(b) {
                Some(0) => checked(a.checked_div(b)),
                Some(_) => Ok(Number::Real(a as f64 / b as f64)),
                None => error!(EvaluationError::IntegerOverflow),
            },
            NumberBinaryOperand::Real(_, b) if b == 0.0 => error!(EvaluationError::DivisionByZero),
            NumberBinaryOperand::Real(a, b) => Ok(Number::Real(a / b)),
        }
    }
}

#[test]
fn number_arithmetic() -> Result<()> {
    assert_eq!((Number::Integer(2) + Number::Integer(3))?, Number::Integer(5));
    assert_eq!((Number::Integer(2) - Number::Real(0.5))?, Number::Real(1.5));
    assert_eq!((Number::Real(1.5) * Number::Integer(2))?, Number::Real(3.0));
    assert_eq!(
        Number::Integer(i64::MAX) + Number::Integer(1),
        error!(EvaluationError::IntegerOverflow)
    );
    assert_eq!(
        Number::Integer(i64::MIN) * Number::Integer(-1),
        error!(EvaluationError::IntegerOverflow)
    );
    Ok(())
}

#[test]
fn number_division() -> Result<()> {
    assert!(matches!(
        (Number::Integer(8) / Number::Integer(2))?,
        Number::Integer(4)
    ));
    assert!(matches!(
        (Number::Integer(1) / Number::Integer(4))?,
        Number::Real(r) if r == 0.25
    ));
    assert!(matches!(
        (Number::Real(3.0) / Number::Integer(2))?,
        Number::Real(r) if r == 1.5
    ));
    assert_eq!(
        Number::Integer(1) / Number::Integer(0),
        error!(EvaluationError::DivisionByZero)
    );
    assert_eq!(
        Number::Real(1.0) / Number::Real(0.0),
        error!(EvaluationError::DivisionByZero)
    );
    assert_eq!(
        Number::Integer(i64::MIN) / Number::Integer(-1),
        error!(EvaluationError::IntegerOverflow)
    );
    Ok(())
}

#[test]
fn number_comparison_and_display() {
    assert_eq!(Number::Integer(1), Number::Real(1.0));
    assert!(Number::Integer(1) < Number::Real(1.5));
    assert!(Number::Real(-2.0) <= Number::Integer(-2));
    assert_eq!(Number::Integer(-7).to_string(), "-7");
    assert_eq!(Number::Real(2.0).to_string(), "2.0");
    assert_eq!(Number::Real(0.125).to_string(), "0.125");
}

/// Fixed parameter names plus an optional name collecting the remaining arguments.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ParameterFormals(pub Vec<String>, pub Option<String>);

impl ParameterFormals {
    pub fn new() -> ParameterFormals {
        Self(Vec::new(), None)
    }

    pub fn accepts(&self, argument_count: usize) -> bool {
        match self.1 {
            Some(_) => argument_count >= self.0.len(),
            None => argument_count == self.0.len(),
        }
    }
}

impl Display for ParameterFormals {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.0.len() {
            0 => match &self.1 {
                None => write!(f, "()"),
                Some(variadic) => write!(f, "{}", variadic),
            },
            _ => match &self.1 {
                Some(last) => write!(f, "({} . {})", self.0.join(" "), last),
                None => write!(f, "({})", self.0.join(" ")),
            },
        }
    }
}

#[macro_export]
macro_rules! param_fixed {
    ($($name:expr),*) => {
        $crate::values::ParameterFormals(vec![$($name.to_string()),*], None)
    };
}

#[macro_export]
macro_rules! append_variadic_param {
    ($formals:expr, $variadic:expr) => {{
        let mut formals: $crate::values::ParameterFormals = $formals;
        formals.1 = Some($variadic.to_string());
        formals
    }};
}

#[test]
fn formals_display_and_arity() {
    let fixed = param_fixed!["x", "y"];
    assert_eq!(fixed.to_string(), "(x y)");
    assert!(fixed.accepts(2));
    assert!(!fixed.accepts(1));
    let dotted = append_variadic_param!(param_fixed!["x"], "rest");
    assert_eq!(dotted.to_string(), "(x . rest)");
    assert!(dotted.accepts(1));
    assert!(dotted.accepts(4));
    assert!(!dotted.accepts(0));
    let all = append_variadic_param!(param_fixed![], "args");
    assert_eq!(all.to_string(), "args");
    assert_eq!(ParameterFormals::new().to_string(), "()");
}

/// A lambda as written: its formals and a non-empty body.
#[derive(PartialEq, Debug, Clone)]
pub struct SchemeProcedure(pub ParameterFormals, pub Vec<Expression>);

impl Display for SchemeProcedure {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let SchemeProcedure(formals, ..) = self;
        write!(f, "(lambda {})", formals)
    }
}

pub type ArgVec = SmallVec<[Value; 4]>;

pub struct BuiltinProcedure {
    pub name: &'static str,
    pub parameters: ParameterFormals,
    pub body: fn(ArgVec) -> Result<Value>,
}

impl Display for BuiltinProcedure {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "<builtin procedure {}>", self.name)
    }
}

impl Debug for BuiltinProcedure {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Clone)]
pub enum Procedure {
    User(Rc<SchemeProcedure>, Rc<Environment>),
    Builtin(&'static BuiltinProcedure),
}

// the captured environment may contain the procedure itself
impl Debug for Procedure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(p, _) => write!(f, "{:?}", p),
            Self::Builtin(b) => write!(f, "{:?}", b),
        }
    }
}

// procedures are equal only to themselves
impl PartialEq for Procedure {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::User(a, _), Self::User(b, _)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl Procedure {
    pub fn get_parameters(&self) -> &ParameterFormals {
        match &self {
            Procedure::User(user, ..) => &user.0,
            Procedure::Builtin(builtin) => &builtin.parameters,
        }
    }
}

impl Display for Procedure {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self {
            Procedure::User(procedure, ..) => write!(f, "<procedure {}>", procedure),
            Procedure::Builtin(builtin) => write!(f, "{}", builtin),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Type {
    Number, // Non exhaustive, but ok
    Integer,
    Boolean,
    Pair,
    List,
}

#[macro_export]
macro_rules! match_expect_type {
    ($value:expr, $type:pat => $inner: expr, $type_name:expr) => {
        match $value {
            $type => Ok($inner),
            other => $crate::error!($crate::interpreter::error::EvaluationError::TypeMismatch(
                other.to_string(),
                $type_name
            )),
        }
    };
}

#[test]
fn macro_match_expect_type() {
    assert_eq!(
        match_expect_type!(
            Value::Number(Number::Integer(5)),
            Value::Number(Number::Integer(i)) => i, Type::Integer
        ),
        Ok(5)
    );
    assert_eq!(
        match_expect_type!(
            Value::Number(Number::Integer(1)),
            Value::Number(Number::Integer(i)) => i + 3, Type::Integer),
        Ok(4)
    );
    assert_eq!(
        match_expect_type!(
            Value::Number(Number::Integer(5)),
            Value::Boolean(b) => b, Type::Boolean
        ),
        error!(EvaluationError::TypeMismatch(5.to_string(), Type::Boolean))
    );
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(Number),
    Boolean(bool),
    EmptyList,
    Pair(Rc<Pair>),
    Procedure(Procedure),
}

impl Value {
    pub fn expect_number(self) -> Result<Number> {
        match_expect_type!(self, Value::Number(number) => number, Type::Number)
    }
    pub fn expect_integer(self) -> Result<i64> {
        match_expect_type!(self, Value::Number(Number::Integer(i)) => i, Type::Integer)
    }
    pub fn expect_pair(self) -> Result<Rc<Pair>> {
        match_expect_type!(self, Value::Pair(pair) => pair, Type::Pair)
    }

    pub fn cons(car: Value, cdr: Value) -> Self {
        Value::Pair(Rc::new(Pair::new(car, cdr)))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Value::Boolean(true))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Value::Number(num) => write!(f, "{}", num),
            Value::Procedure(p) => write!(f, "{}", p),
            Value::Boolean(true) => write!(f, "#t"),
            Value::Boolean(false) => write!(f, "#f"),
            Value::Pair(list) => write!(f, "{}", list),
            Value::EmptyList => write!(f, "nil"),
        }
    }
}

#[test]
fn value_display() {
    assert_eq!(Value::Boolean(true).to_string(), "#t");
    assert_eq!(Value::Boolean(false).to_string(), "#f");
    assert_eq!(Value::EmptyList.to_string(), "nil");
    assert_eq!(Value::Number(Number::Real(2.0)).to_string(), "2.0");
    let procedure = Procedure::User(
        Rc::new(SchemeProcedure(param_fixed!["x", "y"], vec![])),
        Environment::global(),
    );
    assert_eq!(
        Value::Procedure(procedure).to_string(),
        "<procedure (lambda (x y))>"
    );
}

#[test]
fn procedure_identity() {
    let env = Environment::global();
    let make = || {
        Procedure::User(
            Rc::new(SchemeProcedure(param_fixed!["x"], vec![])),
            env.clone(),
        )
    };
    let first = make();
    assert_eq!(first, first.clone());
    assert_ne!(first, make());
}
