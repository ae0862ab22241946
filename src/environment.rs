use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::error::*;
use crate::interpreter::builtin::{builtin_table, BuiltinTable};
use crate::values::{Procedure, Value};

type Result<T> = std::result::Result<T, SchemeError>;

/// A frame of bindings with an optional parent frame.
///
/// The root frame additionally exposes the process-wide builtin table; definitions made in
/// a frame shadow that frame's builtins.
pub struct Environment {
    parent: Option<Rc<Environment>>,
    definitions: RefCell<HashMap<String, Value>>,
    builtins: Option<&'static BuiltinTable>,
}

impl Environment {
    /// Frame holding only the builtin procedures.
    pub fn new_root() -> Self {
        Self {
            parent: None,
            definitions: RefCell::new(HashMap::new()),
            builtins: Some(builtin_table()),
        }
    }

    /// Empty frame whose parent is a fresh builtin root.
    pub fn global() -> Rc<Self> {
        Rc::new(Self::new_child(Rc::new(Self::new_root())))
    }

    pub fn new_child(parent: Rc<Environment>) -> Self {
        Self {
            parent: Some(parent),
            definitions: RefCell::new(HashMap::new()),
            builtins: None,
        }
    }

    pub fn define(&self, name: String, value: Value) {
        self.definitions.borrow_mut().insert(name, value);
    }

    fn get_local(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.definitions.borrow().get(name) {
            return Some(value.clone());
        }
        self.builtins
            .and_then(|table| table.get(name))
            .map(|builtin| Value::Procedure(Procedure::Builtin(builtin)))
    }

    fn binds_locally(&self, name: &str) -> bool {
        self.definitions.borrow().contains_key(name)
            || self.builtins.map_or(false, |table| table.contains_key(name))
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let mut frame = self;
        loop {
            if let Some(value) = frame.get_local(name) {
                return Some(value);
            }
            frame = frame.parent.as_deref()?;
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Value> {
        match self.get(name) {
            Some(value) => Ok(value),
            None => error!(NameError::UnboundSymbol(name.to_string())),
        }
    }

    /// Rebinds `name` in the nearest frame binding it.
    pub fn set(&self, name: &str, value: Value) -> Result<()> {
        let mut frame = self;
        loop {
            if frame.binds_locally(name) {
                frame.define(name.to_string(), value);
                return Ok(());
            }
            match frame.parent.as_deref() {
                Some(parent) => frame = parent,
                None => return error!(NameError::UnboundSymbol(name.to_string())),
            }
        }
    }

    /// Removes a definition of this frame only, returning its value.
    pub fn delete(&self, name: &str) -> Result<Value> {
        match self.definitions.borrow_mut().remove(name) {
            Some(value) => Ok(value),
            None => error!(NameError::NotLocallyBound(name.to_string())),
        }
    }
}

#[cfg(test)]
use crate::values::Number;

#[test]
fn lookup_walks_parents() -> Result<()> {
    let global = Environment::global();
    global.define("x".to_string(), Value::Number(Number::Integer(1)));
    let child = Rc::new(Environment::new_child(global.clone()));
    assert_eq!(child.lookup("x")?, Value::Number(Number::Integer(1)));
    assert!(matches!(child.lookup("car")?, Value::Procedure(Procedure::Builtin(_))));
    assert_eq!(
        child.lookup("y"),
        error!(NameError::UnboundSymbol("y".to_string()))
    );
    child.define("x".to_string(), Value::Boolean(true));
    assert_eq!(child.lookup("x")?, Value::Boolean(true));
    assert_eq!(global.lookup("x")?, Value::Number(Number::Integer(1)));
    Ok(())
}

#[test]
fn set_mutates_nearest_binding() -> Result<()> {
    let global = Environment::global();
    global.define("x".to_string(), Value::Number(Number::Integer(1)));
    let child = Environment::new_child(global.clone());
    child.set("x", Value::Number(Number::Integer(2)))?;
    assert_eq!(global.lookup("x")?, Value::Number(Number::Integer(2)));
    assert_eq!(
        child.set("nope", Value::EmptyList),
        error!(NameError::UnboundSymbol("nope".to_string()))
    );
    Ok(())
}

#[test]
fn set_shadows_builtin_in_root() -> Result<()> {
    let global = Environment::global();
    global.set("car", Value::Boolean(false))?;
    assert_eq!(global.lookup("car")?, Value::Boolean(false));
    assert!(global.definitions.borrow().get("car").is_none());
    let other = Environment::global();
    assert!(matches!(other.lookup("car")?, Value::Procedure(_)));
    Ok(())
}

#[test]
fn delete_is_frame_local() -> Result<()> {
    let global = Environment::global();
    global.define("x".to_string(), Value::Number(Number::Integer(1)));
    let child = Environment::new_child(global.clone());
    assert_eq!(
        child.delete("x"),
        error!(NameError::NotLocallyBound("x".to_string()))
    );
    assert_eq!(global.delete("x")?, Value::Number(Number::Integer(1)));
    assert_eq!(global.get("x"), None);
    assert_eq!(
        global.delete("car"),
        error!(NameError::NotLocallyBound("car".to_string()))
    );
    Ok(())
}
