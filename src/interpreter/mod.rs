type Result<T> = std::result::Result<T, SchemeError>;
pub mod builtin;
mod interpreter;
pub mod pair;
mod special_form;

pub use interpreter::*;
pub use special_form::SpecialForm;

use crate::error::SchemeError;
pub mod error;
