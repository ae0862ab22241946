type Result<T> = std::result::Result<T, SchemeError>;

mod lexer;
pub use lexer::*;
mod atom;
pub use atom::*;
#[macro_use]
mod parser;
pub use parser::*;

use crate::error::SchemeError;
pub mod error;
