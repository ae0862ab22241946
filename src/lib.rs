#[macro_use]
extern crate lazy_static;
#[macro_use]
pub mod error;
#[macro_use]
pub mod values;
pub mod environment;
pub mod file;
pub mod interpreter;
pub mod options;
pub mod parser;
pub mod repl;
