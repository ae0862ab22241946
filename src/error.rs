use std::fmt;

use fmt::Display;
use thiserror::Error;

use crate::{interpreter::error::EvaluationError, parser::error::SyntaxError};

#[derive(Error, Debug, PartialEq, Clone)]
pub enum NameError {
    #[error("unbound symbol {0}")]
    UnboundSymbol(String),
    #[error("{0} is not bound in the current frame")]
    NotLocallyBound(String),
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum ErrorData {
    #[error("SchemeSyntaxError: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("SchemeNameError: {0}")]
    Name(#[from] NameError),
    #[error("SchemeEvaluationError: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("io error: {0}")]
    Io(String),
}

impl ErrorData {
    /// Name of the error category as shown to users.
    pub fn category(&self) -> &'static str {
        match self {
            ErrorData::Syntax(_) => "SchemeSyntaxError",
            ErrorData::Name(_) => "SchemeNameError",
            ErrorData::Evaluation(_) => "SchemeEvaluationError",
            ErrorData::Io(_) => "IoError",
        }
    }
}

impl From<std::io::Error> for ErrorData {
    fn from(error: std::io::Error) -> Self {
        ErrorData::Io(error.to_string())
    }
}

impl ToLocated for ErrorData {}

pub type SchemeError = Located<ErrorData>;

impl std::error::Error for SchemeError {}

impl From<std::io::Error> for SchemeError {
    fn from(error: std::io::Error) -> Self {
        ErrorData::from(error).no_locate()
    }
}

#[derive(Debug, Clone)]
pub struct Located<T: PartialEq + Display> {
    pub data: T,
    pub location: Option<[u32; 2]>,
}

impl<T: PartialEq + Display> Located<T> {
    pub fn from_data(data: T) -> Self {
        Self {
            data,
            location: None,
        }
    }

    pub fn locate(mut self, location: Option<[u32; 2]>) -> Self {
        self.location = location;
        self
    }

    // keep the innermost location when an error bubbles up
    pub fn or_locate(mut self, location: Option<[u32; 2]>) -> Self {
        self.location = self.location.or(location);
        self
    }

    pub fn extract_data(self) -> T {
        self.data
    }
}

impl<T: PartialEq + Display> From<T> for Located<T> {
    fn from(data: T) -> Self {
        Self::from_data(data)
    }
}

impl<T: PartialEq + Display> PartialEq for Located<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: PartialEq + Display> Display for Located<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some([line, column]) => write!(f, "{} (at {}:{})", self.data, line, column),
            None => self.data.fmt(f),
        }
    }
}

impl<T: PartialEq + Display> std::ops::Deref for Located<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.data
    }
}

pub trait ToLocated: PartialEq + Display + Sized {
    fn locate(self, location: Option<[u32; 2]>) -> Located<Self> {
        Located {
            data: self,
            location,
        }
    }

    fn no_locate(self) -> Located<Self> {
        Located {
            data: self,
            location: None,
        }
    }
}

#[macro_export]
macro_rules! error {
    ($error:expr) => {
        Err($crate::error::ToLocated::no_locate(
            $crate::error::ErrorData::from($error),
        ))
    };
}

#[macro_export]
macro_rules! located_error {
    ($error:expr, $location:expr) => {
        Err($crate::error::ToLocated::locate(
            $crate::error::ErrorData::from($error),
            $location,
        ))
    };
}

#[test]
fn error_display_carries_category_and_location() {
    let unlocated: std::result::Result<(), SchemeError> =
        error!(NameError::UnboundSymbol("foo".to_string()));
    assert_eq!(
        unlocated.unwrap_err().to_string(),
        "SchemeNameError: unbound symbol foo"
    );
    let located: std::result::Result<(), SchemeError> =
        located_error!(SyntaxError::UnmatchedParentheses, Some([2, 5]));
    let located = located.unwrap_err();
    assert_eq!(located.category(), "SchemeSyntaxError");
    assert!(located.to_string().ends_with("(at 2:5)"));
}

#[test]
fn or_locate_keeps_inner_location() {
    let inner = ErrorData::from(EvaluationError::EmptyCall).locate(Some([1, 1]));
    assert_eq!(inner.or_locate(Some([3, 3])).location, Some([1, 1]));
    let bare = ErrorData::from(EvaluationError::EmptyCall).no_locate();
    assert_eq!(bare.or_locate(Some([3, 3])).location, Some([3, 3]));
}
