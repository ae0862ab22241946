use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum SyntaxError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unmatched parentheses!")]
    UnmatchedParentheses,
    #[error("{0} opening and {1} closing parentheses")]
    UnbalancedParentheses(usize, usize),
    #[error("multiple atoms outside of any parentheses")]
    UngroupedAtoms,
}
