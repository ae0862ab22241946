use super::Result;
use super::{classify_atom, error::SyntaxError, Token, TokenData};
use crate::error::*;
use crate::values::Number;
use itertools::join;
use std::fmt;
use std::iter::Iterator;

pub type Expression = Located<ExpressionBody>;

#[derive(PartialEq, Debug, Clone)]
pub enum ExpressionBody {
    Number(Number),
    Symbol(String),
    List(Vec<Expression>),
}

impl ToLocated for ExpressionBody {}

impl From<Number> for ExpressionBody {
    fn from(n: Number) -> Self {
        ExpressionBody::Number(n)
    }
}

impl From<Number> for Expression {
    fn from(n: Number) -> Self {
        ExpressionBody::Number(n).into()
    }
}

impl fmt::Display for ExpressionBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExpressionBody::Number(number) => write!(f, "{}", number),
            ExpressionBody::Symbol(symbol) => write!(f, "{}", symbol),
            ExpressionBody::List(elements) => {
                write!(f, "({})", join(elements.iter().map(|e| &e.data), " "))
            }
        }
    }
}

impl ExpressionBody {
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            ExpressionBody::Symbol(symbol) => Some(symbol.as_str()),
            _ => None,
        }
    }
}

/// Recursive-descent parser yielding one expression per top-level form.
pub struct Parser<TokenIter: Iterator<Item = Token>> {
    lexer: TokenIter,
    location: Option<[u32; 2]>,
}

impl<TokenIter: Iterator<Item = Token>> Iterator for Parser<TokenIter> {
    type Item = Result<Expression>;
    fn next(&mut self) -> Option<Self::Item> {
        self.parse().transpose()
    }
}

impl<TokenIter: Iterator<Item = Token>> Parser<TokenIter> {
    pub fn from_lexer(lexer: TokenIter) -> Parser<TokenIter> {
        Self {
            lexer,
            location: None,
        }
    }

    pub fn parse(&mut self) -> Result<Option<Expression>> {
        match self.advance() {
            Some(token) => self.expression(token).map(Some),
            None => Ok(None),
        }
    }

    fn expression(&mut self, token: Token) -> Result<Expression> {
        let Token { data, location } = token;
        match data {
            TokenData::Atom(atom) => Ok(classify_atom(&atom).locate(location)),
            TokenData::LeftParen => self.list(location),
            TokenData::RightParen => located_error!(SyntaxError::UnmatchedParentheses, location),
        }
    }

    fn list(&mut self, location: Option<[u32; 2]>) -> Result<Expression> {
        let mut elements = vec![];
        loop {
            match self.advance() {
                Some(Token {
                    data: TokenData::RightParen,
                    ..
                }) => break Ok(ExpressionBody::List(elements).locate(location)),
                Some(token) => elements.push(self.expression(token)?),
                None => break located_error!(SyntaxError::UnexpectedEnd, self.location),
            }
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.lexer.next();
        if let Some(Token { location, .. }) = &token {
            self.location = *location;
        }
        token
    }
}

/// Rejects token sequences that can never form a program: empty input, a leading `)`,
/// unequal parenthesis counts, or several atoms with no grouping at all.
pub fn validate(tokens: &[Token]) -> Result<()> {
    let first = match tokens.first() {
        Some(first) => first,
        None => return error!(SyntaxError::UnexpectedEnd),
    };
    if first.data == TokenData::RightParen {
        return located_error!(SyntaxError::UnmatchedParentheses, first.location);
    }
    let count = |paren: TokenData| tokens.iter().filter(|t| t.data == paren).count();
    let (opening, closing) = (count(TokenData::LeftParen), count(TokenData::RightParen));
    if opening != closing {
        return error!(SyntaxError::UnbalancedParentheses(opening, closing));
    }
    if tokens.len() > 1 && opening == 0 {
        return error!(SyntaxError::UngroupedAtoms);
    }
    Ok(())
}

/// Parses the first expression of a validated token sequence.
///
/// Anything after the first complete expression is ignored.
pub fn parse(tokens: &[Token]) -> Result<Expression> {
    validate(tokens)?;
    let mut parser = Parser::from_lexer(tokens.iter().cloned());
    match parser.parse()? {
        Some(expression) => {
            if parser.lexer.next().is_some() {
                log::debug!("ignoring input after {}", expression.data);
            }
            Ok(expression)
        }
        None => error!(SyntaxError::UnexpectedEnd),
    }
}

#[cfg(test)]
fn symbol(name: &str) -> Expression {
    ExpressionBody::Symbol(name.to_string()).into()
}

#[cfg(test)]
fn integer(i: i64) -> Expression {
    Number::Integer(i).into()
}

#[cfg(test)]
fn list(elements: Vec<Expression>) -> Expression {
    ExpressionBody::List(elements).into()
}

#[cfg(test)]
fn parse_str(source: &str) -> Result<Expression> {
    parse(&super::tokenize(source))
}

#[test]
fn empty() {
    assert_eq!(parse(&[]), error!(SyntaxError::UnexpectedEnd));
    let mut parser = Parser::from_lexer(Vec::<Token>::new().into_iter());
    assert_eq!(parser.parse(), Ok(None));
}

#[test]
fn single_atoms() -> Result<()> {
    assert_eq!(parse_str("1")?, integer(1));
    assert_eq!(parse_str("-2.5")?, Number::Real(-2.5).into());
    assert_eq!(parse_str("x")?, symbol("x"));
    Ok(())
}

#[test]
fn procedure_call() -> Result<()> {
    assert_eq!(
        parse_str("(+ 1 2 3)")?,
        list(vec![symbol("+"), integer(1), integer(2), integer(3)])
    );
    Ok(())
}

#[test]
fn nested_procedure_call() -> Result<()> {
    assert_eq!(
        parse_str("(+ 1 (- 2 3))")?,
        list(vec![
            symbol("+"),
            integer(1),
            list(vec![symbol("-"), integer(2), integer(3)])
        ])
    );
    Ok(())
}

#[test]
fn empty_lists() -> Result<()> {
    assert_eq!(parse_str("()")?, list(vec![]));
    assert_eq!(
        parse_str("(a () (()))")?,
        list(vec![symbol("a"), list(vec![]), list(vec![list(vec![])])])
    );
    Ok(())
}

#[test]
fn keywords_are_plain_symbols() -> Result<()> {
    assert_eq!(
        parse_str("(lambda (x) (* x x))")?,
        list(vec![
            symbol("lambda"),
            list(vec![symbol("x")]),
            list(vec![symbol("*"), symbol("x"), symbol("x")])
        ])
    );
    Ok(())
}

#[test]
fn expression_locations() -> Result<()> {
    let expression = parse_str("\n  (f\n (g 1))")?;
    assert_eq!(expression.location, Some([2, 3]));
    match &expression.data {
        ExpressionBody::List(elements) => assert_eq!(elements[1].location, Some([3, 2])),
        other => panic!("expected a list, got {}", other),
    }
    Ok(())
}

#[test]
fn unmatched_parantheses() {
    assert_eq!(
        parse_str(")("),
        located_error!(SyntaxError::UnmatchedParentheses, None)
    );
    assert_eq!(
        parse_str("(+ 1 2"),
        error!(SyntaxError::UnbalancedParentheses(1, 0))
    );
    assert_eq!(
        parse_str("(+ 1 2))"),
        error!(SyntaxError::UnbalancedParentheses(1, 2))
    );
}

#[test]
fn ungrouped_atoms() {
    assert_eq!(parse_str("1 2"), error!(SyntaxError::UngroupedAtoms));
}

#[test]
fn trailing_forms_are_ignored() -> Result<()> {
    assert_eq!(parse_str("(a) (b)")?, list(vec![symbol("a")]));
    assert_eq!(parse_str("(a))(")?, list(vec![symbol("a")]));
    Ok(())
}

#[test]
fn parser_iterates_top_level_forms() -> Result<()> {
    let parser = Parser::from_lexer(super::tokenize("(define x 1) x 2").into_iter());
    let forms = parser.collect::<Result<Vec<_>>>()?;
    assert_eq!(
        forms,
        vec![
            list(vec![symbol("define"), symbol("x"), integer(1)]),
            symbol("x"),
            integer(2)
        ]
    );
    Ok(())
}

#[test]
fn display_round_trips() -> Result<()> {
    let source = "(define (f x) (if (> x 0) x (- x 2.5)))";
    let expression = parse_str(source)?;
    assert_eq!(expression.data.to_string(), source);
    assert_eq!(parse_str(&expression.data.to_string())?, expression);
    Ok(())
}
