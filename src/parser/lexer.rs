use crate::error::*;
use std::fmt;
use std::iter::Iterator;
use std::iter::Peekable;

pub type Token = Located<TokenData>;

#[derive(PartialEq, Debug, Clone)]
pub enum TokenData {
    LeftParen,
    RightParen,
    Atom(String),
}

impl fmt::Display for TokenData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenData::LeftParen => write!(f, "("),
            TokenData::RightParen => write!(f, ")"),
            TokenData::Atom(atom) => write!(f, "{}", atom),
        }
    }
}

impl ToLocated for TokenData {}

/// Splits a character stream into parentheses and atoms.
///
/// Whitespace and `(`/`)` delimit atoms, `;` comments out the rest of its line.
/// Tokenizing never fails: classifying atoms is left to the parser.
pub struct Lexer<CharIter: Iterator<Item = char>> {
    pub current: Option<char>,
    pub peekable_char_stream: Peekable<CharIter>,
    location: [u32; 2],
}

impl<CharIter: Iterator<Item = char>> Iterator for Lexer<CharIter> {
    type Item = Token;
    fn next(&mut self) -> Option<Self::Item> {
        self.skip_atmosphere();
        let location = self.location;
        self.try_next().map(|data| data.locate(Some(location)))
    }
}

fn is_delimiter(c: char) -> bool {
    c == '(' || c == ')' || c == ';' || c.is_whitespace()
}

impl<CharIter: Iterator<Item = char>> Lexer<CharIter> {
    pub fn from_char_stream(char_stream: CharIter) -> Lexer<CharIter> {
        Self {
            current: None,
            peekable_char_stream: char_stream.peekable(),
            location: [1, 1],
        }
    }

    fn try_next(&mut self) -> Option<TokenData> {
        match self.advance() {
            Some('(') => Some(TokenData::LeftParen),
            Some(')') => Some(TokenData::RightParen),
            Some(_) => Some(self.atom()),
            None => None,
        }
    }

    fn advance(&mut self) -> Option<char> {
        self.current = self.peekable_char_stream.next();
        match self.current {
            Some('\n') => {
                self.location[0] += 1;
                self.location[1] = 1;
            }
            Some(_) => self.location[1] += 1,
            None => (),
        }
        self.current
    }

    // whitespace and comments, up to the first character of the next token
    fn skip_atmosphere(&mut self) {
        while let Some(c) = self.peekable_char_stream.peek() {
            match c {
                ';' => self.comment(),
                c if c.is_whitespace() => {
                    self.advance();
                }
                _ => break,
            }
        }
    }

    fn comment(&mut self) {
        while let Some(c) = self.peekable_char_stream.peek() {
            match c {
                '\n' => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn atom(&mut self) -> TokenData {
        let mut atom = String::new();
        atom.extend(self.current);
        while let Some(nc) = self.peekable_char_stream.peek() {
            if is_delimiter(*nc) {
                break;
            }
            atom.push(*nc);
            self.advance();
        }
        TokenData::Atom(atom)
    }
}

pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::from_char_stream(source.chars()).collect()
}

#[cfg(test)]
fn token_texts(source: &str) -> Vec<String> {
    tokenize(source)
        .into_iter()
        .map(|token| token.data.to_string())
        .collect()
}

#[test]
fn empty_text() {
    assert_eq!(tokenize(""), vec![]);
    assert_eq!(tokenize("   \n\t  "), vec![]);
}

#[test]
fn simple_expression() {
    assert_eq!(
        token_texts("(+ 1 2.5 foo)"),
        vec!["(", "+", "1", "2.5", "foo", ")"]
    );
}

#[test]
fn parentheses_need_no_spaces() {
    assert_eq!(
        token_texts("(cat(dog)(tomato))"),
        vec!["(", "cat", "(", "dog", ")", "(", "tomato", ")", ")"]
    );
}

#[test]
fn comments_are_dropped() {
    let source = "; leading comment\n(define x ; trailing comment ( ) \n 5) ;; end";
    assert_eq!(token_texts(source), vec!["(", "define", "x", "5", ")"]);
}

#[test]
fn comment_splits_atom() {
    assert_eq!(token_texts("abc;def\nghi"), vec!["abc", "ghi"]);
}

#[test]
fn multiline_locations() {
    let tokens = tokenize("(a\n  bc)");
    assert_eq!(
        tokens
            .iter()
            .map(|token| token.location)
            .collect::<Vec<_>>(),
        vec![Some([1, 1]), Some([1, 2]), Some([2, 3]), Some([2, 5])]
    );
    assert_eq!(tokens[2].data, TokenData::Atom("bc".to_string()));
}

#[test]
fn tokens_survive_rejoining() {
    let source = "(define (f x)\n  ; doubles\n  (* x 2.0)) (f -3)";
    let first = token_texts(source);
    let rejoined = first.join(" ");
    assert_eq!(token_texts(&rejoined), first);
}
