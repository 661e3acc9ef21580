//! Tokenization of a cleaned expression string.
//!
//! Numbers are runs of digits and dots, identifiers are runs of ASCII letters.
//! Identifiers are kept as names here and resolved by the evaluator.

use std::fmt;

use super::arithmetic::Operator;
use crate::error::CalcError;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    Identifier(String),
    OpenParen,
    CloseParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Operator(op) => write!(f, "{}", op.symbol()),
            Self::Identifier(name) => f.write_str(name),
            Self::OpenParen => f.write_str("("),
            Self::CloseParen => f.write_str(")"),
        }
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Split `input` into tokens.
///
/// Whitespace is skipped. Any character outside digits, `.`, ASCII letters,
/// the operator set and parentheses is a malformed expression.
pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if is_number_char(c) {
            let start = i;
            while i < chars.len() && is_number_char(chars[i]) {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let value = text
                .parse::<f64>()
                .map_err(|_| CalcError::malformed(format!("invalid number '{text}'")))?;
            out.push(Token::Number(value));
            continue;
        }

        if c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_alphabetic() {
                i += 1;
            }
            out.push(Token::Identifier(chars[start..i].iter().collect()));
            continue;
        }

        let token = match c {
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            _ => match Operator::from_char(c) {
                Some(op) => Token::Operator(op),
                None => return Err(CalcError::malformed(format!("unexpected character '{c}'"))),
            },
        };
        out.push(token);
        i += 1;
    }

    Ok(out)
}

/// Render tokens separated by spaces, for trace output.
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
