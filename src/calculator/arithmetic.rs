//! Arithmetic core: the fixed operator set and its priorities.

use crate::error::CalcError;

/// A binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    /// Map an operator character to its operator, if it is one of `+ - * / ^`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            '^' => Some(Self::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Pow => '^',
        }
    }

    /// Priority used when deciding whether to reduce or push.
    ///
    /// Parentheses sit at [`PAREN_PRIORITY`], below every operator.
    pub fn priority(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 3,
        }
    }

    /// Apply the operator to `(a, b)`, where `a` is the deeper operand.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => a / b,
            Self::Pow => a.powf(b),
        }
    }
}

/// Priority of `(` and `)`.
pub const PAREN_PRIORITY: u8 = 0;

/// Apply the operator character `op` to `(a, b)`.
///
/// Returns [`CalcError::InvalidOperator`] for anything outside `+ - * / ^`.
pub fn evaluate(a: f64, b: f64, op: char) -> Result<f64, CalcError> {
    let operator = Operator::from_char(op).ok_or(CalcError::InvalidOperator(op))?;
    Ok(operator.apply(a, b))
}
