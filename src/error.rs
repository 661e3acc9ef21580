//! Error type shared by the calculator pipeline.
//!
//! Every variant collapses to the `ERROR` sentinel at the public
//! [`Calculator::calculate`](crate::calculator::Calculator::calculate) boundary,
//! but they stay distinct internally so callers and tests can tell failures apart.

use thiserror::Error;

/// Failures that can occur while validating or evaluating an expression.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CalcError {
    /// The input failed the length or grammar check before parsing.
    #[error("expression failed validation")]
    Validation,

    /// An identifier has no entry in the constant table or in memory,
    /// or it resolves to zero.
    #[error("unresolved symbol: {0}")]
    UnresolvedSymbol(String),

    /// Unexpected character, unparsable number, unbalanced parentheses
    /// or an operator without operands.
    #[error("malformed expression: {0}")]
    Malformed(String),

    /// The arithmetic core was called with an operator outside `+ - * / ^`.
    #[error("invalid operator detected: {0}")]
    InvalidOperator(char),

    /// The result is infinite or NaN (division by zero, overflow).
    #[error("result is not a finite number: {0}")]
    NonFinite(f64),
}

impl CalcError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}
