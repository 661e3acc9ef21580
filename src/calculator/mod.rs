//! Calculator module for evaluating arithmetic expressions.
//!
//! This module provides functionality to:
//! - Validate that input looks like a supported expression
//! - Tokenize and evaluate it with a two-stack reduction
//! - Round and format the result, or report the `ERROR` sentinel

mod arithmetic;
mod evaluation;
mod format;
mod symbols;
mod tokens;
mod validation;

pub use arithmetic::{Operator, evaluate};
pub use evaluation::{CalcResult, Calculator, ERROR};
pub use format::{DEFAULT_PRECISION, format_number, format_result, round_to};
pub use symbols::{Memory, constant};
pub use tokens::{Token, tokenize};
pub use validation::{DEFAULT_MAX_LENGTH, is_valid, is_valid_with};
