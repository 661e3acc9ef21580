//! Expression validation for the calculator.
//!
//! A fast pre-check run before any tokenization: the input must be short
//! enough and built only from characters the evaluator understands.

use lazy_static::lazy_static;
use regex::Regex;

/// Default maximum expression length, in bytes.
pub const DEFAULT_MAX_LENGTH: usize = 50;

lazy_static! {
    /// Optional leading run of alphanumerics, whitespace and `(`, then a core of
    /// alphanumerics, whitespace, operators, parentheses and dots, ending in an
    /// alphanumeric or `)`.
    static ref EXPRESSION_PATTERN: Regex = Regex::new(
        r"^[0-9a-zA-Z\s(]*[0-9a-zA-Z\s+\-*/^().]*[0-9a-zA-Z)]+$"
    ).unwrap();
}

/// Check if `input` is an acceptable expression, using the default length limit.
pub fn is_valid(input: &str) -> bool {
    is_valid_with(input, DEFAULT_MAX_LENGTH)
}

/// Check if `input` is an acceptable expression of at most `max_length` bytes.
///
/// Returns `false` for empty or whitespace-only input, input longer than
/// `max_length`, and input containing characters outside
/// `[0-9a-zA-Z+-*/^().]` and whitespace.
pub fn is_valid_with(input: &str, max_length: usize) -> bool {
    input.len() <= max_length && EXPRESSION_PATTERN.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_expressions_accepted() {
        assert!(is_valid(" 10 + 2^5 + (33/3 + (100-50)*2) +6/2 - Pi"));
        assert!(is_valid("5*(5+2)"));
        assert!(is_valid("Pi"));
        assert!(is_valid("0.2+0.5"));
        assert!(is_valid("(1)"));
        assert!(is_valid("-5"));
    }

    #[test]
    fn test_invalid_characters_rejected() {
        assert!(!is_valid("5 > 2 && (560 + 22)"));
        assert!(!is_valid(") 5 > 2"));
        assert!(!is_valid("2 % 3"));
        assert!(!is_valid("x_1"));
        assert!(!is_valid("3,5"));
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        assert!(!is_valid(""));
        assert!(!is_valid("   "));
        assert!(!is_valid("\t\n"));
    }

    #[test]
    fn test_trailing_operator_rejected() {
        assert!(!is_valid("5+"));
        assert!(!is_valid("(5+2)*"));
        assert!(!is_valid("2."));
    }

    #[test]
    fn test_length_limit() {
        let at_limit = "1".repeat(DEFAULT_MAX_LENGTH);
        let over_limit = "1".repeat(DEFAULT_MAX_LENGTH + 1);
        assert!(is_valid(&at_limit));
        assert!(!is_valid(&over_limit));
        assert!(is_valid_with(&over_limit, DEFAULT_MAX_LENGTH + 1));
        assert!(!is_valid_with("1+1", 2));
    }

    #[test]
    fn test_is_pure() {
        let input = "222/2 + 2*Pi";
        assert_eq!(is_valid(input), is_valid(input));
    }
}
