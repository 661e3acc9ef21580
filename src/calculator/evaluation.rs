//! Expression evaluation.
//!
//! A single left-to-right pass over the token sequence, reducing eagerly
//! against a number stack and an operator stack whenever operator priority
//! allows it.

use tracing::{debug, trace};

use super::arithmetic::{Operator, PAREN_PRIORITY};
use super::format::format_result;
use super::symbols::Memory;
use super::tokens::{Token, format_tokens, tokenize};
use super::validation::is_valid_with;
use crate::config::CalculatorConfig;
use crate::error::CalcError;

/// The only failure value that crosses the public boundary.
pub const ERROR: &str = "ERROR";

/// Result of evaluating a calculator expression.
#[derive(Clone, Debug)]
pub enum CalcResult {
    /// Successful calculation with a finite numeric result.
    Success {
        /// The original expression.
        expression: String,
        /// The unrounded value.
        value: f64,
        /// Rounded and formatted for display.
        display_result: String,
    },
    /// Validation or evaluation failed.
    Error {
        /// The original expression.
        expression: String,
        error: CalcError,
    },
}

impl CalcResult {
    /// Get the expression that was evaluated.
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. } => expression,
            Self::Error { expression, .. } => expression,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Get the display string: the formatted result, or the `ERROR` sentinel.
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display_result, .. } => display_result,
            Self::Error { .. } => ERROR,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Success { value, .. } => Some(*value),
            Self::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&CalcError> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error, .. } => Some(error),
        }
    }
}

/// An expression evaluator with its own variable memory.
///
/// `Calculator` is `Send + Sync`; one instance may serve concurrent callers.
#[derive(Debug, Default)]
pub struct Calculator {
    config: CalculatorConfig,
    memory: Memory,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CalculatorConfig) -> Self {
        Self {
            config,
            memory: Memory::new(),
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Validate `input` against this calculator's length limit.
    pub fn is_valid(&self, input: &str) -> bool {
        is_valid_with(input, self.config.max_length)
    }

    /// Whether `input` passes validation the way [`Calculator::calculate`] sees it,
    /// after whitespace removal.
    pub fn check(&self, input: &str) -> bool {
        self.is_valid(&clean(input))
    }

    /// Evaluate `input` and return the formatted result or `"ERROR"`.
    ///
    /// Never fails: every internal error collapses to the sentinel.
    pub fn calculate(&self, input: &str) -> String {
        self.evaluate_expression(input).display().to_string()
    }

    /// Evaluate `input`, keeping the error detail on failure.
    pub fn evaluate_expression(&self, input: &str) -> CalcResult {
        let expression = input.to_string();

        match self.try_calculate(input) {
            Ok(value) => CalcResult::Success {
                display_result: format_result(value, self.config.precision),
                expression,
                value,
            },
            Err(error) => {
                debug!(%expression, %error, "calculation failed");
                CalcResult::Error { expression, error }
            }
        }
    }

    /// Evaluate `input` to its unrounded value.
    pub fn try_calculate(&self, input: &str) -> Result<f64, CalcError> {
        let cleaned = clean(input);
        if !self.is_valid(&cleaned) {
            return Err(CalcError::Validation);
        }

        let tokens = tokenize(&cleaned)?;
        trace!(tokens = %format_tokens(&tokens), "tokenized expression");

        let value = StackMachine::new(&self.memory).run(&tokens)?;
        if !value.is_finite() {
            return Err(CalcError::NonFinite(value));
        }
        Ok(value)
    }

    /// Evaluate `input` and, on success, store the unrounded value under `name`.
    pub fn calculate_into(&self, name: &str, input: &str) -> String {
        let result = self.evaluate_expression(input);
        if let Some(value) = result.value()
            && let Err(error) = self.memory.set(name, value)
        {
            debug!(name, %error, "could not store result");
            return ERROR.to_string();
        }
        result.display().to_string()
    }

    /// Store a variable for use in later expressions.
    pub fn remember(&self, name: &str, value: f64) -> Result<(), CalcError> {
        self.memory.set(name, value)?;
        debug!(name, value, "stored variable");
        Ok(())
    }

    pub fn recall(&self, name: &str) -> Option<f64> {
        self.memory.get(name)
    }

    pub fn forget(&self, name: &str) -> Option<f64> {
        self.memory.remove(name)
    }

    pub fn clear_memory(&self) {
        self.memory.clear();
    }
}

/// An entry of the operator stack. `)` is never pushed.
#[derive(Clone, Copy, Debug, PartialEq)]
enum StackItem {
    Operator(Operator),
    OpenParen,
}

impl StackItem {
    fn priority(self) -> u8 {
        match self {
            Self::Operator(op) => op.priority(),
            Self::OpenParen => PAREN_PRIORITY,
        }
    }
}

/// Per-call evaluation state.
struct StackMachine<'a> {
    numbers: Vec<f64>,
    operators: Vec<StackItem>,
    memory: &'a Memory,
}

impl<'a> StackMachine<'a> {
    fn new(memory: &'a Memory) -> Self {
        Self {
            numbers: Vec::new(),
            operators: Vec::new(),
            memory,
        }
    }

    fn run(mut self, tokens: &[Token]) -> Result<f64, CalcError> {
        let mut cursor = 0;

        while cursor < tokens.len() {
            match &tokens[cursor] {
                Token::Number(value) => self.numbers.push(*value),

                Token::Identifier(name) => {
                    let value = self.memory.resolve(name)?;
                    self.numbers.push(value);
                }

                Token::Operator(op) => {
                    // A leading minus negates the operand that follows it.
                    if *op == Operator::Sub && starts_group(tokens, cursor) {
                        self.numbers.push(0.0);
                    }

                    match self.operators.last().copied() {
                        Some(top) if op.priority() <= top.priority() => {
                            self.reduce()?;
                            // Re-process the same operator against the new top.
                            continue;
                        }
                        _ => self.operators.push(StackItem::Operator(*op)),
                    }
                }

                Token::OpenParen => self.operators.push(StackItem::OpenParen),

                Token::CloseParen => match self.operators.last().copied() {
                    None => return Err(CalcError::malformed("unmatched ')'")),
                    Some(StackItem::OpenParen) => {
                        self.operators.pop();
                    }
                    Some(StackItem::Operator(_)) => {
                        self.reduce()?;
                        // Keep flushing until the matching '(' is on top.
                        continue;
                    }
                },
            }

            cursor += 1;
        }

        while self.numbers.len() > 1 {
            self.reduce()?;
        }

        match self.operators.last().copied() {
            Some(StackItem::OpenParen) => Err(CalcError::malformed("unclosed '('")),
            Some(StackItem::Operator(op)) => Err(CalcError::malformed(format!(
                "dangling operator '{}'",
                op.symbol()
            ))),
            None => self
                .numbers
                .pop()
                .ok_or_else(|| CalcError::malformed("empty expression")),
        }
    }

    /// Pop two operands and one operator, apply it, and push the result.
    fn reduce(&mut self) -> Result<(), CalcError> {
        let op = match self.operators.pop() {
            Some(StackItem::Operator(op)) => op,
            Some(StackItem::OpenParen) => return Err(CalcError::malformed("unclosed '('")),
            None => return Err(CalcError::malformed("missing operator between operands")),
        };

        let underflow = || {
            CalcError::malformed(format!("operator '{}' is missing an operand", op.symbol()))
        };
        let b = self.numbers.pop().ok_or_else(underflow)?;
        let a = self.numbers.pop().ok_or_else(underflow)?;

        let result = op.apply(a, b);
        trace!(a, b, op = %op.symbol(), result, "reduced");
        self.numbers.push(result);
        Ok(())
    }
}

/// Strip all whitespace from raw input.
fn clean(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Whether the token at `cursor` is the first of the expression or of a
/// parenthesized group.
fn starts_group(tokens: &[Token], cursor: usize) -> bool {
    cursor == 0 || matches!(tokens.get(cursor - 1), Some(Token::OpenParen))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(input: &str) -> String {
        Calculator::new().calculate(input)
    }

    #[test]
    fn test_use_cases() {
        assert_eq!(calc("5*(5+2)"), "35");
        assert_eq!(calc("5"), "5");
        assert_eq!(calc("(5/5*2)"), "2");
        assert_eq!(calc("100/2 + 20*3 + (2 - 1)"), "111");
        assert_eq!(calc("Pi"), "3.14159");
        assert_eq!(calc("E"), "2.71828");
        assert_eq!(calc("Pi/E"), "1.15573");
        assert_eq!(calc("222/2 + 2*Pi"), "117.28319");
        assert_eq!(calc("222/2 + 111*2"), "333");
        assert_eq!(calc("1000000000*1000000000"), "1.0E+18");
        assert_eq!(calc("1000000000/1000000000"), "1");
        assert_eq!(calc("0.2+0.5"), "0.7");
        assert_eq!(calc("0.5*0.5"), "0.25");
    }

    #[test]
    fn test_long_mixed_expression() {
        assert_eq!(
            calc(" 10 + 2^5 + (33/3 + (100-50)*2) +6/2 - Pi"),
            "152.85841"
        );
        let result = Calculator::new().evaluate_expression("10-E+5");
        assert!(result.is_success());
        assert_eq!(result.display(), "12.28172");
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(calc("2+3*4"), "14");
        assert_eq!(calc("2*3+4"), "10");
        assert_eq!(calc("1-2*3+4"), "-1");
        assert_eq!(calc("10-4-3"), "3");
        assert_eq!(calc("64/4/2"), "8");
        assert_eq!(calc("2*3^2"), "18");
        assert_eq!(calc("2^3*4"), "32");
        assert_eq!(calc("2^3^2"), "64");
        assert_eq!(calc("(2+3)*4"), "20");
        assert_eq!(calc("2*(3+4)*5"), "70");
        assert_eq!(calc("((1+2)*(3+4))"), "21");
    }

    #[test]
    fn test_leading_minus() {
        assert_eq!(calc("-3"), "-3");
        assert_eq!(calc("-2^2"), "-4");
        assert_eq!(calc("(-3)*2"), "-6");
        assert_eq!(calc("-(2+3)"), "-5");
        assert_eq!(calc("2*-3"), ERROR);
    }

    #[test]
    fn test_invalid_input_is_error() {
        assert_eq!(calc(") 5 > 2"), ERROR);
        assert_eq!(calc("5 > 2 && (560 + 22)"), ERROR);
        assert_eq!(calc(""), ERROR);
        assert_eq!(calc("   "), ERROR);
        assert_eq!(calc(&"1+".repeat(30)), ERROR);
    }

    #[test]
    fn test_whitespace_is_removed_before_length_check() {
        let spaced = format!("{}1", " ".repeat(60));
        assert_eq!(calc(&spaced), "1");
        assert!(Calculator::new().check(&spaced));
    }

    #[test]
    fn test_check_matches_calculate() {
        let calculator = Calculator::new();
        let spaced = format!("1 +{}2", " ".repeat(60));
        assert!(!calculator.is_valid(&spaced));
        assert!(calculator.check(&spaced));
        assert_eq!(calculator.calculate(&spaced), "3");

        assert!(!calculator.check(") 5 > 2"));
        assert!(!calculator.check("   "));
        assert!(!calculator.check(&"1 + ".repeat(20)));
    }

    #[test]
    fn test_decimal_ties() {
        assert_eq!(calc("1.234565"), "1.23457");
        assert_eq!(calc("1.000005"), "1.00001");
    }

    #[test]
    fn test_malformed_expressions() {
        let calculator = Calculator::new();
        for input in ["5)", "()", "(5", "2*(3+4", "2Pi", "1.2.3", "(5+)", "5(3)"] {
            assert!(
                matches!(
                    calculator.try_calculate(input),
                    Err(CalcError::Malformed(_))
                ),
                "input={input:?}"
            );
            assert_eq!(calculator.calculate(input), ERROR, "input={input:?}");
        }
    }

    #[test]
    fn test_error_kinds() {
        let calculator = Calculator::new();
        assert_eq!(
            calculator.try_calculate(") 5 > 2"),
            Err(CalcError::Validation)
        );
        assert_eq!(
            calculator.try_calculate("2*foo"),
            Err(CalcError::UnresolvedSymbol("foo".into()))
        );
        assert_eq!(
            calculator.try_calculate("pi"),
            Err(CalcError::UnresolvedSymbol("pi".into()))
        );
        assert!(matches!(
            calculator.try_calculate("1/0"),
            Err(CalcError::NonFinite(_))
        ));
    }

    #[test]
    fn test_division_by_zero_is_error() {
        assert_eq!(calc("1/0"), ERROR);
        assert_eq!(calc("0/0"), ERROR);
        assert_eq!(calc("10^400"), ERROR);
    }

    #[test]
    fn test_idempotent_on_plain_numbers() {
        for input in ["5*(5+2)", "Pi/E", "0.2+0.5", "2-5", "1/3"] {
            let first = calc(input);
            assert_eq!(calc(&first), first, "input={input:?}");
        }
    }

    #[test]
    fn test_memory_lookup() {
        let calculator = Calculator::new();
        assert_eq!(calculator.calculate("rate*2"), ERROR);

        calculator.remember("rate", 1.5).unwrap();
        assert_eq!(calculator.calculate("rate*2"), "3");
        assert_eq!(calculator.recall("rate"), Some(1.5));

        assert_eq!(calculator.forget("rate"), Some(1.5));
        assert_eq!(calculator.calculate("rate*2"), ERROR);
    }

    #[test]
    fn test_zero_variable_is_unresolved() {
        let calculator = Calculator::new();
        calculator.remember("nothing", 0.0).unwrap();
        assert_eq!(
            calculator.try_calculate("nothing+1"),
            Err(CalcError::UnresolvedSymbol("nothing".into()))
        );
    }

    #[test]
    fn test_calculate_into() {
        let calculator = Calculator::new();
        assert_eq!(calculator.calculate_into("third", "1/3"), "0.33333");
        assert_eq!(calculator.recall("third"), Some(1.0 / 3.0));
        assert_eq!(calculator.calculate("third*3"), "1");

        assert_eq!(calculator.calculate_into("Pi", "1+1"), ERROR);
        assert_eq!(calculator.calculate_into("bad", "1/0"), ERROR);
        assert_eq!(calculator.recall("bad"), None);

        calculator.clear_memory();
        assert_eq!(calculator.recall("third"), None);
    }

    #[test]
    fn test_config_limits() {
        let calculator = Calculator::with_config(CalculatorConfig {
            max_length: 5,
            precision: 2,
        });
        assert_eq!(calculator.config().max_length, 5);
        assert_eq!(calculator.calculate("Pi"), "3.14");
        assert_eq!(calculator.calculate("1+2+3"), "6");
        assert_eq!(calculator.calculate("1+2+34"), ERROR);
    }

    #[test]
    fn test_calc_result_accessors() {
        let calculator = Calculator::new();
        let ok = calculator.evaluate_expression("1+1");
        assert!(ok.is_success());
        assert_eq!(ok.expression(), "1+1");
        assert_eq!(ok.value(), Some(2.0));
        assert!(ok.error().is_none());

        let err = calculator.evaluate_expression("1+");
        assert!(!err.is_success());
        assert_eq!(err.display(), ERROR);
        assert_eq!(err.error(), Some(&CalcError::Validation));
    }

    #[test]
    fn test_shared_across_threads() {
        let calculator = std::sync::Arc::new(Calculator::new());
        calculator.remember("x", 2.0).unwrap();

        let handles: Vec<_> = (1..=4)
            .map(|n| {
                let calculator = std::sync::Arc::clone(&calculator);
                std::thread::spawn(move || calculator.calculate(&format!("x*{n}")))
            })
            .collect();

        let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec!["2", "4", "6", "8"]);
    }
}
