//! Two-stack arithmetic expression evaluator.
//!
//! ```
//! use stackcalc::Calculator;
//!
//! let calculator = Calculator::new();
//! assert_eq!(calculator.calculate("100/2 + 20*3 + (2 - 1)"), "111");
//! assert_eq!(calculator.calculate(") 5 > 2"), "ERROR");
//! ```

pub mod calculator;
pub mod config;
pub mod error;
pub mod request;

pub use calculator::{CalcResult, Calculator, ERROR, evaluate, is_valid};
pub use config::CalculatorConfig;
pub use error::CalcError;
