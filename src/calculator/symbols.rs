//! Named values: the fixed constant table and the per-calculator memory.

use std::collections::HashMap;
use std::f64::consts;
use std::sync::RwLock;

use crate::error::CalcError;

/// Case-sensitive mathematical constants, consulted before memory.
const CONSTANTS: &[(&str, f64)] = &[("Pi", consts::PI), ("E", consts::E)];

/// Look up a constant by name.
pub fn constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(constant_name, _)| *constant_name == name)
        .map(|(_, value)| *value)
}

/// Variables remembered across calculations.
///
/// Reads and writes go through a lock so a single calculator can be shared
/// between threads.
#[derive(Debug, Default)]
pub struct Memory {
    values: RwLock<HashMap<String, f64>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .copied()
    }

    /// Store `value` under `name`.
    ///
    /// Names must be non-empty runs of ASCII letters that do not shadow a
    /// constant, and values must be finite.
    pub fn set(&self, name: &str, value: f64) -> Result<(), CalcError> {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CalcError::malformed(format!(
                "invalid variable name '{name}'"
            )));
        }
        if constant(name).is_some() {
            return Err(CalcError::malformed(format!(
                "cannot overwrite constant '{name}'"
            )));
        }
        if !value.is_finite() {
            return Err(CalcError::NonFinite(value));
        }

        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.to_string(), value);
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Option<f64> {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(name)
    }

    pub fn clear(&self) {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    /// Resolve an identifier: constants first, then memory.
    ///
    /// A name that resolves to zero is treated as unresolved.
    pub fn resolve(&self, name: &str) -> Result<f64, CalcError> {
        match constant(name).or_else(|| self.get(name)) {
            Some(value) if value != 0.0 => Ok(value),
            _ => Err(CalcError::UnresolvedSymbol(name.to_string())),
        }
    }
}
