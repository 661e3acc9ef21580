//! Rounding and canonical rendering of results.
//!
//! Results are rounded to a fixed number of decimals, then printed with
//! 14 significant digits: plain notation for moderate magnitudes, and
//! `1.0E+18` style scientific notation otherwise.

/// Default number of decimal places kept in a result.
pub const DEFAULT_PRECISION: u32 = 5;

const SIGNIFICANT_DIGITS: i32 = 14;

/// Beyond this magnitude an `f64` has no fractional digits worth rounding.
const ROUNDING_LIMIT: f64 = 1e15;

/// Round half away from zero to `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_LIMIT {
        return value;
    }

    let factor = 10f64.powi(precision.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    pre_round(scaled).round() / factor
}

/// Round to 15 significant digits so binary error does not flip decimal ties
/// (`1.234565 * 1e5` is `123456.49999999999`).
fn pre_round(value: f64) -> f64 {
    format!("{value:.14e}").parse().unwrap_or(value)
}

/// Round `value` and render it in canonical form.
pub fn format_result(value: f64, precision: u32) -> String {
    format_number(round_to(value, precision))
}

/// Render `value` with 14 significant digits.
///
/// Decimal exponents from -4 up to 13 print in plain notation with trailing
/// zeros removed; everything else prints as `M.ME±X`, keeping a `.0` on an
/// integral mantissa.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { "INF" } else { "-INF" }.to_string();
    }
    // Also catches negative zero.
    if value == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let mut mantissa = trim_fraction(mantissa).to_string();
        if !mantissa.contains('.') {
            mantissa.push_str(".0");
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}E{sign}{}", exponent.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

/// Strip trailing zeros of a fractional part, then a dangling `.`.
fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
