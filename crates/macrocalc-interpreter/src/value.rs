//! Numeric value helpers for the MacroCalc interpreter.
//!
//! Every value is an `f64`. Truth is "nonzero"; comparisons and logical
//! operators produce `1` or `0`.

pub fn is_truthy(value: f64) -> bool {
    value != 0.0
}

pub fn from_bool(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Significant digits shown by `print`.
const PRINT_PRECISION: i32 = 6;

/// Renders a number the way `print` shows it: `%g` with six significant
/// digits, so `1/3` prints as `0.333333` and `1000000` as `1e+06`.
///
/// Fixed notation is used while the decimal exponent lies in `-4..6`,
/// scientific notation otherwise. Trailing zeros are dropped in both.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // The exponent is taken after rounding to the shown precision, so
    // 999999.5 moves up to 1e+06.
    let sci = format!("{:.*e}", (PRINT_PRECISION - 1) as usize, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exponent < -4 || exponent >= PRINT_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (PRINT_PRECISION - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Remainder of both operands truncated toward zero to integers.
///
/// Returns `None` when the truncated divisor is zero.
pub fn truncated_rem(a: f64, b: f64) -> Option<f64> {
    let divisor = b as i64;
    if divisor == 0 {
        return None;
    }
    Some((a as i64).wrapping_rem(divisor) as f64)
}
