//! Display formatting for conversion results

const SCIENTIFIC_UPPER: f64 = 1e9;
const SCIENTIFIC_LOWER: f64 = 1e-4;
const SCIENTIFIC_DIGITS: usize = 4;
const MIN_FRACTION_DIGITS: usize = 2;

/// Insert ',' every three digits from the right. `digits` is ASCII.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Scientific notation with an explicitly signed exponent: `1.5000e+9`
fn to_exponential(value: f64, digits: usize) -> String {
    let raw = format!("{:.*e}", digits, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
        _ => raw,
    }
}

/// Number of fractional digits allowed for a value of this magnitude
fn max_fraction_digits(abs: f64) -> usize {
    let magnitude = abs.max(1.0).log10().floor() as i32;
    let decimal_places = (4 - magnitude).max(0) as usize;
    decimal_places.max(MIN_FRACTION_DIGITS)
}

/// Format a conversion result for display.
///
/// Very large or very small magnitudes use scientific notation; everything else
/// gets grouped integer digits and 2 to 4 fractional digits depending on size.
pub fn format_result(result: f64) -> String {
    if !result.is_finite() {
        return result.to_string();
    }

    let abs = result.abs();
    if abs > SCIENTIFIC_UPPER || (abs > 0.0 && abs < SCIENTIFIC_LOWER) {
        return to_exponential(result, SCIENTIFIC_DIGITS);
    }

    let fixed = format!("{:.*}", max_fraction_digits(abs), abs);
    let (integer_part, fraction_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    // Strip trailing zeros but keep the minimum fraction width
    let mut fraction = fraction_part.trim_end_matches('0').to_string();
    while fraction.len() < MIN_FRACTION_DIGITS {
        fraction.push('0');
    }

    let sign = if result < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, group_thousands(integer_part), fraction)
}
