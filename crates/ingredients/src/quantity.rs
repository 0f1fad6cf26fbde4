use fraction::Fraction;

use crate::error::IngredientError;

/// Fractions that sub-unit quantities snap to when displayed
const CANONICAL_FRACTIONS: [(u64, u64); 6] = [(1, 2), (1, 3), (1, 4), (1, 8), (2, 3), (3, 4)];

/// Absolute tolerance for snapping to a canonical fraction
const SNAP_TOLERANCE: f64 = 0.01;

/// Longest decimal fraction part kept exact (10^9 still fits comfortably in u64)
const MAX_DECIMAL_PLACES: u32 = 9;

/// Parse a single quantity token into an exact Fraction
///
/// Supports formats:
/// - Whole numbers: "2" → 2/1
/// - Pure fractions: "1/2" → 1/2
/// - Decimals: "0.5" → 1/2, "1.25" → 5/4
///
/// Signs, exponents and zero denominators are rejected.
pub fn parse_quantity(token: &str) -> Result<Fraction, IngredientError> {
    let trimmed = token.trim();
    let invalid = || IngredientError::InvalidQuantity(token.to_string());

    if let Some((numerator, denominator)) = trimmed.split_once('/') {
        let numerator = parse_digits(numerator).ok_or_else(invalid)?;
        let denominator = parse_digits(denominator).ok_or_else(invalid)?;

        if denominator == 0 {
            return Err(IngredientError::InvalidQuantity(format!(
                "{}: denominator cannot be zero",
                token
            )));
        }

        return Ok(Fraction::new(numerator, denominator));
    }

    if let Some((whole, decimals)) = trimmed.split_once('.') {
        if decimals.is_empty() || decimals.len() > MAX_DECIMAL_PLACES as usize {
            return Err(invalid());
        }

        let whole = parse_digits(whole).ok_or_else(invalid)?;
        let decimals_value = parse_digits(decimals).ok_or_else(invalid)?;
        let scale = 10u64.pow(decimals.len() as u32);
        let numerator = whole
            .checked_mul(scale)
            .and_then(|n| n.checked_add(decimals_value))
            .ok_or_else(invalid)?;

        return Ok(Fraction::new(numerator, scale));
    }

    let whole = parse_digits(trimmed).ok_or_else(invalid)?;
    Ok(Fraction::new(whole, 1u64))
}

/// Combine a whole number and a fraction token ("1" + "1/2") into one quantity
pub fn parse_mixed_quantity(whole: &str, fraction: &str) -> Result<Fraction, IngredientError> {
    if !fraction.contains('/') {
        return Err(IngredientError::InvalidQuantity(format!(
            "{} {}",
            whole, fraction
        )));
    }

    let whole = parse_digits(whole.trim())
        .ok_or_else(|| IngredientError::InvalidQuantity(whole.to_string()))?;
    let fractional = parse_quantity(fraction)?;

    Ok(Fraction::new(whole, 1u64) + fractional)
}

fn parse_digits(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    value.parse().ok()
}

/// Convert a quantity to f64, NaN for non-finite fractions
pub fn quantity_to_f64(quantity: &Fraction) -> f64 {
    match (quantity.numer(), quantity.denom()) {
        (Some(numer), Some(denom)) if *denom != 0 => *numer as f64 / *denom as f64,
        _ => f64::NAN,
    }
}

/// True when the quantity is a whole number
pub fn is_whole(quantity: &Fraction) -> bool {
    quantity.denom() == Some(&1u64)
}

/// Format a quantity for display
///
/// Rules, applied in order:
/// - exact zero → "0"
/// - whole numbers → "2"
/// - below one → nearest of 1/2, 1/3, 1/4, 1/8, 2/3, 3/4 within 0.01,
///   otherwise two decimals with trailing zeros trimmed ("0.6"), widened to
///   one significant digit when that would read as zero ("0.0007")
/// - one or more → one decimal place ("1.5")
///
/// Lossy: "0.6" does not parse back to a canonical fraction and 0.34 shows as "1/3".
pub fn format_quantity(quantity: &Fraction) -> String {
    if quantity.numer() == Some(&0u64) {
        return "0".to_string();
    }

    if is_whole(quantity) {
        if let Some(numer) = quantity.numer() {
            return numer.to_string();
        }
    }

    let value = quantity_to_f64(quantity);

    if value < 1.0 {
        return snap_to_canonical(value).unwrap_or_else(|| format_small(value));
    }

    format!("{:.1}", value)
}

fn snap_to_canonical(value: f64) -> Option<String> {
    CANONICAL_FRACTIONS
        .iter()
        .map(|&(numer, denom)| {
            let diff = (value - numer as f64 / denom as f64).abs();
            (diff, numer, denom)
        })
        .filter(|(diff, _, _)| *diff <= SNAP_TOLERANCE)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, numer, denom)| format!("{}/{}", numer, denom))
}

/// Two decimals, widened to keep one significant digit for tiny non-zero values
fn format_small(value: f64) -> String {
    let formatted = trim_decimal(&format!("{:.2}", value));
    if formatted != "0" || value <= 0.0 {
        return formatted;
    }

    let places = (-value.log10()).ceil().max(2.0) as usize;
    trim_decimal(&format!("{:.*}", places, value))
}

fn trim_decimal(formatted: &str) -> String {
    if !formatted.contains('.') {
        return formatted.to_string();
    }

    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_number() {
        let result = parse_quantity("2").unwrap();
        assert_eq!(*result.numer().unwrap(), 2u64);
        assert_eq!(*result.denom().unwrap(), 1u64);
    }

    #[test]
    fn test_parse_pure_fraction_is_exact() {
        let result = parse_quantity("1/3").unwrap();
        assert_eq!(*result.numer().unwrap(), 1u64);
        assert_eq!(*result.denom().unwrap(), 3u64);
    }

    #[test]
    fn test_parse_decimal_is_exact() {
        let result = parse_quantity("1.25").unwrap();
        // 1.25 = 5/4
        assert_eq!(*result.numer().unwrap(), 5u64);
        assert_eq!(*result.denom().unwrap(), 4u64);
    }

    #[test]
    fn test_parse_mixed_fraction() {
        let result = parse_mixed_quantity("1", "1/2").unwrap();
        assert_eq!(*result.numer().unwrap(), 3u64);
        assert_eq!(*result.denom().unwrap(), 2u64);
    }

    #[test]
    fn test_parse_rejects_zero_denominator() {
        let result = parse_quantity("1/0");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("denominator cannot be zero"));
    }

    #[test]
    fn test_parse_rejects_signs_and_words() {
        assert!(parse_quantity("-2").is_err());
        assert!(parse_quantity("+2").is_err());
        assert!(parse_quantity("1e3").is_err());
        assert!(parse_quantity("cup").is_err());
        assert!(parse_quantity("1.").is_err());
        assert!(parse_quantity("").is_err());
    }

    #[test]
    fn test_format_zero() {
        assert_eq!(format_quantity(&Fraction::new(0u64, 1u64)), "0");
    }

    #[test]
    fn test_format_whole() {
        // 4/2 = 2
        assert_eq!(format_quantity(&Fraction::new(4u64, 2u64)), "2");
    }

    #[test]
    fn test_format_canonical_fractions() {
        assert_eq!(format_quantity(&Fraction::new(1u64, 2u64)), "1/2");
        assert_eq!(format_quantity(&Fraction::new(1u64, 8u64)), "1/8");
        assert_eq!(format_quantity(&Fraction::new(2u64, 3u64)), "2/3");
        assert_eq!(format_quantity(&Fraction::new(3u64, 4u64)), "3/4");
    }

    #[test]
    fn test_format_snaps_within_tolerance() {
        // 0.34 is within 0.01 of 1/3
        assert_eq!(format_quantity(&parse_quantity("0.34").unwrap()), "1/3");
    }

    #[test]
    fn test_format_falls_back_to_trimmed_decimals() {
        assert_eq!(format_quantity(&parse_quantity("0.6").unwrap()), "0.6");
        assert_eq!(format_quantity(&parse_quantity("0.15").unwrap()), "0.15");
    }

    #[test]
    fn test_format_tiny_quantity_is_not_zero() {
        assert_eq!(format_quantity(&Fraction::new(66u64, 100_000u64)), "0.0007");
        assert_eq!(format_quantity(&Fraction::new(4u64, 1000u64)), "0.004");
        assert_eq!(format_quantity(&Fraction::new(778u64, 999_999_000u64)), "0.0000008");
    }

    #[test]
    fn test_format_above_one_uses_one_decimal() {
        assert_eq!(format_quantity(&Fraction::new(3u64, 2u64)), "1.5");
        assert_eq!(format_quantity(&Fraction::new(11u64, 4u64)), "2.8");
    }

    #[test]
    fn test_format_is_lossy_for_non_canonical_values() {
        // 0.6 survives as a decimal, 0.34 is snapped to 1/3 and does not round-trip
        let original = parse_quantity("0.34").unwrap();
        let reparsed = parse_quantity(&format_quantity(&original)).unwrap();
        assert_ne!(original, reparsed);
    }
}
