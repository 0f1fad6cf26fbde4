use std::fmt;
use std::sync::LazyLock;

use fraction::Fraction;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::IngredientError;
use crate::quantity::{format_quantity, parse_mixed_quantity, parse_quantity, quantity_to_f64};
use crate::units::is_unit;

/// Trailing "(...)" preparation note
static RE_PREPARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(([^()]*)\)\s*$").unwrap());

/// Structured view of one raw ingredient line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIngredient {
    pub original: String,
    #[serde(serialize_with = "serialize_quantity")]
    pub quantity: Fraction,
    pub unit: String,
    pub name: String,
    pub preparation: Option<String>,
}

fn serialize_quantity<S: Serializer>(quantity: &Fraction, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(quantity_to_f64(quantity))
}

impl ParsedIngredient {
    /// Whole line as the name, quantity 1, no unit
    fn fallback(original: &str) -> Self {
        Self {
            original: original.to_string(),
            quantity: Fraction::new(1u64, 1u64),
            unit: String::new(),
            name: original.trim().to_string(),
            preparation: None,
        }
    }

    pub fn quantity_value(&self) -> f64 {
        quantity_to_f64(&self.quantity)
    }

    /// Copy with the quantity multiplied; all other fields unchanged
    ///
    /// The multiplier must be positive and finite. No upper bound is imposed
    /// here, callers exposing serving sizes clamp to their own range.
    pub fn scale(&self, multiplier: f64) -> Result<Self, IngredientError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(IngredientError::InvalidMultiplier(multiplier));
        }

        Ok(Self {
            quantity: multiply(&self.quantity, multiplier),
            ..self.clone()
        })
    }

    fn has_implicit_quantity(&self) -> bool {
        self.unit.is_empty() && self.quantity == Fraction::new(1u64, 1u64)
    }
}

impl fmt::Display for ParsedIngredient {
    /// "<qty> <unit> <name> (<preparation>)" with empty parts skipped
    ///
    /// The quantity prefix is dropped for a bare "1" so plain names read naturally.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(3);

        if !self.has_implicit_quantity() {
            parts.push(format_quantity(&self.quantity));
            if !self.unit.is_empty() {
                parts.push(self.unit.clone());
            }
        }

        if !self.name.is_empty() {
            parts.push(self.name.clone());
        }

        write!(f, "{}", parts.join(" "))?;

        if let Some(preparation) = &self.preparation {
            write!(f, " ({})", preparation)?;
        }

        Ok(())
    }
}

/// Parse a raw ingredient line
///
/// Best-effort grammar: `[quantity] [unit] name [(preparation)]` where quantity
/// is an integer, a decimal, a `n/d` fraction or a mixed number (`1 1/2`).
/// Lines without a leading quantity keep the whole text as the name.
pub fn parse(raw: &str) -> ParsedIngredient {
    let tokens: Vec<&str> = raw.split_whitespace().collect();

    let Some(first) = tokens.first() else {
        return ParsedIngredient::fallback(raw);
    };

    let Ok(mut quantity) = parse_quantity(first) else {
        return ParsedIngredient::fallback(raw);
    };
    let mut rest = &tokens[1..];

    // "1 1/2 cups": whole number followed by a fraction
    if !first.contains(['/', '.']) {
        if let Some(next) = rest.first() {
            if let Ok(mixed) = parse_mixed_quantity(first, next) {
                quantity = mixed;
                rest = &rest[1..];
            }
        }
    }

    if rest.is_empty() {
        return ParsedIngredient::fallback(raw);
    }

    let mut unit = String::new();
    if rest.len() > 1 && is_unit(rest[0]) {
        unit = rest[0].to_string();
        rest = &rest[1..];
    }

    let text = rest.join(" ");
    let (name, preparation) = split_preparation(&text);

    ParsedIngredient {
        original: raw.to_string(),
        quantity,
        unit,
        name,
        preparation,
    }
}

/// Parse every line of a recipe's ingredient list
pub fn parse_all<S: AsRef<str>>(lines: &[S]) -> Vec<ParsedIngredient> {
    lines.iter().map(|line| parse(line.as_ref())).collect()
}

/// Multiplier denominator used when the exact product does not fit in u64
const MULTIPLIER_GRID: u64 = 1000;

/// Product of a quantity and a positive finite multiplier
///
/// Exact when it fits, otherwise the multiplier is rounded to 1/1000ths, and as
/// a last resort the product is taken in floating point.
fn multiply(quantity: &Fraction, multiplier: f64) -> Fraction {
    let exact = Fraction::from(multiplier);
    if let (Some(numer), Some(denom)) = (exact.numer(), exact.denom()) {
        if let Some(product) = checked_product(quantity, *numer, *denom) {
            return product;
        }
    }

    let rounded = (multiplier * MULTIPLIER_GRID as f64).round();
    if rounded >= 1.0 && rounded < u64::MAX as f64 {
        if let Some(product) = checked_product(quantity, rounded as u64, MULTIPLIER_GRID) {
            return product;
        }
    }

    Fraction::from(quantity_to_f64(quantity) * multiplier)
}

/// `quantity * numer / denom` reduced, or None if it leaves u64
fn checked_product(quantity: &Fraction, numer: u64, denom: u64) -> Option<Fraction> {
    let numer = u128::from(*quantity.numer()?) * u128::from(numer);
    let denom = u128::from(*quantity.denom()?) * u128::from(denom);
    if denom == 0 {
        return None;
    }

    let divisor = gcd(numer, denom);
    let numer = u64::try_from(numer / divisor).ok()?;
    let denom = u64::try_from(denom / divisor).ok()?;

    Some(Fraction::new(numer, denom))
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn split_preparation(text: &str) -> (String, Option<String>) {
    let Some(captures) = RE_PREPARATION.captures(text) else {
        return (text.trim().to_string(), None);
    };

    let (Some(whole), Some(note)) = (captures.get(0), captures.get(1)) else {
        return (text.trim().to_string(), None);
    };

    let name = text[..whole.start()].trim();
    let note = note.as_str().trim();

    if name.is_empty() {
        return (text.trim().to_string(), None);
    }

    let preparation = (!note.is_empty()).then(|| note.to_string());
    (name.to_string(), preparation)
}
