use std::collections::HashSet;
use std::sync::LazyLock;

/// Unit words recognised after a leading quantity
static UNITS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Volume
        "cup", "cups", "c", "tablespoon", "tablespoons", "tbsp", "tbs", "teaspoon", "teaspoons",
        "tsp", "milliliter", "milliliters", "ml", "liter", "liters", "l", "quart", "quarts", "qt",
        "pint", "pints", "pt", "gallon", "gallons",
        // Weight
        "ounce", "ounces", "oz", "pound", "pounds", "lb", "lbs", "gram", "grams", "g",
        "kilogram", "kilograms", "kg",
        // Count-like
        "pinch", "pinches", "dash", "dashes", "clove", "cloves", "can", "cans", "package",
        "packages", "pkg", "slice", "slices", "stick", "sticks", "bunch", "bunches", "sprig",
        "sprigs",
    ]
    .into_iter()
    .collect()
});

/// Check if a word is a known cooking unit
///
/// Case-insensitive; a single trailing period ("tbsp.") is accepted.
pub fn is_unit(word: &str) -> bool {
    let normalized = word.trim().to_lowercase();
    let normalized = normalized.strip_suffix('.').unwrap_or(&normalized);

    UNITS.contains(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_units() {
        assert!(is_unit("cups"));
        assert!(is_unit("teaspoon"));
        assert!(is_unit("Tbsp."));
        assert!(is_unit("OZ"));
    }

    #[test]
    fn test_ingredient_words_are_not_units() {
        assert!(!is_unit("eggs"));
        assert!(!is_unit("flour"));
        assert!(!is_unit(""));
    }
}
