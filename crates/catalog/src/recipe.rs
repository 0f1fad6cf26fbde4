use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Immutable catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: u64,
    pub name: String,
    pub cook_time_minutes: u32,
    pub n_steps: u32,
    pub n_ingredients: u32,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cuisine: Option<String>,
    pub dietary_tags: BTreeSet<String>,
    pub avg_rating: f64,
    pub num_interactions: u32,
}

impl Recipe {
    /// Steps times ingredients, derived on every call
    pub fn complexity_score(&self) -> u64 {
        u64::from(self.n_steps) * u64::from(self.n_ingredients)
    }

    /// Ingredients joined by a single space
    pub fn ingredient_text(&self) -> String {
        self.ingredients.join(" ")
    }
}

/// List-like column as it appears in exported catalogs
///
/// Either a proper JSON array or a string holding a delimited list, sometimes
/// wrapped in a bracketed list representation (`"['salt', 'pepper']"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListField {
    Items(Vec<String>),
    Text(String),
}

impl Default for ListField {
    fn default() -> Self {
        ListField::Items(Vec::new())
    }
}

impl ListField {
    /// Normalise into trimmed, non-empty items
    pub fn into_items(self, separator: char) -> Vec<String> {
        match self {
            ListField::Items(items) => items.iter().filter_map(|item| clean_item(item)).collect(),
            ListField::Text(text) => parse_list_text(&text, separator),
        }
    }
}

fn parse_list_text(text: &str, separator: char) -> Vec<String> {
    let trimmed = text.trim();

    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            return items.iter().filter_map(|item| clean_item(item)).collect();
        }

        // Single-quoted list representation; items are comma separated
        return trimmed
            .trim_matches(|c| c == '[' || c == ']')
            .split(',')
            .filter_map(clean_item)
            .collect();
    }

    trimmed.split(separator).filter_map(clean_item).collect()
}

fn clean_item(item: &str) -> Option<String> {
    let cleaned = item
        .trim()
        .trim_matches(|c| matches!(c, '[' | ']' | '\'' | '"'))
        .trim();

    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Raw catalog row before normalisation
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeRecord {
    #[serde(alias = "recipe_id")]
    pub id: u64,
    pub name: String,
    #[serde(alias = "minutes")]
    pub cook_time_minutes: u32,
    #[serde(default)]
    pub n_steps: Option<u32>,
    #[serde(default)]
    pub n_ingredients: Option<u32>,
    #[serde(default)]
    pub ingredients: ListField,
    /// Richer ingredient lines, preferred when present
    #[serde(default)]
    pub detailed_ingredients: Option<ListField>,
    #[serde(default, alias = "steps")]
    pub instructions: ListField,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub dietary_tags: ListField,
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub num_interactions: u32,
}

impl From<RecipeRecord> for Recipe {
    fn from(record: RecipeRecord) -> Self {
        let ingredients = record
            .detailed_ingredients
            .map(|detailed| detailed.into_items(','))
            .filter(|detailed| !detailed.is_empty())
            .unwrap_or_else(|| record.ingredients.into_items(','));
        let instructions = record.instructions.into_items('.');
        let dietary_tags = record.dietary_tags.into_items(',').into_iter().collect();

        let n_ingredients = record
            .n_ingredients
            .unwrap_or_else(|| u32::try_from(ingredients.len()).unwrap_or(u32::MAX));
        let n_steps = record
            .n_steps
            .unwrap_or_else(|| u32::try_from(instructions.len()).unwrap_or(u32::MAX));

        let cuisine = record
            .cuisine
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Recipe {
            id: record.id,
            name: record.name.trim().to_string(),
            cook_time_minutes: record.cook_time_minutes,
            n_steps,
            n_ingredients,
            ingredients,
            instructions,
            cuisine,
            dietary_tags,
            avg_rating: record.avg_rating,
            num_interactions: record.num_interactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_score_is_steps_times_ingredients() {
        let record: RecipeRecord = serde_json::from_str(
            r#"{"id": 1, "name": "Toast", "cook_time_minutes": 5, "n_steps": 3, "n_ingredients": 4}"#,
        )
        .unwrap();
        let recipe = Recipe::from(record);
        assert_eq!(recipe.complexity_score(), 12);
    }

    #[test]
    fn test_list_field_accepts_json_array() {
        let field = ListField::Items(vec![" flour ".into(), "".into(), "sugar".into()]);
        assert_eq!(field.into_items(','), vec!["flour", "sugar"]);
    }

    #[test]
    fn test_list_field_parses_delimited_string() {
        let field = ListField::Text("flour, sugar ,, eggs".into());
        assert_eq!(field.into_items(','), vec!["flour", "sugar", "eggs"]);
    }

    #[test]
    fn test_list_field_parses_bracketed_representation() {
        let field = ListField::Text("['salt', 'black pepper', '']".into());
        assert_eq!(field.into_items(','), vec!["salt", "black pepper"]);

        let json = ListField::Text(r#"["Mix well.", "Bake"]"#.into());
        assert_eq!(json.into_items('.'), vec!["Mix well.", "Bake"]);
    }

    #[test]
    fn test_instructions_split_on_period() {
        let field = ListField::Text("Mix the flour. Bake for 20 minutes.".into());
        assert_eq!(
            field.into_items('.'),
            vec!["Mix the flour", "Bake for 20 minutes"]
        );
    }

    #[test]
    fn test_counts_derived_from_lists_when_absent() {
        let record: RecipeRecord = serde_json::from_str(
            r#"{
                "recipe_id": 7,
                "name": " Pancakes ",
                "minutes": 20,
                "ingredients": "flour, milk, eggs",
                "steps": ["whisk", "fry"],
                "cuisine": "  ",
                "dietary_tags": "vegetarian"
            }"#,
        )
        .unwrap();
        let recipe = Recipe::from(record);

        assert_eq!(recipe.id, 7);
        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.n_ingredients, 3);
        assert_eq!(recipe.n_steps, 2);
        assert_eq!(recipe.cuisine, None);
        assert!(recipe.dietary_tags.contains("vegetarian"));
        assert_eq!(recipe.ingredient_text(), "flour milk eggs");
    }

    #[test]
    fn test_detailed_ingredients_take_precedence() {
        let record: RecipeRecord = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "Rice",
                "minutes": 15,
                "ingredients": ["rice", "water"],
                "detailed_ingredients": "1 cup rice, 2 cups water"
            }"#,
        )
        .unwrap();
        let recipe = Recipe::from(record);
        assert_eq!(recipe.ingredients, vec!["1 cup rice", "2 cups water"]);

        let empty: RecipeRecord = serde_json::from_str(
            r#"{"id": 4, "name": "Tea", "minutes": 5, "ingredients": "tea", "detailed_ingredients": ""}"#,
        )
        .unwrap();
        assert_eq!(Recipe::from(empty).ingredients, vec!["tea"]);
    }
}
