use recommender_catalog::{Catalog, Recipe};

/// Feature order shared by the scaler, centroids and targets
pub const FEATURE_NAMES: [&str; 3] = ["minutes", "complexity_score", "ingredient_count"];

pub fn recipe_features(recipe: &Recipe) -> Vec<f64> {
    vec![
        f64::from(recipe.cook_time_minutes),
        recipe.complexity_score() as f64,
        f64::from(recipe.n_ingredients),
    ]
}

/// One feature row per recipe, in catalog order
pub fn build_features(catalog: &Catalog) -> Vec<Vec<f64>> {
    catalog.recipes().iter().map(recipe_features).collect()
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    squared_distance(a, b).sqrt()
}

pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
