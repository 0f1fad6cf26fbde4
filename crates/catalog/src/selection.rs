use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::Catalog;
use crate::error::CatalogResult;
use crate::recipe::Recipe;

/// Training-time quality gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityFilter {
    pub max_complexity: u64,
    pub min_avg_rating: f64,
    pub min_interactions: u32,
}

impl Default for QualityFilter {
    fn default() -> Self {
        Self {
            max_complexity: 100,
            min_avg_rating: 4.0,
            min_interactions: 3,
        }
    }
}

impl QualityFilter {
    pub fn accepts(&self, recipe: &Recipe) -> bool {
        recipe.complexity_score() <= self.max_complexity
            && recipe.avg_rating >= self.min_avg_rating
            && recipe.num_interactions >= self.min_interactions
    }

    /// New catalog holding only the accepted recipes
    pub fn apply(&self, catalog: &Catalog) -> CatalogResult<Catalog> {
        let kept: Vec<Recipe> = catalog
            .recipes()
            .iter()
            .filter(|recipe| self.accepts(recipe))
            .cloned()
            .collect();

        info!(
            before = catalog.len(),
            after = kept.len(),
            max_complexity = self.max_complexity,
            min_avg_rating = self.min_avg_rating,
            min_interactions = self.min_interactions,
            "Quality filter applied"
        );

        Catalog::from_recipes(kept)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn recipe(id: u64, n_steps: u32, avg_rating: f64, num_interactions: u32) -> Recipe {
        Recipe {
            id,
            name: format!("recipe {}", id),
            cook_time_minutes: 30,
            n_steps,
            n_ingredients: 10,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            cuisine: None,
            dietary_tags: BTreeSet::new(),
            avg_rating,
            num_interactions,
        }
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let filter = QualityFilter::default();
        assert!(filter.accepts(&recipe(1, 10, 4.0, 3)));
        assert!(!filter.accepts(&recipe(2, 11, 4.5, 10)));
        assert!(!filter.accepts(&recipe(3, 5, 3.9, 10)));
        assert!(!filter.accepts(&recipe(4, 5, 4.5, 2)));
    }

    #[test]
    fn test_apply_keeps_accepted_recipes() {
        let catalog = Catalog::from_recipes(vec![
            recipe(1, 5, 4.8, 20),
            recipe(2, 50, 4.8, 20),
            recipe(3, 5, 2.0, 20),
        ])
        .unwrap();

        let filtered = QualityFilter::default().apply(&catalog).unwrap();
        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains(1));
    }
}
