use std::sync::Arc;

use recommender_catalog::{Catalog, Recipe};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClusteringError, ClusteringResult};
use crate::features::{euclidean_distance, recipe_features};
use crate::model::ClusterModel;

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub cook_time_minutes: u32,
    pub complexity: f64,
    pub ingredient_count: u32,
}

impl Preference {
    pub fn new(cook_time_minutes: u32, complexity: f64, ingredient_count: u32) -> Self {
        Self {
            cook_time_minutes,
            complexity,
            ingredient_count,
        }
    }

    fn validate(&self) -> ClusteringResult<()> {
        if self.cook_time_minutes < 1 {
            return Err(invalid("cooking time must be at least 1 minute"));
        }

        if !self.complexity.is_finite() || self.complexity < 0.0 {
            return Err(invalid("complexity must be a non-negative number"));
        }

        if self.ingredient_count < 1 {
            return Err(invalid("ingredient count must be at least 1"));
        }

        Ok(())
    }

    /// Same feature order as the recipes were trained with
    fn features(&self) -> Vec<f64> {
        vec![
            f64::from(self.cook_time_minutes),
            self.complexity,
            f64::from(self.ingredient_count),
        ]
    }
}

fn invalid(message: &str) -> ClusteringError {
    ClusteringError::InvalidPreference(message.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecipe<'a> {
    pub recipe: &'a Recipe,
    /// Euclidean distance in raw feature space
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation<'a> {
    pub cluster_id: usize,
    pub recipes: Vec<RankedRecipe<'a>>,
}

/// Online side of the cluster model
///
/// Holds the catalog and artifact read-only; safe to share across requests.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    model: Arc<ClusterModel>,
    /// Catalog positions per cluster id
    members: Vec<Vec<usize>>,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>, model: Arc<ClusterModel>) -> ClusteringResult<Self> {
        model.validate_against(&catalog)?;

        let mut members = vec![Vec::new(); model.k];
        for (position, recipe) in catalog.recipes().iter().enumerate() {
            if let Some(cluster) = model.cluster_of(recipe.id) {
                members[cluster].push(position);
            }
        }

        Ok(Self {
            catalog,
            model,
            members,
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn model(&self) -> &Arc<ClusterModel> {
        &self.model
    }

    /// Rank the recipes of the cluster nearest to the preference
    ///
    /// Results never leave the selected cluster, so fewer than `limit` recipes
    /// may come back. Ordered by distance, then id.
    pub fn recommend(
        &self,
        preference: &Preference,
        limit: usize,
    ) -> ClusteringResult<Recommendation<'_>> {
        preference.validate()?;
        if limit < 1 {
            return Err(invalid("limit must be at least 1"));
        }

        let target = preference.features();
        let cluster_id = self.model.nearest_cluster(&target);
        let recipes = self.catalog.recipes();

        let mut ranked: Vec<RankedRecipe<'_>> = self.members[cluster_id]
            .iter()
            .map(|&position| {
                let recipe = &recipes[position];
                RankedRecipe {
                    recipe,
                    distance: euclidean_distance(&recipe_features(recipe), &target),
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.recipe.id.cmp(&b.recipe.id))
        });
        ranked.truncate(limit);

        debug!(
            cluster_id,
            candidates = self.members[cluster_id].len(),
            returned = ranked.len(),
            "Recommendation ranked"
        );

        Ok(Recommendation {
            cluster_id,
            recipes: ranked,
        })
    }
}
