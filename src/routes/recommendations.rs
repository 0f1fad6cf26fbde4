use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use recommender_clustering::Preference;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::routes::AppState;
use crate::routes::recipes::RecipeSummary;

const DEFAULT_LIMIT: i64 = 20;

#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationParams {
    pub cook_time: i64,
    pub complexity: f64,
    pub ingredients: i64,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedRecipe {
    #[serde(flatten)]
    pub recipe: RecipeSummary,
    pub similarity_distance: f64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub cluster_id: usize,
    pub recipes: Vec<RecommendedRecipe>,
}

fn to_count(value: i64, field: &str) -> Result<u32, AppError> {
    u32::try_from(value).map_err(|_| AppError::ValidationError(format!("{field} is out of range")))
}

/// GET /api/recommendations
#[tracing::instrument(skip_all)]
pub async fn recommend(
    State(state): State<AppState>,
    params: Result<Query<RecommendationParams>, QueryRejection>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::ValidationError(e.body_text()))?;
    params.validate()?;

    let preference = Preference::new(
        to_count(params.cook_time, "cook_time")?,
        params.complexity,
        to_count(params.ingredients, "ingredients")?,
    );
    let limit = usize::try_from(params.limit.unwrap_or(DEFAULT_LIMIT))
        .map_err(|_| AppError::ValidationError("limit is out of range".to_string()))?;

    let recommendation = state.recommender.recommend(&preference, limit)?;

    tracing::debug!(
        cook_time = preference.cook_time_minutes,
        complexity = preference.complexity,
        ingredients = preference.ingredient_count,
        cluster_id = recommendation.cluster_id,
        returned = recommendation.recipes.len(),
        "Recommendations served"
    );

    Ok(Json(RecommendationResponse {
        cluster_id: recommendation.cluster_id,
        recipes: recommendation
            .recipes
            .iter()
            .map(|ranked| RecommendedRecipe {
                recipe: RecipeSummary::from(ranked.recipe),
                similarity_distance: ranked.distance,
            })
            .collect(),
    }))
}
