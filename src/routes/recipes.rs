use axum::{
    Json,
    extract::{Path, Query, State, rejection::PathRejection, rejection::QueryRejection},
};
use recommender_catalog::Recipe;
use recommender_ingredients::{ParsedIngredient, parse_all};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::routes::AppState;

/// Serving multipliers accepted from clients
pub const MIN_MULTIPLIER: f64 = 0.5;
pub const MAX_MULTIPLIER: f64 = 4.0;

/// Compact recipe view used in result lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: u64,
    pub name: String,
    pub cook_time_minutes: u32,
    pub complexity_score: u64,
    pub n_ingredients: u32,
    pub n_steps: u32,
    pub cuisine: Option<String>,
    pub dietary_tags: Vec<String>,
    pub avg_rating: f64,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            cook_time_minutes: recipe.cook_time_minutes,
            complexity_score: recipe.complexity_score(),
            n_ingredients: recipe.n_ingredients,
            n_steps: recipe.n_steps,
            cuisine: recipe.cuisine.clone(),
            dietary_tags: recipe.dietary_tags.iter().cloned().collect(),
            avg_rating: recipe.avg_rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub num_interactions: u32,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub recipe: RecipeDetail,
}

#[derive(Debug, Deserialize)]
pub struct EnrichParams {
    pub multiplier: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedIngredientsResponse {
    pub recipe_id: u64,
    pub original_ingredients: Vec<String>,
    pub parsed_ingredients: Vec<ParsedIngredient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaled_ingredients: Option<Vec<String>>,
}

fn find_recipe(state: &AppState, id: Result<Path<u64>, PathRejection>) -> Result<&Recipe, AppError> {
    // Ids are numeric, so a malformed id can never match
    let Ok(Path(id)) = id else {
        return Err(AppError::NotFound);
    };

    state.catalog.get(id).ok_or(AppError::NotFound)
}

/// GET /api/recipes/{id}
#[tracing::instrument(skip_all)]
pub async fn detail(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<RecipeResponse>, AppError> {
    let recipe = find_recipe(&state, id)?;

    Ok(Json(RecipeResponse {
        recipe: RecipeDetail {
            summary: RecipeSummary::from(recipe),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            num_interactions: recipe.num_interactions,
        },
    }))
}

/// GET /api/recipes/{id}/enriched-ingredients
///
/// Parses every ingredient line. With `multiplier` (clamped to 0.5..=4.0) the
/// response also carries the rescaled lines, formatted for display.
#[tracing::instrument(skip_all)]
pub async fn enriched_ingredients(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    params: Result<Query<EnrichParams>, QueryRejection>,
) -> Result<Json<EnrichedIngredientsResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let recipe = find_recipe(&state, id)?;

    let multiplier = match params.multiplier {
        Some(m) if !m.is_finite() => {
            return Err(AppError::ValidationError(
                "multiplier must be a finite number".to_string(),
            ));
        }
        Some(m) => Some(m.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)),
        None => None,
    };

    let parsed_ingredients = parse_all(&recipe.ingredients);

    let scaled_ingredients = match multiplier {
        Some(m) => Some(
            parsed_ingredients
                .iter()
                .map(|ingredient| ingredient.scale(m).map(|scaled| scaled.to_string()))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        None => None,
    };

    tracing::debug!(
        recipe_id = recipe.id,
        ingredients = parsed_ingredients.len(),
        multiplier = ?multiplier,
        "Enriched ingredients"
    );

    Ok(Json(EnrichedIngredientsResponse {
        recipe_id: recipe.id,
        original_ingredients: recipe.ingredients.clone(),
        parsed_ingredients,
        multiplier,
        scaled_ingredients,
    }))
}
