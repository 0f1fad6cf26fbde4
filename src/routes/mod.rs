use std::sync::Arc;

use axum::{Router, routing::get};
use recommender_catalog::Catalog;
use recommender_clustering::Recommender;
use tower_http::trace::TraceLayer;

mod health;
mod recipes;
mod recommendations;
mod search;

pub use recipes::{EnrichedIngredientsResponse, RecipeDetail, RecipeSummary};
pub use recommendations::{RecommendationParams, RecommendationResponse, RecommendedRecipe};
pub use search::{SearchParams, SearchResponse, SearchResult};

/// Shared read-only state; cloning only bumps reference counts
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            catalog: recommender.catalog().clone(),
            recommender: Arc::new(recommender),
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/recommendations", get(recommendations::recommend))
        .route("/api/search", get(search::search))
        .route("/api/recipes/{id}", get(recipes::detail))
        .route(
            "/api/recipes/{id}/enriched-ingredients",
            get(recipes::enriched_ingredients),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
