use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recommender_catalog::CatalogError;
use recommender_clustering::ClusteringError;
use recommender_ingredients::IngredientError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Recipe not found")]
    NotFound,

    #[error(transparent)]
    ClusteringError(#[from] ClusteringError),

    #[error(transparent)]
    CatalogError(#[from] CatalogError),

    #[error(transparent)]
    IngredientError(#[from] IngredientError),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Recipe not found".to_string()),
            AppError::ClusteringError(ClusteringError::InvalidPreference(msg)) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::CatalogError(CatalogError::InvalidSearchParameter(msg)) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::IngredientError(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::ClusteringError(e) => {
                tracing::error!("Cluster model error: {}", e);
                internal()
            }
            AppError::CatalogError(e) => {
                tracing::error!("Catalog error: {}", e);
                internal()
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An unexpected error occurred. Please try again later.".to_string(),
    )
}
