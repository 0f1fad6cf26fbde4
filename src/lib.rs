use std::sync::Arc;

use anyhow::Context;
use recommender_catalog::{Catalog, QualityFilter};
use recommender_clustering::{ClusterModel, Recommender};

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod routes;

pub use routes::AppState;

/// Load the catalog and the trained cluster model named in the config
///
/// `filter` must match the one used at training time so the served catalog is
/// the one the model was fitted on. Fails when either file is missing or
/// malformed, or when the model was trained against a different catalog.
pub fn load_state(
    model: &config::ModelConfig,
    filter: Option<QualityFilter>,
) -> anyhow::Result<AppState> {
    let mut catalog = Catalog::load(&model.catalog_path)
        .with_context(|| format!("loading recipe catalog from {}", model.catalog_path))?;
    if let Some(filter) = filter {
        catalog = filter.apply(&catalog)?;
    }

    let artifact = ClusterModel::load(&model.artifact_path)
        .with_context(|| format!("loading cluster model from {}", model.artifact_path))?;

    let recommender = Recommender::new(Arc::new(catalog), Arc::new(artifact))?;

    Ok(AppState::new(recommender))
}

/// Create app router for testing
///
/// Same routes as `serve`, without binding a listener.
pub fn create_app(state: AppState) -> axum::Router {
    routes::router(state)
}
