use std::collections::BTreeMap;

use recommender_catalog::Catalog;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ClusteringResult;
use crate::features::{FEATURE_NAMES, build_features};
use crate::kmeans::{self, KMeansFit, KMeansOptions};
use crate::model::{ARTIFACT_VERSION, ClusterModel};
use crate::scaler::StandardScaler;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingOptions {
    pub clusters: usize,
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            clusters: 6,
            max_iterations: 300,
            seed: 42,
        }
    }
}

/// Model plus the standardized rows and fit it came from
pub(crate) struct Fitted {
    pub model: ClusterModel,
    pub points: Vec<Vec<f64>>,
    pub fit: KMeansFit,
}

pub(crate) fn fit_catalog(catalog: &Catalog, options: &TrainingOptions) -> ClusteringResult<Fitted> {
    let rows = build_features(catalog);
    let kmeans_options = KMeansOptions {
        k: options.clusters,
        max_iterations: options.max_iterations,
        seed: options.seed,
    };

    // Before the scaler so an empty catalog reports the cluster count
    kmeans::check_cluster_count(rows.len(), options.clusters)?;

    let scaler = StandardScaler::fit(&rows)?;
    let points = scaler.transform_all(&rows);
    let fit = kmeans::fit(&points, &kmeans_options)?;

    let assignments: BTreeMap<u64, usize> = catalog
        .recipes()
        .iter()
        .zip(&fit.labels)
        .map(|(recipe, &label)| (recipe.id, label))
        .collect();

    let model = ClusterModel {
        version: ARTIFACT_VERSION,
        k: options.clusters,
        feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
        scaler,
        centroids: fit.centroids.clone(),
        assignments,
    };

    Ok(Fitted { model, points, fit })
}

/// Train a cluster model over every recipe in the catalog
///
/// Fails with a configuration error when the catalog has fewer recipes than
/// requested clusters; `k` is never reduced.
pub fn train(catalog: &Catalog, options: &TrainingOptions) -> ClusteringResult<ClusterModel> {
    let fitted = fit_catalog(catalog, options)?;

    info!(
        recipes = catalog.len(),
        k = options.clusters,
        iterations = fitted.fit.iterations,
        converged = fitted.fit.converged,
        inertia = fitted.fit.inertia,
        cluster_sizes = ?fitted.model.cluster_sizes(),
        "Cluster model trained"
    );

    Ok(fitted.model)
}
