use std::path::PathBuf;

use anyhow::{Context, Result};
use recommender_catalog::Catalog;
use recommender_clustering::{TrainingOptions, best_k, evaluate, train};

use crate::config::Config;

/// Catalog used for offline work, quality-filtered when enabled
fn training_catalog(config: &Config, catalog_override: Option<PathBuf>) -> Result<Catalog> {
    let path = catalog_override.unwrap_or_else(|| PathBuf::from(&config.model.catalog_path));
    let catalog = Catalog::load(&path)?;

    match config.training.filter() {
        Some(filter) => Ok(filter.apply(&catalog)?),
        None => Ok(catalog),
    }
}

pub fn train_model(
    config: &Config,
    catalog_override: Option<PathBuf>,
    output_override: Option<PathBuf>,
    clusters_override: Option<usize>,
) -> Result<()> {
    let catalog = training_catalog(config, catalog_override)?;
    let output = output_override.unwrap_or_else(|| PathBuf::from(&config.model.artifact_path));

    let options = TrainingOptions {
        clusters: clusters_override.unwrap_or(config.training.clusters),
        ..config.training.options()
    };

    tracing::info!(
        recipes = catalog.len(),
        clusters = options.clusters,
        seed = options.seed,
        "Training cluster model"
    );

    let model = train(&catalog, &options)?;
    model
        .save(&output)
        .with_context(|| format!("writing cluster model to {}", output.display()))?;

    println!(
        "Trained {} clusters over {} recipes -> {}",
        model.k,
        catalog.len(),
        output.display()
    );
    for (cluster, size) in model.cluster_sizes().iter().enumerate() {
        println!("  cluster {cluster}: {size} recipes");
    }

    Ok(())
}

pub fn evaluate_model(
    config: &Config,
    catalog_override: Option<PathBuf>,
    min_k: usize,
    max_k: usize,
) -> Result<()> {
    if min_k == 0 || min_k > max_k {
        anyhow::bail!("invalid k range {min_k}..={max_k}");
    }

    let catalog = training_catalog(config, catalog_override)?;
    let evaluations = evaluate(&catalog, min_k..=max_k, &config.training.options())?;

    println!("{:>4}  {:>14}  {:>10}", "k", "inertia", "silhouette");
    for evaluation in &evaluations {
        let silhouette = evaluation
            .silhouette
            .map(|s| format!("{s:.4}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4}  {:>14.3}  {:>10}",
            evaluation.k, evaluation.inertia, silhouette
        );
    }

    match best_k(&evaluations) {
        Some(k) => println!("Best k by silhouette: {k}"),
        None => println!("Silhouette undefined for every k in range"),
    }

    Ok(())
}
