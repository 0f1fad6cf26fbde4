use std::ops::RangeInclusive;

use recommender_catalog::Catalog;
use serde::Serialize;
use tracing::info;

use crate::error::ClusteringResult;
use crate::features::euclidean_distance;
use crate::training::{TrainingOptions, fit_catalog};

/// Quality of a clustering for one value of `k`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KEvaluation {
    pub k: usize,
    pub inertia: f64,
    /// Undefined for a single cluster or when every point is its own cluster
    pub silhouette: Option<f64>,
}

/// Train one model per `k` and score each
pub fn evaluate(
    catalog: &Catalog,
    k_range: RangeInclusive<usize>,
    options: &TrainingOptions,
) -> ClusteringResult<Vec<KEvaluation>> {
    let mut evaluations = Vec::new();

    for k in k_range {
        let fitted = fit_catalog(
            catalog,
            &TrainingOptions {
                clusters: k,
                ..*options
            },
        )?;

        let evaluation = KEvaluation {
            k,
            inertia: fitted.fit.inertia,
            silhouette: silhouette_score(&fitted.points, &fitted.fit.labels, k),
        };

        info!(
            k,
            inertia = evaluation.inertia,
            silhouette = ?evaluation.silhouette,
            "Evaluated cluster count"
        );

        evaluations.push(evaluation);
    }

    Ok(evaluations)
}

/// `k` with the highest silhouette, ties to the smaller `k`
pub fn best_k(evaluations: &[KEvaluation]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for evaluation in evaluations {
        let Some(score) = evaluation.silhouette else {
            continue;
        };

        match best {
            Some((k, current)) if score < current || (score == current && k < evaluation.k) => {}
            _ => best = Some((evaluation.k, score)),
        }
    }

    best.map(|(k, _)| k)
}

/// Mean silhouette coefficient over all points
///
/// A point alone in its cluster scores 0.
pub fn silhouette_score(points: &[Vec<f64>], labels: &[usize], k: usize) -> Option<f64> {
    if k < 2 || points.len() <= k || points.len() != labels.len() {
        return None;
    }

    let mut total = 0.0;

    for (i, point) in points.iter().enumerate() {
        let mut sums = vec![0.0; k];
        let mut counts = vec![0usize; k];

        for (j, other) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            sums[labels[j]] += euclidean_distance(point, other);
            counts[labels[j]] += 1;
        }

        let own = labels[i];
        if counts[own] == 0 {
            continue;
        }

        let a = sums[own] / counts[own] as f64;
        let b = (0..k)
            .filter(|&cluster| cluster != own && counts[cluster] > 0)
            .map(|cluster| sums[cluster] / counts[cluster] as f64)
            .fold(f64::INFINITY, f64::min);

        if !b.is_finite() {
            continue;
        }

        let spread = a.max(b);
        if spread > 0.0 {
            total += (b - a) / spread;
        }
    }

    Some(total / points.len() as f64)
}
