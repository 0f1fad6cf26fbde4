use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{ClusteringError, ClusteringResult};
use crate::features::squared_distance;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansOptions {
    pub k: usize,
    pub max_iterations: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    pub centroids: Vec<Vec<f64>>,
    /// Nearest centroid for every input point
    pub labels: Vec<usize>,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Index of the nearest centroid and the squared distance to it
///
/// Ties go to the lowest index.
pub fn nearest_centroid(centroids: &[Vec<f64>], point: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);

    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(centroid, point);
        if distance < best.1 {
            best = (index, distance);
        }
    }

    best
}

/// `k` must be at least 1 and no larger than the number of points
pub fn check_cluster_count(points: usize, k: usize) -> ClusteringResult<()> {
    if k == 0 {
        return Err(ClusteringError::Configuration(
            "number of clusters must be at least 1".to_string(),
        ));
    }

    if points < k {
        return Err(ClusteringError::Configuration(format!(
            "{} recipes cannot form {} clusters",
            points, k
        )));
    }

    Ok(())
}

/// Lloyd's algorithm with k-means++ seeding
///
/// A cluster left without points keeps its previous centroid. The returned
/// labels always come from a final assignment against the returned centroids.
pub fn fit(points: &[Vec<f64>], options: &KMeansOptions) -> ClusteringResult<KMeansFit> {
    check_cluster_count(points.len(), options.k)?;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut centroids = initial_centroids(points, options.k, &mut rng);
    let mut labels = assign(points, &centroids);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        iterations += 1;
        update_centroids(points, &labels, &mut centroids);

        let next = assign(points, &centroids);
        if next == labels {
            converged = true;
            break;
        }
        labels = next;
    }

    let labels = assign(points, &centroids);
    let inertia: f64 = points
        .iter()
        .zip(&labels)
        .map(|(point, &label)| squared_distance(point, &centroids[label]))
        .sum();

    debug!(k = options.k, iterations, converged, inertia, "k-means finished");

    Ok(KMeansFit {
        centroids,
        labels,
        inertia,
        iterations,
        converged,
    })
}

fn initial_centroids(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())].clone());

    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|point| nearest_centroid(&centroids, point).1)
            .collect();
        let total: f64 = weights.iter().sum();

        // Every point already sits on a centroid
        if total <= 0.0 {
            centroids.push(points[rng.random_range(0..points.len())].clone());
            continue;
        }

        let mut target = rng.random::<f64>() * total;
        let mut chosen = weights.iter().rposition(|weight| *weight > 0.0).unwrap_or(0);
        for (index, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            if target < *weight {
                chosen = index;
                break;
            }
            target -= weight;
        }

        centroids.push(points[chosen].clone());
    }

    centroids
}

fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    points
        .iter()
        .map(|point| nearest_centroid(centroids, point).0)
        .collect()
}

fn update_centroids(points: &[Vec<f64>], labels: &[usize], centroids: &mut [Vec<f64>]) {
    let dimensions = centroids.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; dimensions]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (point, &label) in points.iter().zip(labels) {
        counts[label] += 1;
        for (total, value) in sums[label].iter_mut().zip(point) {
            *total += value;
        }
    }

    for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
        if count == 0 {
            continue;
        }
        *centroid = sum.into_iter().map(|total| total / count as f64).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(k: usize) -> KMeansOptions {
        KMeansOptions {
            k,
            max_iterations: 100,
            seed: 42,
        }
    }

    fn two_blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.2],
            vec![0.2, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 9.9],
            vec![9.8, 10.2],
        ]
    }

    #[test]
    fn test_nearest_centroid_ties_go_to_lowest_index() {
        let centroids = vec![vec![1.0], vec![-1.0]];
        assert_eq!(nearest_centroid(&centroids, &[0.0]).0, 0);
    }

    #[test]
    fn test_fit_separates_blobs() {
        let fit = fit(&two_blobs(), &options(2)).unwrap();
        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.labels[1], fit.labels[2]);
        assert_eq!(fit.labels[3], fit.labels[4]);
        assert_eq!(fit.labels[4], fit.labels[5]);
        assert_ne!(fit.labels[0], fit.labels[3]);
        assert!(fit.converged);
    }

    #[test]
    fn test_fit_is_reproducible_for_a_seed() {
        let first = fit(&two_blobs(), &options(3)).unwrap();
        let second = fit(&two_blobs(), &options(3)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_labels_are_nearest_centroids() {
        let points = two_blobs();
        let fit = fit(&points, &options(3)).unwrap();
        for (point, label) in points.iter().zip(&fit.labels) {
            assert_eq!(nearest_centroid(&fit.centroids, point).0, *label);
        }
    }

    #[test]
    fn test_identical_points_still_give_k_centroids() {
        let points = vec![vec![1.0, 1.0]; 4];
        let fit = fit(&points, &options(3)).unwrap();
        assert_eq!(fit.centroids.len(), 3);
        assert_eq!(fit.inertia, 0.0);
        assert!(fit.labels.iter().all(|&label| label == 0));
    }

    #[test]
    fn test_fit_rejects_fewer_points_than_k() {
        let result = fit(&two_blobs(), &options(7));
        assert!(matches!(result, Err(ClusteringError::Configuration(_))));

        let result = fit(&two_blobs(), &options(0));
        assert!(matches!(result, Err(ClusteringError::Configuration(_))));
    }

    #[test]
    fn test_iteration_cap_is_respected() {
        let capped = KMeansOptions {
            max_iterations: 1,
            ..options(2)
        };
        let fit = fit(&two_blobs(), &capped).unwrap();
        assert_eq!(fit.iterations, 1);
    }
}
