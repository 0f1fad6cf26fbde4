use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use recommender_catalog::Catalog;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ClusteringError, ClusteringResult};
use crate::features::FEATURE_NAMES;
use crate::kmeans::nearest_centroid;
use crate::scaler::StandardScaler;

/// Bumped whenever the artifact layout changes
pub const ARTIFACT_VERSION: u32 = 1;

/// Trained partition of the standardized feature space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterModel {
    pub version: u32,
    pub k: usize,
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    /// Centroids in standardized space, indexed by cluster id
    pub centroids: Vec<Vec<f64>>,
    /// Recipe id to cluster id
    pub assignments: BTreeMap<u64, usize>,
}

impl ClusterModel {
    pub fn load(path: impl AsRef<Path>) -> ClusteringResult<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| ClusteringError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let model: Self = serde_json::from_str(&contents).map_err(|source| ClusteringError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        model.validate()?;

        info!(
            path = %path.display(),
            k = model.k,
            recipes = model.assignments.len(),
            "Cluster model loaded"
        );

        Ok(model)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ClusteringResult<()> {
        let path = path.as_ref();

        let contents =
            serde_json::to_string_pretty(self).map_err(|source| ClusteringError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ClusteringError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, contents).map_err(|source| ClusteringError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), k = self.k, "Cluster model saved");

        Ok(())
    }

    /// Check the artifact is internally consistent
    pub fn validate(&self) -> ClusteringResult<()> {
        if self.version != ARTIFACT_VERSION {
            return Err(configuration(format!(
                "unsupported artifact version {} (expected {})",
                self.version, ARTIFACT_VERSION
            )));
        }

        if self.feature_names != FEATURE_NAMES {
            return Err(configuration(format!(
                "artifact features {:?} do not match {:?}",
                self.feature_names, FEATURE_NAMES
            )));
        }

        if self.k == 0 || self.centroids.len() != self.k {
            return Err(configuration(format!(
                "artifact declares k = {} but holds {} centroids",
                self.k,
                self.centroids.len()
            )));
        }

        let dimensions = self.feature_names.len();
        if self.scaler.mean.len() != dimensions || self.scaler.scale.len() != dimensions {
            return Err(configuration(
                "scaler dimensionality does not match the feature set".to_string(),
            ));
        }

        if self.centroids.iter().any(|c| c.len() != dimensions) {
            return Err(configuration(
                "centroid dimensionality does not match the feature set".to_string(),
            ));
        }

        let mut scaler_values = self.scaler.mean.iter().chain(&self.scaler.scale);
        if scaler_values.any(|v| !v.is_finite()) || self.scaler.scale.iter().any(|v| *v < 0.0) {
            return Err(configuration(
                "scaler holds non-finite or negative values".to_string(),
            ));
        }

        if let Some(cluster) = self
            .centroids
            .iter()
            .position(|c| c.iter().any(|v| !v.is_finite()))
        {
            return Err(configuration(format!(
                "centroid {} holds non-finite values",
                cluster
            )));
        }

        if let Some((id, cluster)) = self.assignments.iter().find(|(_, c)| **c >= self.k) {
            return Err(configuration(format!(
                "recipe {} assigned to cluster {} outside 0..{}",
                id, cluster, self.k
            )));
        }

        Ok(())
    }

    /// Check every catalog recipe is assigned and nothing else is
    pub fn validate_against(&self, catalog: &Catalog) -> ClusteringResult<()> {
        self.validate()?;

        if let Some(recipe) = catalog
            .recipes()
            .iter()
            .find(|recipe| !self.assignments.contains_key(&recipe.id))
        {
            return Err(configuration(format!(
                "recipe {} has no cluster assignment",
                recipe.id
            )));
        }

        if let Some(id) = self.assignments.keys().find(|id| !catalog.contains(**id)) {
            return Err(configuration(format!(
                "artifact assigns unknown recipe {}",
                id
            )));
        }

        Ok(())
    }

    pub fn cluster_of(&self, recipe_id: u64) -> Option<usize> {
        self.assignments.get(&recipe_id).copied()
    }

    /// Cluster whose centroid is nearest to a raw (unscaled) feature vector
    pub fn nearest_cluster(&self, raw: &[f64]) -> usize {
        nearest_centroid(&self.centroids, &self.scaler.transform(raw)).0
    }

    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for &cluster in self.assignments.values() {
            if let Some(size) = sizes.get_mut(cluster) {
                *size += 1;
            }
        }
        sizes
    }
}

fn configuration(message: String) -> ClusteringError {
    ClusteringError::Configuration(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ClusterModel {
        ClusterModel {
            version: ARTIFACT_VERSION,
            k: 2,
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            scaler: StandardScaler {
                mean: vec![10.0, 10.0, 10.0],
                scale: vec![1.0, 1.0, 1.0],
            },
            centroids: vec![vec![-1.0, -1.0, -1.0], vec![1.0, 1.0, 1.0]],
            assignments: BTreeMap::from([(1, 0), (2, 1)]),
        }
    }

    #[test]
    fn test_valid_model() {
        assert!(model().validate().is_ok());
    }

    #[test]
    fn test_nearest_cluster_standardizes_target() {
        let model = model();
        assert_eq!(model.nearest_cluster(&[8.0, 9.0, 9.0]), 0);
        assert_eq!(model.nearest_cluster(&[12.0, 11.0, 10.5]), 1);
        // Equidistant from both centroids
        assert_eq!(model.nearest_cluster(&[10.0, 10.0, 10.0]), 0);
    }

    #[test]
    fn test_validate_rejects_inconsistent_artifacts() {
        let mut wrong_k = model();
        wrong_k.k = 3;
        assert!(wrong_k.validate().is_err());

        let mut wrong_dims = model();
        wrong_dims.centroids[1] = vec![1.0, 1.0];
        assert!(wrong_dims.validate().is_err());

        let mut out_of_range = model();
        out_of_range.assignments.insert(3, 2);
        assert!(out_of_range.validate().is_err());

        let mut old_version = model();
        old_version.version = ARTIFACT_VERSION + 1;
        assert!(old_version.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_values() {
        let mut nan_centroid = model();
        nan_centroid.centroids[1][0] = f64::NAN;
        let err = nan_centroid.validate().unwrap_err();
        assert!(err.to_string().contains("centroid 1"));

        let mut infinite_mean = model();
        infinite_mean.scaler.mean[2] = f64::INFINITY;
        assert!(infinite_mean.validate().is_err());

        let mut nan_scale = model();
        nan_scale.scaler.scale[0] = f64::NAN;
        assert!(nan_scale.validate().is_err());

        let mut negative_scale = model();
        negative_scale.scaler.scale[0] = -1.0;
        assert!(negative_scale.validate().is_err());
    }

    #[test]
    fn test_cluster_sizes() {
        let mut model = model();
        model.assignments.insert(3, 1);
        assert_eq!(model.cluster_sizes(), vec![1, 2]);
        assert_eq!(model.cluster_of(3), Some(1));
        assert_eq!(model.cluster_of(9), None);
    }
}
