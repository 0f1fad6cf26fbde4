use serde::{Deserialize, Serialize};

use crate::error::{ClusteringError, ClusteringResult};

/// Per-feature standardization fitted on the training rows
///
/// Uses the population standard deviation. A feature with zero spread has a
/// scale of 0 and standardizes to 0 for every input, training row or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(rows: &[Vec<f64>]) -> ClusteringResult<Self> {
        let Some(first) = rows.first() else {
            return Err(ClusteringError::Configuration(
                "cannot fit a scaler on zero rows".to_string(),
            ));
        };

        let dimensions = first.len();
        if rows.iter().any(|row| row.len() != dimensions) {
            return Err(ClusteringError::Configuration(
                "feature rows have inconsistent lengths".to_string(),
            ));
        }

        let count = rows.len() as f64;
        let mut mean = vec![0.0; dimensions];
        for row in rows {
            for (total, value) in mean.iter_mut().zip(row) {
                *total += value;
            }
        }
        mean.iter_mut().for_each(|total| *total /= count);

        let mut scale = vec![0.0; dimensions];
        for row in rows {
            for ((total, value), m) in scale.iter_mut().zip(row).zip(&mean) {
                *total += (value - m) * (value - m);
            }
        }
        scale.iter_mut().for_each(|total| *total = (*total / count).sqrt());

        Ok(Self { mean, scale })
    }

    pub fn dimensions(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((value, mean), scale)| {
                if *scale == 0.0 {
                    0.0
                } else {
                    (value - mean) / scale
                }
            })
            .collect()
    }

    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_uses_population_std() {
        let scaler = StandardScaler::fit(&[vec![1.0, 5.0], vec![3.0, 5.0]]).unwrap();
        assert_eq!(scaler.mean, vec![2.0, 5.0]);
        assert_eq!(scaler.scale, vec![1.0, 0.0]);
    }

    #[test]
    fn test_transform_standardizes() {
        let scaler = StandardScaler::fit(&[vec![1.0], vec![3.0]]).unwrap();
        assert_eq!(scaler.transform(&[1.0]), vec![-1.0]);
        assert_eq!(scaler.transform(&[5.0]), vec![3.0]);
    }

    #[test]
    fn test_zero_spread_feature_scales_to_zero() {
        let scaler = StandardScaler::fit(&[vec![1.0, 7.0], vec![3.0, 7.0]]).unwrap();
        assert_eq!(scaler.transform(&[2.0, 100.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_fit_rejects_empty_and_ragged_rows() {
        assert!(StandardScaler::fit(&[]).is_err());
        assert!(StandardScaler::fit(&[vec![1.0], vec![1.0, 2.0]]).is_err());
    }
}
