//! Per-column standardization to zero mean and unit variance.

use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, FEATURE_COUNT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: FeatureVector,
    /// Population standard deviation; constant columns use 1.
    scale: FeatureVector,
}

impl StandardScaler {
    /// Fit column statistics. `rows` must be non-empty.
    pub fn fit(rows: &[FeatureVector]) -> Self {
        let n = rows.len().max(1) as f64;
        let mut mean = [0.0; FEATURE_COUNT];
        let mut scale = [1.0; FEATURE_COUNT];

        for col in 0..FEATURE_COUNT {
            let m = rows.iter().map(|r| r[col]).sum::<f64>() / n;
            let var = rows.iter().map(|r| (r[col] - m).powi(2)).sum::<f64>() / n;
            mean[col] = m;
            let std = var.sqrt();
            if std > f64::EPSILON {
                scale[col] = std;
            }
        }

        Self { mean, scale }
    }

    pub fn transform(&self, row: &FeatureVector) -> FeatureVector {
        std::array::from_fn(|col| (row[col] - self.mean[col]) / self.scale[col])
    }

    pub fn transform_all(&self, rows: &[FeatureVector]) -> Vec<FeatureVector> {
        rows.iter().map(|r| self.transform(r)).collect()
    }
}
