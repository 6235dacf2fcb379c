use crate::error::Result;
use ndarray::{Array1, Array2, ArrayView1};

/// Label returned by [`AnomalyModel::predict`] for outliers.
pub const OUTLIER: i32 = -1;
/// Label returned by [`AnomalyModel::predict`] for inliers.
pub const INLIER: i32 = 1;

/// Unsupervised outlier detector over feature matrices (one row per sample).
pub trait AnomalyModel: Send + Sync {
    /// Fit the detector on training data
    fn fit(&mut self, x: &Array2<f64>) -> Result<()>;

    /// Raw anomaly score per row; higher is more normal, negative is outlying
    fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Labels per row ([`OUTLIER`] or [`INLIER`])
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<i32>>;

    fn decision_value(&self, features: &[f64]) -> Result<f64> {
        Ok(self.decision_function(&single_row(features))?[0])
    }

    fn is_outlier(&self, features: &[f64]) -> Result<bool> {
        Ok(self.predict(&single_row(features))?[0] == OUTLIER)
    }
}

fn single_row(features: &[f64]) -> Array2<f64> {
    ArrayView1::from(features)
        .insert_axis(ndarray::Axis(0))
        .to_owned()
}
