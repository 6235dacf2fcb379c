//! Isolation forest outlier detector.
//!
//! Scores follow the usual conventions: `score_samples` is the negated
//! anomaly score `-2^(-E[h(x)] / c(psi))`, the offset is the contamination
//! percentile of the training scores, and the decision function is the score
//! minus that offset (negative means outlier).

use crate::error::{DetectorError, Result};
use crate::model::{AnomalyModel, INLIER, OUTLIER};
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub n_estimators: usize,
    /// Rows drawn (without replacement) per tree, capped at the dataset size
    pub max_samples: usize,
    /// Expected fraction of outliers in the training data
    pub contamination: f64,
    /// Seed for subsampling and split selection
    pub random_state: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: 256,
            contamination: 0.1,
            random_state: 42,
        }
    }
}

impl ForestParams {
    fn validate(&self) -> Result<()> {
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(DetectorError::InvalidParameter(format!(
                "contamination must be in (0, 0.5], got {}",
                self.contamination
            )));
        }
        if self.n_estimators == 0 {
            return Err(DetectorError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.max_samples == 0 {
            return Err(DetectorError::InvalidParameter(
                "max_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    fn grow(x: &Array2<f64>, rows: &[usize], depth_limit: usize, rng: &mut StdRng) -> Self {
        Self {
            root: build_node(x, rows, 0, depth_limit, rng),
        }
    }

    /// Depth at which `sample` is isolated, adjusted for the rows left in its leaf.
    pub fn path_length(&self, sample: ArrayView1<f64>) -> f64 {
        let mut node = &self.root;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                    depth += 1.0;
                }
            }
        }
    }
}

fn build_node(
    x: &Array2<f64>,
    rows: &[usize],
    depth: usize,
    depth_limit: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= depth_limit || rows.len() <= 1 {
        return Node::Leaf { size: rows.len() };
    }

    // Only features that still vary within this node can split it.
    let candidates: Vec<(usize, f64, f64)> = (0..x.ncols())
        .filter_map(|feature| {
            let (lo, hi) = rows.iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), &row| {
                    let v = x[[row, feature]];
                    (lo.min(v), hi.max(v))
                },
            );
            (hi > lo).then_some((feature, lo, hi))
        })
        .collect();

    if candidates.is_empty() {
        return Node::Leaf { size: rows.len() };
    }

    let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
    let threshold = rng.gen_range(lo..hi);

    let (left, right): (Vec<usize>, Vec<usize>) = rows
        .iter()
        .copied()
        .partition(|&row| x[[row, feature]] <= threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_node(x, &left, depth + 1, depth_limit, rng)),
        right: Box::new(build_node(x, &right, depth + 1, depth_limit, rng)),
    }
}

/// Average path length of an unsuccessful BST search over `n` items, c(n).
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated percentile, `q` in [0, 100].
fn percentile(mut values: Vec<f64>, q: f64) -> f64 {
    values.sort_by(f64::total_cmp);
    let rank = (q / 100.0) * (values.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (rank - lo as f64)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    params: ForestParams,
    trees: Vec<IsolationTree>,
    n_features: usize,
    sample_size: usize,
    offset: f64,
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new(ForestParams::default())
    }
}

impl IsolationForest {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
            n_features: 0,
            sample_size: 0,
            offset: 0.0,
        }
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Threshold subtracted from `score_samples` to obtain the decision function.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn score_samples(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.check_input(x)?;

        let norm = average_path_length(self.sample_size).max(1.0);
        let n_trees = self.trees.len() as f64;

        Ok(Array1::from_iter(x.rows().into_iter().map(|row| {
            let mean_path: f64 =
                self.trees.iter().map(|t| t.path_length(row)).sum::<f64>() / n_trees;
            -(2.0_f64).powf(-mean_path / norm)
        })))
    }

    fn check_input(&self, x: &Array2<f64>) -> Result<()> {
        if !self.is_fitted() {
            return Err(DetectorError::NotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(DetectorError::DimensionMismatch {
                expected: self.n_features,
                got: x.ncols(),
            });
        }
        Ok(())
    }
}

impl AnomalyModel for IsolationForest {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        self.params.validate()?;

        let n = x.nrows();
        if n == 0 || x.ncols() == 0 {
            return Err(DetectorError::EmptyDataset);
        }

        let sample_size = self.params.max_samples.min(n);
        let depth_limit = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(self.params.random_state);

        let trees = (0..self.params.n_estimators)
            .map(|_| {
                let rows = rand::seq::index::sample(&mut rng, n, sample_size).into_vec();
                IsolationTree::grow(x, &rows, depth_limit, &mut rng)
            })
            .collect();

        self.trees = trees;
        self.n_features = x.ncols();
        self.sample_size = sample_size;

        let scores = self.score_samples(x)?;
        self.offset = percentile(scores.to_vec(), 100.0 * self.params.contamination);

        debug!(
            trees = self.trees.len(),
            sample_size,
            depth_limit,
            offset = self.offset,
            "Isolation forest fitted"
        );
        Ok(())
    }

    fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self.score_samples(x)? - self.offset)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<i32>> {
        Ok(self
            .decision_function(x)?
            .mapv(|d| if d < 0.0 { OUTLIER } else { INLIER }))
    }
}
