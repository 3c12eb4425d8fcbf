//! Random forest regressor.
//!
//! Bootstrap-sampled CART trees split on squared error, considering every
//! feature at every node. Deterministic for a fixed seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, FEATURE_COUNT};

/// Nodes with variance at or below this are leaves.
const MIN_IMPURITY: f64 = 1e-12;

/// Forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single regression tree stored as a flat node arena; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    pub fn predict(&self, row: &FeatureVector) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if row[feature] <= threshold { left } else { right },
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

/// Best split found for one node.
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    n_left: usize,
    /// Decrease in summed squared error.
    improvement: f64,
}

struct TreeBuilder<'a> {
    x: &'a [FeatureVector],
    y: &'a [f64],
    max_depth: usize,
    nodes: Vec<Node>,
    importance: FeatureVector,
}

impl<'a> TreeBuilder<'a> {
    fn build(&mut self, samples: &mut [usize], depth: usize) -> usize {
        let idx = self.nodes.len();
        let n = samples.len() as f64;
        let (sum, sum_sq) = samples.iter().fold((0.0, 0.0), |(s, sq), &i| {
            (s + self.y[i], sq + self.y[i] * self.y[i])
        });
        let mean = sum / n;
        self.nodes.push(Node::Leaf { value: mean });

        let variance = (sum_sq / n - mean * mean).max(0.0);
        if depth >= self.max_depth || samples.len() < 2 || variance <= MIN_IMPURITY {
            return idx;
        }

        let Some(split) = self.best_split(samples, sum, sum_sq) else {
            return idx;
        };

        sort_by_feature(self.x, samples, split.feature);
        let (left_samples, right_samples) = samples.split_at_mut(split.n_left);
        self.importance[split.feature] += split.improvement;

        let left = self.build(left_samples, depth + 1);
        let right = self.build(right_samples, depth + 1);
        self.nodes[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }

    fn best_split(&self, samples: &mut [usize], sum: f64, sum_sq: f64) -> Option<SplitCandidate> {
        let n = samples.len();
        let parent_sse = sum_sq - sum * sum / n as f64;
        let mut best: Option<SplitCandidate> = None;

        for feature in 0..FEATURE_COUNT {
            sort_by_feature(self.x, samples, feature);

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for pos in 1..n {
                let prev = samples[pos - 1];
                left_sum += self.y[prev];
                left_sq += self.y[prev] * self.y[prev];

                let lo = self.x[prev][feature];
                let hi = self.x[samples[pos]][feature];
                if lo >= hi {
                    continue;
                }

                let n_left = pos as f64;
                let n_right = (n - pos) as f64;
                let right_sum = sum - left_sum;
                let right_sq = sum_sq - left_sq;
                let child_sse = (left_sq - left_sum * left_sum / n_left)
                    + (right_sq - right_sum * right_sum / n_right);
                let improvement = parent_sse - child_sse;

                if best.as_ref().map_or(true, |b| improvement > b.improvement) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: midpoint(lo, hi),
                        n_left: pos,
                        improvement: improvement.max(0.0),
                    });
                }
            }
        }

        best
    }
}

/// Threshold between two adjacent distinct values that keeps `lo` on the left.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo / 2.0 + hi / 2.0;
    if mid >= hi || mid < lo {
        lo
    } else {
        mid
    }
}

/// Stable sort so ties keep their sample order.
fn sort_by_feature(x: &[FeatureVector], samples: &mut [usize], feature: usize) {
    samples.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));
}

fn normalize(values: &mut FeatureVector) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter_mut().for_each(|v| *v /= total);
    }
}

/// Ensemble of regression trees averaged at prediction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    importances: FeatureVector,
}

impl RandomForest {
    /// Fit on rows `x` and targets `y`. Both must be non-empty and equal length.
    pub fn fit(x: &[FeatureVector], y: &[f64], params: &ForestParams) -> Self {
        let n = x.len();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_estimators);
        let mut importances = [0.0; FEATURE_COUNT];

        for _ in 0..params.n_estimators {
            let mut samples: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

            let mut builder = TreeBuilder {
                x,
                y,
                max_depth: params.max_depth,
                nodes: Vec::new(),
                importance: [0.0; FEATURE_COUNT],
            };
            builder.build(&mut samples, 0);

            let mut tree_importance = builder.importance;
            normalize(&mut tree_importance);
            for (total, value) in importances.iter_mut().zip(tree_importance) {
                *total += value;
            }

            trees.push(RegressionTree {
                nodes: builder.nodes,
            });
        }

        normalize(&mut importances);
        Self { trees, importances }
    }

    /// Mean of the per-tree predictions.
    pub fn predict(&self, row: &FeatureVector) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|t| t.predict(row)).sum::<f64>() / self.trees.len() as f64
    }

    /// Mean-decrease-in-impurity importances, summing to 1 (or all 0 when no tree split).
    pub fn feature_importances(&self) -> &FeatureVector {
        &self.importances
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: ForestParams = ForestParams {
        n_estimators: 25,
        max_depth: 10,
        seed: 42,
    };

    fn row(values: &[f64]) -> FeatureVector {
        let mut r = [0.0; FEATURE_COUNT];
        r[..values.len()].copy_from_slice(values);
        r
    }

    /// Target depends only on feature 0; feature 1 is noise.
    fn step_data() -> (Vec<FeatureVector>, Vec<f64>) {
        let noise = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0, 5.0, 8.0];
        let x: Vec<_> = (0..12).map(|i| row(&[i as f64, noise[i]])).collect();
        let y: Vec<_> = (0..12).map(|i| if i < 6 { 40.0 } else { 90.0 }).collect();
        (x, y)
    }

    #[test]
    fn test_learns_step_function() {
        let (x, y) = step_data();
        let forest = RandomForest::fit(&x, &y, &PARAMS);

        assert!(forest.predict(&row(&[0.0, 3.0])) < 60.0);
        assert!(forest.predict(&row(&[11.0, 3.0])) > 70.0);
    }

    #[test]
    fn test_importances_sum_to_one_and_favor_signal() {
        let (x, y) = step_data();
        let forest = RandomForest::fit(&x, &y, &PARAMS);
        let imp = forest.feature_importances();

        assert!((imp.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(imp[0] > imp[1]);
        assert!(imp[2..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y) = step_data();
        let a = RandomForest::fit(&x, &y, &PARAMS);
        let b = RandomForest::fit(&x, &y, &PARAMS);

        let probe = row(&[5.5, 2.0]);
        assert_eq!(a.predict(&probe), b.predict(&probe));
        assert_eq!(a.feature_importances(), b.feature_importances());
    }

    #[test]
    fn test_constant_targets_never_split() {
        let x: Vec<_> = (0..5).map(|i| row(&[i as f64])).collect();
        let y = vec![70.0; 5];
        let forest = RandomForest::fit(&x, &y, &PARAMS);

        assert_eq!(forest.predict(&row(&[100.0])), 70.0);
        assert!(forest.trees().iter().all(|t| t.node_count() == 1));
        assert_eq!(forest.feature_importances(), &[0.0; FEATURE_COUNT]);
    }

    #[test]
    fn test_depth_limit() {
        let x: Vec<_> = (0..64).map(|i| row(&[i as f64])).collect();
        let y: Vec<_> = (0..64).map(|i| (i * i) as f64).collect();
        let params = ForestParams {
            n_estimators: 3,
            max_depth: 2,
            seed: 7,
        };
        let forest = RandomForest::fit(&x, &y, &params);
        assert!(forest.trees().iter().all(|t| t.depth() <= 2));
    }

    #[test]
    fn test_midpoint_keeps_low_value_left() {
        assert_eq!(midpoint(1.0, 2.0), 1.5);
        let lo: f64 = 1.0;
        let hi = f64::from_bits(lo.to_bits() + 1);
        assert_eq!(midpoint(lo, hi), lo);
    }
}
