//! Bagged ensemble of variance-reducing regression trees.
//!
//! Each tree is grown on a bootstrap sample; splits minimize the summed
//! squared error of the two children, and the variance reduction of every
//! accepted split accumulates into per-feature importances.

use std::cmp::Ordering;

use ndarray::Array2;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_leaf: 5,
        }
    }
}

enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &[f64]) -> f64 {
        match self {
            Node::Leaf { value } => *value,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }
}

pub struct RegressionForest {
    trees: Vec<Node>,
    importances: Vec<f64>,
    n_features: usize,
}

impl RegressionForest {
    /// Fit `params.n_trees` trees on bootstrap samples of the rows of `x`.
    /// `x` must have one row per entry of `y` and at least one row.
    pub fn fit(x: &Array2<f64>, y: &[f64], params: &ForestParams, rng: &mut impl Rng) -> Self {
        let n = y.len();
        let n_features = x.ncols();
        let mut importances = vec![0.0; n_features];

        let trees = (0..params.n_trees)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                build_node(x, y, &sample, 0, params, &mut importances)
            })
            .collect();

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for v in importances.iter_mut() {
                *v /= total;
            }
        }

        Self {
            trees,
            importances,
            n_features,
        }
    }

    /// Ensemble prediction for one feature row.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        debug_assert_eq!(row.len(), self.n_features);
        let sum: f64 = self.trees.iter().map(|t| t.predict(row)).sum();
        sum / self.trees.len() as f64
    }

    /// Normalized variance-reduction importance per feature.
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}

fn build_node(
    x: &Array2<f64>,
    y: &[f64],
    indices: &[usize],
    depth: usize,
    params: &ForestParams,
    importances: &mut [f64],
) -> Node {
    let node_mean = indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64;
    if depth >= params.max_depth || indices.len() < 2 * params.min_samples_leaf {
        return Node::Leaf { value: node_mean };
    }

    let node_sse: f64 = indices.iter().map(|&i| (y[i] - node_mean).powi(2)).sum();
    if node_sse <= 1e-12 {
        return Node::Leaf { value: node_mean };
    }

    let mut best: Option<(usize, f64, f64)> = None;
    for feature in 0..x.ncols() {
        let mut order = indices.to_vec();
        order.sort_by(|&a, &b| {
            x[[a, feature]]
                .partial_cmp(&x[[b, feature]])
                .unwrap_or(Ordering::Equal)
        });

        let total_sum: f64 = order.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = order.iter().map(|&i| y[i] * y[i]).sum();
        let n_total = order.len() as f64;

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for k in 0..order.len() - 1 {
            let yi = y[order[k]];
            left_sum += yi;
            left_sq += yi * yi;

            let left_n = (k + 1) as f64;
            let right_n = n_total - left_n;
            if k + 1 < params.min_samples_leaf
                || order.len() - k - 1 < params.min_samples_leaf
            {
                continue;
            }

            let here = x[[order[k], feature]];
            let next = x[[order[k + 1], feature]];
            if next - here < 1e-12 {
                continue;
            }

            let left_sse = left_sq - left_sum * left_sum / left_n;
            let right_sum = total_sum - left_sum;
            let right_sse = (total_sq - left_sq) - right_sum * right_sum / right_n;
            let gain = node_sse - left_sse - right_sse;

            if gain > 1e-12 && best.map(|(_, _, g)| gain > g).unwrap_or(true) {
                best = Some((feature, (here + next) / 2.0, gain));
            }
        }
    }

    match best {
        None => Node::Leaf { value: node_mean },
        Some((feature, threshold, gain)) => {
            importances[feature] += gain;
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| x[[i, feature]] <= threshold);
            Node::Split {
                feature,
                threshold,
                left: Box::new(build_node(x, y, &left_idx, depth + 1, params, importances)),
                right: Box::new(build_node(x, y, &right_idx, depth + 1, params, importances)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> ForestParams {
        ForestParams {
            n_trees: 30,
            max_depth: 8,
            min_samples_leaf: 3,
        }
    }

    #[test]
    fn learns_a_smooth_function_of_one_feature() {
        let mut rng = StdRng::seed_from_u64(5);
        let n = 200;
        let mut x = Array2::zeros((n, 2));
        let mut y = Vec::with_capacity(n);
        for i in 0..n {
            let a = rng.random_range(0.0..10.0);
            let b = rng.random_range(0.0..10.0);
            x[[i, 0]] = a;
            x[[i, 1]] = b;
            y.push(3.0 * a + 1.0);
        }

        let forest = RegressionForest::fit(&x, &y, &params(), &mut rng);
        let prediction = forest.predict_row(&[5.0, 5.0]);
        assert!(
            (prediction - 16.0).abs() < 3.0,
            "expected ~16, got {prediction}"
        );
    }

    #[test]
    fn informative_feature_dominates_importance() {
        let mut rng = StdRng::seed_from_u64(6);
        let n = 200;
        let mut x = Array2::zeros((n, 3));
        let mut y = Vec::with_capacity(n);
        for i in 0..n {
            let a = rng.random_range(0.0..10.0);
            x[[i, 0]] = a;
            x[[i, 1]] = rng.random_range(0.0..10.0);
            x[[i, 2]] = rng.random_range(0.0..10.0);
            y.push(a * a);
        }

        let forest = RegressionForest::fit(&x, &y, &params(), &mut rng);
        let importances = forest.feature_importances();
        assert!(importances[0] > importances[1]);
        assert!(importances[0] > importances[2]);
        assert!((importances.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn constant_target_collapses_to_leaves() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 50;
        let mut x = Array2::zeros((n, 2));
        for i in 0..n {
            x[[i, 0]] = rng.random_range(0.0..1.0);
            x[[i, 1]] = rng.random_range(0.0..1.0);
        }
        let y = vec![7.5; n];

        let forest = RegressionForest::fit(&x, &y, &params(), &mut rng);
        assert!((forest.predict_row(&[0.5, 0.5]) - 7.5).abs() < 1e-12);
        assert!(forest.feature_importances().iter().all(|&v| v == 0.0));
    }
}
