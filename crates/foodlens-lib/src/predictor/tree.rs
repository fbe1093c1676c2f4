//! Decision-tree regression (CART, squared-error criterion)
//!
//! The tree is grown depth-first into a flat node arena with the root at
//! index 0. Split search walks features in column order and candidate
//! thresholds at midpoints between consecutive distinct values, keeping the
//! first strictly best split, so fitting the same data always yields the
//! same tree.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Depth cap used by the attendance model
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Values closer than this are treated as equal when looking for split points
const FEATURE_THRESHOLD: f64 = 1e-7;

/// One node of the fitted tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        value: f64,
        samples: usize,
        impurity: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        value: f64,
        samples: usize,
        impurity: f64,
    },
}

impl Node {
    pub fn value(&self) -> f64 {
        match self {
            Node::Leaf { value, .. } | Node::Split { value, .. } => *value,
        }
    }

    pub fn samples(&self) -> usize {
        match self {
            Node::Leaf { samples, .. } | Node::Split { samples, .. } => *samples,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Hyperparameters for tree growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// A fitted regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    params: TreeParams,
    n_features: usize,
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    proxy_improvement: f64,
}

impl DecisionTreeRegressor {
    /// Fit a tree to `x` (one row per sample) against targets `y`.
    ///
    /// Returns `None` when there are no samples to fit.
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: TreeParams) -> Option<Self> {
        if x.is_empty() || x.len() != y.len() {
            return None;
        }
        let n_features = x[0].len();
        let mut tree = Self {
            params,
            n_features,
            nodes: Vec::new(),
        };
        let mut indices: Vec<usize> = (0..x.len()).collect();
        tree.grow(x, y, &mut indices, 0);
        Some(tree)
    }

    fn grow(&mut self, x: &[Vec<f64>], y: &[f64], indices: &mut [usize], depth: usize) -> usize {
        let n = indices.len();
        let sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let value = sum / n as f64;
        let impurity = indices.iter().map(|&i| (y[i] - value).powi(2)).sum::<f64>() / n as f64;

        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value,
            samples: n,
            impurity,
        });

        let is_leaf = depth >= self.params.max_depth
            || n < self.params.min_samples_split
            || n < 2 * self.params.min_samples_leaf
            || impurity <= f64::EPSILON;
        if is_leaf {
            return id;
        }

        let split = match self.best_split(x, y, indices, sum) {
            Some(split) => split,
            None => return id,
        };

        // Partition in place: samples routed left first
        indices.sort_by_key(|&i| x[i][split.feature] > split.threshold);
        let n_left = indices
            .iter()
            .take_while(|&&i| x[i][split.feature] <= split.threshold)
            .count();
        let (left_indices, right_indices) = indices.split_at_mut(n_left);

        let left = self.grow(x, y, left_indices, depth + 1);
        let right = self.grow(x, y, right_indices, depth + 1);

        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            value,
            samples: n,
            impurity,
        };
        id
    }

    fn best_split(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
        total_sum: f64,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let mut best: Option<SplitCandidate> = None;

        for feature in 0..self.n_features {
            let mut column: Vec<(f64, f64)> =
                indices.iter().map(|&i| (x[i][feature], y[i])).collect();
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            if column[n - 1].0 <= column[0].0 + FEATURE_THRESHOLD {
                continue;
            }

            let mut left_sum = 0.0;
            for pos in 1..n {
                left_sum += column[pos - 1].1;
                if column[pos].0 <= column[pos - 1].0 + FEATURE_THRESHOLD {
                    continue;
                }
                if pos < min_leaf || n - pos < min_leaf {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let proxy_improvement =
                    left_sum * left_sum / pos as f64 + right_sum * right_sum / (n - pos) as f64;

                if best.map_or(true, |b| proxy_improvement > b.proxy_improvement) {
                    let (lo, hi) = (column[pos - 1].0, column[pos].0);
                    let mut threshold = lo / 2.0 + hi / 2.0;
                    if threshold == hi || !threshold.is_finite() {
                        threshold = lo;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        proxy_improvement,
                    });
                }
            }
        }

        best
    }

    /// Route a feature row to its leaf and return the leaf value
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { value, .. } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    let x = features.get(*feature).copied().unwrap_or(0.0);
                    id = if x <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Depth of the deepest leaf (a lone root has depth 0)
    pub fn depth(&self) -> usize {
        self.depth_of(0)
    }

    fn depth_of(&self, id: usize) -> usize {
        match &self.nodes[id] {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + self.depth_of(*left).max(self.depth_of(*right)),
        }
    }

    /// Render the tree as indented text, one threshold test per line.
    ///
    /// Missing names fall back to `feature_<index>`.
    pub fn export_text(&self, feature_names: &[String]) -> String {
        let mut out = String::new();
        self.write_node(&mut out, 0, 0, feature_names);
        out
    }

    fn write_node(&self, out: &mut String, id: usize, depth: usize, names: &[String]) {
        let indent = "|   ".repeat(depth);
        match &self.nodes[id] {
            Node::Leaf { value, .. } => {
                let _ = writeln!(out, "{}|--- value: [{:.2}]", indent, value);
            }
            Node::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } => {
                let name = names
                    .get(*feature)
                    .cloned()
                    .unwrap_or_else(|| format!("feature_{}", feature));
                let _ = writeln!(out, "{}|--- {} <= {:.2}", indent, name, threshold);
                self.write_node(out, *left, depth + 1, names);
                let _ = writeln!(out, "{}|--- {} >  {:.2}", indent, name, threshold);
                self.write_node(out, *right, depth + 1, names);
            }
        }
    }
}
