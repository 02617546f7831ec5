use serde::{Deserialize, Serialize};

/// Relative tolerance when checking that child covers add up to the parent.
const COVER_TOLERANCE: f64 = 1e-6;

/// One node of a binary decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal node; `x[feature] <= threshold` goes left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        /// Training weight that reached this node.
        cover: f64,
    },
    /// Terminal node carrying the tree output.
    Leaf { value: f64, cover: f64 },
}

impl TreeNode {
    /// Training weight that reached this node.
    pub fn cover(&self) -> f64 {
        match self {
            TreeNode::Split { cover, .. } | TreeNode::Leaf { cover, .. } => *cover,
        }
    }
}

/// Flat, index-linked decision tree rooted at node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Check structural invariants against the number of model features.
    ///
    /// Children must point forward, which rules out cycles, and child covers
    /// must sum to the parent cover so expectations are well defined.
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            let cover = node.cover();
            if !cover.is_finite() || cover <= 0.0 {
                return Err(format!("node {idx} has non-positive cover {cover}"));
            }
            match node {
                TreeNode::Leaf { value, .. } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {idx} has non-finite value"));
                    }
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= feature_count {
                        return Err(format!(
                            "node {idx} splits on feature {feature} \
                             but the model has {feature_count}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx} has non-finite threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {idx} has invalid child index {child}"));
                        }
                    }
                    if left == right {
                        return Err(format!("node {idx} uses child {left} on both sides"));
                    }
                    let children = self.nodes[*left].cover() + self.nodes[*right].cover();
                    if (children - cover).abs() > COVER_TOLERANCE * cover.max(1.0) {
                        return Err(format!(
                            "node {idx} cover {cover} does not match children total {children}"
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Index of the leaf reached by a feature vector.
    pub fn leaf_index(&self, features: &[f64]) -> usize {
        let mut idx = 0usize;
        while let Some(TreeNode::Split {
            feature,
            threshold,
            left,
            right,
            ..
        }) = self.nodes.get(idx)
        {
            let value = features.get(*feature).copied().unwrap_or(0.0);
            idx = if value <= *threshold { *left } else { *right };
        }
        idx
    }

    /// Output of the tree for a feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        match self.nodes.get(self.leaf_index(features)) {
            Some(TreeNode::Leaf { value, .. }) => *value,
            _ => 0.0,
        }
    }

    /// Cover-weighted mean output over the training distribution.
    pub fn expected_value(&self) -> f64 {
        let mut expectations = vec![0.0f64; self.nodes.len()];
        for idx in (0..self.nodes.len()).rev() {
            expectations[idx] = match &self.nodes[idx] {
                TreeNode::Leaf { value, .. } => *value,
                TreeNode::Split {
                    left, right, cover, ..
                } => {
                    let left_part = self.child_cover(*left) * expectation(&expectations, *left);
                    let right_part = self.child_cover(*right) * expectation(&expectations, *right);
                    (left_part + right_part) / cover
                }
            };
        }
        expectations.first().copied().unwrap_or(0.0)
    }

    pub(crate) fn child_cover(&self, idx: usize) -> f64 {
        self.nodes.get(idx).map(TreeNode::cover).unwrap_or(0.0)
    }
}

fn expectation(values: &[f64], idx: usize) -> f64 {
    values.get(idx).copied().unwrap_or(0.0)
}
