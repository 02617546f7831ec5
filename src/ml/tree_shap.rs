//! Exact path-dependent TreeSHAP.
//!
//! For each tree, every root-to-leaf path is walked once while tracking, for
//! each feature on the path, the fraction of training cover that flows down
//! the path with the feature "absent" (`zero_fraction`) or "present"
//! (`one_fraction`). The permutation weights of the Shapley sum are kept in
//! `pweight` and updated incrementally as the path grows and shrinks.
//!
//! The resulting values satisfy `expected_raw + sum(phi) == predict_raw`.

use crate::ml::tree_ensemble::{Tree, TreeEnsembleModel, TreeNode};

/// Baseline plus per-feature contributions for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapValues {
    /// Expected raw output of the model.
    pub base_value: f64,
    /// One contribution per model feature, in feature order.
    pub values: Vec<f64>,
}

/// Compute SHAP values for a row against a whole ensemble.
pub fn ensemble_shap(model: &TreeEnsembleModel, features: &[f64]) -> ShapValues {
    let mut values = vec![0.0f64; model.feature_names.len()];
    let weight = model.tree_weight();
    let mut phi = vec![0.0f64; values.len()];
    for tree in &model.trees {
        phi.iter_mut().for_each(|v| *v = 0.0);
        tree_shap(tree, features, &mut phi);
        for (total, value) in values.iter_mut().zip(&phi) {
            *total += weight * value;
        }
    }
    ShapValues {
        base_value: model.expected_raw(),
        values,
    }
}

#[derive(Debug, Clone, Copy)]
struct PathElement {
    feature: Option<usize>,
    zero_fraction: f64,
    one_fraction: f64,
    pweight: f64,
}

/// Accumulate one tree's SHAP values into `phi`.
pub fn tree_shap(tree: &Tree, features: &[f64], phi: &mut [f64]) {
    if tree.nodes.is_empty() {
        return;
    }
    let mut path = Vec::with_capacity(tree.nodes.len().min(64));
    recurse(tree, features, phi, 0, &mut path, 1.0, 1.0, None);
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    tree: &Tree,
    features: &[f64],
    phi: &mut [f64],
    node_idx: usize,
    path: &mut Vec<PathElement>,
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) {
    extend(path, zero_fraction, one_fraction, feature);
    match &tree.nodes[node_idx] {
        TreeNode::Leaf { value, .. } => {
            for idx in 1..path.len() {
                let element = path[idx];
                let weight = unwound_sum(path, idx);
                if let Some(slot) = element.feature.and_then(|f| phi.get_mut(f)) {
                    *slot += weight * (element.one_fraction - element.zero_fraction) * value;
                }
            }
        }
        TreeNode::Split {
            feature: split_feature,
            threshold,
            left,
            right,
            cover,
        } => {
            let x = features.get(*split_feature).copied().unwrap_or(0.0);
            let (hot, cold) = if x <= *threshold {
                (*left, *right)
            } else {
                (*right, *left)
            };

            let mut incoming_zero = 1.0;
            let mut incoming_one = 1.0;
            let mut branch_path = path.clone();
            if let Some(existing) = branch_path
                .iter()
                .position(|element| element.feature == Some(*split_feature))
            {
                incoming_zero = branch_path[existing].zero_fraction;
                incoming_one = branch_path[existing].one_fraction;
                unwind(&mut branch_path, existing);
            }

            let hot_zero = tree.child_cover(hot) / cover;
            let cold_zero = tree.child_cover(cold) / cover;
            let mut cold_path = branch_path.clone();
            recurse(
                tree,
                features,
                phi,
                hot,
                &mut branch_path,
                hot_zero * incoming_zero,
                incoming_one,
                Some(*split_feature),
            );
            recurse(
                tree,
                features,
                phi,
                cold,
                &mut cold_path,
                cold_zero * incoming_zero,
                0.0,
                Some(*split_feature),
            );
        }
    }
}

fn extend(
    path: &mut Vec<PathElement>,
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) {
    let depth = path.len();
    path.push(PathElement {
        feature,
        zero_fraction,
        one_fraction,
        pweight: if depth == 0 { 1.0 } else { 0.0 },
    });
    let denom = (depth + 1) as f64;
    for i in (0..depth).rev() {
        path[i + 1].pweight += one_fraction * path[i].pweight * (i + 1) as f64 / denom;
        path[i].pweight = zero_fraction * path[i].pweight * (depth - i) as f64 / denom;
    }
}

/// Remove the element at `idx`, undoing its effect on the weights.
fn unwind(path: &mut Vec<PathElement>, idx: usize) {
    let depth = path.len() - 1;
    let one_fraction = path[idx].one_fraction;
    let zero_fraction = path[idx].zero_fraction;
    let denom = (depth + 1) as f64;
    let mut next_one_portion = path[depth].pweight;
    for i in (0..depth).rev() {
        if one_fraction != 0.0 {
            let tmp = path[i].pweight;
            path[i].pweight = next_one_portion * denom / ((i + 1) as f64 * one_fraction);
            next_one_portion = tmp - path[i].pweight * zero_fraction * (depth - i) as f64 / denom;
        } else {
            path[i].pweight = path[i].pweight * denom / (zero_fraction * (depth - i) as f64);
        }
    }
    for i in idx..depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
    path.pop();
}

/// Total permutation weight of the path with the element at `idx` removed.
fn unwound_sum(path: &[PathElement], idx: usize) -> f64 {
    let depth = path.len() - 1;
    let one_fraction = path[idx].one_fraction;
    let zero_fraction = path[idx].zero_fraction;
    let denom = (depth + 1) as f64;
    let mut next_one_portion = path[depth].pweight;
    let mut total = 0.0;
    for i in (0..depth).rev() {
        if one_fraction != 0.0 {
            let tmp = next_one_portion * denom / ((i + 1) as f64 * one_fraction);
            total += tmp;
            next_one_portion = path[i].pweight - tmp * zero_fraction * (depth - i) as f64 / denom;
        } else if zero_fraction != 0.0 {
            total += path[i].pweight / zero_fraction / ((depth - i) as f64 / denom);
        }
    }
    total
}
