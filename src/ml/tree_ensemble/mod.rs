//! Tree-ensemble binary classifier loaded from a JSON artifact.
//!
//! Two aggregations are supported:
//! - Boosted trees summed into a log-odds margin and squashed with a logistic.
//! - Random-forest style averaging of per-tree positive-class probabilities.

mod model;
mod tree;

pub use model::{Aggregation, MODEL_FORMAT_VERSION, OutputSpace, TreeEnsembleModel, logistic};
pub use tree::{Tree, TreeNode};

#[cfg(test)]
pub(crate) use model::tests::boosted_fixture;
#[cfg(test)]
pub(crate) use tree::tests::two_level_tree;
