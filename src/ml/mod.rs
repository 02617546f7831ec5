//! Model loading, inference and attribution.
//!
//! These utilities know nothing about the clinical form: they load a tree
//! ensemble, score feature rows, and decompose a score into per-feature
//! contributions with TreeSHAP.

pub mod tree_ensemble;
pub mod tree_shap;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or checking a model artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact could not be read.
    #[error("Failed to read model {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The artifact is not valid model JSON.
    #[error("Invalid model JSON at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The artifact was written for another format version.
    #[error("Unsupported model_version {found} (expected {expected})")]
    UnsupportedVersion { found: i64, expected: i64 },
    /// The artifact violates a structural invariant.
    #[error("Invalid model: {0}")]
    Invalid(String),
}
