//! Classifier seam and the exported-model format.
//!
//! The pipeline only needs two capabilities from a model: its expected input
//! width and `predict`. [`Classifier`] captures exactly that, so the tree
//! ensemble loaded from disk and test doubles are interchangeable.

mod loader;
mod tree;

pub use loader::{load_classifier, load_tree_ensemble};
pub use tree::{ModelFile, ModelKind, Node, Tree, TreeEnsemble};

use std::path::PathBuf;
use thiserror::Error;

use crate::types::FeatureVector;

/// A pre-trained, immutable classifier.
pub trait Classifier: Send + Sync {
    /// Number of features every input row must carry.
    fn expected_features(&self) -> usize;

    /// Class labels the model can emit, in model order.
    fn labels(&self) -> &[String];

    /// Predict one label per input row.
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<String>, ModelError>;
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("I/O error reading model '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid model: {0}")]
    Invalid(String),

    #[error("Feature count mismatch: model expects {expected}, row has {got}")]
    FeatureCountMismatch { expected: usize, got: usize },

    #[error("Model expects {0} feature(s); at least 2 are required")]
    InsufficientWidth(usize),

    #[error("Model returned no prediction")]
    EmptyPrediction,
}
