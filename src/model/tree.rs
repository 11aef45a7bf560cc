//! Decision tree / random forest exported as JSON.
//!
//! Node layout follows the usual flattened-tree export: split nodes route a
//! row left when `row[feature] <= threshold`, leaves carry per-class weights.
//! A forest averages each tree's normalised leaf distribution and picks the
//! highest-scoring class (lowest class index on ties).

use serde::{Deserialize, Serialize};

use super::{Classifier, ModelError};
use crate::config::defaults::{MIN_MODEL_FEATURES, MODEL_FORMAT_TAG};
use crate::types::FeatureVector;

// ============================================================================
// File Format
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    DecisionTree,
    RandomForest,
}

/// Flattened tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// On-disk representation, as written by the export script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub format: String,
    pub kind: ModelKind,
    pub n_features_in: usize,
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub classes: Vec<String>,
    pub trees: Vec<Tree>,
}

// ============================================================================
// Validated Model
// ============================================================================

/// A structurally validated tree ensemble, ready for prediction.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    kind: ModelKind,
    n_features: usize,
    feature_names: Vec<String>,
    classes: Vec<String>,
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Route one row to a leaf and return its class weights.
    ///
    /// Children always point forward (checked at load), so the walk ends.
    fn leaf_for<'a>(tree: &'a Tree, row: &[f64]) -> &'a [f64] {
        let mut idx = 0;
        loop {
            match &tree.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { value } => return value,
            }
        }
    }

    fn predict_row(&self, row: &[f64]) -> usize {
        let mut scores = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = Self::leaf_for(tree, row);
            let total: f64 = leaf.iter().sum();
            for (score, weight) in scores.iter_mut().zip(leaf) {
                *score += weight / total;
            }
        }

        let mut best = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = i;
            }
        }
        best
    }
}

impl TryFrom<ModelFile> for TreeEnsemble {
    type Error = ModelError;

    fn try_from(file: ModelFile) -> Result<Self, Self::Error> {
        if file.format != MODEL_FORMAT_TAG {
            return Err(ModelError::UnsupportedFormat(format!(
                "format tag '{}' (expected '{}')",
                file.format, MODEL_FORMAT_TAG
            )));
        }
        if file.n_features_in < MIN_MODEL_FEATURES {
            return Err(ModelError::InsufficientWidth(file.n_features_in));
        }
        if !file.feature_names.is_empty() && file.feature_names.len() != file.n_features_in {
            return Err(ModelError::Invalid(format!(
                "{} feature names for {} features",
                file.feature_names.len(),
                file.n_features_in
            )));
        }
        if file.classes.is_empty() {
            return Err(ModelError::Invalid("no classes".to_string()));
        }
        if file.trees.is_empty() {
            return Err(ModelError::Invalid("no trees".to_string()));
        }
        if file.kind == ModelKind::DecisionTree && file.trees.len() != 1 {
            return Err(ModelError::Invalid(format!(
                "decision_tree must contain exactly one tree, found {}",
                file.trees.len()
            )));
        }

        for (t, tree) in file.trees.iter().enumerate() {
            validate_tree(tree, file.n_features_in, file.classes.len())
                .map_err(|msg| ModelError::Invalid(format!("tree {t}: {msg}")))?;
        }

        Ok(Self {
            kind: file.kind,
            n_features: file.n_features_in,
            feature_names: file.feature_names,
            classes: file.classes,
            trees: file.trees,
        })
    }
}

fn validate_tree(tree: &Tree, n_features: usize, n_classes: usize) -> Result<(), String> {
    if tree.nodes.is_empty() {
        return Err("no nodes".to_string());
    }
    let len = tree.nodes.len();

    for (i, node) in tree.nodes.iter().enumerate() {
        match node {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= n_features {
                    return Err(format!("node {i} splits on feature {feature} of {n_features}"));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {i} has non-finite threshold"));
                }
                for child in [left, right] {
                    if *child <= i || *child >= len {
                        return Err(format!("node {i} has invalid child index {child}"));
                    }
                }
            }
            Node::Leaf { value } => {
                if value.len() != n_classes {
                    return Err(format!(
                        "leaf {i} has {} weights for {n_classes} classes",
                        value.len()
                    ));
                }
                if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(format!("leaf {i} has a negative or non-finite weight"));
                }
                if value.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {i} has zero total weight"));
                }
            }
        }
    }
    Ok(())
}

impl Classifier for TreeEnsemble {
    fn expected_features(&self) -> usize {
        self.n_features
    }

    fn labels(&self) -> &[String] {
        &self.classes
    }

    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<String>, ModelError> {
        rows.iter()
            .map(|row| {
                if row.len() != self.n_features {
                    return Err(ModelError::FeatureCountMismatch {
                        expected: self.n_features,
                        got: row.len(),
                    });
                }
                Ok(self.classes[self.predict_row(row.as_slice())].clone())
            })
            .collect()
    }
}
