//! Model loading from disk.

use std::path::Path;
use tracing::info;

use super::{Classifier, ModelError, ModelFile, TreeEnsemble};

/// Extensions of pickled Python models, which cannot be read here.
const PICKLE_EXTENSIONS: &[&str] = &["joblib", "pkl", "pickle"];

/// Load and validate a tree ensemble from a JSON export.
pub fn load_tree_ensemble(path: &Path) -> Result<TreeEnsemble, ModelError> {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if PICKLE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            return Err(ModelError::UnsupportedFormat(format!(
                "'{}' is a pickled model; export it to the JSON tree format first",
                path.display()
            )));
        }
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ModelFile = serde_json::from_str(&contents)?;
    let model = TreeEnsemble::try_from(file)?;

    info!(
        path = %path.display(),
        kind = ?model.kind(),
        trees = model.tree_count(),
        features = model.expected_features(),
        classes = ?model.labels(),
        "Classifier loaded"
    );
    Ok(model)
}

/// Load a classifier behind the [`Classifier`] seam.
pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ModelError> {
    Ok(Box::new(load_tree_ensemble(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MODEL_JSON: &str = r#"{
        "format": "herb-classifier/v1",
        "kind": "decision_tree",
        "n_features_in": 4,
        "classes": ["Neem", "Tulsi"],
        "trees": [{"nodes": [
            {"feature": 1, "threshold": 7.0, "left": 1, "right": 2},
            {"value": [0.0, 4.0]},
            {"value": [6.0, 0.0]}
        ]}]
    }"#;

    #[test]
    fn test_load_valid_file() {
        let mut f = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        f.write_all(MODEL_JSON.as_bytes()).unwrap();

        let model = load_classifier(f.path()).unwrap();
        assert_eq!(model.expected_features(), 4);
        assert_eq!(model.labels(), &["Neem".to_string(), "Tulsi".to_string()]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_tree_ensemble(Path::new("/nonexistent/herb_classifier.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }

    #[test]
    fn test_pickle_rejected_without_reading() {
        let err = load_tree_ensemble(Path::new("/nonexistent/herb_classifier.joblib")).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let mut f = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        f.write_all(b"not json at all").unwrap();
        assert!(matches!(
            load_tree_ensemble(f.path()),
            Err(ModelError::Parse(_))
        ));
    }
}
