//! Classification pipeline: Reading -> FeatureVector -> label -> result.
//!
//! Each call is independent. The classifier is borrowed immutably and never
//! retried; a failed prediction is wrapped and returned.

use tracing::{info, warn};

use crate::error::PipelineError;
use crate::model::{Classifier, ModelError};
use crate::types::{herb_info, ClassificationResult, FeatureVector, Reading};

/// Lay out a reading for a model expecting `width` inputs.
///
/// Positions 0 and 1 carry LDR analog and pH; the rest are zero. The model was
/// exported with more inputs than the rig measures, so the zero padding is
/// what it sees for the unmeasured ones.
pub fn build_feature_vector(reading: &Reading, width: usize) -> Result<FeatureVector, PipelineError> {
    FeatureVector::from_reading(reading, width)
        .ok_or(PipelineError::PredictionFailed(ModelError::InsufficientWidth(width)))
}

/// pH outside the inclusive [5.5, 8.5] window.
pub fn is_abnormal_ph(reading: &Reading) -> bool {
    reading.has_abnormal_ph()
}

/// Classify one reading.
///
/// The caller must only invoke this with a loaded model; see
/// [`Session::analyze`](crate::session::Session::analyze) for the gated path.
pub fn classify(reading: Reading, model: &dyn Classifier) -> Result<ClassificationResult, PipelineError> {
    let features = build_feature_vector(&reading, model.expected_features())?;

    let label = model
        .predict(std::slice::from_ref(&features))
        .map_err(PipelineError::PredictionFailed)?
        .into_iter()
        .next()
        .ok_or(PipelineError::PredictionFailed(ModelError::EmptyPrediction))?;

    let abnormal_ph = is_abnormal_ph(&reading);
    if abnormal_ph {
        warn!(ph = reading.ph, "Abnormal pH detected, sample may be invalid");
    }

    info!(
        label = %label,
        ldr_analog = reading.ldr_analog,
        ph = reading.ph,
        abnormal_ph,
        "Herb classified"
    );

    Ok(ClassificationResult {
        info: herb_info(&label),
        label,
        reading,
        abnormal_ph,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UNKNOWN_HERB;
    use std::sync::Mutex;

    /// Returns a fixed label and records the rows it was given.
    struct FixedModel {
        width: usize,
        label: &'static str,
        labels: Vec<String>,
        seen: Mutex<Vec<Vec<f64>>>,
    }

    impl FixedModel {
        fn new(width: usize, label: &'static str) -> Self {
            Self {
                width,
                label,
                labels: vec![label.to_string()],
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Classifier for FixedModel {
        fn expected_features(&self) -> usize {
            self.width
        }

        fn labels(&self) -> &[String] {
            &self.labels
        }

        fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<String>, ModelError> {
            let mut seen = self.seen.lock().unwrap();
            for row in rows {
                if row.len() != self.width {
                    return Err(ModelError::FeatureCountMismatch {
                        expected: self.width,
                        got: row.len(),
                    });
                }
                seen.push(row.as_slice().to_vec());
            }
            Ok(rows.iter().map(|_| self.label.to_string()).collect())
        }
    }

    struct FailingModel;

    impl Classifier for FailingModel {
        fn expected_features(&self) -> usize {
            2
        }

        fn labels(&self) -> &[String] {
            &[]
        }

        fn predict(&self, _rows: &[FeatureVector]) -> Result<Vec<String>, ModelError> {
            Err(ModelError::Invalid("corrupted weights".to_string()))
        }
    }

    struct SilentModel;

    impl Classifier for SilentModel {
        fn expected_features(&self) -> usize {
            2
        }

        fn labels(&self) -> &[String] {
            &[]
        }

        fn predict(&self, _rows: &[FeatureVector]) -> Result<Vec<String>, ModelError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_tulsi_end_to_end() {
        let model = FixedModel::new(2, "Tulsi");
        let result = classify(Reading::new(320.0, None, 6.8), &model).unwrap();
        assert_eq!(result.label, "Tulsi");
        assert!(!result.abnormal_ph);
        assert_eq!(result.info, herb_info("Tulsi"));
        assert_eq!(result.reading.ldr_analog, 320.0);
        assert_eq!(model.seen.lock().unwrap().as_slice(), &[vec![320.0, 6.8]]);
    }

    #[test]
    fn test_neem_abnormal_ph() {
        let model = FixedModel::new(2, "Neem");
        let result = classify(Reading::new(900.0, None, 9.0), &model).unwrap();
        assert_eq!(result.label, "Neem");
        assert!(result.abnormal_ph);
        assert_eq!(result.info, herb_info("Neem"));
    }

    #[test]
    fn test_vector_padded_to_model_width() {
        let model = FixedModel::new(6, "Ashwagandha");
        classify(Reading::new(430.0, Some(0), 6.5), &model).unwrap();
        assert_eq!(
            model.seen.lock().unwrap()[0],
            vec![430.0, 6.5, 0.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_boundaries_not_abnormal() {
        let model = FixedModel::new(2, "Tulsi");
        assert!(!classify(Reading::new(1.0, None, 5.5), &model).unwrap().abnormal_ph);
        assert!(!classify(Reading::new(1.0, None, 8.5), &model).unwrap().abnormal_ph);
        assert!(classify(Reading::new(1.0, None, 5.4), &model).unwrap().abnormal_ph);
    }

    #[test]
    fn test_unlisted_label_gets_unknown_info() {
        let model = FixedModel::new(2, "Brahmi");
        let result = classify(Reading::new(500.0, None, 7.0), &model).unwrap();
        assert_eq!(result.label, "Brahmi");
        assert_eq!(result.info, UNKNOWN_HERB);
    }

    #[test]
    fn test_model_failure_wrapped() {
        let err = classify(Reading::new(500.0, None, 7.0), &FailingModel).unwrap_err();
        match err {
            PipelineError::PredictionFailed(ModelError::Invalid(msg)) => {
                assert_eq!(msg, "corrupted weights");
            }
            other => panic!("expected PredictionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_prediction_is_failure() {
        let err = classify(Reading::new(500.0, None, 7.0), &SilentModel).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::PredictionFailed(ModelError::EmptyPrediction)
        ));
    }

    #[test]
    fn test_narrow_model_is_failure() {
        let model = FixedModel::new(1, "Tulsi");
        let err = classify(Reading::new(500.0, None, 7.0), &model).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::PredictionFailed(ModelError::InsufficientWidth(1))
        ));
    }

    #[test]
    fn test_build_feature_vector_widths() {
        let reading = Reading::new(777.0, None, 7.7);
        for width in 2..12 {
            let fv = build_feature_vector(&reading, width).unwrap();
            assert_eq!(fv.len(), width);
            assert_eq!(fv.as_slice()[0], 777.0);
            assert_eq!(fv.as_slice()[1], 7.7);
            assert!(fv.as_slice()[2..].iter().all(|v| *v == 0.0));
        }
    }
}
