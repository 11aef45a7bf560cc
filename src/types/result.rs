//! Classifier input and output types.

use serde::Serialize;

use super::{HerbInfo, Reading};

/// Fixed-width classifier input.
///
/// Position 0 is the LDR analog value, position 1 the pH, every later
/// position is zero. The width always equals the model's expected input width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Lay out a reading for a model expecting `width` features.
    ///
    /// Returns `None` when `width` cannot hold both measured features.
    pub fn from_reading(reading: &Reading, width: usize) -> Option<Self> {
        if width < 2 {
            return None;
        }
        let mut values = vec![0.0; width];
        values[0] = reading.ldr_analog;
        values[1] = reading.ph;
        Some(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Outcome of one analysis request. Displayed once, then dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Herb name predicted by the classifier
    pub label: String,
    /// The reading the prediction was made from
    pub reading: Reading,
    /// Table entry for `label` (or the Unknown entry)
    pub info: HerbInfo,
    /// pH outside [5.5, 8.5]; advisory only
    pub abnormal_ph: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_and_padding() {
        let reading = Reading::new(320.0, Some(1), 6.8);
        let fv = FeatureVector::from_reading(&reading, 5).unwrap();
        assert_eq!(fv.as_slice(), &[320.0, 6.8, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_exact_width_two() {
        let reading = Reading::new(320.0, None, 6.8);
        let fv = FeatureVector::from_reading(&reading, 2).unwrap();
        assert_eq!(fv.len(), 2);
        assert_eq!(fv.as_slice(), &[320.0, 6.8]);
    }

    #[test]
    fn test_too_narrow() {
        let reading = Reading::new(320.0, None, 6.8);
        assert!(FeatureVector::from_reading(&reading, 1).is_none());
        assert!(FeatureVector::from_reading(&reading, 0).is_none());
    }
}
