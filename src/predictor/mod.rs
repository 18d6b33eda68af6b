//! Pneumonia classification on top of the inference engine.
//!
//! Defines the [`Classifier`] seam the HTTP handlers depend on, the fixed
//! two-element label set, and the scalar-to-label mapping. Handlers receive
//! a classifier by trait object, so tests can substitute a stub instead of a
//! real ONNX session.

use crate::core::Tensor4D;
use crate::core::errors::PredictResult;
use crate::core::inference::OrtClassifier;

/// The fixed output vocabulary, indexed by rounded model output.
pub const CLASS_LABELS: [&str; 2] = ["Normal", "Pneumonia"];

/// A single binary classification produced from one forward pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PneumoniaPrediction {
    /// Predicted label from [`CLASS_LABELS`].
    pub label: &'static str,
    /// Raw (unrounded) model output in [0,1].
    pub confidence: f32,
}

/// The inference capability the request handlers depend on.
///
/// Implementations must be safe for concurrent use; the production
/// implementation guards each underlying session with a mutex.
pub trait Classifier: Send + Sync {
    /// Runs one forward pass over a preprocessed (1, 200, 200, 3) tensor
    /// and returns the scalar confidence in [0,1].
    fn predict(&self, input: &Tensor4D) -> PredictResult<f32>;
}

impl Classifier for OrtClassifier {
    fn predict(&self, input: &Tensor4D) -> PredictResult<f32> {
        self.infer_scalar(input)
    }
}

/// Maps the model's scalar output to a label.
///
/// Rounds half away from zero, so a score of exactly 0.5 maps to class 1
/// ("Pneumonia"). Scores outside [0,1] are clamped onto the valid index
/// range rather than panicking on a misbehaving model.
pub fn label_for_score(score: f32) -> &'static str {
    let index = (score.round().max(0.0) as usize).min(CLASS_LABELS.len() - 1);
    CLASS_LABELS[index]
}

/// Runs one classification: forward pass plus label mapping.
pub fn classify(classifier: &dyn Classifier, input: &Tensor4D) -> PredictResult<PneumoniaPrediction> {
    let confidence = classifier.predict(input)?;
    Ok(PneumoniaPrediction {
        label: label_for_score(confidence),
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    struct FixedClassifier(f32);

    impl Classifier for FixedClassifier {
        fn predict(&self, _input: &Tensor4D) -> PredictResult<f32> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_low_scores_map_to_normal() {
        assert_eq!(label_for_score(0.0), "Normal");
        assert_eq!(label_for_score(0.2), "Normal");
        assert_eq!(label_for_score(0.49), "Normal");
    }

    #[test]
    fn test_high_scores_map_to_pneumonia() {
        assert_eq!(label_for_score(0.51), "Pneumonia");
        assert_eq!(label_for_score(0.9), "Pneumonia");
        assert_eq!(label_for_score(1.0), "Pneumonia");
    }

    #[test]
    fn test_half_rounds_to_pneumonia() {
        // Tie-break pinned: 0.5 rounds away from zero, to class 1.
        assert_eq!(label_for_score(0.5), "Pneumonia");
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        assert_eq!(label_for_score(-0.3), "Normal");
        assert_eq!(label_for_score(1.7), "Pneumonia");
    }

    #[test]
    fn test_classify_keeps_raw_confidence() {
        let classifier = FixedClassifier(0.8734);
        let input = Array4::<f32>::zeros((1, 200, 200, 3));
        let prediction = classify(&classifier, &input).unwrap();
        assert_eq!(prediction.label, "Pneumonia");
        assert!((prediction.confidence - 0.8734).abs() < f32::EPSILON);
    }
}
