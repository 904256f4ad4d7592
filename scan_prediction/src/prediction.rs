use crate::error::PredictionError;
use serde::Serialize;

/// Allowed drift of the score total from 1.
const SUM_TOLERANCE: f32 = 1e-2;

/// Outcome of one forward pass over one image.
///
/// `class_index` is the argmax of `all_class_probabilities` and
/// `confidence` is the probability at that index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub class_name: String,
    pub class_index: usize,
    pub confidence: f32,
    pub all_class_probabilities: Vec<f32>,
}

impl PredictionResult {
    pub fn from_scores(
        class_names: &[&str],
        scores: Vec<f32>,
    ) -> Result<Self, PredictionError> {
        if scores.len() != class_names.len() {
            return Err(PredictionError::InferenceRuntime(format!(
                "model returned {} scores for {} classes",
                scores.len(),
                class_names.len()
            )));
        }
        if let Some(index) = scores.iter().position(|score| !score.is_finite()) {
            return Err(PredictionError::InferenceRuntime(format!(
                "model returned a non-finite score at index {}",
                index
            )));
        }
        if let Some(index) = scores
            .iter()
            .position(|score| !(0.0..=1.0).contains(score))
        {
            return Err(PredictionError::InferenceRuntime(format!(
                "model returned score {} at index {}, outside [0, 1]; check the `scores` setting",
                scores[index], index
            )));
        }
        let total: f32 = scores.iter().sum();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(PredictionError::InferenceRuntime(format!(
                "model scores sum to {:.4}, not 1; check the `scores` setting",
                total
            )));
        }

        // Lowest index wins on ties.
        let (class_index, confidence) = scores
            .iter()
            .copied()
            .enumerate()
            .reduce(|best, row| if row.1 > best.1 { row } else { best })
            .ok_or_else(|| {
                PredictionError::InferenceRuntime("model returned no scores".to_string())
            })?;

        Ok(Self {
            class_name: class_names[class_index].to_string(),
            class_index,
            confidence,
            all_class_probabilities: scores,
        })
    }

    pub fn confidence_band(&self) -> ConfidenceBand {
        ConfidenceBand::from_confidence(self.confidence)
    }
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|value| (value - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|value| value / sum).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Moderate,
    /// Below 70%; the result needs human review.
    Low,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence >= 0.9 {
            ConfidenceBand::High
        } else if confidence >= 0.7 {
            ConfidenceBand::Moderate
        } else {
            ConfidenceBand::Low
        }
    }
}
