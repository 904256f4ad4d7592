use crate::error::PredictionError;
use ndarray::{Array, Ix4};

/// Runs one forward pass over a single preprocessed image tensor and returns
/// the model's score vector.
pub trait InferenceBackend: Send + Sync + 'static {
    fn infer(&self, input: Array<f32, Ix4>) -> Result<Vec<f32>, PredictionError>;
}
