use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Model artifact failed to load: {0}")]
    ModelLoad(String),
    #[error("Model is not available: {0}")]
    ModelUnavailable(String),
    #[error("Image decode failed: {0}")]
    Decode(String),
    #[error("Image does not fit the model input: {0}")]
    ShapeMismatch(String),
    #[error("Inference failed: {0}")]
    InferenceRuntime(String),
}

impl PredictionError {
    /// Stable machine-readable code, used in API error bodies and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            PredictionError::ModelLoad(_) => "MODEL_LOAD_ERROR",
            PredictionError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            PredictionError::Decode(_) => "DECODE_ERROR",
            PredictionError::ShapeMismatch(_) => "SHAPE_MISMATCH",
            PredictionError::InferenceRuntime(_) => "INFERENCE_ERROR",
        }
    }

    /// Decode and shape errors come from the upload itself and can be fixed
    /// by sending a different image.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictionError::Decode(_) | PredictionError::ShapeMismatch(_)
        )
    }
}
