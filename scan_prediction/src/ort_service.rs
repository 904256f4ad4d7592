use crate::{
    config::{ModelConfig, Validatable},
    error::PredictionError,
    model_service::InferenceBackend,
};
use ndarray::{Array, Ix4};
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::TensorRef,
};
use parking_lot::Mutex;

fn load_error(e: impl std::fmt::Display) -> PredictionError {
    PredictionError::ModelLoad(e.to_string())
}

/// ONNX Runtime backed model. The session is loaded once and guarded by a
/// mutex, so concurrent callers take turns on the runtime.
pub struct OrtModelService {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OrtModelService {
    pub fn new(model_config: &ModelConfig) -> Result<Self, PredictionError> {
        model_config.validate().map_err(PredictionError::ModelLoad)?;
        let model_path = model_config.get_path();

        tracing::info!("Loading ONNX model from {}", model_path.display());
        let session = Session::builder()
            .map_err(load_error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(load_error)?
            .with_intra_threads(model_config.intra_threads)
            .map_err(load_error)?
            .commit_from_file(&model_path)
            .map_err(load_error)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| load_error(format!("{} has no inputs", model_path.display())))?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| load_error(format!("{} has no outputs", model_path.display())))?;

        tracing::info!(
            "Model ready: input '{}', output '{}'",
            input_name,
            output_name
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }
}

impl InferenceBackend for OrtModelService {
    fn infer(&self, input: Array<f32, Ix4>) -> Result<Vec<f32>, PredictionError> {
        let input = input.as_standard_layout();
        let tensor_ref = TensorRef::from_array_view(input.view()).map_err(|e| {
            PredictionError::InferenceRuntime(format!("failed to build tensor: {}", e))
        })?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor_ref])
            .map_err(|e| PredictionError::InferenceRuntime(format!("inference failed: {}", e)))?;

        let (_, data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                PredictionError::InferenceRuntime(format!("failed to extract tensor: {}", e))
            })?;

        Ok(data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_is_load_error() {
        let config = ModelConfig::new("/nonexistent/models", "brain_tumor.onnx");

        let err = OrtModelService::new(&config).err().unwrap();
        assert!(matches!(err, PredictionError::ModelLoad(_)));
    }

    #[test]
    fn test_ort_model_service_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OrtModelService>();
    }
}
