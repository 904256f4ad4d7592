use crate::{
    classifier::{Classifier, ImageClassifier},
    config::{ModelConfig, PreprocessOptions},
    error::PredictionError,
    model_service::InferenceBackend,
    ort_service::OrtModelService,
    prediction::PredictionResult,
    scan::ScanKind,
};
use image::DynamicImage;

/// Output order of the brain MRI model head.
pub const BRAIN_CLASS_NAMES: [&str; 4] = ["glioma", "meningioma", "notumor", "pituitary"];
pub const BRAIN_INPUT_SIZE: u32 = 128;

/// Brain MRI classifier. Pixels are scaled to [0, 1]; by default only
/// three-channel images are accepted.
pub struct BrainClassifier<B: InferenceBackend = OrtModelService> {
    inner: ImageClassifier<B>,
}

impl BrainClassifier<OrtModelService> {
    pub fn load(config: &ModelConfig) -> Result<Self, PredictionError> {
        let backend = OrtModelService::new(config)?;
        Ok(Self::with_backend(
            backend,
            PreprocessOptions::from_config(ScanKind::Brain, config),
        ))
    }
}

impl<B: InferenceBackend> BrainClassifier<B> {
    pub fn with_backend(backend: B, options: PreprocessOptions) -> Self {
        Self {
            inner: ImageClassifier::new(ScanKind::Brain, backend, options),
        }
    }
}

impl<B: InferenceBackend> Classifier for BrainClassifier<B> {
    fn kind(&self) -> ScanKind {
        ScanKind::Brain
    }

    fn predict_image(&self, image: &DynamicImage) -> Result<PredictionResult, PredictionError> {
        self.inner.predict_image(image)
    }
}
