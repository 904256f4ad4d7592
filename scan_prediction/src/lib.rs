mod brain;
mod classifier;
mod error;
mod eye;
mod model_service;
mod ort_service;
mod prediction;
mod scan;

pub mod config;
pub mod preprocessing;

pub use brain::{BrainClassifier, BRAIN_CLASS_NAMES, BRAIN_INPUT_SIZE};
pub use classifier::{Classifier, ImageClassifier};
pub use error::PredictionError;
pub use eye::{EyeClassifier, EYE_CLASS_NAMES, EYE_INPUT_SIZE};
pub use model_service::InferenceBackend;
pub use ort_service::OrtModelService;
pub use prediction::{softmax, ConfidenceBand, PredictionResult};
pub use scan::ScanKind;
