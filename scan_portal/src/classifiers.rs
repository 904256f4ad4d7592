use crate::config::ModelsConfig;
use scan_prediction::{BrainClassifier, Classifier, EyeClassifier, PredictionError, ScanKind};
use std::sync::Arc;

/// The loaded models, built once at startup and shared by every request.
/// A `None` slot is a model switched off in configuration.
#[derive(Clone, Default)]
pub struct Classifiers {
    eye: Option<Arc<dyn Classifier>>,
    brain: Option<Arc<dyn Classifier>>,
}

impl Classifiers {
    pub fn new(eye: Option<Arc<dyn Classifier>>, brain: Option<Arc<dyn Classifier>>) -> Self {
        Self { eye, brain }
    }

    /// Loads every enabled model. Any load failure aborts startup.
    pub fn load(models: &ModelsConfig) -> Result<Self, PredictionError> {
        let eye: Option<Arc<dyn Classifier>> = if models.eye.enabled {
            Some(Arc::new(EyeClassifier::load(&models.eye)?))
        } else {
            None
        };
        let brain: Option<Arc<dyn Classifier>> = if models.brain.enabled {
            Some(Arc::new(BrainClassifier::load(&models.brain)?))
        } else {
            None
        };

        let classifiers = Self { eye, brain };
        for kind in ScanKind::ALL {
            if classifiers.is_available(kind) {
                tracing::info!("{} model loaded", kind);
            } else {
                tracing::warn!("{} model disabled in configuration", kind);
            }
        }

        Ok(classifiers)
    }

    pub fn get(&self, kind: ScanKind) -> Result<Arc<dyn Classifier>, PredictionError> {
        let slot = match kind {
            ScanKind::Eye => &self.eye,
            ScanKind::Brain => &self.brain,
        };
        slot.clone().ok_or_else(|| {
            PredictionError::ModelUnavailable(format!("the {} model is not loaded", kind))
        })
    }

    pub fn is_available(&self, kind: ScanKind) -> bool {
        self.get(kind).is_ok()
    }
}
