use crate::{
    config::{PreprocessOptions, ScoreKind},
    error::PredictionError,
    model_service::InferenceBackend,
    prediction::{softmax, PredictionResult},
    preprocessing::{decode_image, prepare_input},
    scan::ScanKind,
};
use image::DynamicImage;

/// A loaded model bound to a fixed label list and input resolution.
pub trait Classifier: Send + Sync + 'static {
    fn kind(&self) -> ScanKind;

    fn class_names(&self) -> &'static [&'static str] {
        self.kind().class_names()
    }

    fn input_size(&self) -> u32 {
        self.kind().input_size()
    }

    fn predict_image(&self, image: &DynamicImage) -> Result<PredictionResult, PredictionError>;

    /// Decodes raw upload bytes (JPEG or PNG) and classifies them.
    fn predict(&self, image_data: &[u8]) -> Result<PredictionResult, PredictionError> {
        let image = decode_image(image_data)?;
        self.predict_image(&image)
    }
}

pub struct ImageClassifier<B: InferenceBackend> {
    kind: ScanKind,
    options: PreprocessOptions,
    backend: B,
}

impl<B: InferenceBackend> ImageClassifier<B> {
    pub fn new(kind: ScanKind, backend: B, options: PreprocessOptions) -> Self {
        Self {
            kind,
            options,
            backend,
        }
    }

    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: InferenceBackend> Classifier for ImageClassifier<B> {
    fn kind(&self) -> ScanKind {
        self.kind
    }

    fn predict_image(&self, image: &DynamicImage) -> Result<PredictionResult, PredictionError> {
        let input = prepare_input(image, self.kind.input_size(), &self.options)?;

        let scores = self.backend.infer(input)?;
        let probabilities = match self.options.scores {
            ScoreKind::Probabilities => scores,
            ScoreKind::Logits => softmax(&scores),
        };

        let result = PredictionResult::from_scores(self.kind.class_names(), probabilities)
            .inspect_err(|err| tracing::warn!("{} model output rejected: {}", self.kind, err))?;
        tracing::debug!(
            "{} prediction: class={} index={} confidence={:.3}",
            self.kind,
            result.class_name,
            result.class_index,
            result.confidence
        );

        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ndarray::{Array, Ix4};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns fixed scores and remembers the shape of the last input.
    pub struct FakeBackend {
        pub scores: Vec<f32>,
        pub calls: AtomicUsize,
        pub last_shape: Mutex<Vec<usize>>,
    }

    impl FakeBackend {
        pub fn new(scores: Vec<f32>) -> Self {
            Self {
                scores,
                calls: AtomicUsize::new(0),
                last_shape: Mutex::new(Vec::new()),
            }
        }
    }

    impl InferenceBackend for FakeBackend {
        fn infer(&self, input: Array<f32, Ix4>) -> Result<Vec<f32>, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_shape.lock() = input.shape().to_vec();
            Ok(self.scores.clone())
        }
    }

    struct FailingBackend;

    /// Fails on the first call only.
    struct FlakyBackend {
        calls: AtomicUsize,
    }

    impl InferenceBackend for FlakyBackend {
        fn infer(&self, _input: Array<f32, Ix4>) -> Result<Vec<f32>, PredictionError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(PredictionError::InferenceRuntime("device lost".to_string()));
            }
            Ok(vec![0.1, 0.7, 0.1, 0.1])
        }
    }

    impl InferenceBackend for FailingBackend {
        fn infer(&self, _input: Array<f32, Ix4>) -> Result<Vec<f32>, PredictionError> {
            Err(PredictionError::InferenceRuntime("out of memory".to_string()))
        }
    }

    #[test]
    fn test_logits_are_softmaxed() {
        let mut options = PreprocessOptions::defaults_for(ScanKind::Brain);
        options.scores = ScoreKind::Logits;
        let classifier = ImageClassifier::new(
            ScanKind::Brain,
            FakeBackend::new(vec![0.0, 0.0, 4.0, 0.0]),
            options,
        );
        let image = DynamicImage::new_rgb8(16, 16);

        let result = classifier.predict_image(&image).unwrap();
        let total: f32 = result.all_class_probabilities.iter().sum();

        assert_eq!(result.class_name, "notumor");
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_backend_failure_is_not_a_prediction() {
        let classifier = ImageClassifier::new(
            ScanKind::Brain,
            FailingBackend,
            PreprocessOptions::defaults_for(ScanKind::Brain),
        );
        let image = DynamicImage::new_rgb8(16, 16);

        let err = classifier.predict_image(&image).unwrap_err();
        assert!(matches!(err, PredictionError::InferenceRuntime(_)));
    }

    #[test]
    fn test_classifier_recovers_after_backend_failure() {
        let classifier = ImageClassifier::new(
            ScanKind::Brain,
            FlakyBackend {
                calls: AtomicUsize::new(0),
            },
            PreprocessOptions::defaults_for(ScanKind::Brain),
        );
        let image = DynamicImage::new_rgb8(16, 16);

        let err = classifier.predict_image(&image).unwrap_err();
        assert!(matches!(err, PredictionError::InferenceRuntime(_)));

        let result = classifier.predict_image(&image).unwrap();
        assert_eq!(result.class_name, "meningioma");
        assert_eq!(result.confidence, 0.7);
    }

    #[test]
    fn test_unnormalized_scores_are_not_a_prediction() {
        let classifier = ImageClassifier::new(
            ScanKind::Brain,
            FakeBackend::new(vec![3.0, -1.0, 0.5, 0.2]),
            PreprocessOptions::defaults_for(ScanKind::Brain),
        );
        let image = DynamicImage::new_rgb8(16, 16);

        let err = classifier.predict_image(&image).unwrap_err();
        assert!(matches!(err, PredictionError::InferenceRuntime(_)));
        assert_eq!(classifier.backend().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_classifier_is_object_safe() {
        let classifier: Box<dyn Classifier> = Box::new(ImageClassifier::new(
            ScanKind::Eye,
            FakeBackend::new(vec![0.0; 8]),
            PreprocessOptions::defaults_for(ScanKind::Eye),
        ));

        assert_eq!(classifier.class_names().len(), 8);
        assert_eq!(classifier.input_size(), 224);
    }
}
