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

/// Output order of the retinal OCT model head.
pub const EYE_CLASS_NAMES: [&str; 8] = [
    "AMD", "CNV", "CSR", "DME", "DR", "DRUSEN", "MH", "NORMAL",
];
pub const EYE_INPUT_SIZE: u32 = 224;

/// Retinal OCT classifier over a MobileNetV3 backbone. Grayscale scans are
/// replicated to RGB before inference unless configured otherwise.
pub struct EyeClassifier<B: InferenceBackend = OrtModelService> {
    inner: ImageClassifier<B>,
}

impl EyeClassifier<OrtModelService> {
    pub fn load(config: &ModelConfig) -> Result<Self, PredictionError> {
        let backend = OrtModelService::new(config)?;
        Ok(Self::with_backend(
            backend,
            PreprocessOptions::from_config(ScanKind::Eye, config),
        ))
    }
}

impl<B: InferenceBackend> EyeClassifier<B> {
    pub fn with_backend(backend: B, options: PreprocessOptions) -> Self {
        Self {
            inner: ImageClassifier::new(ScanKind::Eye, backend, options),
        }
    }
}

impl<B: InferenceBackend> Classifier for EyeClassifier<B> {
    fn kind(&self) -> ScanKind {
        ScanKind::Eye
    }

    fn predict_image(&self, image: &DynamicImage) -> Result<PredictionResult, PredictionError> {
        self.inner.predict_image(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::tests::FakeBackend;
    use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut image_data = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut image_data), ImageFormat::Png)
            .unwrap();
        image_data
    }

    fn classifier(scores: Vec<f32>) -> EyeClassifier<FakeBackend> {
        EyeClassifier::with_backend(
            FakeBackend::new(scores),
            PreprocessOptions::defaults_for(ScanKind::Eye),
        )
    }

    #[test]
    fn test_grayscale_scan_is_accepted() {
        let classifier = classifier(vec![0.01, 0.9, 0.01, 0.02, 0.02, 0.02, 0.01, 0.01]);
        let scan = png_bytes(DynamicImage::ImageLuma8(GrayImage::from_pixel(
            496,
            512,
            Luma([90]),
        )));

        let result = classifier.predict(&scan).unwrap();

        assert_eq!(result.class_name, "CNV");
        assert_eq!(*classifier.inner.backend().last_shape.lock(), vec![1, 224, 224, 3]);
    }

    #[test]
    fn test_result_invariants() {
        let scores = vec![0.05, 0.05, 0.1, 0.05, 0.05, 0.1, 0.1, 0.5];
        let classifier = classifier(scores.clone());
        let scan = png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            300,
            300,
            Rgb([20, 40, 60]),
        )));

        let result = classifier.predict(&scan).unwrap();
        let total: f32 = result.all_class_probabilities.iter().sum();

        assert!(result.class_index < EYE_CLASS_NAMES.len());
        assert_eq!(result.class_name, "NORMAL");
        assert_eq!(result.confidence, result.all_class_probabilities[result.class_index]);
        assert_eq!(result.all_class_probabilities.len(), EYE_CLASS_NAMES.len());
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let classifier = classifier(vec![0.1, 0.2, 0.1, 0.1, 0.1, 0.1, 0.2, 0.1]);
        let scan = png_bytes(DynamicImage::ImageRgb8(RgbImage::from_fn(64, 48, |x, y| {
            Rgb([x as u8, y as u8, (x ^ y) as u8])
        })));

        let first = classifier.predict(&scan).unwrap();
        let second = classifier.predict(&scan).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_text_file_never_reaches_the_model() {
        let classifier = classifier(vec![0.125; 8]);

        let err = classifier.predict(b"plain text renamed to scan.jpg").unwrap_err();

        assert!(matches!(err, PredictionError::Decode(_)));
        assert_eq!(
            classifier
                .inner
                .backend()
                .calls
                .load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }
}
