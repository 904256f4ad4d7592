use crate::scan::ScanKind;
use serde::Deserialize;
use std::path::PathBuf;

pub trait Validatable {
    fn get_path(&self) -> PathBuf;

    fn validate(&self) -> Result<(), String> {
        if !self.get_path().exists() {
            return Err(format!("Model file not found: {:?}", self.get_path()));
        }
        Ok(())
    }
}

/// Memory layout of the input tensor the exported graph expects.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TensorLayout {
    /// `1 x H x W x 3`, what Keras exports keep.
    #[default]
    Nhwc,
    /// `1 x 3 x H x W`.
    Nchw,
}

/// Per-channel pixel scaling applied before inference. Must match the scheme
/// the model was trained with.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Raw 0..255 values. MobileNetV3 and EfficientNet graphs rescale
    /// internally, so their preprocessing is the identity.
    Passthrough,
    /// 0..255 divided by 255.
    UnitScale,
    /// 0..255 mapped onto [-1, 1] (MobileNetV2, ResNetV2 style).
    Symmetric,
    /// Unit scale, then ImageNet mean/std per channel.
    ImageNet,
}

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

impl Normalization {
    pub fn apply(&self, channel: usize, value: u8) -> f32 {
        let value = value as f32;
        match self {
            Normalization::Passthrough => value,
            Normalization::UnitScale => value / 255.,
            Normalization::Symmetric => value / 127.5 - 1.,
            Normalization::ImageNet => (value / 255. - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel],
        }
    }
}

/// What to do with images that do not carry exactly three color channels.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPolicy {
    /// Gray is copied into R, G and B; alpha is dropped.
    Replicate,
    /// Anything but three channels is a shape mismatch.
    Strict,
}

/// How to read the model's output vector.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    /// The graph ends in a softmax.
    #[default]
    Probabilities,
    /// Raw logits; softmax is applied after inference.
    Logits,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    pub model_dir: PathBuf,
    pub onnx_file: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub layout: TensorLayout,
    #[serde(default)]
    pub normalization: Option<Normalization>,
    #[serde(default)]
    pub channel_policy: Option<ChannelPolicy>,
    #[serde(default)]
    pub scores: ScoreKind,
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_intra_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl ModelConfig {
    pub fn new(model_dir: impl Into<PathBuf>, onnx_file: &str) -> Self {
        Self {
            model_dir: model_dir.into(),
            onnx_file: onnx_file.to_string(),
            enabled: default_enabled(),
            layout: TensorLayout::default(),
            normalization: None,
            channel_policy: None,
            scores: ScoreKind::default(),
            intra_threads: default_intra_threads(),
        }
    }
}

impl Validatable for ModelConfig {
    fn get_path(&self) -> PathBuf {
        self.model_dir.join(&self.onnx_file)
    }
}

/// Fully resolved preprocessing and postprocessing choices for one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessOptions {
    pub layout: TensorLayout,
    pub normalization: Normalization,
    pub channel_policy: ChannelPolicy,
    pub scores: ScoreKind,
}

impl PreprocessOptions {
    pub fn defaults_for(kind: ScanKind) -> Self {
        Self {
            layout: TensorLayout::default(),
            normalization: kind.default_normalization(),
            channel_policy: kind.default_channel_policy(),
            scores: ScoreKind::default(),
        }
    }

    pub fn from_config(kind: ScanKind, config: &ModelConfig) -> Self {
        Self {
            layout: config.layout,
            normalization: config
                .normalization
                .unwrap_or_else(|| kind.default_normalization()),
            channel_policy: config
                .channel_policy
                .unwrap_or_else(|| kind.default_channel_policy()),
            scores: config.scores,
        }
    }
}
