use crate::{
    brain::{BRAIN_CLASS_NAMES, BRAIN_INPUT_SIZE},
    config::{ChannelPolicy, Normalization},
    eye::{EYE_CLASS_NAMES, EYE_INPUT_SIZE},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The imaging modality a classifier is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    /// Retinal OCT.
    Eye,
    /// Brain MRI.
    Brain,
}

impl ScanKind {
    pub const ALL: [ScanKind; 2] = [ScanKind::Eye, ScanKind::Brain];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Eye => "eye",
            ScanKind::Brain => "brain",
        }
    }

    /// Ordered label list; the class index of a prediction points into it.
    pub fn class_names(&self) -> &'static [&'static str] {
        match self {
            ScanKind::Eye => &EYE_CLASS_NAMES,
            ScanKind::Brain => &BRAIN_CLASS_NAMES,
        }
    }

    /// Side length of the square input the model expects.
    pub fn input_size(&self) -> u32 {
        match self {
            ScanKind::Eye => EYE_INPUT_SIZE,
            ScanKind::Brain => BRAIN_INPUT_SIZE,
        }
    }

    pub fn default_normalization(&self) -> Normalization {
        match self {
            ScanKind::Eye => Normalization::Passthrough,
            ScanKind::Brain => Normalization::UnitScale,
        }
    }

    pub fn default_channel_policy(&self) -> ChannelPolicy {
        match self {
            ScanKind::Eye => ChannelPolicy::Replicate,
            ScanKind::Brain => ChannelPolicy::Strict,
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
