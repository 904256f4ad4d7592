use crate::recommendations::recommendation;
use scan_prediction::{ConfidenceBand, PredictionResult, ScanKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// See a specialist within a day or two.
    Urgent,
    /// See a specialist within one or two weeks.
    Prompt,
    Routine,
}

/// What the portal returns for one analyzed scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub scan: ScanKind,
    pub prediction: PredictionResult,
    pub display_name: String,
    pub confidence_band: ConfidenceBand,
    pub urgency: Urgency,
    pub recommendation: &'static str,
    pub notice: &'static str,
}

const EYE_NOTICE: &str = "This AI analysis is a screening tool and should not replace professional \
medical diagnosis. Please consult a qualified ophthalmologist for proper evaluation and treatment.";

const TUMOR_NOTICE: &str = "This is a preliminary AI screening result. Consultation with a \
neurologist or neurosurgeon is essential; additional diagnostic tests and imaging will be required.";

const NO_TUMOR_NOTICE: &str = "No tumor was detected, which does not guarantee the absence of all \
conditions. Continue regular check-ups and report any new or worsening symptoms.";

impl ScanReport {
    pub fn new(scan: ScanKind, prediction: PredictionResult) -> Self {
        let label = prediction.class_name.as_str();
        let (display_name, urgency, notice) = match scan {
            ScanKind::Brain => match label {
                "notumor" => ("No Tumor".to_string(), Urgency::Routine, NO_TUMOR_NOTICE),
                "glioma" => (title_case(label), Urgency::Urgent, TUMOR_NOTICE),
                _ => (title_case(label), Urgency::Prompt, TUMOR_NOTICE),
            },
            ScanKind::Eye => match label {
                "NORMAL" => (label.to_string(), Urgency::Routine, EYE_NOTICE),
                _ => (label.to_string(), Urgency::Prompt, EYE_NOTICE),
            },
        };

        Self {
            scan,
            display_name,
            confidence_band: prediction.confidence_band(),
            urgency,
            recommendation: recommendation(scan, prediction.class_index),
            notice,
            prediction,
        }
    }
}

fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendations::NO_RECOMMENDATION;
    use scan_prediction::{BRAIN_CLASS_NAMES, EYE_CLASS_NAMES};

    fn brain(scores: Vec<f32>) -> ScanReport {
        let prediction = PredictionResult::from_scores(&BRAIN_CLASS_NAMES, scores).unwrap();
        ScanReport::new(ScanKind::Brain, prediction)
    }

    #[test]
    fn test_notumor_report() {
        let report = brain(vec![0.02, 0.03, 0.93, 0.02]);

        assert_eq!(report.display_name, "No Tumor");
        assert_eq!(report.urgency, Urgency::Routine);
        assert_eq!(report.confidence_band, ConfidenceBand::High);
        assert!(report.recommendation.starts_with("**For No Tumor Detected"));
        assert_eq!(report.notice, NO_TUMOR_NOTICE);
    }

    #[test]
    fn test_tumor_urgency() {
        assert_eq!(brain(vec![0.8, 0.1, 0.05, 0.05]).urgency, Urgency::Urgent);
        assert_eq!(brain(vec![0.1, 0.6, 0.2, 0.1]).urgency, Urgency::Prompt);

        let pituitary = brain(vec![0.1, 0.1, 0.1, 0.7]);
        assert_eq!(pituitary.display_name, "Pituitary");
        assert_eq!(pituitary.urgency, Urgency::Prompt);
        assert_eq!(pituitary.confidence_band, ConfidenceBand::Moderate);
    }

    #[test]
    fn test_eye_label_without_text() {
        let prediction = PredictionResult::from_scores(
            &EYE_CLASS_NAMES,
            vec![0.6, 0.1, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05],
        )
        .unwrap();
        let report = ScanReport::new(ScanKind::Eye, prediction);

        assert_eq!(report.display_name, "AMD");
        assert_eq!(report.recommendation, NO_RECOMMENDATION);
        assert_eq!(report.confidence_band, ConfidenceBand::Low);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("meningioma"), "Meningioma");
        assert_eq!(title_case(""), "");
    }
}
