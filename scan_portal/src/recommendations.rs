use scan_prediction::{ScanKind, BRAIN_CLASS_NAMES, EYE_CLASS_NAMES};

pub const NO_RECOMMENDATION: &str = "No recommendation available.";

// Written guidance exists for four of the eight OCT labels; it is keyed by
// label so the model's label order stays the only source of truth.
const EYE_RECOMMENDATIONS: [(&str, &str); 4] = [
    ("CNV", include_str!("../assets/recommendations/eye_cnv.md")),
    ("DME", include_str!("../assets/recommendations/eye_dme.md")),
    ("DRUSEN", include_str!("../assets/recommendations/eye_drusen.md")),
    ("NORMAL", include_str!("../assets/recommendations/eye_normal.md")),
];

const BRAIN_RECOMMENDATIONS: [(&str, &str); 4] = [
    ("glioma", include_str!("../assets/recommendations/brain_glioma.md")),
    ("meningioma", include_str!("../assets/recommendations/brain_meningioma.md")),
    ("notumor", include_str!("../assets/recommendations/brain_notumor.md")),
    ("pituitary", include_str!("../assets/recommendations/brain_pituitary.md")),
];

fn lookup(
    class_names: &[&str],
    table: &[(&str, &'static str)],
    class_index: usize,
) -> &'static str {
    class_names
        .get(class_index)
        .and_then(|label| table.iter().find(|(name, _)| name == label))
        .map(|(_, text)| *text)
        .unwrap_or(NO_RECOMMENDATION)
}

pub fn eye_recommendation(class_index: usize) -> &'static str {
    lookup(&EYE_CLASS_NAMES, &EYE_RECOMMENDATIONS, class_index)
}

pub fn brain_recommendation(class_index: usize) -> &'static str {
    lookup(&BRAIN_CLASS_NAMES, &BRAIN_RECOMMENDATIONS, class_index)
}

pub fn recommendation(kind: ScanKind, class_index: usize) -> &'static str {
    match kind {
        ScanKind::Eye => eye_recommendation(class_index),
        ScanKind::Brain => brain_recommendation(class_index),
    }
}
