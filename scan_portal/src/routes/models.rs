use crate::server::SharedState;
use axum::{extract::State, response::Json};
use scan_prediction::ScanKind;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub scan: ScanKind,
    pub available: bool,
    pub input_size: u32,
    pub class_names: &'static [&'static str],
}

pub async fn list_models(State(state): State<SharedState>) -> Json<Vec<ModelInfo>> {
    let models = ScanKind::ALL
        .iter()
        .map(|kind| ModelInfo {
            scan: *kind,
            available: state.classifiers.is_available(*kind),
            input_size: kind.input_size(),
            class_names: kind.class_names(),
        })
        .collect();

    Json(models)
}
