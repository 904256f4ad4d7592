use crate::server::SharedState;
use axum::{extract::State, response::IntoResponse, response::Json};
use scan_prediction::ScanKind;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct Status {
    status: String,
    models: BTreeMap<&'static str, bool>,
}

pub async fn healthcheck(State(state): State<SharedState>) -> impl IntoResponse {
    let models = ScanKind::ALL
        .iter()
        .map(|kind| (kind.as_str(), state.classifiers.is_available(*kind)))
        .collect();

    Json(Status {
        status: "Available".into(),
        models,
    })
}
