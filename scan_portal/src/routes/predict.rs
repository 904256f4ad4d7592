use crate::{report::ScanReport, server::SharedState};
use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{BytesRejection, PathRejection},
        FromRequestParts, Multipart, Path, State,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use scan_prediction::{PredictionError, ScanKind};
use std::time::Instant;
use thiserror::Error;
use tracing::instrument;

const UPLOAD_FIELD: &str = "file";

#[derive(Error, Debug)]
pub enum PortalError {
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    #[error("Unknown scan kind: {0}")]
    ScanPath(#[from] PathRejection),
    #[error("Request body rejected: {0}")]
    Body(#[from] BytesRejection),
    #[error("Multipart form rejected: {0}")]
    MultipartForm(#[from] MultipartRejection),
    #[error("Multipart upload failed: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("Prediction worker failed: {0}")]
    Worker(String),
}

impl PortalError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalError::Prediction(err) => match err {
                PredictionError::Decode(_) => StatusCode::BAD_REQUEST,
                PredictionError::ShapeMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
                PredictionError::ModelUnavailable(_) | PredictionError::ModelLoad(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                PredictionError::InferenceRuntime(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            PortalError::ScanPath(err) => err.status(),
            PortalError::Body(err) => err.status(),
            PortalError::MultipartForm(err) => err.status(),
            PortalError::Multipart(err) => err.status(),
            PortalError::Upload(_) => StatusCode::BAD_REQUEST,
            PortalError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        if self.status_code() == StatusCode::PAYLOAD_TOO_LARGE {
            return "PAYLOAD_TOO_LARGE";
        }
        match self {
            PortalError::Prediction(err) => err.code(),
            PortalError::ScanPath(_) => "UNKNOWN_SCAN",
            PortalError::Body(_)
            | PortalError::MultipartForm(_)
            | PortalError::Multipart(_)
            | PortalError::Upload(_) => "UPLOAD_ERROR",
            PortalError::Worker(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {} ({})", self, status);
        } else {
            tracing::warn!("Request rejected: {} ({})", self, status);
        }

        let body = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// `{scan}` path segment; rejections use the JSON error body.
pub struct ScanPath(pub ScanKind);

impl<S: Send + Sync> FromRequestParts<S> for ScanPath {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(scan) = Path::<ScanKind>::from_request_parts(parts, state).await?;
        Ok(ScanPath(scan))
    }
}

#[instrument(skip(state, image_data))]
pub async fn predict_scan(
    State(state): State<SharedState>,
    ScanPath(scan): ScanPath,
    image_data: Result<Bytes, BytesRejection>,
) -> Result<Json<ScanReport>, PortalError> {
    state.metrics.record_request("predict");
    let image_data = image_data?;
    tracing::debug!("Received {} bytes", image_data.len());
    analyze(&state, scan, image_data).await.map(Json)
}

#[instrument(skip(state, multipart))]
pub async fn upload_scan(
    State(state): State<SharedState>,
    ScanPath(scan): ScanPath,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScanReport>, PortalError> {
    state.metrics.record_request("upload");
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            let image_data = field.bytes().await?;
            return analyze(&state, scan, image_data).await.map(Json);
        }
    }

    Err(PortalError::Upload(format!(
        "form has no `{}` field",
        UPLOAD_FIELD
    )))
}

async fn analyze(
    state: &SharedState,
    scan: ScanKind,
    image_data: Bytes,
) -> Result<ScanReport, PortalError> {
    let classifier = state.classifiers.get(scan).inspect_err(|err| {
        state.metrics.record_failure(scan, err.code());
    })?;

    let started = Instant::now();
    let outcome = tokio::task::spawn_blocking(move || classifier.predict(&image_data))
        .await
        .map_err(|e| PortalError::Worker(e.to_string()))?;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(prediction) => {
            tracing::info!(
                "{} scan classified as {} ({:.1}%) in {} ms",
                scan,
                prediction.class_name,
                prediction.confidence * 100.,
                elapsed_ms
            );
            state
                .metrics
                .record_prediction(scan, &prediction.class_name, elapsed_ms);
            Ok(ScanReport::new(scan, prediction))
        }
        Err(err) => {
            state.metrics.record_failure(scan, err.code());
            Err(err.into())
        }
    }
}
