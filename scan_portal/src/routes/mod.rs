mod health;
mod metrics;
mod models;
mod predict;

use crate::server::SharedState;
use axum::{
    routing::{get, post},
    Router,
};

pub use predict::PortalError;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/health", get(health::healthcheck))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/api/models", get(models::list_models))
        .route("/api/{scan}/predict", post(predict::predict_scan))
        .route("/api/{scan}/upload", post(predict::upload_scan))
}
