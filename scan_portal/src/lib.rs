mod classifiers;
mod recommendations;
mod report;
mod routes;
mod server;
mod telemetry;

pub mod app;
pub mod config;

pub use app::start_app;
pub use classifiers::Classifiers;
pub use recommendations::{
    brain_recommendation, eye_recommendation, recommendation, NO_RECOMMENDATION,
};
pub use report::{ScanReport, Urgency};
pub use routes::PortalError;
pub use server::{build_router, HttpServer, SharedState};
