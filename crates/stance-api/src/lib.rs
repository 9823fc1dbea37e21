//! Axum HTTP API server for movement analysis.
//!
//! This crate provides:
//! - `POST /analyze` multipart upload and pose analysis
//! - Liveness and readiness probes
//! - Request IDs, security headers and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod upload;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
pub use upload::TempUpload;
