//! Pose service request/response types.

use serde::{Deserialize, Serialize};
use stance_models::Landmark;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Parameters for a new tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub min_detection_confidence: f64,
    pub min_tracking_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

/// Landmarks for one frame; `None` when no person was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarksResponse {
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}
