//! Shared data models for the Stance movement analysis service.
//!
//! This crate provides Serde-serializable types for:
//! - Body landmarks in the MediaPipe Pose topology
//! - The analysis summary returned by the API
//! - Upload name validation

pub mod landmark;
pub mod summary;
pub mod upload;

// Re-export common types
pub use landmark::{BodyLandmark, Landmark, LandmarkCountError, PoseLandmarks, BODY_LANDMARK_COUNT};
pub use summary::{AnalysisSummary, PoseDetail};
pub use upload::{basename, sanitize_filename, UploadError, VideoExtension};
