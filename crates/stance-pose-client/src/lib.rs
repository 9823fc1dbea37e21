//! Client for the pose estimation sidecar.
//!
//! Landmark detection runs in a separate service that owns the model. This
//! crate talks to it over HTTP and adapts it to the
//! [`LandmarkProviderFactory`](stance_media::LandmarkProviderFactory) seam.

pub mod client;
pub mod error;
pub mod provider;
pub mod types;

pub use client::{PoseClient, PoseClientConfig};
pub use error::{PoseClientError, PoseClientResult};
pub use provider::{SidecarProviderFactory, SidecarSession};
pub use types::{CreateSessionRequest, CreateSessionResponse, HealthResponse, LandmarksResponse};
