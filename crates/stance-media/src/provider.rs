//! Landmark-detection provider traits.
//!
//! Pose estimation runs outside this crate. A [`LandmarkProviderFactory`] is
//! shared by the whole process and hands out one [`LandmarkProvider`] session
//! per analysis, so providers that keep tracking state between frames never
//! leak it across concurrent requests.

use async_trait::async_trait;
use stance_models::PoseLandmarks;

use crate::decode::VideoFrame;
use crate::error::MediaResult;

/// Per-analysis landmark detection session.
#[async_trait]
pub trait LandmarkProvider: Send {
    /// Detect body landmarks in one frame.
    ///
    /// Returns `Ok(None)` when no subject is visible in the frame.
    async fn detect(&mut self, frame: &VideoFrame) -> MediaResult<Option<PoseLandmarks>>;

    /// Release the session. Called exactly once, after the last frame.
    async fn close(&mut self) -> MediaResult<()> {
        Ok(())
    }
}

/// Creates landmark provider sessions.
#[async_trait]
pub trait LandmarkProviderFactory: Send + Sync {
    /// Acquire a fresh session for one analysis.
    async fn open_session(&self) -> MediaResult<Box<dyn LandmarkProvider>>;

    /// Whether the backing service is reachable.
    async fn check_health(&self) -> MediaResult<()> {
        Ok(())
    }

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}
