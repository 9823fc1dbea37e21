//! Landmark provider backed by the pose service.

use std::sync::Arc;

use async_trait::async_trait;
use stance_media::{LandmarkProvider, LandmarkProviderFactory, MediaError, MediaResult, VideoFrame};
use stance_models::PoseLandmarks;
use tracing::warn;

use crate::client::PoseClient;

/// Hands out one pose-service session per analysis.
#[derive(Clone)]
pub struct SidecarProviderFactory {
    client: Arc<PoseClient>,
}

impl SidecarProviderFactory {
    pub fn new(client: PoseClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl LandmarkProviderFactory for SidecarProviderFactory {
    async fn open_session(&self) -> MediaResult<Box<dyn LandmarkProvider>> {
        let session_id = self.client.create_session().await?;
        Ok(Box::new(SidecarSession {
            client: Arc::clone(&self.client),
            session_id,
            closed: false,
        }))
    }

    async fn check_health(&self) -> MediaResult<()> {
        if self.client.health_check().await? {
            Ok(())
        } else {
            Err(MediaError::provider_failed("Pose service is not healthy"))
        }
    }

    fn name(&self) -> &'static str {
        "pose-sidecar"
    }
}

/// One tracking session on the pose service.
pub struct SidecarSession {
    client: Arc<PoseClient>,
    session_id: String,
    closed: bool,
}

#[async_trait]
impl LandmarkProvider for SidecarSession {
    async fn detect(&mut self, frame: &VideoFrame) -> MediaResult<Option<PoseLandmarks>> {
        Ok(self
            .client
            .detect_landmarks(&self.session_id, &frame.image)
            .await?)
    }

    async fn close(&mut self) -> MediaResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        Ok(self.client.delete_session(&self.session_id).await?)
    }
}

impl Drop for SidecarSession {
    // A cancelled analysis drops the session without closing it
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(session_id = %self.session_id, "Pose session dropped outside a runtime; not closed");
            return;
        };
        let client = Arc::clone(&self.client);
        let session_id = std::mem::take(&mut self.session_id);
        runtime.spawn(async move {
            if let Err(e) = client.delete_session(&session_id).await {
                warn!(session_id = %session_id, error = %e, "Failed to close dropped pose session");
            }
        });
    }
}
