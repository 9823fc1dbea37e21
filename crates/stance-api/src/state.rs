//! Application state.

use std::sync::Arc;

use stance_media::{FfmpegDecoder, LandmarkProviderFactory, MovementAnalyzer, VideoDecoder};
use stance_pose_client::{PoseClient, SidecarProviderFactory};
use tokio::sync::Semaphore;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub analyzer: Arc<MovementAnalyzer>,
    pub decoder: Arc<dyn VideoDecoder>,
    pub providers: Arc<dyn LandmarkProviderFactory>,
    /// Bounds the number of analyses running at once
    pub analysis_slots: Arc<Semaphore>,
}

impl AppState {
    /// Assemble state from explicit collaborators.
    pub fn new(
        config: ApiConfig,
        decoder: Arc<dyn VideoDecoder>,
        providers: Arc<dyn LandmarkProviderFactory>,
    ) -> Self {
        let analysis_slots = Arc::new(Semaphore::new(config.max_concurrent_analyses.max(1)));
        Self {
            config,
            analyzer: Arc::new(MovementAnalyzer::default()),
            decoder,
            providers,
            analysis_slots,
        }
    }

    /// Create state backed by FFmpeg and the pose service from the environment.
    pub async fn from_config(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        tokio::fs::create_dir_all(&config.upload_dir).await?;

        let decoder = FfmpegDecoder::new().with_max_width(config.decode_max_width);
        let providers = SidecarProviderFactory::new(PoseClient::from_env()?);

        Ok(Self::new(config, Arc::new(decoder), Arc::new(providers)))
    }
}
