//! Frame aggregation: runs every frame of a video through the landmark
//! provider and the pose registry, then builds the summary.

use std::path::Path;
use std::time::{Duration, Instant};

use stance_models::AnalysisSummary;
use tracing::{debug, info, warn};

use crate::decode::{FrameSource, VideoDecoder};
use crate::error::MediaResult;
use crate::poses::PoseRegistry;
use crate::probe::VideoInfo;
use crate::provider::{LandmarkProvider, LandmarkProviderFactory};
use crate::summary::{build_summary, PoseAccumulator};

/// Frames between debug progress lines.
const PROGRESS_INTERVAL: u64 = 100;

/// Counters collected while analyzing one video.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisStats {
    /// Frames pulled from the decoder
    pub frames_decoded: u64,
    /// Frames for which the provider returned landmarks
    pub frames_with_landmarks: u64,
    /// Matches per pose, in registry order
    pub matches: Vec<(&'static str, u64)>,
    pub elapsed: Duration,
}

/// Result of a completed analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub summary: AnalysisSummary,
    pub stats: AnalysisStats,
}

/// Aggregates per-frame pose matches into an [`AnalysisSummary`].
#[derive(Clone)]
pub struct MovementAnalyzer {
    registry: PoseRegistry,
}

impl Default for MovementAnalyzer {
    fn default() -> Self {
        Self::new(PoseRegistry::builtin())
    }
}

impl MovementAnalyzer {
    pub fn new(registry: PoseRegistry) -> Self {
        Self { registry }
    }

    /// Open `path`, acquire a provider session and analyze every frame.
    ///
    /// `source_name` is the caller-facing name of the video; only its
    /// basename ends up in the summary.
    pub async fn analyze_video(
        &self,
        path: &Path,
        source_name: &str,
        decoder: &dyn VideoDecoder,
        factory: &dyn LandmarkProviderFactory,
    ) -> MediaResult<AnalysisOutcome> {
        let mut opened = decoder.open(path).await?;
        let mut provider = factory.open_session().await?;

        debug!(
            video = source_name,
            decoder = decoder.name(),
            provider = factory.name(),
            "Starting movement analysis"
        );

        self.analyze_frames(source_name, &opened.info, opened.frames.as_mut(), provider.as_mut())
            .await
    }

    /// Analyze an already opened frame stream.
    ///
    /// The provider is closed before returning, whatever the outcome.
    pub async fn analyze_frames(
        &self,
        source_name: &str,
        info: &VideoInfo,
        frames: &mut dyn FrameSource,
        provider: &mut dyn LandmarkProvider,
    ) -> MediaResult<AnalysisOutcome> {
        let started = Instant::now();
        let mut accumulators: Vec<PoseAccumulator> = self
            .registry
            .names()
            .into_iter()
            .map(PoseAccumulator::new)
            .collect();
        let mut stats = AnalysisStats::default();

        let result = self
            .process_frames(source_name, frames, provider, &mut accumulators, &mut stats)
            .await;

        if let Err(e) = provider.close().await {
            warn!(video = source_name, error = %e, "Failed to close landmark provider session");
        }
        result?;

        stats.elapsed = started.elapsed();
        stats.matches = accumulators.iter().map(|acc| (acc.name(), acc.count())).collect();

        let total_frames = if info.frame_count > 0 {
            info.frame_count
        } else {
            stats.frames_decoded
        };
        let summary = build_summary(source_name, total_frames, info.fps, accumulators)?;

        info!(
            video = source_name,
            frames = stats.frames_decoded,
            frames_with_landmarks = stats.frames_with_landmarks,
            matches = ?stats.matches,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "Movement analysis complete"
        );

        Ok(AnalysisOutcome { summary, stats })
    }

    async fn process_frames(
        &self,
        source_name: &str,
        frames: &mut dyn FrameSource,
        provider: &mut dyn LandmarkProvider,
        accumulators: &mut [PoseAccumulator],
        stats: &mut AnalysisStats,
    ) -> MediaResult<()> {
        while let Some(frame) = frames.next_frame().await? {
            stats.frames_decoded += 1;

            if let Some(landmarks) = provider.detect(&frame).await? {
                stats.frames_with_landmarks += 1;
                for pose in self.registry.matches(&landmarks) {
                    if let Some(acc) = accumulators.iter_mut().find(|acc| acc.name() == pose) {
                        acc.record(frame.index);
                    }
                }
            }

            if stats.frames_decoded % PROGRESS_INTERVAL == 0 {
                debug!(
                    video = source_name,
                    frames = stats.frames_decoded,
                    frames_with_landmarks = stats.frames_with_landmarks,
                    "Analysis progress"
                );
            }
        }
        Ok(())
    }
}
