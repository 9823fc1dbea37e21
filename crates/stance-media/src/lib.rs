//! Video decoding and movement analysis.
//!
//! This crate provides:
//! - FFprobe metadata probing and FFmpeg rawvideo frame decoding
//! - Joint angle geometry and pose templates (T-Pose)
//! - Landmark provider traits for external pose estimation
//! - Frame aggregation into an [`AnalysisSummary`](stance_models::AnalysisSummary)

pub mod analyzer;
pub mod command;
pub mod decode;
pub mod error;
pub mod geometry;
pub mod poses;
pub mod probe;
pub mod provider;
pub mod summary;

pub use analyzer::{AnalysisOutcome, AnalysisStats, MovementAnalyzer};
pub use command::{check_ffmpeg, check_ffprobe, DecodeCommand};
pub use decode::{FfmpegDecoder, FfmpegFrameSource, FrameSource, OpenedVideo, VideoDecoder, VideoFrame};
pub use error::{MediaError, MediaResult};
pub use geometry::{angle, joint_angle, Point2};
pub use poses::{PosePredicate, PoseRegistry, TPose, TPoseConfig};
pub use probe::{probe_video, VideoInfo};
pub use provider::{LandmarkProvider, LandmarkProviderFactory};
pub use summary::{build_summary, PoseAccumulator};
