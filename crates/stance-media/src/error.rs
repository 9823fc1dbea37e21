//! Error types for media and analysis operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while decoding and analyzing a video.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Could not open video file: {0}")]
    UnreadableSource(String),

    #[error("Video reports an unusable frame rate ({0})")]
    DegenerateFrameRate(f64),

    #[error("Landmark provider failed: {0}")]
    ProviderFailed(String),

    #[error("Duplicate pose name: {0}")]
    DuplicatePose(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create an unreadable-source error.
    pub fn unreadable(message: impl Into<String>) -> Self {
        Self::UnreadableSource(message.into())
    }

    /// Create a provider failure error.
    pub fn provider_failed(message: impl Into<String>) -> Self {
        Self::ProviderFailed(message.into())
    }

    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable failure category for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            MediaError::FfmpegNotFound
            | MediaError::FfprobeNotFound
            | MediaError::FfmpegFailed { .. }
            | MediaError::FileNotFound(_)
            | MediaError::UnreadableSource(_) => "unreadable_source",
            MediaError::DegenerateFrameRate(_) => "degenerate_rate",
            MediaError::ProviderFailed(_) => "provider_failure",
            MediaError::DuplicatePose(_)
            | MediaError::Io(_)
            | MediaError::Internal(_) => "unexpected",
        }
    }
}
