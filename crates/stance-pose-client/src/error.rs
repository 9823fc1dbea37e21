//! Pose client error types.

use stance_media::MediaError;
use thiserror::Error;

pub type PoseClientResult<T> = Result<T, PoseClientError>;

#[derive(Debug, Error)]
pub enum PoseClientError {
    #[error("Pose service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Frame encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

impl PoseClientError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PoseClientError::ServiceUnavailable(_)
                | PoseClientError::Timeout(_)
                | PoseClientError::Network(_)
        )
    }
}

impl From<PoseClientError> for MediaError {
    fn from(e: PoseClientError) -> Self {
        MediaError::provider_failed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(PoseClientError::ServiceUnavailable("503".into()).is_retryable());
        assert!(PoseClientError::Timeout(30).is_retryable());
        assert!(!PoseClientError::RequestFailed("400".into()).is_retryable());
        assert!(!PoseClientError::InvalidResponse("bad".into()).is_retryable());
    }

    #[test]
    fn test_converts_to_provider_failure() {
        let err: MediaError = PoseClientError::Timeout(30).into();
        assert!(matches!(err, MediaError::ProviderFailed(_)));
        assert_eq!(err.kind(), "provider_failure");
    }
}
