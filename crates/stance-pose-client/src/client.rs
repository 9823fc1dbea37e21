//! Pose service HTTP client.

use std::time::Duration;

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, RgbImage};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use stance_models::PoseLandmarks;
use tracing::{debug, warn};

use crate::error::{PoseClientError, PoseClientResult};
use crate::types::{
    CreateSessionRequest, CreateSessionResponse, HealthResponse, LandmarksResponse,
};

/// Configuration for the pose client.
#[derive(Debug, Clone)]
pub struct PoseClientConfig {
    /// Base URL of the pose service
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Max retries
    pub max_retries: u32,
    pub min_detection_confidence: f64,
    pub min_tracking_confidence: f64,
    /// JPEG quality for uploaded frames (1-100)
    pub jpeg_quality: u8,
}

impl Default for PoseClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            jpeg_quality: 85,
        }
    }
}

impl PoseClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("POSE_SERVICE_URL").unwrap_or(defaults.base_url),
            timeout: Duration::from_secs(env_parse("POSE_SERVICE_TIMEOUT").unwrap_or(30)),
            max_retries: env_parse("POSE_SERVICE_RETRIES").unwrap_or(defaults.max_retries),
            min_detection_confidence: env_parse("POSE_MIN_DETECTION_CONFIDENCE")
                .unwrap_or(defaults.min_detection_confidence),
            min_tracking_confidence: env_parse("POSE_MIN_TRACKING_CONFIDENCE")
                .unwrap_or(defaults.min_tracking_confidence),
            jpeg_quality: env_parse::<u8>("POSE_JPEG_QUALITY")
                .map(|q| q.clamp(1, 100))
                .unwrap_or(defaults.jpeg_quality),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Client for the pose estimation service.
pub struct PoseClient {
    http: Client,
    config: PoseClientConfig,
}

impl PoseClient {
    /// Create a new pose client.
    pub fn new(config: PoseClientConfig) -> PoseClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PoseClientError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> PoseClientResult<Self> {
        Self::new(PoseClientConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Check if the pose service is healthy.
    pub async fn health_check(&self) -> PoseClientResult<bool> {
        let url = self.url("/health");

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = read_json(response).await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("Pose service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Pose service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Open a tracking session on the service.
    pub async fn create_session(&self) -> PoseClientResult<String> {
        let url = self.url("/v1/sessions");
        let request = CreateSessionRequest {
            min_detection_confidence: self.config.min_detection_confidence,
            min_tracking_confidence: self.config.min_tracking_confidence,
        };

        let response = self
            .with_retry(|| async {
                let response = self
                    .http
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| self.transport_error(e))?;
                check_status(response).await
            })
            .await?;

        let created: CreateSessionResponse = read_json(response).await?;
        debug!(session_id = %created.session_id, "Opened pose session");
        Ok(created.session_id)
    }

    /// Detect landmarks for one frame within a session.
    pub async fn detect_landmarks(
        &self,
        session_id: &str,
        image: &RgbImage,
    ) -> PoseClientResult<Option<PoseLandmarks>> {
        let url = self.url(&format!("/v1/sessions/{}/landmarks", session_id));
        let jpeg = encode_jpeg(image, self.config.jpeg_quality)?;

        let response = self
            .with_retry(|| async {
                let response = self
                    .http
                    .post(&url)
                    .header(CONTENT_TYPE, "image/jpeg")
                    .body(jpeg.clone())
                    .send()
                    .await
                    .map_err(|e| self.transport_error(e))?;
                check_status(response).await
            })
            .await?;

        let body: LandmarksResponse = read_json(response).await?;
        body.landmarks
            .map(|points| {
                PoseLandmarks::from_points(points)
                    .map_err(|e| PoseClientError::InvalidResponse(e.to_string()))
            })
            .transpose()
    }

    /// Close a session. An already-expired session is not an error.
    pub async fn delete_session(&self, session_id: &str) -> PoseClientResult<()> {
        let url = self.url(&format!("/v1/sessions/{}", session_id));

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(session_id, "Pose session already gone");
            return Ok(());
        }
        check_status(response).await?;
        debug!(session_id, "Closed pose session");
        Ok(())
    }

    fn transport_error(&self, e: reqwest::Error) -> PoseClientError {
        if e.is_timeout() {
            PoseClientError::Timeout(self.config.timeout.as_secs())
        } else {
            PoseClientError::Network(e)
        }
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> PoseClientResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = PoseClientResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Pose request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(PoseClientError::RequestFailed("Unknown error".to_string())))
    }
}

/// Map non-success statuses to errors; 5xx is retryable.
async fn check_status(response: Response) -> PoseClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = format!("Pose service returned {}: {}", status, body);
    if status.is_server_error() {
        Err(PoseClientError::ServiceUnavailable(message))
    } else {
        Err(PoseClientError::RequestFailed(message))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> PoseClientResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Encode a frame as JPEG.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> PoseClientResult<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgb8,
    )?;
    Ok(buf)
}
