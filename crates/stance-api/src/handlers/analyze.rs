//! Video analysis handler.

use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Extension;
use axum::Json;
use stance_models::AnalysisSummary;
use tracing::{error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::middleware::RequestId;
use crate::state::AppState;
use crate::upload::receive_upload;

/// Analyze an uploaded video for known poses.
///
/// POST /analyze (multipart, field `video_file`)
pub async fn analyze(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalysisSummary>> {
    let request_id = request_id.map(|Extension(id)| id.0).unwrap_or_default();

    let upload = match receive_upload(&mut multipart, &state.config.upload_dir).await {
        Ok(upload) => upload,
        Err(e) => {
            warn!(request_id = %request_id, kind = e.kind(), error = %e, "Rejected upload");
            return Err(e);
        }
    };

    let _permit = state
        .analysis_slots
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| ApiError::Unavailable("Analysis capacity is shutting down".to_string()))?;

    metrics::analysis_started();
    let _in_flight = scopeguard::guard((), |_| metrics::analysis_finished());

    info!(
        request_id = %request_id,
        video = %upload.original_name(),
        container = %upload.extension(),
        bytes = upload.size(),
        "Starting analysis"
    );

    let start = Instant::now();
    let timeout = state.config.analysis_timeout;
    let result = tokio::time::timeout(
        timeout,
        state.analyzer.analyze_video(
            upload.path(),
            upload.original_name(),
            state.decoder.as_ref(),
            state.providers.as_ref(),
        ),
    )
    .await;
    let elapsed = start.elapsed().as_secs_f64();

    let video = upload.original_name().to_string();
    upload.remove();

    let outcome = match result {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            let e = ApiError::from(e);
            error!(request_id = %request_id, video = %video, kind = e.kind(), error = %e, "Analysis failed");
            metrics::record_analysis_failure(e.kind(), elapsed);
            return Err(e);
        }
        Err(_) => {
            let e = ApiError::Timeout(timeout.as_secs());
            error!(request_id = %request_id, video = %video, kind = e.kind(), "Analysis timed out");
            metrics::record_analysis_failure(e.kind(), elapsed);
            return Err(e);
        }
    };

    metrics::record_analysis_success(&outcome.stats, elapsed);
    info!(
        request_id = %request_id,
        video = %video,
        frames = outcome.stats.frames_decoded,
        poses = ?outcome.summary.poses_detected,
        duration_ms = (elapsed * 1000.0) as u64,
        "Analysis complete"
    );

    Ok(Json(outcome.summary))
}
