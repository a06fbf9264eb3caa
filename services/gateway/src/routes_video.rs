use axum::{extract::State, Json};
use tracing::{error, info};

use pipeline::progress;
use pipeline::wire::{
    GenerateVideoRequest, GenerateVideoResponse, VideoStatusRequest, VideoStatusResponse,
};
use pipeline::VideoJobState;

use crate::error::ApiError;
use crate::replicate;
use crate::state::SharedState;

/// Submit a lip-sync job. Returns as soon as the provider has accepted it;
/// callers observe completion through `video_status`.
pub async fn generate_video(
    State(state): State<SharedState>,
    Json(req): Json<GenerateVideoRequest>,
) -> Result<Json<GenerateVideoResponse>, ApiError> {
    if req.image_url.is_empty() || req.audio_url.is_empty() {
        return Err(ApiError::bad_request("Image URL and audio URL are required"));
    }

    // The provider cannot fetch inline media; upload data URLs first to get
    // a reference it accepts.
    let image_ref = resolve_media_ref(&state, &req.image_url).await?;
    let audio_ref = resolve_media_ref(&state, &req.audio_url).await?;

    let prediction = replicate::create_prediction(
        &state.http,
        &state.config.replicate_api_token,
        &state.config.video_model_version,
        &image_ref,
        &audio_ref,
    )
    .await
    .map_err(|e| {
        error!("video job submission failed: {e:#}");
        ApiError::bad_gateway("Failed to start video generation")
    })?;

    info!(prediction_id = %prediction.id, status = %prediction.status, "video job submitted");

    let message = progress::message_for(prediction.status, None);
    Ok(Json(GenerateVideoResponse {
        prediction_id: prediction.id,
        status: prediction.status,
        message,
    }))
}

async fn resolve_media_ref(state: &SharedState, url: &str) -> Result<String, ApiError> {
    if !url.starts_with("data:") {
        return Ok(url.to_string());
    }
    replicate::upload_data_url(&state.http, &state.config.replicate_api_token, url)
        .await
        .map_err(|e| {
            error!("media upload failed: {e:#}");
            ApiError::bad_gateway("Failed to upload media")
        })
}

pub async fn video_status(
    State(state): State<SharedState>,
    Json(req): Json<VideoStatusRequest>,
) -> Result<Json<VideoStatusResponse>, ApiError> {
    if req.prediction_id.is_empty() {
        return Err(ApiError::bad_request("Prediction ID is required"));
    }

    let prediction = replicate::get_prediction(
        &state.http,
        &state.config.replicate_api_token,
        &req.prediction_id,
    )
    .await
    .map_err(|e| {
        error!("status check failed: {e:#}");
        ApiError::bad_gateway("Failed to check status")
    })?;

    info!(prediction_id = %req.prediction_id, status = %prediction.status, "status check");

    let video_url = match (&prediction.status, &prediction.output) {
        (VideoJobState::Succeeded, Some(output)) => replicate::video_url_from_output(output),
        _ => None,
    };
    let error = match prediction.status {
        VideoJobState::Failed | VideoJobState::Canceled => prediction.error.clone(),
        _ => None,
    };

    Ok(Json(VideoStatusResponse {
        status: prediction.status,
        progress: progress::percent_for(prediction.status),
        message: progress::message_for(prediction.status, prediction.error.as_deref()),
        video_url,
        error,
    }))
}
