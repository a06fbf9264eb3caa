use axum::{extract::State, Json};
use tracing::error;

use pipeline::wire::{GenerateScriptRequest, GenerateScriptResponse};

use crate::error::ApiError;
use crate::state::SharedState;

pub async fn generate_script(
    State(state): State<SharedState>,
    Json(req): Json<GenerateScriptRequest>,
) -> Result<Json<GenerateScriptResponse>, ApiError> {
    if req.image_base64.is_empty() {
        return Err(ApiError::bad_request("Image is required"));
    }

    let script = crate::gemini::generate_script(
        &state.http,
        &state.config.gemini_api_key,
        &req.image_base64,
    )
    .await
    .map_err(|e| {
        error!("script generation failed: {e:#}");
        ApiError::bad_gateway("Failed to generate script")
    })?;

    Ok(Json(GenerateScriptResponse { script }))
}
