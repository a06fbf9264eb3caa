use axum::{extract::State, Json};

use pipeline::wire::{GenerateVoiceRequest, GenerateVoiceResponse};

use crate::error::ApiError;
use crate::state::SharedState;

pub async fn generate_voice(
    State(state): State<SharedState>,
    Json(req): Json<GenerateVoiceRequest>,
) -> Result<Json<GenerateVoiceResponse>, ApiError> {
    if req.text.is_empty() || req.voice_id.is_empty() {
        return Err(ApiError::bad_request("Text and voiceId are required"));
    }

    let audio_url = crate::elevenlabs::synthesize(
        &state.http,
        &state.config.elevenlabs_api_key,
        &req.text,
        &req.voice_id,
    )
    .await?;

    Ok(Json(GenerateVoiceResponse { audio_url }))
}
