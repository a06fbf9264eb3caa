//! Speech provider client (ElevenLabs text-to-speech).

use axum::http::StatusCode;
use base64::Engine;
use tracing::error;

use crate::error::ApiError;

const ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";
const TTS_MODEL_ID: &str = "eleven_turbo_v2_5";

/// Synthesize `text` with the given voice and hand the audio back inline as
/// a `data:audio/mpeg` URL. Provider failures keep the provider's HTTP
/// status so the caller can tell quota errors from bad voice ids.
pub async fn synthesize(
    client: &reqwest::Client,
    api_key: &str,
    text: &str,
    voice_id: &str,
) -> Result<String, ApiError> {
    let body = serde_json::json!({
        "text": text,
        "model_id": TTS_MODEL_ID,
        "voice_settings": {
            "stability": 0.5,
            "similarity_boost": 0.75
        }
    });

    let resp = client
        .post(format!("{ELEVENLABS_API_URL}/{voice_id}"))
        .header("Accept", "audio/mpeg")
        .header("xi-api-key", api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| ApiError::bad_gateway(format!("speech provider request failed: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let detail = resp.text().await.unwrap_or_default();
        error!(status = %status, "speech provider error: {detail}");
        return Err(ApiError::with_status(
            StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
            "Failed to generate audio",
        ));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ApiError::bad_gateway(format!("failed to read audio body: {e}")))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:audio/mpeg;base64,{encoded}"))
}
