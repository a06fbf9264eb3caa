//! Request/response bodies of the gateway's HTTP surface.
//!
//! Shared between the client-side [`crate::api::HttpRemoteApi`] and the
//! gateway handlers so the two sides cannot drift. Field names follow the
//! JSON surface (`imageBase64`, `voiceId`, `predictionId`, ...).

use serde::{Deserialize, Serialize};

use crate::job::VideoJobState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScriptRequest {
    pub image_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScriptResponse {
    pub script: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVoiceRequest {
    pub text: String,
    pub voice_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVoiceResponse {
    pub audio_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoRequest {
    pub image_url: String,
    pub audio_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    pub prediction_id: String,
    pub status: VideoJobState,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatusRequest {
    pub prediction_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatusResponse {
    pub status: VideoJobState,
    pub progress: u8,
    pub message: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Every non-2xx gateway response carries this body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_match_the_json_surface() {
        let req = GenerateVoiceRequest {
            text: "Hello!".to_string(),
            voice_id: "v1".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["text"], "Hello!");
        assert_eq!(json["voiceId"], "v1");

        let status: VideoStatusResponse = serde_json::from_str(
            r#"{"status":"succeeded","progress":100,"message":"Video ready!","videoUrl":"v://final","error":null}"#,
        )
        .unwrap();
        assert_eq!(status.status, VideoJobState::Succeeded);
        assert_eq!(status.video_url.as_deref(), Some("v://final"));
    }
}
