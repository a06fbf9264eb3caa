//! Remote job client: typed access to the gateway's four operations.
//!
//! One request per call. No retry or polling lives here; provider errors are
//! surfaced verbatim in [`GenerationError::Remote`].

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::GenerationError;
use crate::job::GenerationJob;
use crate::progress;
use crate::wire::{
    ErrorBody, GenerateScriptRequest, GenerateScriptResponse, GenerateVideoRequest,
    GenerateVideoResponse, GenerateVoiceRequest, GenerateVoiceResponse, VideoStatusRequest,
    VideoStatusResponse,
};

#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Ask the script provider for a short script describing the image. An
    /// empty result is a usable empty string, not an error.
    async fn generate_script(&self, image_base64: &str) -> Result<String, GenerationError>;

    /// Synthesize speech for `text` with the given provider voice. Returns a
    /// playable audio asset URL (possibly a `data:` URL).
    async fn synthesize_voice(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<String, GenerationError>;

    /// Submit a lip-sync video job. Returns the provider-assigned job id
    /// immediately; completion is observed via [`Self::job_status`].
    async fn submit_video_job(
        &self,
        image_ref: &str,
        audio_ref: &str,
    ) -> Result<String, GenerationError>;

    /// Single read of the current job status.
    async fn job_status(&self, job_id: &str) -> Result<GenerationJob, GenerationError>;
}

/// [`RemoteApi`] over the gateway's HTTP surface.
pub struct HttpRemoteApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GenerationError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::Remote {
                status: None,
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            // Non-2xx responses carry {"error": "..."}; fall back to the
            // bare status when the body is not parseable.
            let message = match resp.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => format!("HTTP {status}"),
            };
            return Err(GenerationError::Remote {
                status: Some(status.as_u16()),
                message,
            });
        }

        resp.json::<T>().await.map_err(|e| GenerationError::Remote {
            status: None,
            message: format!("invalid response body: {e}"),
        })
    }
}

#[async_trait]
impl RemoteApi for HttpRemoteApi {
    async fn generate_script(&self, image_base64: &str) -> Result<String, GenerationError> {
        let resp: GenerateScriptResponse = self
            .post_json(
                "/api/generate-script",
                &GenerateScriptRequest {
                    image_base64: image_base64.to_string(),
                },
            )
            .await?;
        Ok(resp.script)
    }

    async fn synthesize_voice(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<String, GenerationError> {
        let resp: GenerateVoiceResponse = self
            .post_json(
                "/api/generate-voice",
                &GenerateVoiceRequest {
                    text: text.to_string(),
                    voice_id: voice_id.to_string(),
                },
            )
            .await?;
        Ok(resp.audio_url)
    }

    async fn submit_video_job(
        &self,
        image_ref: &str,
        audio_ref: &str,
    ) -> Result<String, GenerationError> {
        let resp: GenerateVideoResponse = self
            .post_json(
                "/api/generate-video",
                &GenerateVideoRequest {
                    image_url: image_ref.to_string(),
                    audio_url: audio_ref.to_string(),
                },
            )
            .await?;
        Ok(resp.prediction_id)
    }

    async fn job_status(&self, job_id: &str) -> Result<GenerationJob, GenerationError> {
        let resp: VideoStatusResponse = self
            .post_json(
                "/api/video-status",
                &VideoStatusRequest {
                    prediction_id: job_id.to_string(),
                },
            )
            .await?;

        Ok(GenerationJob {
            job_id: job_id.to_string(),
            status: resp.status,
            progress_percent: progress::percent_for(resp.status),
            result_url: resp.video_url,
            error_message: resp.error,
        })
    }
}
