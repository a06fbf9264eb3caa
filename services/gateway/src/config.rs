use anyhow::{bail, Context, Result};

/// SadTalker lip-sync model on Replicate, overridable via env.
const DEFAULT_VIDEO_MODEL_VERSION: &str =
    "cjwbw/sadtalker:3aa3dac9353cc4d6bd62a8f95957bd844003b401ca4e4a9b33baa574c549d376";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub replicate_api_token: String,
    pub elevenlabs_api_key: String,
    pub gemini_api_key: String,
    pub video_model_version: String,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let replicate_api_token = get("REPLICATE_API_TOKEN")?;
        let elevenlabs_api_key = get("ELEVENLABS_API_KEY")?;
        let gemini_api_key = get("GEMINI_API_KEY")?;
        let video_model_version = std::env::var("VIDEO_MODEL_VERSION")
            .unwrap_or_else(|_| DEFAULT_VIDEO_MODEL_VERSION.to_string());
        let bind_addr =
            std::env::var("GATEWAY_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // Tiny sanity checks (fail fast, fail loud)
        if replicate_api_token.trim().is_empty() {
            bail!("REPLICATE_API_TOKEN must not be empty");
        }
        if !video_model_version.contains(':') {
            bail!("VIDEO_MODEL_VERSION must be of the form owner/model:version");
        }

        Ok(Self {
            replicate_api_token,
            elevenlabs_api_key,
            gemini_api_key,
            video_model_version,
            bind_addr,
        })
    }
}

fn get(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Missing required env var: {key}"))
}
