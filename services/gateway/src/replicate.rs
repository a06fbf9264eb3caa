//! Video-synthesis provider client (Replicate predictions API).

use anyhow::{Context, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pipeline::VideoJobState;

const REPLICATE_API_URL: &str = "https://api.replicate.com/v1";

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    source_image: &'a str,
    driven_audio: &'a str,
    /// Face enhancement
    enhancer: &'a str,
    /// Crop the face out of the source image
    preprocess: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: VideoJobState,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Start a lip-sync prediction. Returns immediately; completion is observed
/// via [`get_prediction`].
pub async fn create_prediction(
    client: &reqwest::Client,
    api_token: &str,
    version: &str,
    image_url: &str,
    audio_url: &str,
) -> Result<Prediction> {
    let model_version = version
        .split_once(':')
        .map(|(_, v)| v)
        .unwrap_or(version);
    let request = PredictionRequest {
        version: model_version,
        input: PredictionInput {
            source_image: image_url,
            driven_audio: audio_url,
            enhancer: "gfpgan",
            preprocess: "crop",
        },
    };

    let response = client
        .post(format!("{REPLICATE_API_URL}/predictions"))
        .header("Authorization", format!("Bearer {api_token}"))
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        anyhow::bail!(
            "Replicate API error: {} - {}",
            response.status(),
            response.text().await?
        );
    }

    Ok(response.json().await?)
}

/// Single read of the current prediction status.
pub async fn get_prediction(
    client: &reqwest::Client,
    api_token: &str,
    prediction_id: &str,
) -> Result<Prediction> {
    let response = client
        .get(format!("{REPLICATE_API_URL}/predictions/{prediction_id}"))
        .header("Authorization", format!("Bearer {api_token}"))
        .send()
        .await?;

    if !response.status().is_success() {
        anyhow::bail!(
            "Failed to get prediction: {} - {}",
            response.status(),
            response.text().await?
        );
    }

    Ok(response.json().await?)
}

/// Verify the API token against the account endpoint.
pub async fn check_account(client: &reqwest::Client, api_token: &str) -> Result<()> {
    client
        .get(format!("{REPLICATE_API_URL}/account"))
        .header("Authorization", format!("Bearer {api_token}"))
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

/// Upload inline `data:` media to the files endpoint and return a serving
/// URL the prediction input can reference.
pub async fn upload_data_url(
    client: &reqwest::Client,
    api_token: &str,
    data_url: &str,
) -> Result<String> {
    let (mime_type, payload) = split_data_url(data_url)?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .context("invalid base64 payload in data URL")?;

    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name("asset")
        .mime_str(&mime_type)?;
    let form = reqwest::multipart::Form::new().part("content", part);

    let response = client
        .post(format!("{REPLICATE_API_URL}/files"))
        .header("Authorization", format!("Bearer {api_token}"))
        .multipart(form)
        .send()
        .await?;

    if !response.status().is_success() {
        anyhow::bail!(
            "File upload failed: {} - {}",
            response.status(),
            response.text().await?
        );
    }

    let json: Value = response.json().await?;
    json["urls"]["get"]
        .as_str()
        .map(str::to_string)
        .context("no serving URL in upload response")
}

fn split_data_url(data_url: &str) -> Result<(String, &str)> {
    let rest = data_url
        .strip_prefix("data:")
        .context("not a data URL")?;
    let (meta, payload) = rest
        .split_once(',')
        .context("malformed data URL: missing payload")?;
    let mime_type = meta
        .strip_suffix(";base64")
        .context("only base64 data URLs are supported")?;
    Ok((mime_type.to_string(), payload))
}

/// Normalize the provider's output shape into a single video URL. Depending
/// on the model this is a bare URL, an array of URLs, or an object with a
/// `video` key (AniPortrait returns `{ video, pose }`).
pub fn video_url_from_output(output: &Value) -> Option<String> {
    match output {
        Value::String(url) => Some(url.clone()),
        Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
        Value::Object(map) => map.get("video").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}
