//! Script provider client (Gemini `generateContent`).

use anyhow::Result;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const SCRIPT_MODEL: &str = "gemini-2.0-flash";

const SCRIPT_PROMPT: &str = "Analyze this image and generate a short, funny script (2-3 sentences, max 150 characters) for what the subject in the photo might say.\n\nIf it's a pet, make it humorous and relatable (like complaining about food or wanting attention).\nIf it's a person, make it lighthearted and fun.\n\nJust respond with the script text only, no quotes or attribution.";

/// Ask the vision model for a short script about the image. An empty model
/// answer is returned as an empty string, not an error.
pub async fn generate_script(
    client: &reqwest::Client,
    api_key: &str,
    image_base64: &str,
) -> Result<String> {
    let body = serde_json::json!({
        "contents": [{
            "parts": [
                { "inline_data": { "mime_type": "image/jpeg", "data": image_base64 } },
                { "text": SCRIPT_PROMPT }
            ]
        }]
    });

    let url = format!("{GEMINI_API_URL}/{SCRIPT_MODEL}:generateContent");
    let resp = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        anyhow::bail!(
            "script provider error: {} - {}",
            resp.status(),
            resp.text().await?
        );
    }

    let json: serde_json::Value = resp.json().await?;
    let text = json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .unwrap_or("")
        .trim()
        .to_string();
    Ok(text)
}
