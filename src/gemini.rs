use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::generator::ImageGenerator;
use crate::types::{GenerationRequest, ImageStyle, Quality};

pub const GEMINI_API_ROOT: &str = "https://generativelanguage.googleapis.com";
const STANDARD_MODEL: &str = "gemini-2.5-flash-image";
const HIGH_QUALITY_MODEL: &str = "gemini-3-pro-image-preview";
const DEFAULT_MIME_TYPE: &str = "image/png";

pub fn model_for(quality: Quality) -> &'static str {
    match quality {
        Quality::Standard => STANDARD_MODEL,
        Quality::High => HIGH_QUALITY_MODEL,
    }
}

pub fn build_provider_prompt(prompt: &str, style: ImageStyle) -> String {
    format!(
        "Generate an image with the following description: \"{prompt}\".\n\
Style: {}.\n\
Ensure high quality, detailed, and visually appealing results.",
        style.provider_hint()
    )
}

async fn assert_ok_response(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    Err(anyhow!("Gemini request failed: {status} {text}"))
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: Option<String>,
}

#[derive(Clone, Debug)]
pub struct GeminiImageGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiImageGenerator {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let model = model_for(request.quality);
        let body = json!({
            "contents": [
                {"parts": [{"text": build_provider_prompt(&request.prompt, request.style)}]}
            ],
            "generationConfig": {
                "imageConfig": {"aspectRatio": request.aspect_ratio.as_str()}
            }
        });

        debug!(model, aspect_ratio = %request.aspect_ratio, style = %request.style, "requesting image");

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        debug!(status = %response.status(), "image response received");

        let response = assert_ok_response(response).await?;
        let payload: GenerateContentResponse = response.json().await?;
        if let Some(error) = payload.error.and_then(|err| err.message) {
            return Err(anyhow!("Gemini returned an error: {error}"));
        }
        let inline = payload
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts)
            .and_then(|parts| parts.into_iter().find_map(|part| part.inline_data))
            .ok_or_else(|| anyhow!("No image data found in response"))?;

        let mime_type = inline
            .mime_type
            .filter(|value| value.starts_with("image/"))
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        Ok(format!("data:{mime_type};base64,{}", inline.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_selects_model() {
        assert_eq!(model_for(Quality::Standard), "gemini-2.5-flash-image");
        assert_eq!(model_for(Quality::High), "gemini-3-pro-image-preview");
    }

    #[test]
    fn provider_prompt_embeds_description_and_style_hint() {
        let prompt = build_provider_prompt("غابة سحرية عند الفجر", ImageStyle::Neon);
        assert!(prompt.starts_with("Generate an image with the following description: \"غابة سحرية عند الفجر\"."));
        assert!(prompt.contains("Style: Neon lights, cyberpunk, glowing, dark background."));
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let generator =
            GeminiImageGenerator::new("k", "http://localhost:9999/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            generator.endpoint("gemini-2.5-flash-image"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }
}
