use anyhow::Result;
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    studio::Studio,
    tools::{generation_result, parse_or},
    types::{GenerationRequest, ImageKind},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateImageRequest {
    #[schemars(description = "Description of the image, Arabic or English")]
    pub prompt: String,
    #[schemars(description = "Style: REALISTIC, ANIME, CINEMATIC, ILLUSTRATION, SIMPLE, ABSTRACT, CLASSIC, NEON, CYBERPUNK, OIL_PAINTING (or the Arabic label). Default REALISTIC")]
    pub style: Option<String>,
    #[schemars(description = "Aspect ratio: 1:1, 16:9, 9:16, 4:5. Default 1:1")]
    pub aspect_ratio: Option<String>,
    #[schemars(description = "Quality: standard or high. Default standard")]
    pub quality: Option<String>,
}

pub async fn generate_image(
    studio: &Studio,
    Parameters(request): Parameters<GenerateImageRequest>,
) -> Result<CallToolResult, McpError> {
    let defaults = GenerationRequest::for_mode(ImageKind::Create, request.prompt);
    let generation = GenerationRequest {
        style: parse_or(request.style.as_deref(), defaults.style, "style")?,
        aspect_ratio: parse_or(request.aspect_ratio.as_deref(), defaults.aspect_ratio, "aspect_ratio")?,
        quality: parse_or(request.quality.as_deref(), defaults.quality, "quality")?,
        ..defaults
    };
    let result = studio.generate(generation).await;
    generation_result(studio, ImageKind::Create, result).await
}
