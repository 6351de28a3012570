use anyhow::Result;
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    story::StoryScene,
    studio::Studio,
    tools::{generation_result, parse_or},
    types::ImageKind,
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateStorySceneRequest {
    #[schemars(description = "Story title")]
    pub title: Option<String>,
    #[schemars(description = "Main character: appearance, clothes, hair, features. Kept constant across scenes")]
    pub character: Option<String>,
    #[schemars(description = "Setting: place, lighting, time of day, weather, mood. Kept constant across scenes")]
    pub setting: Option<String>,
    #[schemars(description = "What happens in this scene")]
    pub scene: String,
    #[schemars(description = "Style name or Arabic label. Default CINEMATIC")]
    pub style: Option<String>,
    #[schemars(description = "Aspect ratio: 1:1, 16:9, 9:16, 4:5. Default 16:9")]
    pub aspect_ratio: Option<String>,
    #[schemars(description = "Quality: standard or high. Default high")]
    pub quality: Option<String>,
}

pub async fn generate_story_scene(
    studio: &Studio,
    Parameters(request): Parameters<GenerateStorySceneRequest>,
) -> Result<CallToolResult, McpError> {
    let scene = StoryScene::new(
        request.title.unwrap_or_default(),
        request.character.unwrap_or_default(),
        request.setting.unwrap_or_default(),
        request.scene,
    );
    let scene = StoryScene {
        style: parse_or(request.style.as_deref(), scene.style, "style")?,
        aspect_ratio: parse_or(request.aspect_ratio.as_deref(), scene.aspect_ratio, "aspect_ratio")?,
        quality: parse_or(request.quality.as_deref(), scene.quality, "quality")?,
        ..scene
    };
    let result = studio.generate_scene(&scene).await;
    generation_result(studio, ImageKind::Story, result).await
}
