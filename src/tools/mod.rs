pub mod gallery;
pub mod generate_image;
pub mod generate_story_scene;
pub mod settings;

use std::str::FromStr;

use rmcp::{ErrorData as McpError, model::{CallToolResult, Content}};
use serde::Serialize;

use crate::controller::GenerationError;
use crate::studio::{Generated, SaveStatus, Studio};
use crate::types::ImageKind;

#[derive(Serialize)]
pub struct ToolResponse {
    pub url: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

pub use gallery::{
    ClearGalleryRequest, DeleteImageRequest, ListGalleryRequest, clear_gallery, delete_image,
    list_gallery,
};
pub use generate_image::{GenerateImageRequest, generate_image};
pub use generate_story_scene::{GenerateStorySceneRequest, generate_story_scene};
pub use settings::{UpdateSettingsRequest, get_settings, toggle_theme, update_settings};

pub(crate) fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string(value).map_err(|err| {
        McpError::internal_error(
            "serialize tool response failed",
            Some(serde_json::Value::String(err.to_string())),
        )
    })?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Parses an optional tool argument, falling back to `default` when absent or blank.
pub(crate) fn parse_or<T>(raw: Option<&str>, default: T, field: &str) -> Result<T, McpError>
where
    T: FromStr<Err = String>,
{
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value.parse::<T>().map_err(|err| {
            McpError::invalid_params(
                format!("{field} is invalid"),
                Some(serde_json::Value::String(err)),
            )
        }),
        None => Ok(default),
    }
}

pub(crate) fn storage_error(err: crate::storage::StorageError) -> McpError {
    McpError::internal_error(
        "gallery storage failed",
        Some(serde_json::Value::String(err.to_string())),
    )
}

/// Converts a finished generation into the tool result shown to the client.
pub(crate) async fn generation_result(
    studio: &Studio,
    kind: ImageKind,
    result: Result<Generated, GenerationError>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(Generated { image_url, save }) => {
            let text = match save {
                SaveStatus::Saved => "Image generated and saved to the gallery.",
                SaveStatus::Skipped => "Image generated. Auto-save is off, so it was not saved.",
                SaveStatus::Failed => "Image generated, but saving it to the gallery failed.",
            };
            let response = ToolResponse {
                mime_type: declared_mime_type(&image_url),
                url: image_url,
                name: format!("{kind}-image"),
                text: text.to_string(),
            };
            json_result(&response)
        }
        Err(GenerationError::EmptyInput) => Ok(CallToolResult::success(vec![Content::text(
            "Nothing to generate: the description is empty.",
        )])),
        Err(GenerationError::ConcurrentSubmission) => Err(McpError::invalid_request(
            "a generation is already running for this mode",
            None,
        )),
        Err(GenerationError::RemoteGenerationFailure(detail)) => {
            let notice = studio
                .last_notice(kind)
                .unwrap_or_else(|| "image generation failed".to_string());
            Err(McpError::internal_error(
                notice,
                Some(serde_json::Value::String(detail)),
            ))
        }
    }
}

fn declared_mime_type(url: &str) -> String {
    url.strip_prefix("data:")
        .and_then(|rest| rest.split([';', ',']).next())
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or("image/png")
        .to_string()
}
