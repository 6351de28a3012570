use anyhow::Result;
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::{Deserialize, Serialize};

use crate::{
    gallery::SavedImage,
    studio::Studio,
    tools::{json_result, storage_error},
    types::{AspectRatio, ImageKind},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListGalleryRequest {
    #[schemars(description = "Maximum number of images to return, newest first. Default 10")]
    pub limit: Option<u32>,
    #[schemars(description = "Filter by type: create, story or all (default)")]
    pub image_type: Option<String>,
    #[schemars(description = "Include the full image reference (may be a large data URL). Default false")]
    pub include_urls: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteImageRequest {
    #[schemars(description = "Id of the gallery image to delete")]
    pub id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClearGalleryRequest {
    #[schemars(description = "Must be true: the user confirmed that every saved image will be deleted")]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GalleryEntry {
    id: String,
    prompt: String,
    timestamp: i64,
    created_at: Option<String>,
    #[serde(rename = "type")]
    kind: ImageKind,
    aspect_ratio: Option<AspectRatio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl GalleryEntry {
    fn from_image(image: SavedImage, include_url: bool) -> Self {
        Self {
            created_at: image.created_at().map(|at| at.to_rfc3339()),
            id: image.id,
            prompt: image.prompt,
            timestamp: image.timestamp,
            kind: image.kind,
            aspect_ratio: image.aspect_ratio,
            url: include_url.then_some(image.url),
        }
    }
}

pub async fn list_gallery(
    studio: &Studio,
    Parameters(request): Parameters<ListGalleryRequest>,
) -> Result<CallToolResult, McpError> {
    let limit = request.limit.unwrap_or(10).max(1) as usize;
    let kind = match request.image_type.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(raw.parse::<ImageKind>().map_err(|_| {
            McpError::invalid_params("image_type only supports create, story or all", None)
        })?),
    };
    let include_urls = request.include_urls.unwrap_or(false);
    let entries: Vec<GalleryEntry> = studio
        .images()
        .await
        .into_iter()
        .filter(|image| kind.is_none_or(|kind| image.kind == kind))
        .take(limit)
        .map(|image| GalleryEntry::from_image(image, include_urls))
        .collect();
    json_result(&entries)
}

pub async fn delete_image(
    studio: &Studio,
    Parameters(request): Parameters<DeleteImageRequest>,
) -> Result<CallToolResult, McpError> {
    let deleted = studio
        .delete_image(request.id.trim())
        .await
        .map_err(storage_error)?;
    json_result(&serde_json::json!({ "id": request.id, "deleted": deleted }))
}

pub async fn clear_gallery(
    studio: &Studio,
    Parameters(request): Parameters<ClearGalleryRequest>,
) -> Result<CallToolResult, McpError> {
    if !request.confirm {
        return Err(McpError::invalid_params(
            "clearing the gallery needs confirm=true",
            None,
        ));
    }
    studio.clear_history().await.map_err(storage_error)?;
    json_result(&serde_json::json!({ "cleared": true }))
}
