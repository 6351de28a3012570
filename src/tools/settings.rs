use anyhow::Result;
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    settings::{Language, Theme},
    studio::Studio,
    tools::{json_result, parse_or, storage_error},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateSettingsRequest {
    #[schemars(description = "light or dark")]
    pub theme: Option<String>,
    #[schemars(description = "ar or en")]
    pub language: Option<String>,
    #[schemars(description = "Save successful generations to the gallery automatically")]
    pub auto_save: Option<bool>,
}

pub async fn get_settings(studio: &Studio) -> Result<CallToolResult, McpError> {
    json_result(&studio.settings().await)
}

pub async fn update_settings(
    studio: &Studio,
    Parameters(request): Parameters<UpdateSettingsRequest>,
) -> Result<CallToolResult, McpError> {
    let current = studio.settings().await;
    let theme: Theme = parse_or(request.theme.as_deref(), current.theme, "theme")?;
    let language: Language = parse_or(request.language.as_deref(), current.language, "language")?;
    let auto_save = request.auto_save.unwrap_or(current.auto_save);
    let updated = studio
        .update_settings(|settings| {
            settings.theme = theme;
            settings.language = language;
            settings.auto_save = auto_save;
        })
        .await
        .map_err(storage_error)?;
    json_result(&updated)
}

/// Flips between light and dark, like the header toggle.
pub async fn toggle_theme(studio: &Studio) -> Result<CallToolResult, McpError> {
    let updated = studio.toggle_theme().await.map_err(storage_error)?;
    json_result(&updated)
}
