use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::studio::Studio;
use crate::tools::{
    ClearGalleryRequest, DeleteImageRequest, GenerateImageRequest, GenerateStorySceneRequest,
    ListGalleryRequest, UpdateSettingsRequest,
};

#[derive(Clone)]
pub struct StudioServer {
    tool_router: ToolRouter<Self>,
    studio: Arc<Studio>,
}

impl StudioServer {
    pub fn new(studio: Arc<Studio>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            studio,
        }
    }
}

#[tool_router]
impl StudioServer {
    #[tool(
        description = "Create mode: generate one image from a description (Arabic supported). Generation can take a while. Saved to the gallery when auto-save is on"
    )]
    async fn generate_image(
        &self,
        Parameters(request): Parameters<GenerateImageRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::generate_image(&self.studio, Parameters(request)).await
    }

    #[tool(
        description = "Story mode: generate one scene that stays consistent with the story title, character and setting. Reuse the same character and setting for every scene of a story"
    )]
    async fn generate_story_scene(
        &self,
        Parameters(request): Parameters<GenerateStorySceneRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::generate_story_scene(&self.studio, Parameters(request)).await
    }

    #[tool(description = "List saved gallery images, newest first")]
    async fn list_gallery(
        &self,
        Parameters(request): Parameters<ListGalleryRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::list_gallery(&self.studio, Parameters(request)).await
    }

    #[tool(description = "Delete one gallery image by id")]
    async fn delete_image(
        &self,
        Parameters(request): Parameters<DeleteImageRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::delete_image(&self.studio, Parameters(request)).await
    }

    #[tool(
        description = "Delete every gallery image. Irreversible: ask the user to confirm first, then pass confirm=true"
    )]
    async fn clear_gallery(
        &self,
        Parameters(request): Parameters<ClearGalleryRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::clear_gallery(&self.studio, Parameters(request)).await
    }

    #[tool(description = "Read the current settings: theme, language, autoSave")]
    async fn get_settings(&self) -> Result<CallToolResult, McpError> {
        crate::tools::get_settings(&self.studio).await
    }

    #[tool(description = "Change theme (light/dark), language (ar/en) or autoSave")]
    async fn update_settings(
        &self,
        Parameters(request): Parameters<UpdateSettingsRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::update_settings(&self.studio, Parameters(request)).await
    }

    #[tool(description = "Switch the theme between light and dark")]
    async fn toggle_theme(&self) -> Result<CallToolResult, McpError> {
        crate::tools::toggle_theme(&self.studio).await
    }
}

#[tool_handler]
impl ServerHandler for StudioServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
