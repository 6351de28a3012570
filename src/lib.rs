pub mod config;
pub mod controller;
pub mod gallery;
pub mod gemini;
pub mod generator;
pub mod image_processing;
pub mod mcp_server;
pub mod settings;
pub mod storage;
pub mod story;
pub mod studio;
pub mod tools;
pub mod types;
pub mod web_routes;

pub use controller::{
    CompletionHandler, GenerationCompleted, GenerationController, GenerationError,
    GenerationOutcome, GenerationState,
};
pub use gallery::{GalleryStore, SavedImage};
pub use generator::ImageGenerator;
pub use settings::{AppSettings, Language, SettingsStore, Theme};
pub use story::StoryScene;
pub use studio::{Generated, SaveStatus, Studio};
pub use types::{AspectRatio, GenerationRequest, ImageKind, ImageStyle, Quality};
