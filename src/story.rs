use crate::types::{AspectRatio, GenerationRequest, ImageKind, ImageStyle, Quality};

const DEFAULT_STORY_TITLE: &str = "قصة";
const CONSISTENCY_INSTRUCTION: &str =
    "Create a consistent scene matching the character and setting described above.";

/// One scene of a story, together with the story-wide context it must stay
/// consistent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryScene {
    pub title: String,
    pub character: String,
    pub setting: String,
    pub scene: String,
    pub style: ImageStyle,
    pub aspect_ratio: AspectRatio,
    pub quality: Quality,
}

impl StoryScene {
    pub fn new(
        title: impl Into<String>,
        character: impl Into<String>,
        setting: impl Into<String>,
        scene: impl Into<String>,
    ) -> Self {
        let (style, aspect_ratio, quality) = ImageKind::Story.defaults();
        Self {
            title: title.into(),
            character: character.into(),
            setting: setting.into(),
            scene: scene.into(),
            style,
            aspect_ratio,
            quality,
        }
    }

    pub fn with_style(mut self, style: ImageStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Only the scene action is required; title, character and setting may be empty.
    pub fn is_blank(&self) -> bool {
        self.scene.trim().is_empty()
    }

    /// Prompt sent to the generator. Pure: equal inputs give byte-identical output.
    pub fn compose_prompt(&self) -> String {
        format!(
            "Story Title: {}\nCharacter Description: {}\nSetting/Environment: {}\nScene Action: {}\n\n{CONSISTENCY_INSTRUCTION}",
            self.title, self.character, self.setting, self.scene
        )
    }

    /// Text recorded in the gallery: `[title] scene`.
    pub fn gallery_prompt(&self) -> String {
        let title = self.title.trim();
        let title = if title.is_empty() { DEFAULT_STORY_TITLE } else { title };
        format!("[{title}] {}", self.scene)
    }

    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            prompt: self.compose_prompt(),
            style: self.style,
            aspect_ratio: self.aspect_ratio,
            quality: self.quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> StoryScene {
        StoryScene::new(
            "رحلة القمر",
            "فتاة بشعر أحمر ومعطف أزرق",
            "غابة مضاءة بالفوانيس ليلاً",
            "تكتشف بابًا سريًا في جذع شجرة",
        )
    }

    #[test]
    fn composition_is_deterministic() {
        assert_eq!(scene().compose_prompt(), scene().compose_prompt());
    }

    #[test]
    fn composition_orders_labelled_sections() {
        let prompt = scene().compose_prompt();
        let title = prompt.find("Story Title: رحلة القمر").unwrap();
        let character = prompt.find("Character Description: ").unwrap();
        let setting = prompt.find("Setting/Environment: ").unwrap();
        let action = prompt.find("Scene Action: ").unwrap();
        assert!(title < character && character < setting && setting < action);
        assert!(prompt.ends_with(CONSISTENCY_INSTRUCTION));
    }

    #[test]
    fn gallery_prompt_falls_back_to_default_title() {
        let mut untitled = scene();
        untitled.title = "  ".to_string();
        assert_eq!(untitled.gallery_prompt(), "[قصة] تكتشف بابًا سريًا في جذع شجرة");
        assert_eq!(scene().gallery_prompt(), "[رحلة القمر] تكتشف بابًا سريًا في جذع شجرة");
    }

    #[test]
    fn request_carries_story_defaults() {
        let request = scene().to_request();
        assert_eq!(request.style, ImageStyle::Cinematic);
        assert_eq!(request.aspect_ratio, AspectRatio::Landscape);
        assert_eq!(request.quality, Quality::High);
        assert_eq!(request.prompt, scene().compose_prompt());
    }
}
