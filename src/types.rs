use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visual style tag chosen by the user for a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageStyle {
    Realistic,
    Anime,
    Cinematic,
    Illustration,
    Simple,
    Abstract,
    Classic,
    Neon,
    Cyberpunk,
    OilPainting,
}

impl ImageStyle {
    pub const ALL: [ImageStyle; 10] = [
        ImageStyle::Realistic,
        ImageStyle::Anime,
        ImageStyle::Cinematic,
        ImageStyle::Illustration,
        ImageStyle::Simple,
        ImageStyle::Abstract,
        ImageStyle::Classic,
        ImageStyle::Neon,
        ImageStyle::Cyberpunk,
        ImageStyle::OilPainting,
    ];

    /// Arabic label shown on the style picker.
    pub fn label(self) -> &'static str {
        match self {
            ImageStyle::Realistic => "واقعي",
            ImageStyle::Anime => "أنمي",
            ImageStyle::Cinematic => "سينمائي",
            ImageStyle::Illustration => "رسم توضيحي",
            ImageStyle::Simple => "بسيط",
            ImageStyle::Abstract => "تجريدي",
            ImageStyle::Classic => "كلاسيكي",
            ImageStyle::Neon => "نيون",
            ImageStyle::Cyberpunk => "سايبربانك",
            ImageStyle::OilPainting => "رسم زيتي",
        }
    }

    /// English style hint appended to the provider prompt.
    pub fn provider_hint(self) -> &'static str {
        match self {
            ImageStyle::Realistic => "Photorealistic, highly detailed, 8k",
            ImageStyle::Anime => "Anime style, Japanese animation, vibrant",
            ImageStyle::Cinematic => "Cinematic lighting, movie scene, dramatic",
            ImageStyle::Illustration => "Digital illustration, artstation, smooth",
            ImageStyle::Simple => "Minimalist, simple lines, clean",
            ImageStyle::Abstract => "Abstract art, surreal, conceptual",
            ImageStyle::Classic => "Classic art, oil painting style, museum quality",
            ImageStyle::Neon => "Neon lights, cyberpunk, glowing, dark background",
            ImageStyle::Cyberpunk => "Cyberpunk, futuristic, high tech",
            ImageStyle::OilPainting => "Oil painting, textured, canvas",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ImageStyle::Realistic => "REALISTIC",
            ImageStyle::Anime => "ANIME",
            ImageStyle::Cinematic => "CINEMATIC",
            ImageStyle::Illustration => "ILLUSTRATION",
            ImageStyle::Simple => "SIMPLE",
            ImageStyle::Abstract => "ABSTRACT",
            ImageStyle::Classic => "CLASSIC",
            ImageStyle::Neon => "NEON",
            ImageStyle::Cyberpunk => "CYBERPUNK",
            ImageStyle::OilPainting => "OIL_PAINTING",
        }
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageStyle {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let normalized = trimmed.to_ascii_uppercase().replace(['-', ' '], "_");
        ImageStyle::ALL
            .into_iter()
            .find(|style| style.name() == normalized || style.label() == trimmed)
            .ok_or_else(|| format!("unknown style: {trimmed}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:5")]
    FourFive,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::FourFive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::FourFive => "4:5",
        }
    }

    fn name(self) -> &'static str {
        match self {
            AspectRatio::Square => "SQUARE",
            AspectRatio::Landscape => "LANDSCAPE",
            AspectRatio::Portrait => "PORTRAIT",
            AspectRatio::FourFive => "FOUR_FIVE",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let normalized = trimmed.to_ascii_uppercase().replace(['-', ' '], "_");
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == trimmed || ratio.name() == normalized)
            .ok_or_else(|| format!("unknown aspect ratio: {trimmed}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Standard,
    High,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Standard => "standard",
            Quality::High => "high",
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Quality::Standard),
            "high" => Ok(Quality::High),
            other => Err(format!("unknown quality: {other}")),
        }
    }
}

/// Which authoring mode produced an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Create,
    Story,
}

impl ImageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageKind::Create => "create",
            ImageKind::Story => "story",
        }
    }

    /// Form defaults for a fresh request in this mode.
    pub fn defaults(self) -> (ImageStyle, AspectRatio, Quality) {
        match self {
            ImageKind::Create => (ImageStyle::Realistic, AspectRatio::Square, Quality::Standard),
            ImageKind::Story => (ImageStyle::Cinematic, AspectRatio::Landscape, Quality::High),
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(ImageKind::Create),
            "story" => Ok(ImageKind::Story),
            other => Err(format!("unknown image type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub style: ImageStyle,
    pub aspect_ratio: AspectRatio,
    pub quality: Quality,
}

impl GenerationRequest {
    /// Request pre-filled with the form defaults of `kind`.
    pub fn for_mode(kind: ImageKind, prompt: impl Into<String>) -> Self {
        let (style, aspect_ratio, quality) = kind.defaults();
        Self {
            prompt: prompt.into(),
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

    pub fn is_blank(&self) -> bool {
        self.prompt.trim().is_empty()
    }
}
