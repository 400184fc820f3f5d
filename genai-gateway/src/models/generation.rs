use std::fmt;
use std::str::FromStr;

/// Default model for the image endpoint.
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";

/// Default completion budget for the text endpoint.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Output sizes accepted by the image endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    S256,
    S512,
    #[default]
    S1024,
    Landscape,
    Portrait,
}

impl ImageSize {
    pub const ALL: [ImageSize; 5] = [
        ImageSize::S256,
        ImageSize::S512,
        ImageSize::S1024,
        ImageSize::Landscape,
        ImageSize::Portrait,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::S256 => "256x256",
            ImageSize::S512 => "512x512",
            ImageSize::S1024 => "1024x1024",
            ImageSize::Landscape => "1792x1024",
            ImageSize::Portrait => "1024x1792",
        }
    }

    /// Comma separated list used in validation messages.
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(ImageSize::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for ImageSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chat models accepted by the text endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextModel {
    Gpt4,
    Gpt4Turbo,
    Gpt35Turbo,
    #[default]
    Gpt4o,
}

impl TextModel {
    pub const ALL: [TextModel; 4] = [
        TextModel::Gpt4,
        TextModel::Gpt4Turbo,
        TextModel::Gpt35Turbo,
        TextModel::Gpt4o,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextModel::Gpt4 => "gpt-4",
            TextModel::Gpt4Turbo => "gpt-4-turbo",
            TextModel::Gpt35Turbo => "gpt-3.5-turbo",
            TextModel::Gpt4o => "gpt-4o",
        }
    }

    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(TextModel::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Model to use once an image is attached. gpt-4 and gpt-4-turbo cannot read
    /// images and are upgraded; gpt-3.5-turbo is passed through unchanged.
    pub fn with_vision(self) -> Self {
        match self {
            TextModel::Gpt4 | TextModel::Gpt4Turbo => TextModel::Gpt4o,
            other => other,
        }
    }
}

impl FromStr for TextModel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for TextModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an image model delivers its output. Chosen once per request from the model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageModelKind {
    /// Base64 payload in the response body, persisted locally (gpt-image-1 and any unknown model).
    InlineBase64,
    /// Upstream-hosted URL returned as-is (dall-e-3).
    HostedUrl,
}

impl ImageModelKind {
    pub fn for_model(model: &str) -> Self {
        match model {
            "dall-e-3" => ImageModelKind::HostedUrl,
            _ => ImageModelKind::InlineBase64,
        }
    }
}

/// Validated image generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: ImageSize,
    pub model: String,
}

impl ImageRequest {
    pub fn kind(&self) -> ImageModelKind {
        ImageModelKind::for_model(&self.model)
    }
}

/// How an attached image reaches the upstream model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// Remote http(s) URL forwarded verbatim.
    Remote(String),
    /// Local file embedded as a `data:<mime>;base64,<payload>` URL.
    Inline(String),
}

impl ImageReference {
    pub fn url(&self) -> &str {
        match self {
            ImageReference::Remote(url) | ImageReference::Inline(url) => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// The `image_url` exactly as the caller sent it; echoed in the response.
    pub original: String,
    pub reference: ImageReference,
}

/// Validated text generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub model: TextModel,
    pub image: Option<ImageAttachment>,
}

impl TextRequest {
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}
