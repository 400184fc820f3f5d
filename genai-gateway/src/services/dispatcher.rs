//! Upstream dispatch: shapes provider parameters from a validated request and
//! issues exactly one call.

use crate::models::{ImageModelKind, ImageRequest, TextRequest};
use crate::services::providers::{
    ChatCompletionParams, ChatCompletionResponse, ChatMessage, ContentPart, GenerationProvider,
    ImageGenerationParams, ImageUrl, ImagesResponse, MessageContent, ProviderError,
};

pub const CHAT_TEMPERATURE: f32 = 0.7;

impl ImageModelKind {
    /// Provider parameters for this delivery strategy.
    pub fn build_params(&self, request: &ImageRequest) -> ImageGenerationParams {
        match self {
            ImageModelKind::InlineBase64 => ImageGenerationParams {
                model: request.model.clone(),
                prompt: request.prompt.clone(),
                size: request.size.as_str().to_string(),
                quality: "medium".to_string(),
                n: None,
                response_format: None,
            },
            ImageModelKind::HostedUrl => ImageGenerationParams {
                model: request.model.clone(),
                prompt: request.prompt.clone(),
                size: request.size.as_str().to_string(),
                quality: "standard".to_string(),
                n: Some(1),
                response_format: Some("url".to_string()),
            },
        }
    }
}

/// Single user message: plain text, or text plus image reference.
pub fn build_chat_params(request: &TextRequest) -> ChatCompletionParams {
    let content = match &request.image {
        None => MessageContent::Text(request.prompt.clone()),
        Some(image) => MessageContent::Parts(vec![
            ContentPart::Text {
                text: request.prompt.clone(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image.reference.url().to_string(),
                },
            },
        ]),
    };

    ChatCompletionParams {
        model: request.model.as_str().to_string(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content,
        }],
        max_tokens: request.max_tokens,
        temperature: CHAT_TEMPERATURE,
    }
}

pub async fn dispatch_image(
    provider: &dyn GenerationProvider,
    request: &ImageRequest,
    kind: ImageModelKind,
) -> Result<ImagesResponse, ProviderError> {
    let params = kind.build_params(request);
    provider.generate_image(&params).await
}

pub async fn dispatch_text(
    provider: &dyn GenerationProvider,
    request: &TextRequest,
) -> Result<ChatCompletionResponse, ProviderError> {
    let params = build_chat_params(request);
    provider.create_chat_completion(&params).await
}
