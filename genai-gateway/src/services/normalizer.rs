//! Converts provider payloads into the uniform response bodies.

use crate::dtos::{GenerateImageResponse, GenerateTextResponse};
use crate::models::{ImageModelKind, ImageRequest, TextRequest};
use crate::services::generation::GenerationError;
use crate::services::providers::{ChatCompletionResponse, ImagesResponse};
use crate::services::storage::{new_png_key, Storage};
use base64::{engine::general_purpose::STANDARD, Engine};

/// Filename reported for upstream-hosted images.
pub const HOSTED_IMAGE_FILENAME: &str = "dall-e-3.png";

/// Image content extracted from a provider response.
#[derive(Debug, PartialEq, Eq)]
pub enum ImagePayload {
    Bytes(Vec<u8>),
    Hosted(String),
}

impl ImageModelKind {
    /// Pull this strategy's payload out of the first returned image.
    pub fn extract(&self, response: ImagesResponse) -> Result<ImagePayload, GenerationError> {
        let first = response
            .data
            .and_then(|data| data.into_iter().next())
            .ok_or(GenerationError::NoImageData)?;

        match self {
            ImageModelKind::InlineBase64 => {
                let encoded = first
                    .b64_json
                    .filter(|s| !s.is_empty())
                    .ok_or(GenerationError::NoImageData)?;
                Ok(ImagePayload::Bytes(STANDARD.decode(encoded.trim())?))
            }
            ImageModelKind::HostedUrl => first
                .url
                .filter(|s| !s.is_empty())
                .map(ImagePayload::Hosted)
                .ok_or(GenerationError::NoImageData),
        }
    }
}

/// Build the image response, persisting inline bytes under a fresh name.
///
/// `public_base` is the absolute URL of the generated-assets directory for the
/// current request, e.g. `http://host:5000/static/generated`.
pub async fn normalize_image(
    kind: ImageModelKind,
    response: ImagesResponse,
    request: &ImageRequest,
    storage: &dyn Storage,
    public_base: &str,
) -> Result<GenerateImageResponse, GenerationError> {
    let (image_url, filename) = match kind.extract(response)? {
        ImagePayload::Bytes(bytes) => {
            let key = new_png_key();
            storage.upload(&key, &bytes).await?;
            tracing::info!(file = %key, bytes = bytes.len(), "Stored generated image");
            (
                format!("{}/{}", public_base.trim_end_matches('/'), key),
                key,
            )
        }
        ImagePayload::Hosted(url) => (url, HOSTED_IMAGE_FILENAME.to_string()),
    };

    Ok(GenerateImageResponse {
        success: true,
        image_url,
        prompt: request.prompt.clone(),
        filename,
        size: request.size.as_str().to_string(),
    })
}

pub fn normalize_text(
    response: ChatCompletionResponse,
    request: &TextRequest,
) -> Result<GenerateTextResponse, GenerationError> {
    let choice = response
        .choices
        .and_then(|choices| choices.into_iter().next())
        .ok_or(GenerationError::NoTextData)?;

    Ok(GenerateTextResponse {
        success: true,
        text: choice.message.content,
        prompt: request.prompt.clone(),
        model: request.model.as_str().to_string(),
        has_image: request.has_image(),
        image_url: request.image.as_ref().map(|image| image.original.clone()),
        tokens_used: response.usage.and_then(|usage| usage.total_tokens),
    })
}
