use super::{lenient_string, trimmed_string};
use crate::models::generation::DEFAULT_IMAGE_MODEL;
use crate::models::ImageSize;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const MAX_IMAGE_PROMPT_CHARS: usize = 1000;

/// Body of `POST /api/generate-image`.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateImageRequest {
    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(custom(function = "validate_image_prompt"))]
    pub prompt: String,

    #[serde(default = "default_size", deserialize_with = "lenient_string")]
    #[validate(custom(function = "validate_image_size"))]
    pub size: String,

    /// Free-form; only selects the delivery strategy downstream.
    #[serde(default = "default_model")]
    pub model: String,
}

impl GenerateImageRequest {
    pub const FIELD_ORDER: &'static [&'static str] = &["prompt", "size"];
}

fn default_size() -> String {
    ImageSize::default().as_str().to_string()
}

fn default_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

fn validate_image_prompt(prompt: &str) -> Result<(), ValidationError> {
    if prompt.is_empty() {
        let mut err = ValidationError::new("Missing prompt");
        err.message = Some(Cow::Borrowed(
            "Please provide a 'prompt' field with your image description",
        ));
        return Err(err);
    }
    if prompt.chars().count() > MAX_IMAGE_PROMPT_CHARS {
        let mut err = ValidationError::new("Prompt too long");
        err.message = Some(Cow::Owned(format!(
            "Prompt must be {} characters or less",
            MAX_IMAGE_PROMPT_CHARS
        )));
        return Err(err);
    }
    Ok(())
}

fn validate_image_size(size: &str) -> Result<(), ValidationError> {
    if size.parse::<ImageSize>().is_err() {
        let mut err = ValidationError::new("Invalid size");
        err.message = Some(Cow::Owned(format!(
            "Size must be one of: {}",
            ImageSize::valid_values()
        )));
        return Err(err);
    }
    Ok(())
}

/// Success body of `POST /api/generate-image`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateImageResponse {
    pub success: bool,
    pub image_url: String,
    pub prompt: String,
    pub filename: String,
    pub size: String,
}
