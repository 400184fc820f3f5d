use super::{lenient_integer, lenient_string, trimmed_string};
use crate::models::generation::DEFAULT_MAX_TOKENS;
use crate::models::TextModel;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const MAX_TEXT_PROMPT_CHARS: usize = 4000;

/// Body of `POST /api/generate-text`.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateTextRequest {
    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(custom(function = "validate_text_prompt"))]
    pub prompt: String,

    #[serde(default = "default_max_tokens", deserialize_with = "lenient_integer")]
    #[validate(range(
        min = 1,
        max = 4000,
        code = "Invalid max_tokens",
        message = "max_tokens must be an integer between 1 and 4000"
    ))]
    pub max_tokens: i64,

    #[serde(default = "default_model", deserialize_with = "lenient_string")]
    #[validate(custom(function = "validate_text_model"))]
    pub model: String,

    /// Remote http(s) URL or the name of a previously generated file.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl GenerateTextRequest {
    pub const FIELD_ORDER: &'static [&'static str] = &["prompt", "max_tokens", "model"];
}

fn default_max_tokens() -> i64 {
    i64::from(DEFAULT_MAX_TOKENS)
}

fn default_model() -> String {
    TextModel::default().as_str().to_string()
}

fn validate_text_prompt(prompt: &str) -> Result<(), ValidationError> {
    if prompt.is_empty() {
        let mut err = ValidationError::new("Missing prompt");
        err.message = Some(Cow::Borrowed(
            "Please provide a 'prompt' field with your text request",
        ));
        return Err(err);
    }
    if prompt.chars().count() > MAX_TEXT_PROMPT_CHARS {
        let mut err = ValidationError::new("Prompt too long");
        err.message = Some(Cow::Owned(format!(
            "Prompt must be {} characters or less",
            MAX_TEXT_PROMPT_CHARS
        )));
        return Err(err);
    }
    Ok(())
}

fn validate_text_model(model: &str) -> Result<(), ValidationError> {
    if model.parse::<TextModel>().is_err() {
        let mut err = ValidationError::new("Invalid model");
        err.message = Some(Cow::Owned(format!(
            "Model must be one of: {}",
            TextModel::valid_values()
        )));
        return Err(err);
    }
    Ok(())
}

/// Success body of `POST /api/generate-text`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateTextResponse {
    pub success: bool,
    pub text: Option<String>,
    pub prompt: String,
    pub model: String,
    pub has_image: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub tokens_used: Option<u32>,
}
