//! Mock provider implementation for testing.

use super::{
    ChatChoice, ChatCompletionParams, ChatCompletionResponse, ChoiceMessage, GenerationProvider,
    ImageData, ImageGenerationParams, ImagesResponse, ProviderError, Usage,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// 1x1 transparent PNG.
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub const MOCK_IMAGE_URL: &str = "https://images.example.com/generated/mock.png";

/// Canned provider that records every call it receives.
pub struct MockProvider {
    image: Result<ImagesResponse, (u16, String)>,
    chat: Result<ChatCompletionResponse, (u16, String)>,
    image_calls: Mutex<Vec<ImageGenerationParams>>,
    chat_calls: Mutex<Vec<ChatCompletionParams>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Answers image calls with both a base64 payload and a hosted URL, and
    /// chat calls with a fixed reply using 42 tokens.
    pub fn new() -> Self {
        Self {
            image: Ok(ImagesResponse {
                data: Some(vec![ImageData {
                    b64_json: Some(TINY_PNG_BASE64.to_string()),
                    url: Some(MOCK_IMAGE_URL.to_string()),
                    revised_prompt: None,
                }]),
            }),
            chat: Ok(ChatCompletionResponse {
                choices: Some(vec![ChatChoice {
                    message: ChoiceMessage {
                        content: Some("Mock response".to_string()),
                    },
                }]),
                usage: Some(Usage {
                    prompt_tokens: Some(30),
                    completion_tokens: Some(12),
                    total_tokens: Some(42),
                }),
            }),
            image_calls: Mutex::new(Vec::new()),
            chat_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_image_response(mut self, response: ImagesResponse) -> Self {
        self.image = Ok(response);
        self
    }

    pub fn with_chat_response(mut self, response: ChatCompletionResponse) -> Self {
        self.chat = Ok(response);
        self
    }

    /// Fail every call with an upstream API error carrying `body`.
    pub fn failing(mut self, status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        self.image = Err((status, body.clone()));
        self.chat = Err((status, body));
        self
    }

    pub fn image_calls(&self) -> Vec<ImageGenerationParams> {
        self.image_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn chat_calls(&self) -> Vec<ChatCompletionParams> {
        self.chat_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    async fn generate_image(
        &self,
        params: &ImageGenerationParams,
    ) -> Result<ImagesResponse, ProviderError> {
        if let Ok(mut calls) = self.image_calls.lock() {
            calls.push(params.clone());
        }

        self.image.clone().map_err(|(status, body)| ProviderError::Api {
            status,
            body,
            retry_after: None,
        })
    }

    async fn create_chat_completion(
        &self,
        params: &ChatCompletionParams,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        if let Ok(mut calls) = self.chat_calls.lock() {
            calls.push(params.clone());
        }

        self.chat.clone().map_err(|(status, body)| ProviderError::Api {
            status,
            body,
            retry_after: None,
        })
    }
}
