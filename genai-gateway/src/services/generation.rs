//! Generation pipeline: dispatch one upstream call, then normalize.

use crate::dtos::{GenerateImageResponse, GenerateTextResponse};
use crate::models::{ImageRequest, TextRequest};
use crate::services::providers::{GenerationProvider, ProviderError};
use crate::services::storage::Storage;
use crate::services::{dispatcher, normalizer};
use std::sync::Arc;
use thiserror::Error;

/// Anything that can go wrong after validation succeeded.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("No image data returned from OpenAI API")]
    NoImageData,

    #[error("No text data returned from OpenAI API")]
    NoTextData,

    #[error("Invalid image data: {0}")]
    InvalidImageData(#[from] base64::DecodeError),

    #[error("Failed to store generated image: {0}")]
    Storage(#[from] std::io::Error),
}

impl GenerationError {
    /// Upstream back-off hint, if the provider sent one.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            GenerationError::Provider(ProviderError::Api { retry_after, .. }) => *retry_after,
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct GenerationService {
    provider: Arc<dyn GenerationProvider>,
    storage: Arc<dyn Storage>,
}

impl GenerationService {
    pub fn new(provider: Arc<dyn GenerationProvider>, storage: Arc<dyn Storage>) -> Self {
        Self { provider, storage }
    }

    pub async fn generate_image(
        &self,
        request: &ImageRequest,
        public_base: &str,
    ) -> Result<GenerateImageResponse, GenerationError> {
        let kind = request.kind();
        let response = dispatcher::dispatch_image(self.provider.as_ref(), request, kind).await?;
        normalizer::normalize_image(kind, response, request, self.storage.as_ref(), public_base)
            .await
    }

    pub async fn generate_text(
        &self,
        request: &TextRequest,
    ) -> Result<GenerateTextResponse, GenerationError> {
        let response = dispatcher::dispatch_text(self.provider.as_ref(), request).await?;
        normalizer::normalize_text(response, request)
    }
}
