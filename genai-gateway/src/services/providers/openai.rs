//! OpenAI provider implementation.
//!
//! Thin `reqwest` client for the Images and Chat Completions APIs. One call
//! per request, no retries, transport defaults for timeouts.

use super::{
    ChatCompletionParams, ChatCompletionResponse, GenerationProvider, ImageGenerationParams,
    ImagesResponse, ProviderError,
};
use crate::config::OpenAiConfig;
use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, Proxy};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Serialize};

/// OpenAI HTTP provider.
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: Secret<String>,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;

        let mut builder = Client::builder();
        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                ProviderError::NotConfigured(format!("Invalid proxy URL '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
            tracing::info!(proxy = %proxy_url, "Routing OpenAI calls through proxy");
        }

        let client = builder
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_json<P, R>(&self, path: &str, params: &P) -> Result<R, ProviderError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.api_url(path))
            .bearer_auth(self.api_key.expose_secret())
            .json(params)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, path, ?retry_after, "OpenAI returned an error");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
                retry_after,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    async fn generate_image(
        &self,
        params: &ImageGenerationParams,
    ) -> Result<ImagesResponse, ProviderError> {
        tracing::debug!(model = %params.model, size = %params.size, "Sending image request to OpenAI");
        self.post_json("images/generations", params).await
    }

    async fn create_chat_completion(
        &self,
        params: &ChatCompletionParams,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        tracing::debug!(
            model = %params.model,
            max_tokens = params.max_tokens,
            "Sending chat completion request to OpenAI"
        );
        self.post_json("chat/completions", params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>, proxy_url: Option<&str>) -> OpenAiConfig {
        OpenAiConfig {
            api_key: api_key.map(|k| Secret::new(k.to_string())),
            base_url: "https://api.openai.com/v1/".to_string(),
            proxy_url: proxy_url.map(str::to_string),
        }
    }

    #[test]
    fn missing_key_is_not_configured() {
        assert!(matches!(
            OpenAiProvider::new(&config(None, None)),
            Err(ProviderError::NotConfigured(_))
        ));
    }

    #[test]
    fn api_url_joins_without_double_slash() {
        let provider = OpenAiProvider::new(&config(Some("sk-test"), None)).unwrap();
        assert_eq!(
            provider.api_url("images/generations"),
            "https://api.openai.com/v1/images/generations"
        );
    }

    #[test]
    fn accepts_proxy_url() {
        assert!(OpenAiProvider::new(&config(Some("sk-test"), Some("http://proxy.local:3128"))).is_ok());
    }
}
