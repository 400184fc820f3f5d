#![allow(dead_code)]

use genai_gateway::config::{CorsConfig, GatewayConfig, OpenAiConfig, StorageConfig};
use genai_gateway::startup::Application;
use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::path::PathBuf;
use uuid::Uuid;

pub const TEST_API_KEY: &str = "sk-test-key";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub static_dir: String,
    pub client: reqwest::Client,
}

/// Configuration pointing the upstream client at `upstream` (a wiremock URI).
/// `None` leaves the API key unset.
pub fn test_config(upstream: Option<&str>) -> GatewayConfig {
    GatewayConfig {
        common: CoreConfig { port: 0 },
        service_name: "AI Image & Text Generation API".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        openai: OpenAiConfig {
            api_key: upstream.map(|_| Secret::new(TEST_API_KEY.to_string())),
            base_url: upstream
                .map(|uri| format!("{}/v1", uri))
                .unwrap_or_else(|| "http://127.0.0.1:9/v1".to_string()),
            proxy_url: None,
        },
        storage: StorageConfig {
            static_dir: format!("target/test-static-{}", Uuid::new_v4()),
        },
        cors: CorsConfig {
            allowed_origins: vec!["*".to_string()],
        },
    }
}

impl TestApp {
    /// Spawn with an upstream at `upstream`.
    pub async fn spawn(upstream: &str) -> Self {
        Self::spawn_with(test_config(Some(upstream))).await
    }

    /// Spawn with no API key configured.
    pub async fn spawn_unconfigured() -> Self {
        Self::spawn_with(test_config(None)).await
    }

    pub async fn spawn_with(config: GatewayConfig) -> Self {
        let static_dir = config.storage.static_dir.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            static_dir,
            client,
        }
    }

    pub fn generated_dir(&self) -> PathBuf {
        PathBuf::from(&self.static_dir).join("generated")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.static_dir);
    }
}
