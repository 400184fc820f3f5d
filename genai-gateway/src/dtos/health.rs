use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub openai_configured: bool,
    pub proxy_configured: bool,
    pub proxy_url: Option<String>,
}
