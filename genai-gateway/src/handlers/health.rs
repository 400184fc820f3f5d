use crate::dtos::HealthResponse;
use crate::startup::AppState;
use axum::{extract::State, Json};

/// Liveness probe. Always 200; reports whether the upstream client is configured.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let proxy_url = state.config.openai.proxy_url.clone();

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        openai_configured: state.generation.is_some(),
        proxy_configured: proxy_url.is_some(),
        proxy_url,
    })
}
