use crate::dtos::{GenerateImageResponse, GenerateTextResponse};
use crate::services::classifier::{classify, Operation};
use crate::services::metrics::{record_generation, record_tokens};
use crate::services::validation;
use crate::services::GenerationService;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use service_core::error::AppError;

const PROMPT_LOG_CHARS: usize = 100;

fn generation_service(state: &AppState) -> Result<&GenerationService, AppError> {
    state.generation.as_ref().ok_or_else(|| {
        AppError::server_error(
            "OpenAI API key not configured",
            "Please set OPENAI_API_KEY environment variable",
        )
    })
}

fn prompt_preview(prompt: &str) -> String {
    prompt.chars().take(PROMPT_LOG_CHARS).collect()
}

fn first_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Scheme and authority the caller used to reach us, e.g. `http://localhost:5000`.
pub fn request_origin(headers: &HeaderMap) -> String {
    let scheme = first_header(headers, "x-forwarded-proto").unwrap_or("http");
    let host = first_header(headers, "x-forwarded-host")
        .or_else(|| first_header(headers, header::HOST.as_str()))
        .unwrap_or("localhost");
    format!("{}://{}", scheme, host)
}

/// `POST /api/generate-image`
pub async fn generate_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GenerateImageResponse>, AppError> {
    let generation = generation_service(&state)?;
    let request = validation::validate_image_request(&body)?;

    tracing::info!(
        prompt = %prompt_preview(&request.prompt),
        model = %request.model,
        size = %request.size,
        "Generating image"
    );

    let public_base = format!(
        "{}{}",
        request_origin(&headers),
        state.config.storage.generated_url_path()
    );

    match generation.generate_image(&request, &public_base).await {
        Ok(result) => {
            record_generation("image", &request.model, "success");
            tracing::info!(filename = %result.filename, "Image generated successfully");
            Ok(Json(result))
        }
        Err(err) => {
            tracing::error!(error = %err, "Error generating image");
            let category = classify(&err);
            record_generation("image", &request.model, category.label());
            Err(category
                .into_app_error(Operation::Image)
                .with_retry_after(err.retry_after()))
        }
    }
}

/// `POST /api/generate-text`
pub async fn generate_text(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateTextResponse>, AppError> {
    let generation = generation_service(&state)?;
    let request = validation::validate_text_request(&body, state.storage.as_ref()).await?;

    tracing::info!(
        prompt = %prompt_preview(&request.prompt),
        model = %request.model,
        has_image = request.has_image(),
        max_tokens = request.max_tokens,
        "Generating text"
    );

    match generation.generate_text(&request).await {
        Ok(result) => {
            record_generation("text", request.model.as_str(), "success");
            if let Some(tokens) = result.tokens_used {
                record_tokens(request.model.as_str(), tokens);
            }
            tracing::info!(tokens_used = ?result.tokens_used, "Text generated successfully");
            Ok(Json(result))
        }
        Err(err) => {
            tracing::error!(error = %err, "Error generating text");
            let category = classify(&err);
            record_generation("text", request.model.as_str(), category.label());
            Err(category
                .into_app_error(Operation::Text)
                .with_retry_after(err.retry_after()))
        }
    }
}
