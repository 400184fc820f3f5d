//! Application startup and lifecycle management.
//!
//! Builds the shared state from configuration, wires the router with its
//! middleware stack and runs the HTTP server until a shutdown signal arrives.

use crate::config::{GatewayConfig, STATIC_URL_PREFIX};
use crate::handlers;
use crate::services::providers::{GenerationProvider, OpenAiProvider};
use crate::services::{GenerationService, LocalStorage, Storage};
use axum::{
    handler::HandlerWithoutStateExt,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, get_service, post, MethodRouter},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub storage: Arc<dyn Storage>,
    /// `None` when no API key is configured.
    pub generation: Option<GenerationService>,
}

impl AppState {
    /// Build state with the OpenAI provider when an API key is configured.
    pub async fn from_config(config: GatewayConfig) -> Result<Self, AppError> {
        let provider: Option<Arc<dyn GenerationProvider>> = if config.openai.is_configured() {
            let provider = OpenAiProvider::new(&config.openai).map_err(|e| {
                tracing::error!("Failed to initialize OpenAI provider: {}", e);
                AppError::ConfigError(anyhow::Error::new(e))
            })?;
            tracing::info!(base_url = %config.openai.base_url, "Initialized OpenAI provider");
            Some(Arc::new(provider))
        } else {
            tracing::warn!("OpenAI provider not configured; generation endpoints will fail");
            None
        };

        Self::with_provider(config, provider).await
    }

    /// Build state around an explicit provider.
    pub async fn with_provider(
        config: GatewayConfig,
        provider: Option<Arc<dyn GenerationProvider>>,
    ) -> Result<Self, AppError> {
        let generated_dir = config.storage.generated_dir();
        let storage: Arc<dyn Storage> =
            Arc::new(LocalStorage::new(&generated_dir).await.map_err(|e| {
                tracing::error!(
                    "Failed to initialize generated-assets directory at {}: {}",
                    generated_dir.display(),
                    e
                );
                AppError::from(e)
            })?);

        let generation = provider.map(|p| GenerationService::new(p, storage.clone()));

        Ok(Self {
            config,
            storage,
            generation,
        })
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ]);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    layer.allow_origin(
        allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                    None
                }
            })
            .collect::<Vec<HeaderValue>>(),
    )
}

/// Build the HTTP router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors.allowed_origins);
    let static_files: MethodRouter = get_service(
        ServeDir::new(&state.config.storage.static_dir)
            .not_found_service(handlers::not_found.into_service()),
    )
    .fallback(handlers::method_not_allowed);

    Router::new()
        .route(
            "/",
            get(handlers::index).fallback(handlers::method_not_allowed),
        )
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        .route(
            "/metrics",
            get(handlers::metrics).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/generate-image",
            post(handlers::generate_image).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/generate-text",
            post(handlers::generate_text).fallback(handlers::method_not_allowed),
        )
        .nest_service(STATIC_URL_PREFIX, static_files)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}

/// Wait for Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config).await?;
        Self::build_with_state(state).await
    }

    /// Build the application around prepared state (port 0 = random port for testing).
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Generation gateway listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
