use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_SERVICE_NAME: &str = "AI Image & Text Generation API";

/// Sub-directory of the static root holding generated images.
pub const GENERATED_SUBDIR: &str = "generated";

/// URL prefix under which the static root is served.
pub const STATIC_URL_PREFIX: &str = "/static";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub openai: OpenAiConfig,
    pub storage: StorageConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// `None` leaves the upstream client unconfigured; generation endpoints then answer 500.
    pub api_key: Option<Secret<String>>,
    pub base_url: String,
    /// Proxy used for upstream calls only.
    pub proxy_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub static_dir: String,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let api_key = optional_env("OPENAI_API_KEY").map(Secret::new);
        if api_key.is_none() && is_prod {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "OPENAI_API_KEY is required in production but not set"
            )));
        }

        let proxy_url = optional_env("OPENAI_PROXY_URL")
            .or_else(|| optional_env("HTTPS_PROXY"))
            .or_else(|| optional_env("HTTP_PROXY"));

        Ok(GatewayConfig {
            common: common_config,
            service_name: env_or("SERVICE_NAME", DEFAULT_SERVICE_NAME),
            log_level: env_or("LOG_LEVEL", "info"),
            otlp_endpoint: optional_env("OTLP_ENDPOINT"),
            openai: OpenAiConfig {
                api_key,
                base_url: env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
                proxy_url,
            },
            storage: StorageConfig {
                static_dir: env_or("STATIC_DIR", "static"),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_or("CORS_ALLOWED_ORIGINS", "*")),
            },
        })
    }
}

impl OpenAiConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty())
    }
}

impl StorageConfig {
    /// Directory where generated images are written and local image references are resolved.
    pub fn generated_dir(&self) -> PathBuf {
        PathBuf::from(&self.static_dir).join(GENERATED_SUBDIR)
    }

    /// Public URL path for the generated-assets directory, without trailing slash.
    pub fn generated_url_path(&self) -> String {
        format!("{}/{}", STATIC_URL_PREFIX, GENERATED_SUBDIR)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
