use std::{env, path::PathBuf, time::Duration};

use secrecy::SecretString;

const DEFAULT_MODEL_API_KEY: &str = "dev_model_api_key";
const MAX_CLEANUP_INTERVAL_MINUTES: u64 = 7 * 24 * 60;
const DEFAULT_MODEL_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub storage_dir: PathBuf,
    pub file_max_age_hours: u64,
    pub cleanup_interval_minutes: u64,
    pub cors_allowed_origin: String,
    pub model_api_base: String,
    pub model_api_key: SecretString,
    pub model_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("generated_pdfs")),
            file_max_age_hours: env::var("FILE_MAX_AGE_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            cleanup_interval_minutes: env::var("CLEANUP_INTERVAL_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(60),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            model_api_base: env::var("MODEL_API_BASE")
                .unwrap_or_else(|_| DEFAULT_MODEL_API_BASE.to_string()),
            model_api_key: SecretString::from(
                env::var("MODEL_API_KEY").unwrap_or_else(|_| DEFAULT_MODEL_API_KEY.to_string()),
            ),
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn file_max_age(&self) -> Duration {
        Duration::from_secs(self.file_max_age_hours.saturating_mul(60 * 60))
    }

    /// Clamped to one week so the ticker deadline stays representable.
    pub fn cleanup_interval(&self) -> Duration {
        let minutes = self
            .cleanup_interval_minutes
            .clamp(1, MAX_CLEANUP_INTERVAL_MINUTES);
        Duration::from_secs(minutes * 60)
    }

    /// Validate that production-critical configuration is set
    /// Panics if the model key is missing or left at its default
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        if !self.is_production() {
            return;
        }

        let api_key = self.model_api_key.expose_secret();

        if api_key.is_empty() || api_key == DEFAULT_MODEL_API_KEY {
            panic!(
                "FATAL: MODEL_API_KEY is using default value! Set MODEL_API_KEY environment variable."
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            app_env: "test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            storage_dir: PathBuf::from("generated_test_files"),
            file_max_age_hours: 24,
            cleanup_interval_minutes: 60,
            cors_allowed_origin: "http://localhost:5173".to_string(),
            model_api_base: "http://localhost:9999/v1".to_string(),
            model_api_key: SecretString::from("test_model_key".to_string()),
            model_name: "test-model".to_string(),
        }
    }
}
