use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*\s*\n?(.*?)\n?\s*```\s*$")
        .expect("CODE_FENCE is a valid regex pattern")
});

/// The generative model behind every agent. Returns prose or loosely-shaped JSON.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentModel: Send + Sync {
    async fn generate_text(&self, system: &str, prompt: &str) -> AppResult<String>;
    async fn generate_json(&self, system: &str, prompt: &str) -> AppResult<Value>;
}

/// Removes a surrounding markdown code fence, if any.
pub fn strip_code_fences(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => text.trim(),
    }
}

pub fn parse_json_payload(text: &str) -> AppResult<Value> {
    serde_json::from_str(strip_code_fences(text)).map_err(|e| {
        log::error!("Model returned unparseable JSON ({} bytes): {}", text.len(), e);
        AppError::ModelError(format!("Model returned invalid JSON: {e}"))
    })
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiContentModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiContentModel {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.model_api_base.clone())
            .with_api_key(config.model_api_key.expose_secret().to_string());

        Self {
            client: Client::with_config(openai_config),
            model: config.model_name.clone(),
        }
    }

    async fn complete(&self, system: &str, prompt: &str, json_mode: bool) -> AppResult<String> {
        let mut request = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt }
            ]
        });
        if json_mode {
            request["response_format"] = json!({ "type": "json_object" });
        }

        let response: Value = self.client.chat().create_byot(request).await.map_err(|e| {
            log::error!("Model request to {} failed: {}", self.model, e);
            AppError::from(e)
        })?;

        let content = response
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AppError::ModelError("Empty response from model".to_string()))?;

        log::info!("Model {} returned {} bytes", self.model, content.len());
        Ok(content.to_string())
    }
}

#[async_trait]
impl ContentModel for OpenAiContentModel {
    async fn generate_text(&self, system: &str, prompt: &str) -> AppResult<String> {
        self.complete(system, prompt, false).await
    }

    async fn generate_json(&self, system: &str, prompt: &str) -> AppResult<Value> {
        let text = self.complete(system, prompt, true).await?;
        parse_json_payload(&text)
    }
}
