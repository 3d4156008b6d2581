use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{LlmSettings, SamplingConfig};
use crate::review::prompts::FeedbackTemplate;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub sampling: SamplingConfig,
    pub llm_timeout: Duration,
    pub llm_max_concurrency: usize,
    pub feedback_template: FeedbackTemplate,
    /// Overrides the template's built-in section spec when set.
    pub section_spec_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = SamplingConfig::default();

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_model: env_or("OPENAI_MODEL", "gpt-3.5-turbo"),
            sampling: SamplingConfig {
                temperature: parse_env("LLM_TEMPERATURE", defaults.temperature)?,
                top_p: parse_env("LLM_TOP_P", defaults.top_p)?,
                max_tokens: parse_env("LLM_MAX_TOKENS", defaults.max_tokens)?,
            },
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 120u64)?),
            llm_max_concurrency: parse_env("LLM_MAX_CONCURRENCY", 4usize)?,
            feedback_template: std::env::var("FEEDBACK_TEMPLATE")
                .ok()
                .map(|v| v.parse::<FeedbackTemplate>())
                .transpose()
                .map_err(anyhow::Error::msg)?
                .unwrap_or_default(),
            section_spec_path: std::env::var("SECTION_SPEC_PATH").ok().map(PathBuf::from),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024usize)?,
            port: parse_env("PORT", 8080u16)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_key: self.openai_api_key.clone(),
            base_url: self.openai_base_url.clone(),
            model: self.openai_model.clone(),
            sampling: self.sampling,
            timeout: self.llm_timeout,
            max_concurrency: self.llm_max_concurrency,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
