use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::filters::synthesizer::DEFAULT_MAX_ATTEMPTS;

pub const DEFAULT_GENERATION_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_CHAT_FALLBACK_MODEL: &str = "gpt-4o-mini-2024-07-18";

/// Application configuration loaded from environment variables.
///
/// Credentials are optional: a missing key leaves the matching capability
/// unconfigured instead of aborting startup. Malformed numbers are fatal.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_genai_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub generation_model: String,
    pub chat_model: String,
    pub chat_fallback_model: String,
    pub filter_max_attempts: u32,
    pub llm_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let filter_max_attempts = parse_or(&lookup, "FILTER_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if filter_max_attempts == 0 {
            bail!("FILTER_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Config {
            google_genai_api_key: credential(&lookup, "GOOGLE_GENAI_API_KEY"),
            openai_api_key: credential(&lookup, "OPENAI_API_KEY"),
            generation_model: lookup("GENERATION_MODEL")
                .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
            chat_model: lookup("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            chat_fallback_model: lookup("CHAT_FALLBACK_MODEL")
                .unwrap_or_else(|| DEFAULT_CHAT_FALLBACK_MODEL.to_string()),
            filter_max_attempts,
            llm_timeout: Duration::from_secs(parse_or(&lookup, "LLM_TIMEOUT_SECS", 120u64)?),
            port: parse_or(&lookup, "PORT", 8080u16)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Blank values count as missing.
fn credential<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
