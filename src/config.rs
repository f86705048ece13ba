use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::llm::google::{models, GOOGLE_API_BASE};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub llm: LLMConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub google_api_key: String,
    pub default_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            llm: LLMConfig {
                google_api_key: env::var("GOOGLE_API_KEY").unwrap_or_default(),
                default_model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| models::DEFAULT.to_string()),
                temperature: env::var("GEMINI_TEMPERATURE")
                    .unwrap_or_else(|_| "0.7".to_string())
                    .parse()
                    .context("GEMINI_TEMPERATURE must be a number")?,
                max_tokens: env::var("GEMINI_MAX_TOKENS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()
                    .context("GEMINI_MAX_TOKENS must be a positive integer")?,
                api_base: env::var("GEMINI_API_BASE")
                    .unwrap_or_else(|_| GOOGLE_API_BASE.to_string()),
            },
            logging: LoggingConfig {
                dir: env::var("LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_log_dir()),
                filter: env::var("RUST_LOG").unwrap_or_else(|_| "gemini_chat=debug".to_string()),
            },
        })
    }
}

/// XDG state directory, falling back to the working directory
fn default_log_dir() -> PathBuf {
    env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            env::var("HOME")
                .map(|h| PathBuf::from(h).join(".local/state"))
                .unwrap_or_else(|_| PathBuf::from("."))
        })
        .join("gemini-chat")
}
