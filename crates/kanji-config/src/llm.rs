use std::env;

use serde::{Deserialize, Serialize};

fn default_model() -> String {
    "claude-sonnet-4-6".to_string()
}

fn default_api_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_seconds() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl LlmConfig {
    pub fn new() -> Self {
        let model = env::var("KANJI_MODEL").unwrap_or_else(|_| default_model());
        let api_key = env::var("ANTHROPIC_API_KEY").unwrap_or_default();
        let api_url = env::var("ANTHROPIC_API_URL").unwrap_or_else(|_| default_api_url());

        let max_tokens = env::var("KANJI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_max_tokens);

        let timeout_seconds = env::var("KANJI_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_seconds);

        Self {
            model,
            api_key,
            api_url,
            max_tokens,
            timeout_seconds,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            api_url: default_api_url(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
