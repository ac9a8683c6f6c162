use std::env;

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.wanikani.com/v2".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaniKaniConfig {
    /// Personal access token; radical names are only fetched when set
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl WaniKaniConfig {
    pub fn new() -> Self {
        let api_key = env::var("WK_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let api_url = env::var("WK_API_URL").unwrap_or_else(|_| default_api_url());

        Self { api_key, api_url }
    }
}

impl Default for WaniKaniConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
        }
    }
}
