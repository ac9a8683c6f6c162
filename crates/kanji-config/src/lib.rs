use std::path::Path;

use serde::{Deserialize, Serialize};

use self::llm::LlmConfig;
use self::paths::PathsConfig;
use self::sources::SourcesConfig;
use self::wanikani::WaniKaniConfig;

pub mod llm;
pub mod paths;
pub mod sources;
pub mod wanikani;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub llm: LlmConfig,
    pub wanikani: WaniKaniConfig,
    pub sources: SourcesConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            paths: PathsConfig::new(),
            llm: LlmConfig::new(),
            wanikani: WaniKaniConfig::new(),
            sources: SourcesConfig::new(),
        }
    }

    /// Load `.env` from the working directory, then `~/.config/kanji/.env`.
    /// Variables already set in the environment are never overwritten.
    pub fn load_dotenv() {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let home_env = paths::home_dir().join(".config").join("kanji").join(".env");
        load_env_file(&home_env);
    }
}

fn load_env_file(path: &Path) {
    if !path.exists() {
        return;
    }
    match dotenvy::from_path(path) {
        Ok(()) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) => tracing::warn!("Ignoring unreadable env file {}: {}", path.display(), e),
    }
}
