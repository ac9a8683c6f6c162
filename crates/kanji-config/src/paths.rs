use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub(crate) fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Where downloaded databases and personal stores live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Downloaded reference databases (safe to delete)
    pub cache_dir: PathBuf,
    /// Personal overlay stores and saved mnemonics
    pub config_dir: PathBuf,
}

impl PathsConfig {
    pub fn new() -> Self {
        let cache_dir = env::var_os("KANJI_MNEMONIC_CACHE")
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir().join(".cache").join("kanji-mnemonic"));

        let config_dir = env::var_os("KANJI_MNEMONIC_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir().join(".config").join("kanji"));

        Self {
            cache_dir,
            config_dir,
        }
    }

    pub fn cache_file(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{name}.json"))
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self::new()
    }
}
