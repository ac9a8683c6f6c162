use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const KEISEI_BASE: &str = "https://raw.githubusercontent.com/mwil/wanikani-userscripts/8ee517737d604f1df0ff103a33b69f1f07218815/wanikani-phonetic-compounds/db";

fn default_kradfile_urls() -> Vec<String> {
    vec![
        "https://raw.githubusercontent.com/jmettraux/kensaku/master/data/kradfile-u".to_string(),
        "https://raw.githubusercontent.com/fasiha/kanjipath/master/resources/data/kradfile-u"
            .to_string(),
    ]
}

/// Download locations for the static reference databases
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub kanji_db_url: String,
    pub phonetic_db_url: String,
    pub wk_kanji_db_url: String,
    pub kradfile_urls: Vec<String>,
    /// Local kanjidic2 JSON export (jmdict-simplified format), parsed on first use
    pub kanjidic_path: Option<PathBuf>,
}

impl SourcesConfig {
    pub fn new() -> Self {
        Self {
            kanjidic_path: env::var_os("KANJIDIC_PATH").map(PathBuf::from),
            ..Self::default()
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            kanji_db_url: format!("{KEISEI_BASE}/kanji_esc.json"),
            phonetic_db_url: format!("{KEISEI_BASE}/phonetic_esc.json"),
            wk_kanji_db_url: format!("{KEISEI_BASE}/wk_kanji_esc.json"),
            kradfile_urls: default_kradfile_urls(),
            kanjidic_path: None,
        }
    }
}
