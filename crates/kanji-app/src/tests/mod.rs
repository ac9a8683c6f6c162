use std::collections::BTreeMap;

use kanji_config::Config;
use kanji_lang_japanese::{ReferenceLoader, ReferenceStore};
use kanji_wanikani::RadicalRecord;
use tempfile::TempDir;

use crate::state::AppState;

mod sources_tests;

/// Config whose cache and config directories live in a temp dir
pub fn temp_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.paths.cache_dir = dir.path().join("cache");
    config.paths.config_dir = dir.path().join("config");
    config
}

pub fn reference() -> ReferenceStore {
    let classification = ReferenceLoader::parse_table(
        r#"{
            "花": {"type": "comp_phonetic", "semantic": "艹", "phonetic": "化",
                   "decomposition": ["艹", "化"], "readings": ["カ", "ケ"]},
            "貨": {"type": "comp_phonetic", "semantic": "貝", "phonetic": "化", "readings": ["カ"]},
            "化": {"type": "comp_indicative", "decomposition": ["亻", "匕"], "readings": ["カ", "ケ"]}
        }"#,
        "fixture",
    )
    .unwrap();
    let wk_kanji = ReferenceLoader::parse_table(
        r#"{"花": {"meaning": "Flower", "level": 5, "onyomi": "か, け", "kunyomi": "はな"},
            "貨": {"meaning": "Freight", "level": 13, "onyomi": "か"}}"#,
        "fixture",
    )
    .unwrap();
    let radicals = BTreeMap::from([
        (
            "艹".to_string(),
            RadicalRecord {
                name: "Flowers".to_string(),
                level: 2,
                slug: "flowers".to_string(),
            },
        ),
        (
            "骨".to_string(),
            RadicalRecord {
                name: "Bone".to_string(),
                level: 20,
                slug: "bone".to_string(),
            },
        ),
    ]);

    ReferenceStore::new()
        .with_classification(classification)
        .with_wk_kanji(wk_kanji)
        .with_wk_radicals(radicals)
        .with_sound_mnemonics(ReferenceLoader::load_embedded_sound_mnemonics().unwrap())
}

pub fn state(dir: &TempDir) -> AppState {
    AppState::from_parts(temp_config(dir), reference())
}

pub fn output(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).unwrap()
}
