use std::collections::BTreeMap;
use std::path::Path;

use kanji_core::LoadError;
use kanji_overlay::SoundMnemonic;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::kana::katakana_to_hiragana;
use crate::reference::{KanjidicEntry, ReferenceStore};

pub const KANJI_DB: &str = "kanji_db";
pub const PHONETIC_DB: &str = "phonetic_db";
pub const WK_KANJI_DB: &str = "wk_kanji_db";
pub const KRADFILE: &str = "kradfile";
pub const KANJIDIC: &str = "kanjidic";
pub const WK_RADICALS: &str = "wk_radicals";
pub const WK_KANJI_SUBJECTS: &str = "wk_kanji_subjects";

/// Tables that must be present before anything can be resolved
pub const REQUIRED_TABLES: [&str; 3] = [KANJI_DB, PHONETIC_DB, WK_KANJI_DB];

pub struct ReferenceLoader;

impl ReferenceLoader {
    /// Load the bundled default sound mnemonics
    pub fn load_embedded_sound_mnemonics() -> Result<BTreeMap<String, SoundMnemonic>, LoadError> {
        let json = include_str!("../data/sound_mnemonics.json");
        let table = Self::parse_table(json, "sound mnemonics")?;
        tracing::info!("Loaded {} default sound mnemonics", table.len());
        Ok(table)
    }

    /// Parse a `{key: record}` JSON object. Records that do not fit `T` are
    /// skipped with a warning; a document that is not an object is an error.
    pub fn parse_table<T: DeserializeOwned>(
        json: &str,
        label: &str,
    ) -> Result<BTreeMap<String, T>, LoadError> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| LoadError::ParseError(format!("{}: {}", label, e)))?;

        let mut table = BTreeMap::new();
        for (key, value) in raw {
            match serde_json::from_value(value) {
                Ok(record) => {
                    table.insert(key, record);
                }
                Err(e) => tracing::warn!("Skipping malformed {} entry {}: {}", label, key, e),
            }
        }
        Ok(table)
    }

    pub fn load_table<T: DeserializeOwned>(
        path: &Path,
        label: &str,
    ) -> Result<BTreeMap<String, T>, LoadError> {
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.display().to_string()));
        }
        let json = std::fs::read_to_string(path)?;
        let table = Self::parse_table(&json, label)?;
        tracing::info!("Loaded {} {} entries from {}", table.len(), label, path.display());
        Ok(table)
    }

    /// Like [`Self::load_table`], but a missing or unreadable file is empty
    pub fn load_optional_table<T: DeserializeOwned>(path: &Path, label: &str) -> BTreeMap<String, T> {
        match Self::load_table(path, label) {
            Ok(table) => table,
            Err(LoadError::FileNotFound(_)) => {
                tracing::warn!("{} not available ({}), continuing without it", label, path.display());
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {}", label, e);
                BTreeMap::new()
            }
        }
    }

    /// Store holding only the data compiled into the binary
    pub fn bundled() -> Result<ReferenceStore, LoadError> {
        Ok(ReferenceStore::new().with_sound_mnemonics(Self::load_embedded_sound_mnemonics()?))
    }

    /// Build the reference store from the JSON files in `cache_dir`
    pub fn load_from_cache(cache_dir: &Path) -> Result<ReferenceStore, LoadError> {
        let file = |name: &str| cache_dir.join(format!("{}.json", name));

        let store = Self::bundled()?
            .with_classification(Self::load_table(&file(KANJI_DB), "Keisei kanji")?)
            .with_phonetic(Self::load_table(&file(PHONETIC_DB), "Keisei phonetic")?)
            .with_wk_kanji(Self::load_table(&file(WK_KANJI_DB), "Keisei WaniKani kanji")?)
            .with_visual(Self::load_optional_table(&file(KRADFILE), "KRADFILE"))
            .with_kanjidic(Self::load_optional_table(&file(KANJIDIC), "KANJIDIC"))
            .with_wk_radicals(Self::load_optional_table(&file(WK_RADICALS), "WaniKani radicals"))
            .with_wk_subjects(Self::load_optional_table(
                &file(WK_KANJI_SUBJECTS),
                "WaniKani kanji subjects",
            ));

        Ok(store)
    }

    /// Parse KRADFILE-u text. Each line reads `kanji : part part ...`;
    /// comments and lines without the separator are ignored.
    pub fn parse_kradfile(text: &str) -> BTreeMap<String, Vec<String>> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once(" : "))
            .map(|(kanji, parts)| {
                (
                    kanji.trim().to_string(),
                    parts.split_whitespace().map(str::to_string).collect(),
                )
            })
            .collect()
    }

    /// Parse a kanjidic2 JSON export (jmdict-simplified layout).
    ///
    /// Groups are merged, on'yomi become hiragana, only English meanings are
    /// kept and characters without reading/meaning data are skipped.
    pub fn parse_kanjidic(json: &str) -> Result<BTreeMap<String, KanjidicEntry>, LoadError> {
        let raw: KanjidicDocument = serde_json::from_str(json)
            .map_err(|e| LoadError::InvalidFormat(format!("kanjidic2: {}", e)))?;

        let mut table = BTreeMap::new();
        for character in raw.characters {
            let Some(reading_meaning) = character.reading_meaning else {
                continue;
            };

            let mut entry = KanjidicEntry {
                grade: character.misc.grade,
                frequency: character.misc.frequency,
                ..Default::default()
            };
            for group in reading_meaning.groups {
                for reading in group.readings {
                    match reading.kind.as_str() {
                        "ja_on" => entry.onyomi.push(katakana_to_hiragana(&reading.value)),
                        "ja_kun" => entry.kunyomi.push(reading.value),
                        _ => {}
                    }
                }
                entry.meanings.extend(
                    group
                        .meanings
                        .into_iter()
                        .filter(|m| m.lang.as_deref().unwrap_or("en") == "en")
                        .map(|m| m.value),
                );
            }
            table.insert(character.literal, entry);
        }

        tracing::info!("Parsed {} kanjidic2 characters", table.len());
        Ok(table)
    }
}

#[derive(Deserialize)]
struct KanjidicDocument {
    #[serde(default)]
    characters: Vec<KanjidicCharacter>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KanjidicCharacter {
    literal: String,
    #[serde(default)]
    reading_meaning: Option<KanjidicReadingMeaning>,
    #[serde(default)]
    misc: KanjidicMisc,
}

#[derive(Deserialize)]
struct KanjidicReadingMeaning {
    #[serde(default)]
    groups: Vec<KanjidicGroup>,
}

#[derive(Deserialize)]
struct KanjidicGroup {
    #[serde(default)]
    readings: Vec<KanjidicReading>,
    #[serde(default)]
    meanings: Vec<KanjidicMeaning>,
}

#[derive(Deserialize)]
struct KanjidicReading {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

#[derive(Deserialize)]
struct KanjidicMeaning {
    #[serde(default)]
    lang: Option<String>,
    value: String,
}

#[derive(Default, Deserialize)]
struct KanjidicMisc {
    #[serde(default)]
    grade: Option<u32>,
    #[serde(default)]
    frequency: Option<u32>,
}
