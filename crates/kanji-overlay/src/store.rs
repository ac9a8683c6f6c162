use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use kanji_core::ReadingKind;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::records::{PersonalDecomposition, PersonalOverlay, SavedMnemonic, SoundMnemonic};

const RADICALS_FILE: &str = "radicals.json";
const DECOMPOSITIONS_FILE: &str = "decompositions.json";
const READING_OVERRIDES_FILE: &str = "reading_overrides.json";
const SOUND_MNEMONICS_FILE: &str = "sound_mnemonics.json";
const MNEMONICS_FILE: &str = "mnemonics.json";

#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Personal JSON stores in the config directory. Each store is a flat object
/// keyed by kanji or reading, read whole and rewritten whole on every change.
pub struct OverlayStore {
    dir: PathBuf,
}

impl OverlayStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read all four overlay stores
    pub fn load(&self) -> PersonalOverlay {
        PersonalOverlay {
            radicals: self.radicals(),
            decompositions: self.decompositions(),
            reading_overrides: self.reading_overrides(),
            sound_mnemonics: self.sound_mnemonics(),
        }
    }

    pub fn radicals(&self) -> BTreeMap<String, String> {
        self.read_records::<String>(RADICALS_FILE)
            .into_iter()
            .filter(|(_, name): &(String, String)| !name.trim().is_empty())
            .collect()
    }

    pub fn save_radical(&self, radical: &str, name: &str) -> Result<(), OverlayError> {
        if name.trim().is_empty() {
            return Err(OverlayError::InvalidRecord(format!(
                "empty name for radical {radical}"
            )));
        }
        let mut records = self.radicals();
        records.insert(radical.to_string(), name.trim().to_string());
        self.write_records(RADICALS_FILE, &records)
    }

    pub fn decompositions(&self) -> BTreeMap<String, PersonalDecomposition> {
        self.read_records::<PersonalDecomposition>(DECOMPOSITIONS_FILE)
            .into_iter()
            .filter_map(|(kanji, record)| match record.validated() {
                Some(record) => Some((kanji, record)),
                None => {
                    tracing::warn!("Ignoring personal decomposition for {kanji}: no parts");
                    None
                }
            })
            .collect()
    }

    pub fn save_decomposition(
        &self,
        kanji: &str,
        record: PersonalDecomposition,
    ) -> Result<(), OverlayError> {
        let record = record.validated().ok_or_else(|| {
            OverlayError::InvalidRecord(format!("decomposition for {kanji} has no parts"))
        })?;
        let mut records = self.decompositions();
        records.insert(kanji.to_string(), record);
        self.write_records(DECOMPOSITIONS_FILE, &records)
    }

    /// Returns whether a record was removed
    pub fn remove_decomposition(&self, kanji: &str) -> Result<bool, OverlayError> {
        let mut records = self.decompositions();
        self.remove_and_write(DECOMPOSITIONS_FILE, &mut records, kanji)
    }

    pub fn reading_overrides(&self) -> BTreeMap<String, ReadingKind> {
        self.read_records(READING_OVERRIDES_FILE)
    }

    pub fn save_reading_override(&self, kanji: &str, kind: ReadingKind) -> Result<(), OverlayError> {
        let mut records = self.reading_overrides();
        records.insert(kanji.to_string(), kind);
        self.write_records(READING_OVERRIDES_FILE, &records)
    }

    pub fn remove_reading_override(&self, kanji: &str) -> Result<bool, OverlayError> {
        let mut records = self.reading_overrides();
        self.remove_and_write(READING_OVERRIDES_FILE, &mut records, kanji)
    }

    pub fn sound_mnemonics(&self) -> BTreeMap<String, SoundMnemonic> {
        self.read_records(SOUND_MNEMONICS_FILE)
    }

    pub fn save_sound_mnemonic(
        &self,
        reading: &str,
        mnemonic: SoundMnemonic,
    ) -> Result<(), OverlayError> {
        let mut records = self.sound_mnemonics();
        records.insert(reading.to_string(), mnemonic);
        self.write_records(SOUND_MNEMONICS_FILE, &records)
    }

    pub fn remove_sound_mnemonic(&self, reading: &str) -> Result<bool, OverlayError> {
        let mut records = self.sound_mnemonics();
        self.remove_and_write(SOUND_MNEMONICS_FILE, &mut records, reading)
    }

    pub fn mnemonics(&self) -> BTreeMap<String, SavedMnemonic> {
        self.read_records(MNEMONICS_FILE)
    }

    pub fn mnemonic_for(&self, kanji: &str) -> Option<SavedMnemonic> {
        self.mnemonics().remove(kanji)
    }

    pub fn save_mnemonic(&self, kanji: &str, mnemonic: &str, model: &str) -> Result<(), OverlayError> {
        let mut records = self.mnemonics();
        records.insert(
            kanji.to_string(),
            SavedMnemonic {
                mnemonic: mnemonic.to_string(),
                model: model.to_string(),
                timestamp: chrono::Local::now().to_rfc3339(),
            },
        );
        self.write_records(MNEMONICS_FILE, &records)
    }

    fn remove_and_write<T: Serialize>(
        &self,
        file: &str,
        records: &mut BTreeMap<String, T>,
        key: &str,
    ) -> Result<bool, OverlayError> {
        if records.remove(key).is_none() {
            return Ok(false);
        }
        self.write_records(file, records)?;
        Ok(true)
    }

    /// Read a store, skipping records that do not fit the expected shape.
    /// A missing or unreadable file is an empty store.
    fn read_records<T: DeserializeOwned>(&self, file: &str) -> BTreeMap<String, T> {
        let path = self.dir.join(file);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Could not read {}: {}", path.display(), e);
                return BTreeMap::new();
            }
        };

        if text.trim().is_empty() {
            return BTreeMap::new();
        }

        let raw: serde_json::Map<String, serde_json::Value> = match serde_json::from_str(&text) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
                return BTreeMap::new();
            }
        };

        raw.into_iter()
            .filter_map(|(key, value)| match serde_json::from_value::<T>(value) {
                Ok(record) => Some((key, record)),
                Err(e) => {
                    tracing::warn!("Ignoring malformed record {key:?} in {file}: {e}");
                    None
                }
            })
            .collect()
    }

    /// Replace a store atomically: write a sibling temp file, then rename it
    fn write_records<T: Serialize>(
        &self,
        file: &str,
        records: &BTreeMap<String, T>,
    ) -> Result<(), OverlayError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(records)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(self.dir.join(file)).map_err(|e| e.error)?;

        tracing::debug!("Wrote {} records to {}", records.len(), file);
        Ok(())
    }
}
