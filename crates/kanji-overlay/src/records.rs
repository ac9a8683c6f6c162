use std::collections::BTreeMap;

use kanji_core::{RadicalNames, ReadingKind};
use serde::{Deserialize, Serialize};

/// A user's own breakdown of a kanji
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDecomposition {
    pub parts: Vec<String>,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub semantic: Option<String>,
}

impl PersonalDecomposition {
    /// Build a record, putting the semantic part first and the phonetic part
    /// last. Marked parts missing from `parts` are added.
    pub fn new(parts: Vec<String>, phonetic: Option<String>, semantic: Option<String>) -> Self {
        let mut parts = parts;
        if let Some(s) = &semantic {
            parts.retain(|p| p != s);
            parts.insert(0, s.clone());
        }
        if let Some(p) = &phonetic {
            parts.retain(|part| part != p);
            parts.push(p.clone());
        }
        Self {
            parts,
            phonetic,
            semantic,
        }
    }

    /// Drop records with no parts and role markers that name no part
    pub(crate) fn validated(self) -> Option<Self> {
        if self.parts.is_empty() || self.parts.iter().any(|p| p.trim().is_empty()) {
            return None;
        }
        let keep = |marker: Option<String>| marker.filter(|m| self.parts.contains(m));
        let phonetic = keep(self.phonetic.clone());
        let semantic = keep(self.semantic.clone());
        Some(Self {
            parts: self.parts,
            phonetic,
            semantic,
        })
    }

    /// Whether the record marks any component role itself
    pub fn names_roles(&self) -> bool {
        self.phonetic.is_some() || self.semantic.is_some()
    }
}

/// Named character standing in for a reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundMnemonic {
    pub character: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMnemonic {
    pub mnemonic: String,
    pub model: String,
    /// RFC 3339 local time
    pub timestamp: String,
}

/// Everything the user has customized, read once per command
#[derive(Debug, Clone, Default)]
pub struct PersonalOverlay {
    pub radicals: BTreeMap<String, String>,
    pub decompositions: BTreeMap<String, PersonalDecomposition>,
    pub reading_overrides: BTreeMap<String, ReadingKind>,
    pub sound_mnemonics: BTreeMap<String, SoundMnemonic>,
}

impl PersonalOverlay {
    pub fn decomposition(&self, kanji: &str) -> Option<&PersonalDecomposition> {
        self.decompositions.get(kanji)
    }

    pub fn reading_override(&self, kanji: &str) -> Option<ReadingKind> {
        self.reading_overrides.get(kanji).copied()
    }

    pub fn sound_mnemonic(&self, reading: &str) -> Option<&SoundMnemonic> {
        self.sound_mnemonics.get(reading)
    }

    pub fn radical_names(&self) -> &dyn RadicalNames {
        &self.radicals
    }
}
