//! Read-only reference tables a profile is resolved from

use std::collections::BTreeMap;

use kanji_core::{Classification, RadicalNames, ReadingKind};
use kanji_overlay::SoundMnemonic;
use kanji_wanikani::{KanjiSubjectRecord, RadicalRecord};
use serde::{Deserialize, Deserializer};

use crate::kana::{normalize_onyomi, split_readings};

/// Treat `null` like a missing field
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Readings stored either as a list or as one comma separated string
fn reading_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::List(list)) => list,
        Some(Raw::Joined(joined)) => split_readings(&joined),
        None => Vec::new(),
    })
}

/// Keisei classification entry (`kanji_db.json`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KeiseiEntry {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub semantic: Option<String>,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub decomposition: Vec<String>,
    #[serde(default, deserialize_with = "reading_list")]
    pub readings: Vec<String>,
}

impl KeiseiEntry {
    /// `None` for unprocessed entries, which count as absent
    pub fn classification(&self) -> Option<Classification> {
        match self.kind.as_deref() {
            Some(kind) => Classification::from_keisei(kind),
            None => Some(Classification::Unknown),
        }
    }
}

/// Keisei phonetic component entry (`phonetic_db.json`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PhoneticEntry {
    #[serde(default, deserialize_with = "reading_list")]
    pub readings: Vec<String>,
    #[serde(rename = "wk-radical", default)]
    pub wk_radical: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub compounds: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub non_compounds: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub xrefs: Vec<String>,
}

/// Keisei's WaniKani kanji table (`wk_kanji_db.json`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WkKanjiEntry {
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default, deserialize_with = "reading_list")]
    pub onyomi: Vec<String>,
    #[serde(default, deserialize_with = "reading_list")]
    pub kunyomi: Vec<String>,
    #[serde(default)]
    pub important_reading: Option<String>,
}

/// Parsed KANJIDIC2 entry as cached in `kanjidic.json`
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, Deserialize)]
pub struct KanjidicEntry {
    #[serde(default)]
    pub meanings: Vec<String>,
    #[serde(default)]
    pub onyomi: Vec<String>,
    #[serde(default)]
    pub kunyomi: Vec<String>,
    #[serde(default)]
    pub grade: Option<u32>,
    #[serde(default)]
    pub frequency: Option<u32>,
}

/// Where a kanji's readings came from, in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingTier {
    WaniKaniTable,
    WaniKaniSubject,
    Kanjidic,
    Classification,
}

pub const READING_TIERS: [ReadingTier; 4] = [
    ReadingTier::WaniKaniTable,
    ReadingTier::WaniKaniSubject,
    ReadingTier::Kanjidic,
    ReadingTier::Classification,
];

/// On'yomi (hiragana) and kun'yomi from a single source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingRecord {
    pub on_yomi: Vec<String>,
    pub kun_yomi: Vec<String>,
}

impl ReadingRecord {
    fn new(on_yomi: &[String], kun_yomi: &[String]) -> Option<Self> {
        let record = Self {
            on_yomi: normalize_onyomi(on_yomi),
            kun_yomi: kun_yomi
                .iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
        };
        (!record.is_empty()).then_some(record)
    }

    pub fn is_empty(&self) -> bool {
        self.on_yomi.is_empty() && self.kun_yomi.is_empty()
    }
}

/// All static data for one command invocation
#[derive(Debug, Default)]
pub struct ReferenceStore {
    classification: BTreeMap<String, KeiseiEntry>,
    phonetic: BTreeMap<String, PhoneticEntry>,
    wk_kanji: BTreeMap<String, WkKanjiEntry>,
    wk_subjects: BTreeMap<String, KanjiSubjectRecord>,
    wk_radicals: BTreeMap<String, RadicalRecord>,
    visual: BTreeMap<String, Vec<String>>,
    kanjidic: BTreeMap<String, KanjidicEntry>,
    sound_mnemonics: BTreeMap<String, SoundMnemonic>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classification(mut self, table: BTreeMap<String, KeiseiEntry>) -> Self {
        self.classification = table;
        self
    }

    pub fn with_phonetic(mut self, table: BTreeMap<String, PhoneticEntry>) -> Self {
        self.phonetic = table;
        self
    }

    pub fn with_wk_kanji(mut self, table: BTreeMap<String, WkKanjiEntry>) -> Self {
        self.wk_kanji = table;
        self
    }

    pub fn with_wk_subjects(mut self, table: BTreeMap<String, KanjiSubjectRecord>) -> Self {
        self.wk_subjects = table;
        self
    }

    pub fn with_wk_radicals(mut self, table: BTreeMap<String, RadicalRecord>) -> Self {
        self.wk_radicals = table;
        self
    }

    pub fn with_visual(mut self, table: BTreeMap<String, Vec<String>>) -> Self {
        self.visual = table;
        self
    }

    pub fn with_kanjidic(mut self, table: BTreeMap<String, KanjidicEntry>) -> Self {
        self.kanjidic = table;
        self
    }

    pub fn with_sound_mnemonics(mut self, table: BTreeMap<String, SoundMnemonic>) -> Self {
        self.sound_mnemonics = table;
        self
    }

    /// Classification entry, with unprocessed entries treated as absent
    pub fn classification_entry(&self, kanji: &str) -> Option<&KeiseiEntry> {
        self.classification
            .get(kanji)
            .filter(|entry| entry.classification().is_some())
    }

    pub fn classification_entries(&self) -> impl Iterator<Item = (&str, &KeiseiEntry)> {
        self.classification
            .iter()
            .filter(|(_, entry)| entry.classification().is_some())
            .map(|(kanji, entry)| (kanji.as_str(), entry))
    }

    pub fn phonetic_entry(&self, component: &str) -> Option<&PhoneticEntry> {
        self.phonetic.get(component)
    }

    pub fn wk_subject(&self, kanji: &str) -> Option<&KanjiSubjectRecord> {
        self.wk_subjects.get(kanji)
    }

    pub fn visual_parts(&self, kanji: &str) -> Option<&[String]> {
        self.visual.get(kanji).map(Vec::as_slice)
    }

    pub fn default_sound_mnemonic(&self, reading: &str) -> Option<&SoundMnemonic> {
        self.sound_mnemonics.get(reading)
    }

    pub fn default_sound_mnemonics(&self) -> &BTreeMap<String, SoundMnemonic> {
        &self.sound_mnemonics
    }

    /// Readings from one tier, if that tier has any for the kanji
    pub fn readings_from(&self, tier: ReadingTier, kanji: &str) -> Option<ReadingRecord> {
        match tier {
            ReadingTier::WaniKaniTable => self
                .wk_kanji
                .get(kanji)
                .and_then(|e| ReadingRecord::new(&e.onyomi, &e.kunyomi)),
            ReadingTier::WaniKaniSubject => self
                .wk_subjects
                .get(kanji)
                .and_then(|s| ReadingRecord::new(&s.readings.onyomi, &s.readings.kunyomi)),
            ReadingTier::Kanjidic => self
                .kanjidic
                .get(kanji)
                .and_then(|e| ReadingRecord::new(&e.onyomi, &e.kunyomi)),
            ReadingTier::Classification => self
                .classification_entry(kanji)
                .and_then(|e| ReadingRecord::new(&e.readings, &[])),
        }
    }

    /// First tier with any reading supplies both lists
    pub fn readings(&self, kanji: &str) -> Option<(ReadingTier, ReadingRecord)> {
        READING_TIERS
            .iter()
            .find_map(|&tier| self.readings_from(tier, kanji).map(|r| (tier, r)))
    }

    pub fn meaning(&self, kanji: &str) -> Option<String> {
        let non_empty = |m: &String| !m.trim().is_empty();
        self.wk_kanji
            .get(kanji)
            .and_then(|e| e.meaning.clone())
            .filter(non_empty)
            .or_else(|| {
                self.wk_subjects
                    .get(kanji)
                    .and_then(|s| s.meanings.first().cloned())
                    .filter(non_empty)
            })
            .or_else(|| {
                self.kanjidic
                    .get(kanji)
                    .and_then(|e| e.meanings.first().cloned())
                    .filter(non_empty)
            })
    }

    pub fn wanikani_level(&self, kanji: &str) -> Option<u32> {
        self.wk_subjects
            .get(kanji)
            .map(|s| s.level)
            .filter(|&level| level > 0)
            .or_else(|| self.wk_kanji.get(kanji).and_then(|e| e.level))
    }

    /// Important reading as declared by WaniKani data
    pub fn declared_important_reading(&self, kanji: &str) -> Option<ReadingKind> {
        self.wk_kanji
            .get(kanji)
            .and_then(|e| e.important_reading.as_deref())
            .and_then(ReadingKind::from_str)
            .or_else(|| {
                self.wk_subjects
                    .get(kanji)
                    .and_then(|s| s.important_reading.as_deref())
                    .and_then(ReadingKind::from_str)
            })
    }

    /// Meaning of a component that is itself a kanji, used when a radical
    /// name is missing
    pub fn component_meaning(&self, symbol: &str) -> Option<String> {
        self.meaning(symbol)
    }

}

impl RadicalNames for ReferenceStore {
    fn radical_name(&self, symbol: &str) -> Option<String> {
        self.wk_radicals.get(symbol).map(|r| r.name.clone())
    }

    fn find_symbol(&self, name: &str) -> Option<String> {
        let wanted = name.trim().to_lowercase();
        self.wk_radicals
            .iter()
            .find(|(_, r)| r.name.to_lowercase() == wanted)
            .map(|(symbol, _)| symbol.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanji_wanikani::SubjectReadings;

    fn s(v: &str) -> String {
        v.to_string()
    }

    fn store() -> ReferenceStore {
        let wk_kanji = serde_json::from_str(
            r#"{"花": {"meaning": "Flower", "level": 5, "onyomi": "か", "kunyomi": "はな", "important_reading": "kunyomi"}}"#,
        )
        .unwrap();
        let subjects = BTreeMap::from([(
            s("語"),
            KanjiSubjectRecord {
                meanings: vec![s("Language")],
                readings: SubjectReadings {
                    onyomi: vec![s("ご")],
                    kunyomi: vec![s("かた.る")],
                },
                component_radicals: vec![s("言"), s("吾")],
                level: 5,
                important_reading: Some(s("onyomi")),
            },
        )]);
        let kanjidic = BTreeMap::from([(
            s("亜"),
            KanjidicEntry {
                meanings: vec![s("Asia")],
                onyomi: vec![s("あ")],
                ..Default::default()
            },
        )]);
        let classification = serde_json::from_str(
            r#"{
                "化": {"type": "comp_indicative", "semantic": null, "phonetic": null,
                       "decomposition": ["亻", "匕"], "readings": ["カ", "ケ"]},
                "丸": {"type": "unprocessed", "readings": ["ガン"]}
            }"#,
        )
        .unwrap();

        ReferenceStore::new()
            .with_wk_kanji(wk_kanji)
            .with_wk_subjects(subjects)
            .with_kanjidic(kanjidic)
            .with_classification(classification)
    }

    #[test]
    fn reading_tiers_take_first_nonempty_record() {
        let store = store();

        let (tier, record) = store.readings("花").unwrap();
        assert_eq!(tier, ReadingTier::WaniKaniTable);
        assert_eq!(record.on_yomi, vec!["か"]);
        assert_eq!(record.kun_yomi, vec!["はな"]);

        let (tier, record) = store.readings("語").unwrap();
        assert_eq!(tier, ReadingTier::WaniKaniSubject);
        assert_eq!(record.kun_yomi, vec!["かた.る"]);

        assert_eq!(store.readings("亜").unwrap().0, ReadingTier::Kanjidic);

        let (tier, record) = store.readings("化").unwrap();
        assert_eq!(tier, ReadingTier::Classification);
        assert_eq!(record.on_yomi, vec!["か", "け"]);
    }

    #[test]
    fn unprocessed_entries_are_absent() {
        let store = store();
        assert!(store.classification_entry("丸").is_none());
        assert!(store.readings("丸").is_none());
        assert!(store.meaning("丸").is_none());
    }

    #[test]
    fn meaning_and_level_chains() {
        let store = store();
        assert_eq!(store.meaning("花").as_deref(), Some("Flower"));
        assert_eq!(store.meaning("語").as_deref(), Some("Language"));
        assert_eq!(store.meaning("亜").as_deref(), Some("Asia"));
        assert_eq!(store.meaning("化"), None);
        assert_eq!(store.wanikani_level("語"), Some(5));
        assert_eq!(store.wanikani_level("花"), Some(5));
        assert_eq!(store.wanikani_level("亜"), None);
    }

    #[test]
    fn declared_important_reading_prefers_table() {
        let store = store();
        assert_eq!(store.declared_important_reading("花"), Some(ReadingKind::Kunyomi));
        assert_eq!(store.declared_important_reading("語"), Some(ReadingKind::Onyomi));
        assert_eq!(store.declared_important_reading("亜"), None);
    }

    #[test]
    fn null_lists_deserialize_as_empty() {
        let entry: PhoneticEntry = serde_json::from_str(
            r#"{"readings": ["カ"], "wk-radical": "change", "compounds": null}"#,
        )
        .unwrap();
        assert!(entry.compounds.is_empty());
        assert_eq!(entry.wk_radical.as_deref(), Some("change"));
    }

    #[test]
    fn radical_names_from_wanikani_cache() {
        let store = ReferenceStore::new().with_wk_radicals(BTreeMap::from([(
            s("吾"),
            RadicalRecord {
                name: s("Five Mouths"),
                level: 10,
                slug: s("five-mouths"),
            },
        )]));
        assert_eq!(store.radical_name("吾").as_deref(), Some("Five Mouths"));
        assert_eq!(store.find_symbol("five mouths").as_deref(), Some("吾"));
        assert_eq!(store.radical_name("言"), None);
    }
}
