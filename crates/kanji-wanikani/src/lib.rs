mod client;

pub use client::{RadicalCatalog, WaniKaniClient};

use serde::{Deserialize, Serialize};

/// Cached radical record, keyed by radical character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadicalRecord {
    pub name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectReadings {
    #[serde(default)]
    pub onyomi: Vec<String>,
    #[serde(default)]
    pub kunyomi: Vec<String>,
}

/// Cached kanji subject record, keyed by kanji character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanjiSubjectRecord {
    #[serde(default)]
    pub meanings: Vec<String>,
    #[serde(default)]
    pub readings: SubjectReadings,
    /// Component radicals as characters (image-only radicals are dropped)
    #[serde(default)]
    pub component_radicals: Vec<String>,
    #[serde(default)]
    pub level: u32,
    /// Reading type of the primary reading ("onyomi" / "kunyomi")
    #[serde(default)]
    pub important_reading: Option<String>,
}
