use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{KanjiSubjectRecord, RadicalRecord, SubjectReadings};

/// Radicals from one fetch, by subject ID and by character
#[derive(Debug, Default)]
pub struct RadicalCatalog {
    pub ids: HashMap<u64, String>,
    pub records: BTreeMap<String, RadicalRecord>,
}

#[derive(Clone)]
pub struct WaniKaniClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl WaniKaniClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch every radical that has a character. Image-only radicals are
    /// skipped.
    pub async fn radicals(&self) -> Result<RadicalCatalog> {
        let mut catalog = RadicalCatalog::default();

        for subject in self.subjects("radical").await? {
            let Some(character) = subject.data.characters.clone() else {
                continue;
            };
            catalog.ids.insert(subject.id, character.clone());
            let Some(name) = subject.data.primary_meaning() else {
                continue;
            };
            catalog.records.insert(
                character,
                RadicalRecord {
                    name,
                    level: subject.data.level,
                    slug: subject.data.slug.clone(),
                },
            );
        }

        tracing::info!("Fetched {} WaniKani radicals", catalog.records.len());
        Ok(catalog)
    }

    /// Fetch every kanji subject with its component radicals resolved from
    /// subject IDs to characters through `radicals`.
    pub async fn kanji_subjects(
        &self,
        radicals: &RadicalCatalog,
    ) -> Result<BTreeMap<String, KanjiSubjectRecord>> {
        let radical_ids = &radicals.ids;

        let mut kanji = BTreeMap::new();
        for subject in self.subjects("kanji").await? {
            let data = subject.data;
            let Some(character) = data.characters.clone() else {
                continue;
            };

            let component_radicals = data
                .component_subject_ids
                .iter()
                .filter_map(|id| radical_ids.get(id).cloned())
                .collect();

            let readings = SubjectReadings {
                onyomi: data.readings_of("onyomi"),
                kunyomi: data.readings_of("kunyomi"),
            };

            let important_reading = data
                .readings
                .iter()
                .find(|r| r.primary)
                .map(|r| r.reading_type.clone());

            kanji.insert(
                character,
                KanjiSubjectRecord {
                    meanings: data.meanings.iter().map(|m| m.meaning.clone()).collect(),
                    readings,
                    component_radicals,
                    level: data.level,
                    important_reading,
                },
            );
        }

        tracing::info!("Fetched {} WaniKani kanji subjects", kanji.len());
        Ok(kanji)
    }

    /// Walk the paginated subjects collection for one subject type
    async fn subjects(&self, subject_type: &str) -> Result<Vec<Subject>> {
        let mut url = Some(format!("{}/subjects?types={}", self.base_url, subject_type));
        let mut subjects = Vec::new();

        while let Some(page_url) = url {
            tracing::debug!("GET {}", page_url);
            let page: Collection = self
                .client
                .get(&page_url)
                .bearer_auth(&self.api_key)
                .send()
                .await
                .context("Failed to send request to WaniKani")?
                .error_for_status()
                .context("WaniKani rejected the request")?
                .json()
                .await
                .context("Failed to parse WaniKani response")?;

            subjects.extend(page.data);
            url = page.pages.next_url;
        }

        Ok(subjects)
    }
}

#[derive(Deserialize)]
struct Collection {
    data: Vec<Subject>,
    pages: Pages,
}

#[derive(Deserialize)]
struct Pages {
    next_url: Option<String>,
}

#[derive(Deserialize)]
struct Subject {
    id: u64,
    data: SubjectData,
}

#[derive(Deserialize)]
struct SubjectData {
    characters: Option<String>,
    #[serde(default)]
    meanings: Vec<Meaning>,
    #[serde(default)]
    readings: Vec<Reading>,
    #[serde(default)]
    component_subject_ids: Vec<u64>,
    level: u32,
    #[serde(default)]
    slug: String,
}

impl SubjectData {
    fn primary_meaning(&self) -> Option<String> {
        self.meanings
            .iter()
            .find(|m| m.primary)
            .or_else(|| self.meanings.first())
            .map(|m| m.meaning.clone())
    }

    fn readings_of(&self, reading_type: &str) -> Vec<String> {
        self.readings
            .iter()
            .filter(|r| r.reading_type == reading_type)
            .map(|r| r.reading.clone())
            .collect()
    }
}

#[derive(Deserialize)]
struct Meaning {
    meaning: String,
    #[serde(default)]
    primary: bool,
}

#[derive(Deserialize)]
struct Reading {
    reading: String,
    #[serde(rename = "type")]
    reading_type: String,
    #[serde(default)]
    primary: bool,
}
