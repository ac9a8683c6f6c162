use std::collections::HashMap;

use crate::reference::ReferenceStore;

/// A kanji that designates a given component as its phonetic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyCandidate {
    pub kanji: String,
    pub meaning: Option<String>,
    /// Hiragana on'yomi
    pub on_yomi: Vec<String>,
}

/// Reverse index from phonetic component to the kanji that use it.
/// Built once per invocation from the classification table.
#[derive(Debug, Default)]
pub struct PhoneticFamilyIndex {
    families: HashMap<String, Vec<FamilyCandidate>>,
}

impl PhoneticFamilyIndex {
    pub fn build(store: &ReferenceStore) -> Self {
        let mut index = Self::default();

        for (kanji, entry) in store.classification_entries() {
            let is_phonetic_semantic = entry
                .classification()
                .is_some_and(|c| c.is_phonetic_semantic());
            let Some(phonetic) = entry.phonetic.as_deref().filter(|p| !p.is_empty()) else {
                continue;
            };
            if !is_phonetic_semantic {
                continue;
            }

            let on_yomi = store
                .readings(kanji)
                .map(|(_, record)| record.on_yomi)
                .unwrap_or_default();

            index
                .families
                .entry(phonetic.to_string())
                .or_default()
                .push(FamilyCandidate {
                    kanji: kanji.to_string(),
                    meaning: store.meaning(kanji),
                    on_yomi,
                });
        }

        for members in index.families.values_mut() {
            members.sort_by(|a, b| a.kanji.cmp(&b.kanji));
        }

        tracing::info!(
            "Indexed {} phonetic families over {} kanji",
            index.families.len(),
            index.families.values().map(Vec::len).sum::<usize>()
        );
        index
    }

    /// Kanji using `component` as their phonetic, in code point order
    pub fn lookup(&self, component: &str) -> Vec<&FamilyCandidate> {
        self.families
            .get(component)
            .map(|members| members.iter().collect())
            .unwrap_or_default()
    }

    /// How many kanji other than `target` use `component` as phonetic and
    /// share at least one on'yomi with the target
    pub fn corroborating(&self, component: &str, target: &str, target_on: &[String]) -> usize {
        self.lookup(component)
            .into_iter()
            .filter(|c| c.kanji != target)
            .filter(|c| c.on_yomi.iter().any(|r| target_on.contains(r)))
            .count()
    }
}
