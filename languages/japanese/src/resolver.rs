//! Kanji profile resolution over reference data and the personal overlay

use kanji_core::{
    ChainedNames, Classification, Component, DecompositionSource, DefaultPreprocessor,
    FamilyMember, KanjiProfile, PhoneticFamily, Preprocessor, RadicalNames, ReadingKind,
    ResolveError, Role, RoleBreakdown, SoundMnemonicMatch,
};
use kanji_overlay::{PersonalDecomposition, PersonalOverlay};

use crate::index::PhoneticFamilyIndex;
use crate::kana::{katakana_to_hiragana, kun_stem};
use crate::reference::{KeiseiEntry, ReferenceStore};

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Guess the phonetic component from family evidence when the
    /// classification table does not name one
    pub infer_phonetic: bool,
    /// One-shot important reading, not persisted
    pub primary_reading_override: Option<ReadingKind>,
    /// Free text forwarded to the prompt
    pub personal_context: Option<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            infer_phonetic: true,
            primary_reading_override: None,
            personal_context: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompositionTier {
    Personal,
    WaniKani,
    Classification,
    Visual,
}

impl DecompositionTier {
    pub fn source(&self) -> DecompositionSource {
        match self {
            DecompositionTier::Personal => DecompositionSource::Personal,
            DecompositionTier::WaniKani => DecompositionSource::WaniKani,
            DecompositionTier::Classification => DecompositionSource::Classification,
            DecompositionTier::Visual => DecompositionSource::Visual,
        }
    }
}

/// Decomposition sources in precedence order. The first tier with parts wins.
pub const DECOMPOSITION_TIERS: [DecompositionTier; 4] = [
    DecompositionTier::Personal,
    DecompositionTier::WaniKani,
    DecompositionTier::Classification,
    DecompositionTier::Visual,
];

/// Pick the reading to build the reading mnemonic around when nothing
/// declares one. A heuristic tie-break, not a linguistic rule.
pub fn infer_important_reading(
    is_phonetic_semantic: bool,
    family_shares_onyomi: bool,
    has_onyomi: bool,
    has_kunyomi: bool,
) -> ReadingKind {
    if is_phonetic_semantic && family_shares_onyomi {
        ReadingKind::Onyomi
    } else if has_kunyomi && !has_onyomi {
        ReadingKind::Kunyomi
    } else {
        ReadingKind::Onyomi
    }
}

/// Position of the component with the most corroborating family members.
/// Ties go to the earliest position; no evidence means no phonetic.
pub fn infer_phonetic_position(
    index: &PhoneticFamilyIndex,
    components: &[Component],
    target: &str,
    target_on: &[String],
) -> Option<usize> {
    if target_on.is_empty() {
        return None;
    }

    let mut best: Option<(usize, usize)> = None;
    for (position, component) in components.iter().enumerate() {
        let count = index.corroborating(&component.symbol, target, target_on);
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((position, count)),
        }
    }
    best.map(|(position, _)| position)
}

pub struct BatchItem {
    pub input: String,
    pub result: Result<KanjiProfile, ResolveError>,
}

/// Per-character outcome of resolving several kanji
#[derive(Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn profiles(&self) -> impl Iterator<Item = &KanjiProfile> {
        self.items.iter().filter_map(|item| item.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ResolveError)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().err().map(|e| (item.input.as_str(), e)))
    }

    /// True only when there was something to resolve and nothing resolved
    pub fn all_failed(&self) -> bool {
        !self.items.is_empty() && self.profiles().next().is_none()
    }
}

/// Roles and classification settled for one decomposition
struct RoleAssignment {
    components: Vec<Component>,
    classification: Classification,
    semantic: Option<String>,
    phonetic: Option<String>,
}

pub struct ProfileResolver<'a> {
    store: &'a ReferenceStore,
    index: &'a PhoneticFamilyIndex,
    overlay: &'a PersonalOverlay,
}

impl<'a> ProfileResolver<'a> {
    pub fn new(
        store: &'a ReferenceStore,
        index: &'a PhoneticFamilyIndex,
        overlay: &'a PersonalOverlay,
    ) -> Self {
        Self {
            store,
            index,
            overlay,
        }
    }

    /// Personal radical names first, then the WaniKani radical cache
    pub fn names(&self) -> ChainedNames<'a> {
        ChainedNames::new(vec![
            self.overlay.radical_names(),
            self.store as &dyn RadicalNames,
        ])
    }

    /// Components from a single tier with unspecified roles, or `None` when
    /// the tier has nothing for this kanji
    pub fn decompose(&self, tier: DecompositionTier, kanji: &str) -> Option<Vec<Component>> {
        let names = self.names();
        let named = |parts: &[String]| -> Option<Vec<Component>> {
            (!parts.is_empty()).then(|| {
                parts
                    .iter()
                    .map(|p| Component::new(p.as_str(), names.radical_name(p)))
                    .collect()
            })
        };

        match tier {
            DecompositionTier::Personal => self
                .overlay
                .decomposition(kanji)
                .and_then(|record| named(&record.parts)),
            DecompositionTier::WaniKani => self
                .store
                .wk_subject(kanji)
                .and_then(|subject| named(&subject.component_radicals)),
            DecompositionTier::Classification => self
                .store
                .classification_entry(kanji)
                .and_then(|entry| named(&entry.decomposition)),
            DecompositionTier::Visual => self.store.visual_parts(kanji).and_then(|parts| {
                (!parts.is_empty())
                    .then(|| parts.iter().map(|p| Component::new(p.as_str(), None)).collect())
            }),
        }
    }

    fn first_decomposition(
        &self,
        tiers: &[DecompositionTier],
        kanji: &str,
    ) -> Option<(DecompositionTier, Vec<Component>)> {
        tiers
            .iter()
            .find_map(|&tier| self.decompose(tier, kanji).map(|parts| (tier, parts)))
    }

    pub fn resolve(
        &self,
        character: &str,
        options: &ResolveOptions,
    ) -> Result<KanjiProfile, ResolveError> {
        let kanji = DefaultPreprocessor.single_character(character)?;

        let (on_yomi, kun_yomi) = self
            .store
            .readings(&kanji)
            .map(|(tier, record)| {
                tracing::debug!("{}: readings from {:?}", kanji, tier);
                (record.on_yomi, record.kun_yomi)
            })
            .unwrap_or_default();
        let meaning = self.store.meaning(&kanji);
        let entry = self.store.classification_entry(&kanji);

        let decomposition = self.first_decomposition(&DECOMPOSITION_TIERS, &kanji);
        if decomposition.is_none()
            && entry.is_none()
            && meaning.is_none()
            && on_yomi.is_empty()
            && kun_yomi.is_empty()
        {
            return Err(ResolveError::NotFound { character: kanji });
        }

        let (source, components) = match decomposition {
            Some((tier, components)) => {
                tracing::debug!("{}: decomposition from {:?}", kanji, tier);
                (tier.source(), components)
            }
            None => (DecompositionSource::None, Vec::new()),
        };

        let auto_decomposition = (source == DecompositionSource::Personal)
            .then(|| self.first_decomposition(&DECOMPOSITION_TIERS[1..], &kanji))
            .flatten()
            .map(|(_, components)| components);

        let personal = (source == DecompositionSource::Personal)
            .then(|| self.overlay.decomposition(&kanji))
            .flatten();

        let assignment = self.assign_roles(&kanji, components, entry, personal, &on_yomi, options);

        let phonetic_family = assignment
            .phonetic
            .as_deref()
            .filter(|_| assignment.classification.is_phonetic_semantic())
            .map(|phonetic| self.phonetic_family(phonetic, &kanji, &on_yomi));

        let breakdown = self.breakdown(&assignment);

        let important_reading = self.important_reading(
            &kanji,
            options,
            assignment.classification,
            phonetic_family.as_ref(),
            &on_yomi,
            &kun_yomi,
        );

        let relevant_sound_mnemonics =
            self.sound_mnemonics(&on_yomi, &kun_yomi, important_reading);

        Ok(KanjiProfile {
            wanikani_level: self.store.wanikani_level(&kanji),
            character: kanji,
            meaning,
            on_yomi,
            kun_yomi,
            important_reading,
            classification: assignment.classification,
            decomposition: assignment.components,
            decomposition_source: source,
            auto_decomposition,
            breakdown,
            phonetic_family,
            relevant_sound_mnemonics,
        })
    }

    /// Resolve each input in turn; failures are recorded, never fatal
    pub fn resolve_batch<S: AsRef<str>>(&self, inputs: &[S], options: &ResolveOptions) -> BatchReport {
        let items = inputs
            .iter()
            .map(|input| {
                let input = input.as_ref();
                let result = self.resolve(input, options);
                if let Err(e) = &result {
                    tracing::debug!("Failed to resolve {}: {}", input, e);
                }
                BatchItem {
                    input: input.to_string(),
                    result,
                }
            })
            .collect();
        BatchReport { items }
    }

    fn assign_roles(
        &self,
        kanji: &str,
        mut components: Vec<Component>,
        entry: Option<&KeiseiEntry>,
        personal: Option<&PersonalDecomposition>,
        on_yomi: &[String],
        options: &ResolveOptions,
    ) -> RoleAssignment {
        let table_class = entry.and_then(KeiseiEntry::classification);
        let mut classification = table_class.unwrap_or(Classification::Unknown);

        if let Some(record) = personal.filter(|r| r.names_roles()) {
            mark(&mut components, record.semantic.as_deref(), record.phonetic.as_deref());
            return RoleAssignment {
                components,
                classification,
                semantic: record.semantic.clone(),
                phonetic: record.phonetic.clone(),
            };
        }

        let table_semantic = entry.and_then(|e| e.semantic.as_deref()).filter(|s| !s.is_empty());
        let table_phonetic = entry.and_then(|e| e.phonetic.as_deref()).filter(|p| !p.is_empty());
        mark(&mut components, table_semantic, table_phonetic);
        let mut phonetic = table_phonetic.map(str::to_string);

        let may_infer = table_class.is_none_or(|c| c == Classification::PhoneticSemantic);
        if phonetic.is_none() && options.infer_phonetic && may_infer {
            if let Some(position) = infer_phonetic_position(self.index, &components, kanji, on_yomi) {
                tracing::debug!("{}: inferred phonetic {}", kanji, components[position].symbol);
                let lone_other = components.len() == 2;
                for (i, component) in components.iter_mut().enumerate() {
                    if i == position {
                        component.role = Role::Phonetic;
                    } else if component.role == Role::Unspecified && lone_other {
                        component.role = Role::Semantic;
                    }
                }
                phonetic = Some(components[position].symbol.clone());
                if table_class.is_none() {
                    classification = Classification::PhoneticSemanticInferred;
                }
            }
        }

        let semantic = table_semantic.map(str::to_string).or_else(|| {
            let mut semantic = components.iter().filter(|c| c.role == Role::Semantic);
            match (semantic.next(), semantic.next()) {
                (Some(only), None) => Some(only.symbol.clone()),
                _ => None,
            }
        });

        RoleAssignment {
            components,
            classification,
            semantic,
            phonetic,
        }
    }

    /// The classification's own semantic and phonetic parts. Tier components
    /// may split differently (WaniKani gives 言 五 口 for 語), so these are
    /// reported apart from the decomposition.
    fn breakdown(&self, assignment: &RoleAssignment) -> Option<RoleBreakdown> {
        if !assignment.classification.is_phonetic_semantic()
            || (assignment.semantic.is_none() && assignment.phonetic.is_none())
        {
            return None;
        }

        let names = self.names();
        let part = |symbol: &str, role: Role, fallback: Option<String>| {
            Component::new(symbol, names.radical_name(symbol).or(fallback)).with_role(role)
        };

        Some(RoleBreakdown {
            semantic: assignment
                .semantic
                .as_deref()
                .map(|symbol| part(symbol, Role::Semantic, None)),
            phonetic: assignment.phonetic.as_deref().map(|symbol| {
                let wk_radical = self
                    .store
                    .phonetic_entry(symbol)
                    .and_then(|e| e.wk_radical.clone());
                part(symbol, Role::Phonetic, wk_radical)
            }),
        })
    }

    fn phonetic_family(&self, component: &str, target: &str, target_on: &[String]) -> PhoneticFamily {
        let candidates: Vec<_> = self
            .index
            .lookup(component)
            .into_iter()
            .filter(|c| c.kanji != target)
            .filter_map(|c| {
                target_on
                    .iter()
                    .position(|r| c.on_yomi.contains(r))
                    .map(|position| (position, c))
            })
            .collect();

        let mut ordered = candidates.clone();
        ordered.sort_by(|(pa, a), (pb, b)| pa.cmp(pb).then_with(|| a.kanji.cmp(&b.kanji)));

        let shared_readings = target_on
            .iter()
            .filter(|r| candidates.iter().any(|(_, c)| c.on_yomi.contains(r)))
            .cloned()
            .collect();

        let members = ordered
            .into_iter()
            .map(|(position, c)| FamilyMember {
                kanji: c.kanji.clone(),
                meaning: c.meaning.clone(),
                matching_reading: target_on[position].clone(),
            })
            .collect();

        let entry = self.store.phonetic_entry(component);
        let component_name = self
            .names()
            .radical_name(component)
            .or_else(|| entry.and_then(|e| e.wk_radical.clone()));

        PhoneticFamily {
            component: component.to_string(),
            component_name,
            shared_readings,
            family_readings: entry
                .map(|e| e.readings.iter().map(|r| katakana_to_hiragana(r)).collect())
                .unwrap_or_default(),
            members,
            look_alikes: entry.map(|e| e.non_compounds.clone()).unwrap_or_default(),
        }
    }

    fn important_reading(
        &self,
        kanji: &str,
        options: &ResolveOptions,
        classification: Classification,
        family: Option<&PhoneticFamily>,
        on_yomi: &[String],
        kun_yomi: &[String],
    ) -> ReadingKind {
        let has_readings = |kind: &ReadingKind| match kind {
            ReadingKind::Onyomi => !on_yomi.is_empty(),
            ReadingKind::Kunyomi => !kun_yomi.is_empty(),
        };

        self.overlay
            .reading_override(kanji)
            .or(options.primary_reading_override)
            .or_else(|| {
                self.store
                    .declared_important_reading(kanji)
                    .filter(has_readings)
            })
            .unwrap_or_else(|| {
                infer_important_reading(
                    classification.is_phonetic_semantic(),
                    family.is_some_and(|f| !f.shared_readings.is_empty()),
                    !on_yomi.is_empty(),
                    !kun_yomi.is_empty(),
                )
            })
    }

    fn sound_mnemonics(
        &self,
        on_yomi: &[String],
        kun_yomi: &[String],
        important: ReadingKind,
    ) -> Vec<SoundMnemonicMatch> {
        let mut readings: Vec<&str> = on_yomi.iter().map(String::as_str).collect();
        if important == ReadingKind::Kunyomi {
            readings.extend(kun_yomi.iter().map(|k| kun_stem(k)));
        }

        let mut matches: Vec<SoundMnemonicMatch> = Vec::new();
        for reading in readings {
            if reading.is_empty() || matches.iter().any(|m| m.reading == reading) {
                continue;
            }
            let found = match self.overlay.sound_mnemonic(reading) {
                Some(sound) => Some((sound, true)),
                None => self.store.default_sound_mnemonic(reading).map(|s| (s, false)),
            };
            if let Some((sound, personal)) = found {
                matches.push(SoundMnemonicMatch {
                    reading: reading.to_string(),
                    name: sound.character.clone(),
                    description: sound.description.clone(),
                    personal,
                });
            }
        }
        matches
    }
}

/// Mark semantic parts and the first matching phonetic part
fn mark(components: &mut [Component], semantic: Option<&str>, phonetic: Option<&str>) {
    let mut phonetic_marked = false;
    for component in components.iter_mut() {
        if !phonetic_marked && Some(component.symbol.as_str()) == phonetic {
            component.role = Role::Phonetic;
            phonetic_marked = true;
        } else if Some(component.symbol.as_str()) == semantic {
            component.role = Role::Semantic;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::loader::ReferenceLoader;
    use crate::reference::KanjidicEntry;
    use kanji_overlay::SoundMnemonic;
    use kanji_wanikani::{KanjiSubjectRecord, RadicalRecord, SubjectReadings};

    fn s(v: &str) -> String {
        v.to_string()
    }

    fn kanjidic(onyomi: &[&str], kunyomi: &[&str]) -> KanjidicEntry {
        KanjidicEntry {
            onyomi: onyomi.iter().map(|r| s(r)).collect(),
            kunyomi: kunyomi.iter().map(|r| s(r)).collect(),
            ..Default::default()
        }
    }

    fn sound(character: &str) -> SoundMnemonic {
        SoundMnemonic {
            character: s(character),
            description: format!("{} description", character),
        }
    }

    fn store() -> ReferenceStore {
        let classification = ReferenceLoader::parse_table(
            r#"{
                "花": {"type": "comp_phonetic", "semantic": "艹", "phonetic": "化",
                       "decomposition": ["艹", "化"], "readings": ["カ", "ケ"]},
                "貨": {"type": "comp_phonetic", "semantic": "貝", "phonetic": "化", "readings": ["カ"]},
                "靴": {"type": "comp_phonetic", "semantic": "革", "phonetic": "化", "readings": ["カ"]},
                "化": {"type": "comp_indicative", "decomposition": ["亻", "匕"], "readings": ["カ", "ケ"]},
                "語": {"type": "comp_phonetic", "semantic": "言", "phonetic": null,
                       "decomposition": ["言", "吾"], "readings": ["ゴ"]},
                "悟": {"type": "comp_phonetic", "phonetic": "吾", "readings": ["ゴ"]},
                "誤": {"type": "comp_phonetic", "phonetic": "吾", "readings": ["ゴ"]},
                "該": {"type": "comp_phonetic", "phonetic": "亥", "readings": ["ガイ"]},
                "核": {"type": "comp_phonetic", "phonetic": "亥", "readings": ["カク"]},
                "甲": {"type": "comp_phonetic", "phonetic": "工", "readings": ["コウ"]},
                "乙": {"type": "comp_phonetic", "phonetic": "口", "readings": ["コウ"]},
                "峠": {"type": "kokuji", "decomposition": ["山", "上", "下"]}
            }"#,
            "test",
        )
        .unwrap();
        let phonetic = ReferenceLoader::parse_table(
            r#"{"化": {"readings": ["カ", "ケ"], "wk-radical": "change", "compounds": ["花", "貨", "靴"],
                       "non_compounds": ["死"]}}"#,
            "test",
        )
        .unwrap();
        let wk_kanji = ReferenceLoader::parse_table(
            r#"{"花": {"meaning": "Flower", "level": 5, "onyomi": "か, け", "kunyomi": "はな"},
                "貨": {"meaning": "Freight", "level": 13, "onyomi": "か"},
                "峠": {"meaning": "Mountain Pass", "level": 30, "kunyomi": "とうげ"},
                "語": {"meaning": "Language", "level": 5, "onyomi": "ご", "kunyomi": "かた.る",
                       "important_reading": "onyomi"}}"#,
            "test",
        )
        .unwrap();
        let visual = BTreeMap::from([
            (s("骸"), vec![s("骨"), s("亥")]),
            (s("丙"), vec![s("工"), s("口")]),
        ]);
        let kanjidic_table = BTreeMap::from([
            (s("骸"), kanjidic(&["がい"], &["むくろ"])),
            (s("丙"), kanjidic(&["こう"], &[])),
        ]);
        let sounds = BTreeMap::from([
            (s("か"), sound("Mosquito")),
            (s("け"), sound("Keg")),
            (s("かた"), sound("Shoulder")),
        ]);

        ReferenceStore::new()
            .with_classification(classification)
            .with_phonetic(phonetic)
            .with_wk_kanji(wk_kanji)
            .with_visual(visual)
            .with_kanjidic(kanjidic_table)
            .with_sound_mnemonics(sounds)
    }

    fn subject(meaning: &str, onyomi: &[&str], radicals: &[&str]) -> KanjiSubjectRecord {
        KanjiSubjectRecord {
            meanings: vec![s(meaning)],
            readings: SubjectReadings {
                onyomi: onyomi.iter().map(|r| s(r)).collect(),
                kunyomi: vec![],
            },
            component_radicals: radicals.iter().map(|r| s(r)).collect(),
            level: 5,
            important_reading: Some(s("onyomi")),
        }
    }

    fn radical(name: &str) -> RadicalRecord {
        RadicalRecord {
            name: s(name),
            level: 1,
            slug: name.to_lowercase(),
        }
    }

    /// WaniKani splits 語 into 言 五 口 while Keisei names 吾 as its phonetic
    fn wanikani_store() -> ReferenceStore {
        let classification = ReferenceLoader::parse_table(
            r#"{
                "語": {"type": "comp_phonetic", "semantic": "言", "phonetic": "吾",
                       "decomposition": ["言", "吾"], "readings": ["ゴ"]},
                "悟": {"type": "comp_phonetic", "semantic": "忄", "phonetic": "吾", "readings": ["ゴ"]},
                "誤": {"type": "comp_phonetic", "semantic": "言", "phonetic": "吾", "readings": ["ゴ"]}
            }"#,
            "test",
        )
        .unwrap();
        let phonetic = ReferenceLoader::parse_table(
            r#"{"吾": {"readings": ["ゴ"], "wk-radical": "five mouths", "compounds": ["語", "悟", "誤"]}}"#,
            "test",
        )
        .unwrap();
        let subjects = BTreeMap::from([(s("語"), subject("Language", &["ご"], &["言", "五", "口"]))]);
        let radicals = BTreeMap::from([
            (s("言"), radical("Say")),
            (s("五"), radical("Five")),
            (s("口"), radical("Mouth")),
        ]);
        let visual = BTreeMap::from([(s("語"), vec![s("五"), s("口"), s("言")])]);

        ReferenceStore::new()
            .with_classification(classification)
            .with_phonetic(phonetic)
            .with_wk_subjects(subjects)
            .with_wk_radicals(radicals)
            .with_visual(visual)
    }

    fn symbols(components: &[Component]) -> Vec<&str> {
        components.iter().map(|c| c.symbol.as_str()).collect()
    }

    fn resolve(store: &ReferenceStore, overlay: &PersonalOverlay, kanji: &str) -> KanjiProfile {
        let index = PhoneticFamilyIndex::build(store);
        ProfileResolver::new(store, &index, overlay)
            .resolve(kanji, &ResolveOptions::default())
            .unwrap()
    }

    fn phonetic_count(profile: &KanjiProfile) -> usize {
        profile
            .decomposition
            .iter()
            .filter(|c| c.role == Role::Phonetic)
            .count()
    }

    #[test]
    fn known_phonetic_builds_family_without_target() {
        let store = store();
        let profile = resolve(&store, &PersonalOverlay::default(), "花");

        assert_eq!(profile.classification, Classification::PhoneticSemantic);
        assert_eq!(profile.decomposition_source, DecompositionSource::Classification);
        assert_eq!(profile.phonetic_component().unwrap().symbol, "化");
        assert_eq!(profile.semantic_components().next().unwrap().symbol, "艹");

        let family = profile.phonetic_family.as_ref().unwrap();
        assert_eq!(family.component, "化");
        assert_eq!(family.component_name.as_deref(), Some("change"));
        let members: Vec<&str> = family.members.iter().map(|m| m.kanji.as_str()).collect();
        assert_eq!(members, vec!["貨", "靴"]);
        assert_eq!(family.members[0].matching_reading, "か");
        assert_eq!(family.members[0].meaning.as_deref(), Some("Freight"));
        assert_eq!(family.shared_readings, vec!["か"]);
        assert_eq!(family.family_readings, vec!["か", "け"]);
        assert_eq!(family.look_alikes, vec!["死"]);
        assert_eq!(profile.important_reading, ReadingKind::Onyomi);
    }

    #[test]
    fn inference_fills_missing_phonetic() {
        let store = store();
        let profile = resolve(&store, &PersonalOverlay::default(), "語");

        assert_eq!(profile.classification, Classification::PhoneticSemantic);
        assert_eq!(profile.phonetic_component().unwrap().symbol, "吾");
        assert_eq!(profile.decomposition[0].role, Role::Semantic);
        let members: Vec<&str> = profile
            .phonetic_family
            .as_ref()
            .unwrap()
            .members
            .iter()
            .map(|m| m.kanji.as_str())
            .collect();
        assert_eq!(members, vec!["悟", "誤"]);
    }

    #[test]
    fn inference_without_entry_marks_inferred() {
        let store = store();
        let profile = resolve(&store, &PersonalOverlay::default(), "骸");

        assert_eq!(profile.classification, Classification::PhoneticSemanticInferred);
        assert_eq!(profile.decomposition_source, DecompositionSource::Visual);
        assert_eq!(profile.decomposition[0].role, Role::Semantic);
        assert_eq!(profile.decomposition[1].role, Role::Phonetic);
        assert_eq!(profile.decomposition[1].display_name, "亥");
    }

    #[test]
    fn inference_can_be_disabled() {
        let store = store();
        let index = PhoneticFamilyIndex::build(&store);
        let overlay = PersonalOverlay::default();
        let options = ResolveOptions {
            infer_phonetic: false,
            ..Default::default()
        };
        let profile = ProfileResolver::new(&store, &index, &overlay)
            .resolve("骸", &options)
            .unwrap();

        assert_eq!(profile.classification, Classification::Unknown);
        assert_eq!(phonetic_count(&profile), 0);
        assert!(profile.phonetic_family.is_none());
    }

    #[test]
    fn inference_ties_go_to_earliest_and_mark_one() {
        let store = store();
        let profile = resolve(&store, &PersonalOverlay::default(), "丙");

        assert_eq!(phonetic_count(&profile), 1);
        assert_eq!(profile.phonetic_component().unwrap().symbol, "工");
        assert_eq!(profile.decomposition[1].role, Role::Semantic);
    }

    #[test]
    fn inference_without_evidence_leaves_roles_unspecified() {
        let store = store();
        let profile = resolve(&store, &PersonalOverlay::default(), "峠");

        assert_eq!(profile.classification, Classification::Kokuji);
        assert!(profile.decomposition.iter().all(|c| c.role == Role::Unspecified));
        assert!(profile.phonetic_family.is_none());
        assert_eq!(profile.important_reading, ReadingKind::Kunyomi);
    }

    #[test]
    fn personal_roles_are_authoritative() {
        let store = store();
        let mut overlay = PersonalOverlay::default();
        overlay.decompositions.insert(
            s("骸"),
            PersonalDecomposition::new(vec![], Some(s("亥")), Some(s("骨"))),
        );
        overlay.radicals.insert(s("亥"), s("Pig"));

        let profile = resolve(&store, &overlay, "骸");

        assert_eq!(profile.decomposition_source, DecompositionSource::Personal);
        assert_eq!(profile.decomposition.len(), 2);
        assert_eq!(profile.decomposition[0].symbol, "骨");
        assert_eq!(profile.decomposition[0].role, Role::Semantic);
        assert_eq!(profile.decomposition[1].symbol, "亥");
        assert_eq!(profile.decomposition[1].role, Role::Phonetic);
        assert_eq!(profile.decomposition[1].display_name, "Pig");
        assert_eq!(profile.auto_decomposition.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn personal_parts_replace_automatic_decomposition() {
        let store = store();
        let mut overlay = PersonalOverlay::default();
        overlay.decompositions.insert(
            s("語"),
            PersonalDecomposition::new(vec![s("口"), s("言"), s("五")], None, None),
        );

        let profile = resolve(&store, &overlay, "語");

        let symbols: Vec<&str> = profile.decomposition.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["口", "言", "五"]);
        assert_eq!(profile.decomposition[1].role, Role::Semantic);
        assert_eq!(phonetic_count(&profile), 0);

        let auto: Vec<&str> = profile
            .auto_decomposition
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.symbol.as_str())
            .collect();
        assert_eq!(auto, vec!["言", "吾"]);
    }

    #[test]
    fn wanikani_tier_beats_keisei_and_visual() {
        let store = wanikani_store();
        let index = PhoneticFamilyIndex::build(&store);
        let overlay = PersonalOverlay::default();
        let resolver = ProfileResolver::new(&store, &index, &overlay);
        assert!(resolver.decompose(DecompositionTier::Classification, "語").is_some());
        assert!(resolver.decompose(DecompositionTier::Visual, "語").is_some());

        let profile = resolver.resolve("語", &ResolveOptions::default()).unwrap();

        assert_eq!(profile.decomposition_source, DecompositionSource::WaniKani);
        assert_eq!(symbols(&profile.decomposition), vec!["言", "五", "口"]);
        let names: Vec<&str> = profile
            .decomposition
            .iter()
            .map(|c| c.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Say", "Five", "Mouth"]);
        assert_eq!(profile.meaning.as_deref(), Some("Language"));
        assert_eq!(profile.on_yomi, vec!["ご"]);
    }

    #[test]
    fn wanikani_split_keeps_classification_roles_in_breakdown() {
        let store = wanikani_store();
        let profile = resolve(&store, &PersonalOverlay::default(), "語");

        assert_eq!(profile.decomposition[0].role, Role::Semantic);
        assert_eq!(phonetic_count(&profile), 0);

        let breakdown = profile.breakdown.as_ref().unwrap();
        let semantic = breakdown.semantic.as_ref().unwrap();
        assert_eq!((semantic.symbol.as_str(), semantic.display_name.as_str()), ("言", "Say"));
        let phonetic = breakdown.phonetic.as_ref().unwrap();
        assert_eq!(phonetic.symbol, "吾");
        assert_eq!(phonetic.role, Role::Phonetic);
        assert_eq!(phonetic.display_name, "five mouths");

        let family = profile.phonetic_family.as_ref().unwrap();
        assert_eq!(family.component, phonetic.symbol);
        let members: Vec<&str> = family.members.iter().map(|m| m.kanji.as_str()).collect();
        assert_eq!(members, vec!["悟", "誤"]);
    }

    #[test]
    fn personal_beats_wanikani() {
        let store = wanikani_store();
        let mut overlay = PersonalOverlay::default();
        overlay.decompositions.insert(
            s("語"),
            PersonalDecomposition::new(vec![s("言"), s("吾")], Some(s("吾")), Some(s("言"))),
        );

        let profile = resolve(&store, &overlay, "語");

        assert_eq!(profile.decomposition_source, DecompositionSource::Personal);
        assert_eq!(symbols(&profile.decomposition), vec!["言", "吾"]);
        assert_eq!(profile.phonetic_component().unwrap().symbol, "吾");
        let auto = profile.auto_decomposition.as_ref().unwrap();
        assert_eq!(symbols(auto), vec!["言", "五", "口"]);
    }

    #[test]
    fn personal_radical_names_override_wanikani_names() {
        let store = wanikani_store();
        let mut overlay = PersonalOverlay::default();
        overlay.radicals.insert(s("口"), s("Kuchi"));
        overlay.radicals.insert(s("吾"), s("Me"));

        let profile = resolve(&store, &overlay, "語");

        assert_eq!(profile.decomposition[0].display_name, "Say");
        assert_eq!(profile.decomposition[2].display_name, "Kuchi");
        let phonetic = profile.breakdown.as_ref().unwrap().phonetic.as_ref().unwrap();
        assert_eq!(phonetic.display_name, "Me");
        assert_eq!(
            profile.phonetic_family.as_ref().unwrap().component_name.as_deref(),
            Some("Me")
        );
    }

    #[test]
    fn breakdown_only_for_phonetic_semantic() {
        let store = store();
        let flower = resolve(&store, &PersonalOverlay::default(), "花");
        let breakdown = flower.breakdown.as_ref().unwrap();
        assert_eq!(breakdown.semantic.as_ref().unwrap().symbol, "艹");
        assert_eq!(breakdown.phonetic.as_ref().unwrap().symbol, "化");

        let pass = resolve(&store, &PersonalOverlay::default(), "峠");
        assert!(pass.breakdown.is_none());
    }

    #[test]
    fn missing_everywhere_is_not_found() {
        let store = store();
        let index = PhoneticFamilyIndex::build(&store);
        let overlay = PersonalOverlay::default();
        let resolver = ProfileResolver::new(&store, &index, &overlay);

        let err = resolver.resolve("鬱", &ResolveOptions::default()).unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            resolver.resolve("花火", &ResolveOptions::default()),
            Err(ResolveError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn batch_records_failures() {
        let store = store();
        let index = PhoneticFamilyIndex::build(&store);
        let overlay = PersonalOverlay::default();
        let resolver = ProfileResolver::new(&store, &index, &overlay);

        let report = resolver.resolve_batch(&["花", "鬱"], &ResolveOptions::default());
        assert_eq!(report.profiles().count(), 1);
        let failures: Vec<&str> = report.failures().map(|(input, _)| input).collect();
        assert_eq!(failures, vec!["鬱"]);
        assert!(!report.all_failed());

        let report = resolver.resolve_batch(&["鬱"], &ResolveOptions::default());
        assert!(report.all_failed());
        assert!(!BatchReport::default().all_failed());
    }

    #[test]
    fn important_reading_precedence() {
        let store = store();
        let index = PhoneticFamilyIndex::build(&store);
        let mut overlay = PersonalOverlay::default();
        let one_shot = ResolveOptions {
            primary_reading_override: Some(ReadingKind::Kunyomi),
            ..Default::default()
        };

        let resolver = ProfileResolver::new(&store, &index, &overlay);
        let declared = resolver.resolve("語", &ResolveOptions::default()).unwrap();
        assert_eq!(declared.important_reading, ReadingKind::Onyomi);
        let profile = resolver.resolve("語", &one_shot).unwrap();
        assert_eq!(profile.important_reading, ReadingKind::Kunyomi);

        overlay.reading_overrides.insert(s("語"), ReadingKind::Onyomi);
        let resolver = ProfileResolver::new(&store, &index, &overlay);
        let profile = resolver.resolve("語", &one_shot).unwrap();
        assert_eq!(profile.important_reading, ReadingKind::Onyomi);
    }

    #[test]
    fn important_reading_heuristic() {
        assert_eq!(infer_important_reading(true, true, true, true), ReadingKind::Onyomi);
        assert_eq!(infer_important_reading(false, false, false, true), ReadingKind::Kunyomi);
        assert_eq!(infer_important_reading(true, false, true, true), ReadingKind::Onyomi);
        assert_eq!(infer_important_reading(false, false, false, false), ReadingKind::Onyomi);
    }

    #[test]
    fn sound_mnemonics_prefer_personal() {
        let store = store();
        let mut overlay = PersonalOverlay::default();
        overlay.sound_mnemonics.insert(s("か"), sound("Car"));

        let profile = resolve(&store, &overlay, "花");
        let sounds: Vec<(&str, &str, bool)> = profile
            .relevant_sound_mnemonics
            .iter()
            .map(|m| (m.reading.as_str(), m.name.as_str(), m.personal))
            .collect();
        assert_eq!(sounds, vec![("か", "Car", true), ("け", "Keg", false)]);
    }

    #[test]
    fn kunyomi_stems_join_sound_lookup() {
        let store = store();
        let mut overlay = PersonalOverlay::default();
        overlay.reading_overrides.insert(s("語"), ReadingKind::Kunyomi);

        let profile = resolve(&store, &overlay, "語");
        let readings: Vec<&str> = profile
            .relevant_sound_mnemonics
            .iter()
            .map(|m| m.reading.as_str())
            .collect();
        assert_eq!(readings, vec!["かた"]);
    }
}
