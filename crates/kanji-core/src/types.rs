use serde::{Deserialize, Serialize};

/// Which family of readings a kanji is primarily learned by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    Onyomi,
    Kunyomi,
}

impl ReadingKind {
    /// Parse from the stored string form ("onyomi" / "kunyomi")
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "onyomi" => Some(ReadingKind::Onyomi),
            "kunyomi" => Some(ReadingKind::Kunyomi),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingKind::Onyomi => "onyomi",
            ReadingKind::Kunyomi => "kunyomi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReadingKind::Onyomi => "On'yomi",
            ReadingKind::Kunyomi => "Kun'yomi",
        }
    }
}

/// Formation type of a kanji (六書 categories as used by the Keisei tables)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    PhoneticSemantic,
    /// Phonetic-semantic, but derived from component evidence rather than the table
    PhoneticSemanticInferred,
    Pictograph,
    CompoundIndicative,
    SimpleIndicative,
    Derivative,
    Rebus,
    Kokuji,
    Shinjitai,
    Unknown,
}

impl Classification {
    /// Map a Keisei `type` value. `unprocessed` means the entry carries no
    /// classification at all and yields `None`.
    pub fn from_keisei(s: &str) -> Option<Self> {
        match s {
            "unprocessed" => None,
            "comp_phonetic" => Some(Classification::PhoneticSemantic),
            "comp_phonetic_inferred" => Some(Classification::PhoneticSemanticInferred),
            "hieroglyph" => Some(Classification::Pictograph),
            "comp_indicative" => Some(Classification::CompoundIndicative),
            "indicative" => Some(Classification::SimpleIndicative),
            "derivative" => Some(Classification::Derivative),
            "rebus" => Some(Classification::Rebus),
            "kokuji" => Some(Classification::Kokuji),
            "shinjitai" => Some(Classification::Shinjitai),
            _ => Some(Classification::Unknown),
        }
    }

    pub fn is_phonetic_semantic(&self) -> bool {
        matches!(
            self,
            Classification::PhoneticSemantic | Classification::PhoneticSemanticInferred
        )
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Classification::PhoneticSemantic => "Phonetic-Semantic Compound (形声)",
            Classification::PhoneticSemanticInferred => {
                "Phonetic-Semantic Compound (形声) [inferred from components]"
            }
            Classification::Pictograph => "Hieroglyph / Pictograph (象形)",
            Classification::CompoundIndicative => "Compound Indicative (会意)",
            Classification::SimpleIndicative => "Simple Indicative (指事)",
            Classification::Derivative => "Derivative Cognate (転注)",
            Classification::Rebus => "Phonetic Loan (仮借)",
            Classification::Kokuji => "Japanese-made Kanji (国字)",
            Classification::Shinjitai => "Simplified Form (新字体)",
            Classification::Unknown => "Unknown origin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Semantic,
    Phonetic,
    Unspecified,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Semantic => "semantic",
            Role::Phonetic => "phonetic",
            Role::Unspecified => "unspecified",
        }
    }
}

/// One structural part of a kanji
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub symbol: String,
    pub role: Role,
    /// Resolved radical name, or the raw symbol when no name is known
    pub display_name: String,
}

impl Component {
    pub fn new(symbol: impl Into<String>, display_name: Option<String>) -> Self {
        let symbol = symbol.into();
        let display_name = display_name.unwrap_or_else(|| symbol.clone());
        Self {
            symbol,
            role: Role::Unspecified,
            display_name,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Whether a real name was resolved (rather than falling back to the symbol)
    pub fn is_named(&self) -> bool {
        self.display_name != self.symbol
    }
}

/// The tier that produced a profile's decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecompositionSource {
    Personal,
    WaniKani,
    Classification,
    Visual,
    None,
}

impl DecompositionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecompositionSource::Personal => "personal",
            DecompositionSource::WaniKani => "wanikani",
            DecompositionSource::Classification => "keisei",
            DecompositionSource::Visual => "kradfile",
            DecompositionSource::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyMember {
    pub kanji: String,
    pub meaning: Option<String>,
    /// First on'yomi (in the queried kanji's order) shared with the queried kanji
    pub matching_reading: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneticFamily {
    pub component: String,
    pub component_name: Option<String>,
    /// On'yomi of the queried kanji that at least one member shares
    pub shared_readings: Vec<String>,
    /// Readings the phonetic database lists for the whole family
    pub family_readings: Vec<String>,
    pub members: Vec<FamilyMember>,
    /// Kanji that contain the component but do not take its reading
    pub look_alikes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundMnemonicMatch {
    pub reading: String,
    pub name: String,
    pub description: String,
    pub personal: bool,
}

/// Semantic and phonetic parts named by the classification, kept apart from
/// the decomposition tier that supplied the components
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleBreakdown {
    pub semantic: Option<Component>,
    pub phonetic: Option<Component>,
}

/// Fully resolved kanji profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KanjiProfile {
    pub character: String,
    pub meaning: Option<String>,
    pub wanikani_level: Option<u32>,
    pub on_yomi: Vec<String>,
    pub kun_yomi: Vec<String>,
    pub important_reading: ReadingKind,
    pub classification: Classification,
    pub decomposition: Vec<Component>,
    pub decomposition_source: DecompositionSource,
    /// What the automatic tiers produced when a personal decomposition won
    pub auto_decomposition: Option<Vec<Component>>,
    /// Present for phonetic-semantic kanji with a known semantic or phonetic part
    pub breakdown: Option<RoleBreakdown>,
    pub phonetic_family: Option<PhoneticFamily>,
    pub relevant_sound_mnemonics: Vec<SoundMnemonicMatch>,
}

impl KanjiProfile {
    pub fn phonetic_component(&self) -> Option<&Component> {
        self.decomposition.iter().find(|c| c.role == Role::Phonetic)
    }

    pub fn semantic_components(&self) -> impl Iterator<Item = &Component> {
        self.decomposition.iter().filter(|c| c.role == Role::Semantic)
    }

    pub fn readings(&self, kind: ReadingKind) -> &[String] {
        match kind {
            ReadingKind::Onyomi => &self.on_yomi,
            ReadingKind::Kunyomi => &self.kun_yomi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keisei_types_map_to_classifications() {
        assert_eq!(Classification::from_keisei("unprocessed"), None);
        assert_eq!(
            Classification::from_keisei("comp_phonetic"),
            Some(Classification::PhoneticSemantic)
        );
        assert_eq!(
            Classification::from_keisei("hieroglyph"),
            Some(Classification::Pictograph)
        );
        assert_eq!(
            Classification::from_keisei("something_new"),
            Some(Classification::Unknown)
        );
        assert!(Classification::PhoneticSemanticInferred.is_phonetic_semantic());
        assert!(!Classification::Kokuji.is_phonetic_semantic());
    }

    #[test]
    fn unnamed_components_display_their_symbol() {
        let bare = Component::new("亥", None);
        assert_eq!(bare.display_name, "亥");
        assert!(!bare.is_named());
        assert_eq!(bare.role, Role::Unspecified);

        let named = Component::new("言", Some("Say".to_string())).with_role(Role::Semantic);
        assert!(named.is_named());
        assert_eq!(named.role, Role::Semantic);
    }

    #[test]
    fn reading_kind_parses_stored_form() {
        assert_eq!(ReadingKind::from_str(" Kunyomi "), Some(ReadingKind::Kunyomi));
        assert_eq!(ReadingKind::from_str("nanori"), None);
        assert_eq!(ReadingKind::Onyomi.label(), "On'yomi");
    }
}
