pub mod index;
pub mod kana;
pub mod loader;
pub mod prompt;
pub mod reference;
pub mod resolver;

pub use index::{FamilyCandidate, PhoneticFamilyIndex};
pub use loader::ReferenceLoader;
pub use prompt::{PromptOptions, RenderOptions, SYSTEM_PROMPT, assemble, render_profile};
pub use reference::{
    KanjidicEntry, KeiseiEntry, PhoneticEntry, READING_TIERS, ReadingRecord, ReadingTier,
    ReferenceStore, WkKanjiEntry,
};
pub use resolver::{
    BatchItem, BatchReport, DECOMPOSITION_TIERS, DecompositionTier, ProfileResolver,
    ResolveOptions, infer_important_reading,
};
