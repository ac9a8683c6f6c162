pub mod error;
pub mod preprocess;
pub mod radical;
pub mod types;

pub use error::{LoadError, ResolveError};
pub use preprocess::{DefaultPreprocessor, Preprocessor};
pub use radical::{ChainedNames, RadicalNames};
pub use types::{
    Classification, Component, DecompositionSource, FamilyMember, KanjiProfile, PhoneticFamily,
    ReadingKind, Role, RoleBreakdown, SoundMnemonicMatch,
};
