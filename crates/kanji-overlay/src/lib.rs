mod records;
mod store;

pub use records::{PersonalDecomposition, PersonalOverlay, SavedMnemonic, SoundMnemonic};
pub use store::{OverlayError, OverlayStore};
