use anyhow::{Context, Result};
use kanji_config::Config;
use kanji_core::{ChainedNames, RadicalNames};
use kanji_lang_japanese::{PhoneticFamilyIndex, ProfileResolver, ReferenceLoader, ReferenceStore};
use kanji_overlay::{OverlayStore, PersonalOverlay};

use crate::sources::SourceCache;

/// Everything a resolving command reads, loaded once per invocation
pub struct AppState {
    pub config: Config,
    pub overlay_store: OverlayStore,
    pub overlay: PersonalOverlay,
    pub reference: ReferenceStore,
    pub index: PhoneticFamilyIndex,
}

impl AppState {
    /// Fetch missing databases, then load reference data and the overlay
    pub async fn load(config: Config) -> Result<Self> {
        SourceCache::new(&config)?.ensure_all().await?;

        let reference = ReferenceLoader::load_from_cache(&config.paths.cache_dir)
            .context("Failed to load reference databases (try `kanji clear-cache`)")?;
        Ok(Self::from_parts(config, reference))
    }

    pub fn from_parts(config: Config, reference: ReferenceStore) -> Self {
        let overlay_store = OverlayStore::new(config.paths.config_dir.clone());
        let overlay = overlay_store.load();
        let index = PhoneticFamilyIndex::build(&reference);

        Self {
            config,
            overlay_store,
            overlay,
            reference,
            index,
        }
    }

    pub fn resolver(&self) -> ProfileResolver<'_> {
        ProfileResolver::new(&self.reference, &self.index, &self.overlay)
    }

    /// Personal names first, then WaniKani names
    pub fn names(&self) -> ChainedNames<'_> {
        ChainedNames::new(vec![
            self.overlay.radical_names(),
            &self.reference as &dyn RadicalNames,
        ])
    }
}
