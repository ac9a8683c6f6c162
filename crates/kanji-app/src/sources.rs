//! Download and cache the static reference databases

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use kanji_config::Config;
use kanji_lang_japanese::ReferenceLoader;
use kanji_lang_japanese::loader::{
    KANJI_DB, KANJIDIC, KRADFILE, PHONETIC_DB, WK_KANJI_DB, WK_KANJI_SUBJECTS, WK_RADICALS,
};
use kanji_wanikani::WaniKaniClient;
use serde::Serialize;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Every file the cache directory may hold
pub const CACHE_FILES: [&str; 7] = [
    KANJI_DB,
    PHONETIC_DB,
    WK_KANJI_DB,
    KRADFILE,
    KANJIDIC,
    WK_RADICALS,
    WK_KANJI_SUBJECTS,
];

pub struct SourceCache<'a> {
    config: &'a Config,
    client: reqwest::Client,
}

impl<'a> SourceCache<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { config, client })
    }

    /// Make sure every reference table is cached. The Keisei tables are
    /// required; the rest degrade to a warning.
    pub async fn ensure_all(&self) -> Result<()> {
        self.ensure_keisei().await?;

        if let Err(e) = self.ensure_kradfile().await {
            tracing::warn!("KRADFILE unavailable: {:#}", e);
        }
        if let Err(e) = self.ensure_kanjidic() {
            tracing::warn!("KANJIDIC unavailable: {:#}", e);
        }
        if let Err(e) = self.ensure_wanikani().await {
            tracing::warn!("WaniKani data unavailable: {:#}", e);
        }
        Ok(())
    }

    async fn ensure_keisei(&self) -> Result<()> {
        let sources = &self.config.sources;
        for (name, url) in [
            (KANJI_DB, &sources.kanji_db_url),
            (PHONETIC_DB, &sources.phonetic_db_url),
            (WK_KANJI_DB, &sources.wk_kanji_db_url),
        ] {
            let path = self.config.paths.cache_file(name);
            if path.exists() {
                continue;
            }

            eprintln!("Downloading {}...", name);
            let text = self.fetch_text(url).await?;
            let table: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", url))?;
            if !table.is_object() {
                bail!("{} is not a JSON object", url);
            }
            write_text_atomic(&path, &text)?;
            tracing::info!("Cached {} at {}", name, path.display());
        }
        Ok(())
    }

    async fn ensure_kradfile(&self) -> Result<()> {
        let path = self.config.paths.cache_file(KRADFILE);
        if path.exists() {
            return Ok(());
        }

        eprintln!("Downloading KRADFILE-u...");
        for url in &self.config.sources.kradfile_urls {
            match self.fetch_text(url).await {
                Ok(text) => {
                    let table = ReferenceLoader::parse_kradfile(&text);
                    write_json_atomic(&path, &table)?;
                    tracing::info!("Cached {} KRADFILE entries", table.len());
                    return Ok(());
                }
                Err(e) => tracing::debug!("KRADFILE mirror {} failed: {:#}", url, e),
            }
        }
        bail!("no KRADFILE mirror answered")
    }

    pub(crate) fn ensure_kanjidic(&self) -> Result<()> {
        let path = self.config.paths.cache_file(KANJIDIC);
        if path.exists() {
            return Ok(());
        }
        let Some(source) = &self.config.sources.kanjidic_path else {
            tracing::debug!("KANJIDIC_PATH not set, skipping kanjidic2");
            return Ok(());
        };

        let json = std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read {}", source.display()))?;
        let table = ReferenceLoader::parse_kanjidic(&json)?;
        write_json_atomic(&path, &table)
    }

    pub(crate) async fn ensure_wanikani(&self) -> Result<()> {
        let radicals_path = self.config.paths.cache_file(WK_RADICALS);
        let subjects_path = self.config.paths.cache_file(WK_KANJI_SUBJECTS);
        if radicals_path.exists() && subjects_path.exists() {
            return Ok(());
        }

        let Some(api_key) = &self.config.wanikani.api_key else {
            eprintln!("Warning: WK_API_KEY is not set and no WaniKani data is cached.");
            eprintln!("  Radical names will be missing. Create a token at");
            eprintln!("  https://www.wanikani.com/settings/personal_access_tokens");
            return Ok(());
        };

        let client = WaniKaniClient::new(self.config.wanikani.api_url.clone(), api_key.clone());
        eprintln!("Fetching WaniKani radicals...");
        let radicals = client.radicals().await?;
        if !radicals_path.exists() {
            write_json_atomic(&radicals_path, &radicals.records)?;
        }
        if !subjects_path.exists() {
            eprintln!("Fetching WaniKani kanji...");
            write_json_atomic(&subjects_path, &client.kanji_subjects(&radicals).await?)?;
        }
        Ok(())
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?
            .error_for_status()
            .with_context(|| format!("{} returned an error", url))?
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", url))
    }
}

/// Delete every cached database. Returns how many files were removed.
pub fn clear_cache(cache_dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for name in CACHE_FILES {
        let path = cache_dir.join(format!("{}.json", name));
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).context("Failed to serialize cache file")?;
    write_text_atomic(path, &json)
}

fn write_text_atomic(path: &Path, text: &str) -> Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("{} has no parent directory", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
