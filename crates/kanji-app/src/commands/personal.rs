//! Commands that edit the personal overlay

use std::io::Write;

use anyhow::{Result, anyhow, bail};
use kanji_core::{DefaultPreprocessor, Preprocessor, RadicalNames, ReadingKind};
use kanji_lang_japanese::ReferenceStore;
use kanji_lang_japanese::kana::katakana_to_hiragana;
use kanji_overlay::{OverlayStore, PersonalDecomposition, SoundMnemonic};

use crate::state::AppState;

pub struct DecomposeArgs {
    pub kanji: String,
    pub parts: Vec<String>,
    pub phonetic: Option<String>,
    pub semantic: Option<String>,
    pub remove: bool,
}

/// A single character passes through; anything longer is a radical name
pub fn resolve_part(part: &str, names: &dyn RadicalNames) -> Result<String> {
    let part = part.trim();
    if part.chars().count() == 1 {
        return Ok(part.to_string());
    }
    names.find_symbol(part).ok_or_else(|| {
        anyhow!(
            "\"{part}\" is not a known radical name. Use 'kanji name <radical> {part}' to add it first."
        )
    })
}

fn decomposition_labels(record: &PersonalDecomposition) -> Vec<String> {
    record
        .parts
        .iter()
        .map(|p| {
            if Some(p) == record.semantic.as_ref() {
                format!("{} (semantic)", p)
            } else if Some(p) == record.phonetic.as_ref() {
                format!("{} (phonetic)", p)
            } else {
                p.clone()
            }
        })
        .collect()
}

pub fn decompose(state: &AppState, args: &DecomposeArgs, out: &mut dyn Write) -> Result<()> {
    let kanji = DefaultPreprocessor.single_character(&args.kanji)?;
    let store = &state.overlay_store;

    if args.remove {
        if store.remove_decomposition(&kanji)? {
            writeln!(out, "Removed personal decomposition for {}", kanji)?;
        } else {
            writeln!(out, "No personal decomposition saved for {}", kanji)?;
        }
        return Ok(());
    }

    if args.parts.is_empty() && args.phonetic.is_none() && args.semantic.is_none() {
        match state.overlay.decomposition(&kanji) {
            Some(record) => writeln!(out, "{} → {}", kanji, decomposition_labels(record).join(", "))?,
            None => writeln!(out, "No personal decomposition saved for {}", kanji)?,
        }
        return Ok(());
    }

    let names = state.names();
    let parts = args
        .parts
        .iter()
        .map(|p| resolve_part(p, &names))
        .collect::<Result<Vec<_>>>()?;
    let phonetic = args
        .phonetic
        .as_deref()
        .map(|p| resolve_part(p, &names))
        .transpose()?;
    let semantic = args
        .semantic
        .as_deref()
        .map(|s| resolve_part(s, &names))
        .transpose()?;

    let record = PersonalDecomposition::new(parts, phonetic, semantic);
    store.save_decomposition(&kanji, record.clone())?;

    let labels: Vec<String> = record
        .parts
        .iter()
        .map(|p| {
            let mut label = p.clone();
            if let Some(name) = names
                .radical_name(p)
                .or_else(|| state.reference.component_meaning(p))
            {
                label.push_str(&format!(" ({})", name));
            }
            if Some(p) == record.semantic.as_ref() {
                label.push_str(" [semantic]");
            } else if Some(p) == record.phonetic.as_ref() {
                label.push_str(" [phonetic]");
            }
            label
        })
        .collect();
    writeln!(out, "Saved: {} → {}", kanji, labels.join(", "))?;
    Ok(())
}

pub fn name(store: &OverlayStore, radical: &str, name: &str, out: &mut dyn Write) -> Result<()> {
    let radical = DefaultPreprocessor.single_character(radical)?;
    let name = name.trim();
    if name.is_empty() {
        bail!("A radical name cannot be empty");
    }
    store.save_radical(&radical, name)?;
    writeln!(out, "Saved: {} → {}", radical, name)?;
    Ok(())
}

pub fn names(store: &OverlayStore, out: &mut dyn Write) -> Result<()> {
    let radicals = store.radicals();
    if radicals.is_empty() {
        writeln!(out, "No personal radical names yet.")?;
        writeln!(out, "Use 'kanji name <radical> <name>' to add one.")?;
        return Ok(());
    }
    for (radical, name) in radicals {
        writeln!(out, "  {} → {}", radical, name)?;
    }
    Ok(())
}

pub fn reading(
    store: &OverlayStore,
    kanji: &str,
    kind: Option<ReadingKind>,
    remove: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let kanji = DefaultPreprocessor.single_character(kanji)?;

    if remove {
        if store.remove_reading_override(&kanji)? {
            writeln!(out, "Removed reading override for {}", kanji)?;
        } else {
            writeln!(out, "No reading override for {}", kanji)?;
        }
        return Ok(());
    }

    match kind {
        Some(kind) => {
            store.save_reading_override(&kanji, kind)?;
            writeln!(out, "Saved: {} → {}", kanji, kind.as_str())?;
        }
        None => match store.reading_overrides().get(&kanji) {
            Some(kind) => writeln!(out, "{} → {}", kanji, kind.as_str())?,
            None => writeln!(out, "No reading override for {}", kanji)?,
        },
    }
    Ok(())
}

pub fn readings(store: &OverlayStore, out: &mut dyn Write) -> Result<()> {
    let overrides = store.reading_overrides();
    if overrides.is_empty() {
        writeln!(out, "No reading overrides yet.")?;
        writeln!(out, "Use 'kanji reading <kanji> onyomi|kunyomi' to add one.")?;
        return Ok(());
    }
    for (kanji, kind) in overrides {
        writeln!(out, "  {} → {}", kanji, kind.as_str())?;
    }
    Ok(())
}

pub fn sound(
    store: &OverlayStore,
    reading: &str,
    character: Option<&str>,
    description: Option<&str>,
    remove: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let reading = katakana_to_hiragana(reading.trim());
    if reading.is_empty() {
        bail!("A reading is required");
    }

    if remove {
        if store.remove_sound_mnemonic(&reading)? {
            writeln!(out, "Removed personal sound mnemonic for {}", reading)?;
        } else {
            writeln!(out, "No personal sound mnemonic for {}", reading)?;
        }
        return Ok(());
    }

    match (character, description) {
        (Some(character), Some(description)) => {
            let mnemonic = SoundMnemonic {
                character: character.to_string(),
                description: description.to_string(),
            };
            store.save_sound_mnemonic(&reading, mnemonic)?;
            writeln!(out, "Saved: {} → {}: {}", reading, character, description)?;
        }
        (Some(_), None) | (None, Some(_)) => {
            bail!("Both a character and a description are needed: kanji sound <reading> <character> <description>")
        }
        (None, None) => match store.sound_mnemonics().get(&reading) {
            Some(sound) => writeln!(out, "{} → {}: {}", reading, sound.character, sound.description)?,
            None => {
                writeln!(out, "No personal sound mnemonic for {}", reading)?;
                writeln!(out, "Use 'kanji sound <reading> <character> <description>' to add one.")?;
            }
        },
    }
    Ok(())
}

/// List bundled sound mnemonics merged with personal ones, or only personal
pub fn sounds(
    store: &OverlayStore,
    reference: &ReferenceStore,
    personal_only: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let personal = store.sound_mnemonics();

    if personal_only {
        if personal.is_empty() {
            writeln!(out, "No personal sound mnemonics yet.")?;
            writeln!(out, "Use 'kanji sound <reading> <character> <description>' to add one.")?;
            return Ok(());
        }
        for (reading, sound) in &personal {
            writeln!(out, "  {} → {}: {}", reading, sound.character, sound.description)?;
        }
        return Ok(());
    }

    let mut merged = reference.default_sound_mnemonics().clone();
    for (reading, sound) in &personal {
        merged.insert(reading.clone(), sound.clone());
    }
    if merged.is_empty() {
        writeln!(out, "No sound mnemonics available.")?;
        return Ok(());
    }
    for (reading, sound) in &merged {
        let marker = if personal.contains_key(reading) { " (personal)" } else { "" };
        writeln!(
            out,
            "  {} → {}: {}{}",
            reading, sound.character, sound.description, marker
        )?;
    }
    Ok(())
}
