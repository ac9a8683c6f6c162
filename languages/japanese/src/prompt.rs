//! Prompt assembly and human-readable profile display

use kanji_core::{Component, KanjiProfile, ReadingKind, Role};

pub const SYSTEM_PROMPT: &str = "\
You write memorable kanji mnemonics in the WaniKani style for a learner who already \
knows the WaniKani radical names.

## Meaning mnemonics
- Turn the component names into characters, objects or actions in a short scene
- Make the meaning feel like the only possible outcome of the scene
- Two to four sentences, concrete and visual; absurd details are welcome

## Reading mnemonics
- Hook the primary reading onto an English word, name or phrase that sounds like it
- Established hooks such as しょう = Shogun or こう = Koala are fine, new ones are too
- Give kun'yomi the same treatment when they are the primary reading

## Phonetic-semantic compounds
- Open with the structure: the semantic part points at the meaning, the phonetic part \
carries the reading shared with its family
- Keep the meaning story shorter, since the phonetic part already explains the reading
- Name a few family members so the learner can link them

## Sound mnemonic characters
- When recurring characters are listed for a reading, use that character as the \
reading hook instead of inventing a new one
- Personal characters always win over defaults

## Style
- Readings in hiragana, never romaji
- Bold the hook word of the reading mnemonic
- Cover the primary reading first and mention a secondary one briefly if it matters
- If a component has no name, say so rather than inventing one
";

const UNNAMED_HINT: &str = "(no name, add one with `kanji name";

#[derive(Debug, Clone)]
pub struct PromptOptions {
    pub include_sound_mnemonics: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            include_sound_mnemonics: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Also list the automatic decomposition hidden by a personal one
    pub show_all_decomposition: bool,
    pub show_sound_mnemonics: bool,
}

fn component_name(component: &Component) -> String {
    if component.is_named() {
        component.display_name.clone()
    } else {
        format!("{} {} <name>`)", UNNAMED_HINT, component.symbol)
    }
}

fn component_line(component: &Component) -> String {
    let name = component_name(component);
    match component.role {
        Role::Unspecified => format!("  {} → {}", component.symbol, name),
        role => format!("  {} → {} [{}]", component.symbol, name, role.as_str()),
    }
}

fn reading_line(profile: &KanjiProfile, kind: ReadingKind) -> Option<String> {
    let readings = profile.readings(kind);
    if readings.is_empty() {
        return None;
    }
    let marker = if profile.important_reading == kind { " ★ important" } else { "" };
    Some(format!("{}: {}{}", kind.label(), readings.join(", "), marker))
}

fn sound_lines(profile: &KanjiProfile, lines: &mut Vec<String>) {
    if profile.relevant_sound_mnemonics.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("── Sound mnemonics ──".to_string());
    for sound in &profile.relevant_sound_mnemonics {
        let origin = if sound.personal { " (personal)" } else { "" };
        lines.push(format!(
            "  {} → {}: {}{}",
            sound.reading, sound.name, sound.description, origin
        ));
    }
}

fn profile_lines(profile: &KanjiProfile, options: &RenderOptions) -> Vec<String> {
    let mut lines = vec![format!("═══ {} ═══", profile.character)];

    if let Some(meaning) = &profile.meaning {
        lines.push(format!("Meaning: {}", meaning));
    }
    if let Some(level) = profile.wanikani_level {
        lines.push(format!("WaniKani level: {}", level));
    }
    lines.extend(reading_line(profile, ReadingKind::Onyomi));
    lines.extend(reading_line(profile, ReadingKind::Kunyomi));
    let important = profile.readings(profile.important_reading);
    if !important.is_empty() {
        lines.push(format!(
            "Important reading: {} ({})",
            profile.important_reading.label(),
            important.join(", ")
        ));
    }

    lines.push(String::new());
    lines.push(format!("Type: {}", profile.classification.label()));

    if !profile.decomposition.is_empty() {
        lines.push(format!(
            "Components ({}):",
            profile.decomposition_source.as_str()
        ));
        lines.extend(profile.decomposition.iter().map(component_line));
    }

    if options.show_all_decomposition {
        if let Some(auto) = &profile.auto_decomposition {
            lines.push("Automatic components (not used):".to_string());
            lines.extend(auto.iter().map(component_line));
        }
    }

    if let Some(breakdown) = &profile.breakdown {
        lines.push(String::new());
        lines.push("── Phonetic-semantic breakdown ──".to_string());
        if let Some(semantic) = &breakdown.semantic {
            lines.push(format!(
                "  Semantic (meaning): {} → {}",
                semantic.symbol,
                component_name(semantic)
            ));
        }
        if let Some(phonetic) = &breakdown.phonetic {
            lines.push(format!(
                "  Phonetic (sound): {} → {}",
                phonetic.symbol,
                component_name(phonetic)
            ));
        }
    }

    if let Some(family) = &profile.phonetic_family {
        lines.push(String::new());
        lines.push("── Phonetic family ──".to_string());
        let name = family.component_name.as_deref().unwrap_or("no WaniKani name");
        lines.push(format!("  Phonetic component: {} ({})", family.component, name));
        if !family.family_readings.is_empty() {
            lines.push(format!("  Family readings: {}", family.family_readings.join(", ")));
        }
        if !family.shared_readings.is_empty() {
            lines.push(format!("  Shared readings: {}", family.shared_readings.join(", ")));
        }
        if !family.members.is_empty() {
            lines.push("  Other kanji in this family:".to_string());
            for member in &family.members {
                lines.push(format!(
                    "    {} - {} ({})",
                    member.kanji,
                    member.meaning.as_deref().unwrap_or("?"),
                    member.matching_reading
                ));
            }
        }
        if !family.look_alikes.is_empty() {
            lines.push(format!(
                "  ⚠ Looks similar but reads differently: {}",
                family.look_alikes.join(", ")
            ));
        }
    }

    if options.show_sound_mnemonics {
        sound_lines(profile, &mut lines);
    }

    lines
}

/// Human-readable profile for `lookup`
pub fn render_profile(profile: &KanjiProfile, options: &RenderOptions) -> String {
    profile_lines(profile, options).join("\n")
}

/// Build the user message for mnemonic generation. Output depends only on
/// the arguments.
pub fn assemble(
    profile: &KanjiProfile,
    personal_context: Option<&str>,
    options: &PromptOptions,
) -> String {
    let mut lines = vec!["Generate a mnemonic for this kanji:".to_string(), String::new()];
    lines.extend(profile_lines(profile, &RenderOptions::default()));

    if options.include_sound_mnemonics {
        sound_lines(profile, &mut lines);
    }

    if let Some(context) = personal_context.filter(|c| !c.trim().is_empty()) {
        lines.push(String::new());
        lines.push("── Additional context from user ──".to_string());
        lines.push(context.to_string());
    }

    let reading_target = match profile.readings(profile.important_reading).first() {
        Some(reading) => format!("{}: {}", profile.important_reading.label(), reading),
        None => profile.important_reading.label().to_string(),
    };

    lines.push(String::new());
    lines.push("── Please generate ──".to_string());
    lines.push(
        "1. **Meaning mnemonic**: a short story linking the component names to the meaning"
            .to_string(),
    );
    lines.push(format!(
        "2. **Reading mnemonic**: a hook for the primary reading ({})",
        reading_target
    ));
    if profile.classification.is_phonetic_semantic() && profile.phonetic_family.is_some() {
        lines.push(
            "3. **Phonetic family note**: a brief note on the shared phonetic reading".to_string(),
        );
    }

    lines.join("\n")
}
