use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use kanji_lang_japanese::{
    PromptOptions, RenderOptions, ResolveOptions, SYSTEM_PROMPT, assemble, render_profile,
};
use kanji_overlay::OverlayStore;

use super::report_failures;
use crate::state::AppState;

pub struct LookupArgs {
    pub kanji: Vec<String>,
    pub options: ResolveOptions,
    pub all_decomp: bool,
    pub sound: bool,
    pub json: bool,
}

pub fn lookup(state: &AppState, args: &LookupArgs, out: &mut dyn Write) -> Result<ExitCode> {
    let report = state.resolver().resolve_batch(&args.kanji, &args.options);

    if args.json {
        let profiles: Vec<_> = report.profiles().collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&profiles)?)?;
    } else {
        let render = RenderOptions {
            show_all_decomposition: args.all_decomp,
            show_sound_mnemonics: args.sound,
        };
        for profile in report.profiles() {
            writeln!(out, "{}", render_profile(profile, &render))?;
            writeln!(out)?;
        }
    }

    Ok(report_failures(&report))
}

pub fn prompt(
    state: &AppState,
    kanji: &[String],
    options: &ResolveOptions,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let report = state.resolver().resolve_batch(kanji, options);

    for profile in report.profiles() {
        writeln!(out, "── SYSTEM PROMPT ──")?;
        writeln!(out, "{}", SYSTEM_PROMPT)?;
        writeln!(out, "── USER MESSAGE ──")?;
        writeln!(
            out,
            "{}",
            assemble(
                profile,
                options.personal_context.as_deref(),
                &PromptOptions::default()
            )
        )?;
        writeln!(out)?;
    }

    Ok(report_failures(&report))
}

/// Print saved mnemonics
pub fn show(store: &OverlayStore, kanji: &[String], out: &mut dyn Write) -> Result<()> {
    for character in kanji {
        match store.mnemonic_for(character) {
            Some(saved) => {
                writeln!(out, "═══ {} ═══  ({}, {})", character, saved.model, saved.timestamp)?;
                writeln!(out, "{}", saved.mnemonic)?;
                writeln!(out)?;
            }
            None => writeln!(out, "No saved mnemonic for {}", character)?,
        }
    }
    Ok(())
}
