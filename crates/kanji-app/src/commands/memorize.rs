use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use kanji_core::KanjiProfile;
use kanji_lang_japanese::{
    PromptOptions, RenderOptions, ResolveOptions, SYSTEM_PROMPT, assemble, render_profile,
};
use kanji_llm::TextGenerator;
use kanji_overlay::OverlayStore;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use super::report_failures;
use crate::state::AppState;

pub struct MemorizeArgs {
    pub kanji: Vec<String>,
    pub interactive: bool,
    pub options: ResolveOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Accept,
    Retry,
    Edit,
    Quit,
}

impl Choice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "a" | "accept" | "" => Some(Choice::Accept),
            "r" | "retry" => Some(Choice::Retry),
            "e" | "edit" => Some(Choice::Edit),
            "q" | "quit" => Some(Choice::Quit),
            _ => None,
        }
    }
}

/// Write streamed text straight to the terminal
fn echo(text: &str) {
    let mut stdout = std::io::stdout();
    if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
        tracing::debug!("Failed to echo generated text: {}", e);
    }
}

/// Generate a mnemonic for one profile, streaming it to `on_text`, and save
/// it right away
pub async fn generate_and_save(
    generator: &dyn TextGenerator,
    store: &OverlayStore,
    model: &str,
    profile: &KanjiProfile,
    prompt: &str,
    on_text: &mut (dyn for<'a> FnMut(&'a str) + Send),
) -> Result<String> {
    let generation = generator
        .generate_streaming(SYSTEM_PROMPT, prompt, model, on_text)
        .await
        .with_context(|| format!("Failed to generate a mnemonic for {}", profile.character))?;
    tracing::debug!(
        "{} answered with stop reason {:?}",
        generation.provider,
        generation.stop_reason
    );

    store.save_mnemonic(&profile.character, &generation.text, &generation.model)?;
    Ok(generation.text)
}

pub async fn memorize(
    state: &AppState,
    generator: &dyn TextGenerator,
    args: &MemorizeArgs,
) -> Result<ExitCode> {
    let report = state.resolver().resolve_batch(&args.kanji, &args.options);
    let model = state.config.llm.model.as_str();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    let mut generated = 0;

    for profile in report.profiles() {
        writeln!(stdout, "{}", render_profile(profile, &RenderOptions::default()))?;
        writeln!(stdout, "\n── Generating mnemonic... ──\n")?;

        let prompt = assemble(
            profile,
            args.options.personal_context.as_deref(),
            &PromptOptions::default(),
        );
        let saved = generate_and_save(
            generator,
            &state.overlay_store,
            model,
            profile,
            &prompt,
            &mut echo,
        )
        .await;
        writeln!(stdout)?;
        let mut text = match saved {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error: {e:#}");
                continue;
            }
        };
        generated += 1;

        if !args.interactive {
            continue;
        }

        loop {
            let Some(choice) = ask(&mut input, &mut stdout).await? else {
                break;
            };
            match choice {
                Choice::Accept | Choice::Quit => break,
                Choice::Retry => {
                    writeln!(stdout, "\n── Regenerating mnemonic... ──\n")?;
                    let saved = generate_and_save(
                        generator,
                        &state.overlay_store,
                        model,
                        profile,
                        &prompt,
                        &mut echo,
                    )
                    .await;
                    writeln!(stdout)?;
                    match saved {
                        Ok(new_text) => text = new_text,
                        Err(e) => eprintln!("Error: {e:#}"),
                    }
                }
                Choice::Edit => {
                    if let Some(edited) = edit_in_editor(&text).await? {
                        text = edited;
                        state
                            .overlay_store
                            .save_mnemonic(&profile.character, &text, model)?;
                        writeln!(stdout, "Saved edited mnemonic.")?;
                    }
                }
            }
        }
    }

    let status = report_failures(&report);
    if generated == 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(status)
}

/// Prompt until a valid choice is read; `None` at end of input
async fn ask(input: &mut Lines<BufReader<Stdin>>, stdout: &mut dyn Write) -> Result<Option<Choice>> {
    loop {
        write!(stdout, "\n[a]ccept / [r]etry / [e]dit / [q]uit: ")?;
        stdout.flush()?;
        let Some(line) = input.next_line().await? else {
            return Ok(None);
        };
        if let Some(choice) = Choice::parse(&line) {
            return Ok(Some(choice));
        }
    }
}

/// Open the text in `$EDITOR` (falling back to `vi`). Returns the edited text
/// when it changed and is not empty.
async fn edit_in_editor(text: &str) -> Result<Option<String>> {
    let mut file = tempfile::Builder::new()
        .prefix("kanji-mnemonic-")
        .suffix(".md")
        .tempfile()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = tokio::process::Command::new(&editor)
        .arg(file.path())
        .status()
        .await
        .with_context(|| format!("Failed to launch editor {}", editor))?;
    if !status.success() {
        tracing::warn!("Editor exited with {}", status);
        return Ok(None);
    }

    let edited = tokio::fs::read_to_string(file.path()).await?;
    let edited = edited.trim();
    if edited.is_empty() || edited == text.trim() {
        return Ok(None);
    }
    Ok(Some(edited.to_string()))
}
