use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use kanji_config::Config;
use kanji_core::ReadingKind;
use kanji_lang_japanese::{ReferenceLoader, ResolveOptions};
use kanji_llm::AnthropicGenerator;
use kanji_overlay::OverlayStore;
use tracing_subscriber::EnvFilter;

mod commands;
mod sources;
mod state;

#[cfg(test)]
mod tests;

use self::commands::lookup::LookupArgs;
use self::commands::memorize::MemorizeArgs;
use self::commands::personal::DecomposeArgs;
use self::state::AppState;

#[derive(Parser)]
#[command(
    name = "kanji",
    version,
    about = "Generate kanji mnemonics from WaniKani radicals and phonetic-semantic data"
)]
struct Cli {
    /// Model used for mnemonic generation
    #[arg(long, global = true)]
    model: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a mnemonic
    #[command(visible_alias = "m")]
    Memorize {
        #[arg(required = true)]
        kanji: Vec<String>,
        /// Extra context for the prompt
        #[arg(short, long)]
        context: Option<String>,
        /// Save the mnemonic without the accept/retry/edit prompt
        #[arg(short = 'n', long)]
        no_interactive: bool,
        /// Disable phonetic inference
        #[arg(long)]
        no_infer: bool,
        /// Reading to focus on, for this run only
        #[arg(long, value_enum)]
        primary: Option<ReadingArg>,
    },
    /// Show kanji profiles without calling the model
    #[command(visible_alias = "l")]
    Lookup {
        #[arg(required = true)]
        kanji: Vec<String>,
        #[arg(long)]
        no_infer: bool,
        /// Also show the automatic decomposition hidden by a personal one
        #[arg(long)]
        all_decomp: bool,
        /// Show sound mnemonics for the readings
        #[arg(long)]
        sound: bool,
        /// Print profiles as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the assembled prompt
    #[command(visible_alias = "p")]
    Prompt {
        #[arg(required = true)]
        kanji: Vec<String>,
        #[arg(short, long)]
        context: Option<String>,
        #[arg(long)]
        no_infer: bool,
        #[arg(long, value_enum)]
        primary: Option<ReadingArg>,
    },
    /// Set, show or remove a personal decomposition
    #[command(visible_alias = "d")]
    Decompose {
        kanji: String,
        /// Parts as characters or radical names
        parts: Vec<String>,
        #[arg(short, long)]
        phonetic: Option<String>,
        #[arg(short, long)]
        semantic: Option<String>,
        #[arg(long, visible_alias = "rm")]
        remove: bool,
    },
    /// Add or update a personal radical name
    Name { radical: String, name: String },
    /// List personal radical names
    Names,
    /// Set, show or remove a primary reading override
    Reading {
        kanji: String,
        #[arg(value_enum)]
        reading_type: Option<ReadingArg>,
        #[arg(long, visible_alias = "rm")]
        remove: bool,
    },
    /// List reading overrides
    Readings,
    /// Add, show or remove a personal sound mnemonic
    Sound {
        reading: String,
        character: Option<String>,
        description: Option<String>,
        #[arg(long, visible_alias = "rm")]
        remove: bool,
    },
    /// List sound mnemonics
    Sounds {
        /// Only personal entries
        #[arg(long)]
        personal: bool,
    },
    /// Show saved mnemonics
    Show {
        #[arg(required = true)]
        kanji: Vec<String>,
    },
    /// Delete downloaded databases
    ClearCache,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReadingArg {
    Onyomi,
    Kunyomi,
}

impl From<ReadingArg> for ReadingKind {
    fn from(arg: ReadingArg) -> Self {
        match arg {
            ReadingArg::Onyomi => ReadingKind::Onyomi,
            ReadingArg::Kunyomi => ReadingKind::Kunyomi,
        }
    }
}

fn resolve_options(no_infer: bool, primary: Option<ReadingArg>, context: Option<String>) -> ResolveOptions {
    ResolveOptions {
        infer_phonetic: !no_infer,
        primary_reading_override: primary.map(ReadingKind::from),
        personal_context: context,
    }
}

/// Logs go to stderr so profiles and prompts on stdout stay clean
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("KANJI_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    Config::load_dotenv();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = Config::new();
    if let Some(model) = cli.model {
        config.llm.model = model;
    }
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Memorize {
            kanji,
            context,
            no_interactive,
            no_infer,
            primary,
        } => {
            let llm = config.llm.clone();
            if llm.api_key.is_empty() {
                anyhow::bail!("ANTHROPIC_API_KEY is not set");
            }
            let generator = AnthropicGenerator::new(
                llm.api_key,
                llm.api_url,
                llm.max_tokens,
                Duration::from_secs(llm.timeout_seconds),
            );
            let state = AppState::load(config).await?;
            let args = MemorizeArgs {
                kanji: commands::split_kanji(&kanji),
                interactive: !no_interactive,
                options: resolve_options(no_infer, primary, context),
            };
            commands::memorize::memorize(&state, &generator, &args).await
        }
        Command::Lookup {
            kanji,
            no_infer,
            all_decomp,
            sound,
            json,
        } => {
            let state = AppState::load(config).await?;
            let args = LookupArgs {
                kanji: commands::split_kanji(&kanji),
                options: resolve_options(no_infer, None, None),
                all_decomp,
                sound,
                json,
            };
            commands::lookup::lookup(&state, &args, &mut stdout)
        }
        Command::Prompt {
            kanji,
            context,
            no_infer,
            primary,
        } => {
            let state = AppState::load(config).await?;
            let kanji = commands::split_kanji(&kanji);
            let options = resolve_options(no_infer, primary, context);
            commands::lookup::prompt(&state, &kanji, &options, &mut stdout)
        }
        Command::Decompose {
            kanji,
            parts,
            phonetic,
            semantic,
            remove,
        } => {
            let state = AppState::load(config).await?;
            let args = DecomposeArgs {
                kanji,
                parts,
                phonetic,
                semantic,
                remove,
            };
            commands::personal::decompose(&state, &args, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Name { radical, name } => {
            let store = OverlayStore::new(config.paths.config_dir);
            commands::personal::name(&store, &radical, &name, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Names => {
            let store = OverlayStore::new(config.paths.config_dir);
            commands::personal::names(&store, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Reading {
            kanji,
            reading_type,
            remove,
        } => {
            let store = OverlayStore::new(config.paths.config_dir);
            let kind = reading_type.map(ReadingKind::from);
            commands::personal::reading(&store, &kanji, kind, remove, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Readings => {
            let store = OverlayStore::new(config.paths.config_dir);
            commands::personal::readings(&store, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Sound {
            reading,
            character,
            description,
            remove,
        } => {
            let store = OverlayStore::new(config.paths.config_dir);
            commands::personal::sound(
                &store,
                &reading,
                character.as_deref(),
                description.as_deref(),
                remove,
                &mut stdout,
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Sounds { personal } => {
            let store = OverlayStore::new(config.paths.config_dir);
            let bundled = ReferenceLoader::bundled()?;
            commands::personal::sounds(&store, &bundled, personal, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { kanji } => {
            let store = OverlayStore::new(config.paths.config_dir);
            commands::lookup::show(&store, &commands::split_kanji(&kanji), &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::ClearCache => {
            let removed = sources::clear_cache(&config.paths.cache_dir)?;
            println!(
                "Removed {} cached file(s) from {}",
                removed,
                config.paths.cache_dir.display()
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}
