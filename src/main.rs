use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use sluggen::provider::{DictionaryInfo, DictionaryProvider, FileProvider, MemoryProvider, TagInfo};

#[derive(Parser)]
#[command(name = "sluggen")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a pattern and print its structure as JSON
    Parse(ParseArgs),
    /// Check whether a pattern is valid (exit code only)
    Check(CheckArgs),
    /// Suggest completions at a cursor offset
    Suggest(SuggestArgs),
}

#[derive(clap::Args)]
struct ParseArgs {
    /// Pattern text
    pattern: String,

    /// Report the partial-parse context instead of requiring a complete pattern
    #[arg(long)]
    partial: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Pattern text
    pattern: String,
}

#[derive(clap::Args)]
struct SuggestArgs {
    /// Pattern text
    pattern: String,

    /// 0-based character offset of the cursor
    #[arg(long)]
    cursor: usize,

    /// YAML dictionary catalog; a built-in demo catalog is used when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("sluggen: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, anyhow::Error> {
    match cli.command {
        Commands::Parse(args) => {
            if args.partial {
                let context = sluggen::parse_partial(&args.pattern);
                println!("{}", serde_json::to_string_pretty(&context)?);
                return Ok(ExitCode::SUCCESS);
            }
            match sluggen::parse(&args.pattern) {
                Ok(pattern) => {
                    println!("{}", serde_json::to_string_pretty(&pattern)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("sluggen: {e}");
                    Ok(ExitCode::from(1))
                }
            }
        }
        Commands::Check(args) => Ok(if sluggen::validate(&args.pattern) {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        }),
        Commands::Suggest(args) => {
            let provider: Box<dyn DictionaryProvider> = match &args.catalog {
                Some(path) => Box::new(FileProvider::load(path)?),
                None => {
                    log::debug!("no catalog given, using the built-in demo catalog");
                    Box::new(demo_catalog())
                }
            };
            let suggestions = sluggen::suggest(&args.pattern, args.cursor, provider.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Small catalog so `sluggen suggest` works without any setup.
fn demo_catalog() -> MemoryProvider {
    let dictionary = |kind: &str, count: u64| DictionaryInfo {
        kind: kind.into(),
        count,
    };
    let tag = |kind: &str, name: &str, description: &str| TagInfo {
        kind: kind.into(),
        tag: name.into(),
        description: description.into(),
        opt_in: false,
        word_count: 0,
    };
    MemoryProvider::new(
        vec![
            dictionary("adjective", 1524),
            dictionary("adverb", 312),
            dictionary("noun", 2641),
            dictionary("verb", 987),
        ],
        vec![
            tag("noun", "animal", "living creatures"),
            tag("noun", "artifact", "man-made objects"),
            tag("noun", "place", "locations and landmarks"),
            tag("adjective", "color", "color words"),
            tag("adjective", "size", "size and scale words"),
        ],
    )
}
