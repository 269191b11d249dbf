use anyhow::{Context, Result};
use atf_scanner::driver::{ScanPipeline, ScanState};
use atf_scanner::lexer::{format_tokens, KeywordRegistry, ScanOptions};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "atf-scan")]
#[command(author, version, about = "Tokenizer for ATF cuneiform transliterations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DumpFormat {
    /// One token per line (default)
    #[value(name = "text")]
    Text,
    /// JSON array of tokens
    #[value(name = "json")]
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of an ATF file
    Tokens {
        /// The ATF file to scan
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: DumpFormat,

        /// Leave text/lemma/absorb modes open at end of input instead of unwinding them
        #[arg(long)]
        keep_open_modes: bool,
    },

    /// Report lexical errors in an ATF file
    Check {
        /// The ATF file to check
        input: PathBuf,
    },

    /// List the reserved keywords
    Keywords {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --verbose only changes the default; RUST_LOG still wins when set
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Tokens {
            input,
            format,
            keep_open_modes,
        } => tokens(input, format, keep_open_modes),
        Commands::Check { input } => check(input),
        Commands::Keywords { json } => keywords(json),
    };

    if let Err(e) = result {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn tokens(input: PathBuf, format: DumpFormat, keep_open_modes: bool) -> Result<()> {
    log::info!("Scanning {:?}", input);

    let state = ScanState::new(&input).with_context(|| format!("Failed to load {:?}", input))?;
    let options = ScanOptions::new().with_unwind_at_eof(!keep_open_modes);
    let mut pipeline = ScanPipeline::new(state, options);
    let output = pipeline.run();

    match format {
        DumpFormat::Text => println!("{}", format_tokens(&output.tokens)),
        DumpFormat::Json => println!("{}", serde_json::to_string_pretty(&output.tokens)?),
    }

    if pipeline.state().has_errors() {
        pipeline.state().report_diagnostics()?;
    }

    Ok(())
}

fn check(input: PathBuf) -> Result<()> {
    log::info!("Checking {:?}", input);

    let state = ScanState::new(&input).with_context(|| format!("Failed to load {:?}", input))?;
    let mut pipeline = ScanPipeline::new(state, ScanOptions::default());
    let output = pipeline.run();

    if pipeline.state().has_errors() {
        pipeline.state().report_diagnostics()?;
        anyhow::bail!(
            "Lexical analysis failed with {} error(s)",
            pipeline.state().error_count()
        );
    }

    println!(
        "{}: {} tokens, no lexical errors (ended in {} mode)",
        "success".green().bold(),
        output.tokens.len(),
        output.final_mode
    );
    Ok(())
}

fn keywords(json: bool) -> Result<()> {
    let registry = KeywordRegistry::global();

    if json {
        let entries: Vec<_> = registry
            .iter()
            .map(|(key, keyword)| {
                serde_json::json!({
                    "key": key,
                    "kind": keyword.kind,
                    "category": keyword.category,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (key, keyword) in registry.iter() {
        println!(
            "{:<12} {:<12} {}",
            key,
            keyword.kind.name().cyan(),
            keyword.category
        );
    }
    Ok(())
}
