//! phrasekit CLI entry point.
//!
//! Provides command-line tools for working with JSON phrase files:
//! - `phrasekit translate` - Render one phrase with parameters
//! - `phrasekit check` - Validate that every phrase compiles
//! - `phrasekit coverage` - Compare translations against a source file

mod commands;
mod output;

use std::io::stderr;
use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{CheckArgs, CoverageArgs, TranslateArgs, run_check, run_coverage, run_translate};
use tracing_subscriber::EnvFilter;

/// phrasekit phrase file tools.
#[derive(Debug, Parser)]
#[command(name = "phrasekit")]
#[command(about = "phrasekit phrase file tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a phrase from a JSON phrase file
    Translate(TranslateArgs),
    /// Check that every phrase in JSON phrase files compiles
    Check(CheckArgs),
    /// Report translation coverage across locales
    Coverage(CoverageArgs),
}

/// Set up color output based on user preference.
fn setup_colors(color_when: ColorWhen) {
    match color_when {
        ColorWhen::Auto => {
            // owo-colors automatically checks TTY, NO_COLOR, FORCE_COLOR
        }
        ColorWhen::Always => {
            owo_colors::set_override(true);
        }
        ColorWhen::Never => {
            owo_colors::set_override(false);
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn setup_tracing(verbose: bool) {
    let default_level = if verbose { "phrasekit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .without_time()
        .try_init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    setup_tracing(cli.verbose);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let result = match cli.command {
        Commands::Translate(args) => run_translate(args),
        Commands::Check(args) => run_check(args),
        Commands::Coverage(args) => run_coverage(args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{e:?}");
            exit(exitcode::SOFTWARE);
        }
    }
}
