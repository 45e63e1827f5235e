// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

//! BurnBar CLI - AI provider usage aggregation from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Aggregate tray bars from a probe snapshot
//! burnbar bars --snapshot usage.json
//!
//! # Pace classification for one metric window
//! burnbar pace --used 450 --limit 500 --resets-in-ms 7200000 --period-ms 86400000
//!
//! # Render the tray glyph to a PNG
//! burnbar icon --snapshot usage.json --style circle -o tray.png
//!
//! # Inspect settings
//! burnbar config show
//! ```

mod commands;
mod snapshot;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{bars, config, icon, pace};

// ============================================================================
// CLI Definition
// ============================================================================

/// BurnBar CLI - AI provider usage aggregation.
#[derive(Parser)]
#[command(name = "burnbar")]
#[command(about = "AI provider usage aggregation CLI")]
#[command(long_about = r#"
BurnBar collapses multi-account AI provider usage into tray bars and
pace estimates.

Built-in providers:
  • OpenAI Codex (codex)
  • Claude Code (claude)
  • GitHub Copilot (copilot)
  • Antigravity (antigravity)
  • OpenCode (opencode)
  • z.ai (zai)

Examples:
  burnbar bars --snapshot usage.json      # Aggregated tray bars
  burnbar pace --used 450 --limit 500 \
    --resets-in-ms 7200000 --period-ms 86400000
  burnbar icon --snapshot usage.json -o tray.png
  burnbar config show
"#)]
#[command(version)]
#[command(author = "BurnBar Contributors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate a probe snapshot into tray bars.
    #[command(visible_alias = "b")]
    Bars(bars::BarsArgs),

    /// Classify usage pace for one metric window.
    #[command(visible_alias = "p")]
    Pace(pace::PaceArgs),

    /// Render the tray glyph to a PNG file.
    #[command(visible_alias = "i")]
    Icon(icon::IconArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Serializes a value per the `--pretty` flag.
    pub fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(out)
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("burnbar=debug,info")
    } else {
        EnvFilter::new("burnbar=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Bars(args) => bars::run(args, &cli).await,
        Commands::Pace(args) => pace::run(args, &cli),
        Commands::Icon(args) => icon::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }

    Ok(())
}
