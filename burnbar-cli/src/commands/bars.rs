//! Bars command - aggregate a probe snapshot into tray bars.

use std::path::PathBuf;

use anyhow::Result;
use burnbar_core::{builtin_providers, primary_bars, DisplayMode};
use clap::Args;
use tracing::info;

use crate::snapshot;
use crate::{Cli, OutputFormat};

/// Arguments for the bars command.
#[derive(Args)]
pub struct BarsArgs {
    /// Probe snapshot JSON file.
    #[arg(long, short)]
    pub snapshot: PathBuf,

    /// Override the bar limit (defaults to the configured style's).
    #[arg(long)]
    pub max_bars: Option<usize>,

    /// Override the display mode.
    #[arg(long)]
    pub mode: Option<ModeArg>,
}

/// Display mode flag values.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ModeArg {
    /// Fractions reflect consumed usage.
    Used,
    /// Fractions reflect remaining headroom.
    Left,
}

impl From<ModeArg> for DisplayMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Used => DisplayMode::Used,
            ModeArg::Left => DisplayMode::Left,
        }
    }
}

/// Runs the bars command.
pub async fn run(args: &BarsArgs, cli: &Cli) -> Result<()> {
    info!(snapshot = %args.snapshot.display(), "aggregating tray bars");

    let meta = builtin_providers();
    let store = burnbar_store::SettingsStore::load_default().await?;
    store.normalize_against(&meta).await;
    let settings = store.get().await;

    let lines = snapshot::load_lines(&args.snapshot).await?;
    let max_bars = args.max_bars.unwrap_or(settings.tray_icon_style.max_bars());
    let mode = args.mode.map_or(settings.display_mode, DisplayMode::from);

    let bars = primary_bars(&meta, &settings.providers, &lines, max_bars, mode);

    match cli.format {
        OutputFormat::Text => {
            if bars.is_empty() {
                println!("No enabled provider has a primary metric.");
                return Ok(());
            }
            for bar in &bars {
                match bar.fraction {
                    Some(f) => println!("{:<12} {:>6.1}%", bar.id, f * 100.0),
                    None => println!("{:<12} {:>7}", bar.id, "no data"),
                }
            }
        }
        OutputFormat::Json => println!("{}", cli.to_json(&bars)?),
    }

    Ok(())
}
