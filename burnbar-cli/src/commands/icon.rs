//! Icon command - render the tray glyph to a PNG file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use burnbar_core::{builtin_providers, primary_bars, TrayIconStyle};
use burnbar_tray::{render_tray_icon, RenderParams};
use clap::Args;
use tracing::info;

use crate::snapshot;
use crate::{Cli, OutputFormat};

/// Arguments for the icon command.
#[derive(Args)]
pub struct IconArgs {
    /// Probe snapshot JSON file.
    #[arg(long, short)]
    pub snapshot: PathBuf,

    /// Output PNG path.
    #[arg(long, short, default_value = "tray.png")]
    pub output: PathBuf,

    /// Override the configured icon style.
    #[arg(long)]
    pub style: Option<StyleArg>,

    /// Device pixel ratio to render at.
    #[arg(long, default_value_t = 2.0)]
    pub dpr: f64,

    /// Percent text drawn next to the glyph.
    #[arg(long)]
    pub percent: Option<String>,
}

/// Icon style flag values.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StyleArg {
    Bars,
    Circle,
    Provider,
    TextOnly,
}

impl From<StyleArg> for TrayIconStyle {
    fn from(value: StyleArg) -> Self {
        match value {
            StyleArg::Bars => TrayIconStyle::Bars,
            StyleArg::Circle => TrayIconStyle::Circle,
            StyleArg::Provider => TrayIconStyle::Provider,
            StyleArg::TextOnly => TrayIconStyle::TextOnly,
        }
    }
}

/// Runs the icon command.
pub async fn run(args: &IconArgs, cli: &Cli) -> Result<()> {
    let meta = builtin_providers();
    let store = burnbar_store::SettingsStore::load_default().await?;
    store.normalize_against(&meta).await;
    let settings = store.get().await;

    let style = args.style.map_or(settings.tray_icon_style, TrayIconStyle::from);
    let lines = snapshot::load_lines(&args.snapshot).await?;
    let bars = primary_bars(
        &meta,
        &settings.providers,
        &lines,
        style.max_bars(),
        settings.display_mode,
    );

    let params = RenderParams {
        style,
        percent_text: args.percent.as_deref(),
        provider_icon: None,
        dpr: args.dpr,
    };
    let icon = render_tray_icon(&bars, &params)?;
    let png = icon.to_png()?;

    tokio::fs::write(&args.output, &png)
        .await
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(path = %args.output.display(), "wrote tray icon");

    match cli.format {
        OutputFormat::Text => {
            println!(
                "Wrote {} ({}x{}, {} bars)",
                args.output.display(),
                icon.width,
                icon.height,
                bars.len()
            );
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "path": args.output.display().to_string(),
                "width": icon.width,
                "height": icon.height,
                "bars": bars,
            });
            println!("{}", cli.to_json(&report)?);
        }
    }

    Ok(())
}
