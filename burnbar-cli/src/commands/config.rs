//! Config command - inspect and reset settings.

use anyhow::Result;
use burnbar_core::builtin_providers;
use burnbar_store::{default_config_dir, default_settings_path, Settings, SettingsStore};
use clap::{Args, Subcommand};

use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration (normalized against the registry).
    Show,

    /// Show configuration paths.
    Path,

    /// Enable a provider.
    Enable {
        /// Provider to enable.
        provider: String,
    },

    /// Disable a provider.
    Disable {
        /// Provider to disable.
        provider: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Enable { provider } => set_enabled(provider, true, cli).await,
        ConfigAction::Disable { provider } => set_enabled(provider, false, cli).await,
        ConfigAction::Reset => reset_config(cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    store.normalize_against(&builtin_providers()).await;
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            println!("BurnBar Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Provider order:");
            for id in &settings.providers.order {
                let marker = if settings.providers.is_enabled(id) {
                    "•"
                } else {
                    "◦"
                };
                println!("  {marker} {id}");
            }
            println!();
            println!("Display mode:     {}", settings.display_mode);
            println!("Tray icon style:  {}", settings.tray_icon_style);
            println!(
                "Show percentage:  {}",
                settings.effective_show_percentage()
            );
        }
        OutputFormat::Json => println!("{}", cli.to_json(&settings)?),
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = default_settings_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            println!("{}", cli.to_json(&paths)?);
        }
    }

    Ok(())
}

async fn set_enabled(provider: &str, enabled: bool, cli: &Cli) -> Result<()> {
    let meta = builtin_providers();
    if !meta.iter().any(|m| m.id == provider) {
        anyhow::bail!("Unknown provider: {provider}");
    }

    let store = SettingsStore::load_default().await?;
    store.normalize_against(&meta).await;
    store.set_provider_enabled(provider, enabled).await;
    store.save().await?;

    if !cli.quiet {
        let verb = if enabled { "Enabled" } else { "Disabled" };
        println!("{verb} {provider}");
    }
    Ok(())
}

async fn reset_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    store.update(|settings| *settings = Settings::default()).await;
    store.normalize_against(&builtin_providers()).await;
    store.save().await?;

    if !cli.quiet {
        println!("Settings reset to defaults.");
    }
    Ok(())
}
