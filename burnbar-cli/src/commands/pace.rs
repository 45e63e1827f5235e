//! Pace command - classify usage pace for one metric window.

use anyhow::Result;
use burnbar_core::{calculate_pace, pace_detail_text, DisplayMode};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use crate::commands::bars::ModeArg;
use crate::{Cli, OutputFormat};

/// Arguments for the pace command.
#[derive(Args)]
pub struct PaceArgs {
    /// Usage consumed so far.
    #[arg(long)]
    pub used: f64,

    /// Usage limit for the period.
    #[arg(long)]
    pub limit: f64,

    /// Period length in milliseconds.
    #[arg(long)]
    pub period_ms: f64,

    /// Milliseconds until the period resets.
    #[arg(long, conflicts_with = "resets_at")]
    pub resets_in_ms: Option<f64>,

    /// Absolute reset time, RFC 3339.
    #[arg(long)]
    pub resets_at: Option<DateTime<Utc>>,

    /// Display mode for the detail line.
    #[arg(long, default_value = "left")]
    pub mode: ModeArg,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaceReport {
    status: burnbar_core::PaceStatus,
    projected_usage: f64,
    detail: String,
}

/// Runs the pace command.
pub fn run(args: &PaceArgs, cli: &Cli) -> Result<()> {
    let now_ms = Utc::now().timestamp_millis() as f64;
    let resets_at_ms = match (args.resets_in_ms, args.resets_at) {
        (Some(delta), _) => now_ms + delta,
        (None, Some(at)) => at.timestamp_millis() as f64,
        (None, None) => anyhow::bail!("either --resets-in-ms or --resets-at is required"),
    };

    let Some(result) = calculate_pace(args.used, args.limit, resets_at_ms, args.period_ms, now_ms)
    else {
        match cli.format {
            OutputFormat::Text => println!("No pace estimate available."),
            OutputFormat::Json => println!("null"),
        }
        return Ok(());
    };

    let detail = pace_detail_text(
        &result,
        args.used,
        args.limit,
        resets_at_ms,
        args.period_ms,
        now_ms,
        DisplayMode::from(args.mode),
    );

    match cli.format {
        OutputFormat::Text => {
            println!("Status:    {:?}", result.status);
            println!("Projected: {:.1} of {:.1}", result.projected_usage, args.limit);
            println!("Detail:    {detail}");
        }
        OutputFormat::Json => {
            let report = PaceReport {
                status: result.status,
                projected_usage: result.projected_usage,
                detail,
            };
            println!("{}", cli.to_json(&report)?);
        }
    }

    Ok(())
}
