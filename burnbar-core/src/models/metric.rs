//! Probed usage lines.
//!
//! A provider probe produces a fresh `Vec<MetricLine>` on every run.
//! Lines are immutable value objects with no lifecycle of their own;
//! the label may embed account scoping (see [`crate::scoped_label`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Five-hour rolling session window, in milliseconds.
pub const PERIOD_5_HOURS_MS: u64 = 5 * 60 * 60 * 1000;
/// Seven-day rolling window, in milliseconds.
pub const PERIOD_7_DAYS_MS: u64 = 7 * 24 * 60 * 60 * 1000;
/// Thirty-day billing window, in milliseconds.
pub const PERIOD_30_DAYS_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// How a progress line's numbers should be formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ProgressFormat {
    /// Plain percentage of a 0-100 scale.
    Percent,
    /// US dollar amounts.
    Dollars,
    /// A raw count with a unit suffix (e.g. "credits").
    Count {
        /// Unit suffix appended after the number.
        suffix: String,
    },
}

/// One row of usage data from a provider probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MetricLine {
    /// Free-form label/value pair.
    #[serde(rename_all = "camelCase")]
    Text {
        /// Row label, possibly account-scoped.
        label: String,
        /// Display value.
        value: String,
        /// Optional accent color (CSS hex).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        /// Optional secondary line under the value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
    },
    /// Used-versus-limit gauge.
    #[serde(rename_all = "camelCase")]
    Progress {
        /// Row label, possibly account-scoped.
        label: String,
        /// Amount consumed so far.
        used: f64,
        /// Total allowance for the period.
        limit: f64,
        /// How to format the numbers.
        format: ProgressFormat,
        /// When the period resets, if the provider reports it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resets_at: Option<DateTime<Utc>>,
        /// Period length in milliseconds, if the provider reports it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        period_duration_ms: Option<u64>,
        /// Optional accent color (CSS hex).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    /// Short status chip.
    #[serde(rename_all = "camelCase")]
    Badge {
        /// Row label, possibly account-scoped.
        label: String,
        /// Chip text.
        text: String,
        /// Optional accent color (CSS hex).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        /// Optional secondary line under the chip.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
    },
}

impl MetricLine {
    /// Returns the raw (possibly scoped) label of this line.
    pub fn label(&self) -> &str {
        match self {
            MetricLine::Text { label, .. }
            | MetricLine::Progress { label, .. }
            | MetricLine::Badge { label, .. } => label,
        }
    }
}

/// One provider probe result, applied to state in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutput {
    /// Registry id of the provider this result belongs to.
    pub provider_id: String,
    /// Provider display name as reported by the probe.
    pub display_name: String,
    /// Subscription plan, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Fresh metric lines, replacing the previous probe's lines.
    pub lines: Vec<MetricLine>,
    /// Icon URL for the provider style glyph.
    pub icon_url: String,
}

/// Builds a percent-format progress line on a 0-100 scale.
pub fn progress_percent_line(
    label: &str,
    used: f64,
    resets_at: Option<DateTime<Utc>>,
    period_duration_ms: Option<u64>,
) -> MetricLine {
    MetricLine::Progress {
        label: label.to_string(),
        used,
        limit: 100.0,
        format: ProgressFormat::Percent,
        resets_at,
        period_duration_ms,
        color: None,
    }
}

/// Builds a neutral status badge.
pub fn status_line(text: &str) -> MetricLine {
    MetricLine::Badge {
        label: "Status".to_string(),
        text: text.to_string(),
        color: Some("#a3a3a3".to_string()),
        subtitle: None,
    }
}

/// Builds an error badge.
pub fn error_line(message: String) -> MetricLine {
    MetricLine::Badge {
        label: "Error".to_string(),
        text: message,
        color: Some("#ef4444".to_string()),
        subtitle: None,
    }
}

// ============================================================================
// Tests
// ============================================================================
