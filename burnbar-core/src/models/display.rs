//! Persisted display enums.
//!
//! Serialized names are part of the settings file format and must
//! stay stable across versions.

use serde::{Deserialize, Serialize};

/// Whether gauges show the used or the remaining share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Show fraction of the limit already consumed.
    Used,
    /// Show fraction of the limit still available.
    #[default]
    Left,
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayMode::Used => write!(f, "used"),
            DisplayMode::Left => write!(f, "left"),
        }
    }
}

/// Visual style of the menu bar glyph.
///
/// `stacked` and `gauge` are retired names from older releases and
/// deserialize onto `Bars` and `Circle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TrayIconStyle {
    /// Up to four horizontal bars, one per provider.
    #[default]
    #[serde(alias = "stacked")]
    Bars,
    /// A single ring gauge for the first provider.
    #[serde(alias = "gauge")]
    Circle,
    /// The first provider's brand icon, no gauge.
    Provider,
    /// Percent text alone, no bars.
    TextOnly,
}

impl TrayIconStyle {
    /// Number of bars this style renders.
    pub fn max_bars(&self) -> usize {
        match self {
            TrayIconStyle::Bars => 4,
            TrayIconStyle::Circle | TrayIconStyle::Provider | TrayIconStyle::TextOnly => 1,
        }
    }

    /// True when the style cannot render without percent text.
    pub fn mandates_percentage(&self) -> bool {
        matches!(self, TrayIconStyle::TextOnly)
    }

    /// All selectable styles.
    pub fn all() -> &'static [TrayIconStyle] {
        &[
            TrayIconStyle::Bars,
            TrayIconStyle::Circle,
            TrayIconStyle::Provider,
            TrayIconStyle::TextOnly,
        ]
    }
}

impl std::fmt::Display for TrayIconStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrayIconStyle::Bars => write!(f, "bars"),
            TrayIconStyle::Circle => write!(f, "circle"),
            TrayIconStyle::Provider => write!(f, "provider"),
            TrayIconStyle::TextOnly => write!(f, "textOnly"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
