// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `BurnBar` Core
//!
//! Core types and the usage pipeline for the `BurnBar` application.
//!
//! Everything in this crate is a pure value type or a pure function.
//! Probe results flow through it in one direction:
//!
//! 1. Raw [`MetricLine`]s arrive per provider, their labels possibly
//!    account-scoped ([`scoped_label`]).
//! 2. [`aggregate::primary_bars`] collapses each enabled provider's
//!    progress lines into a single [`TrayPrimaryBar`] fraction.
//! 3. [`pace::calculate_pace`] projects end-of-period usage for
//!    tooltips.
//!
//! Provider ordering and enablement come from [`prefs::normalize`],
//! which reconciles persisted preferences against the provider
//! registry on every start.
//!
//! ## Key Types
//!
//! - [`MetricLine`] - One row of probed usage data
//! - [`ProviderMeta`] - Static per-provider descriptor
//! - [`ProviderPrefs`] - Persisted provider ordering / enablement
//! - [`TrayPrimaryBar`] - One tray gauge per provider
//! - [`PaceResult`] - Projected end-of-period usage classification

pub mod aggregate;
pub mod error;
pub mod models;
pub mod pace;
pub mod prefs;
pub mod scoped_label;

pub use error::CoreError;

pub use models::{
    // Display enums
    DisplayMode,
    TrayIconStyle,
    // Metric types
    MetricLine,
    ProbeOutput,
    ProgressFormat,
    // Provider types
    builtin_providers,
    is_valid_provider_id,
    validate_provider_id,
    ManifestLine,
    ManifestLineKind,
    ProviderMeta,
};

pub use aggregate::{primary_bars, TrayPrimaryBar};
pub use pace::{calculate_pace, pace_detail_text, PaceResult, PaceStatus};
pub use prefs::{normalize, prefs_equal, ProviderPrefs};
pub use scoped_label::ScopedLabel;
