//! Domain models.
//!
//! Split into focused submodules:
//! - [`metric`] - Probed usage lines and probe results
//! - [`provider`] - Static provider descriptors and the registry
//! - [`display`] - Persisted display enums

pub mod display;
pub mod metric;
pub mod provider;

pub use display::{DisplayMode, TrayIconStyle};
pub use metric::{
    error_line, progress_percent_line, status_line, MetricLine, ProbeOutput, ProgressFormat,
    PERIOD_30_DAYS_MS, PERIOD_5_HOURS_MS, PERIOD_7_DAYS_MS,
};
pub use provider::{
    builtin_providers, is_valid_provider_id, validate_provider_id, ManifestLine, ManifestLineKind,
    ProviderMeta,
};
