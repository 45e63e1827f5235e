// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `BurnBar` Store
//!
//! State management for the `BurnBar` application.
//!
//! This crate provides:
//!
//! - **`SettingsStore`**: persisted user preferences, normalized
//!   against the provider registry on load
//! - **`ProbeStore`**: live per-provider probe results, applied in
//!   arrival order, observable via watch channels
//! - **Persistence**: atomic JSON file I/O with restrictive
//!   permissions
//!
//! In-memory state is authoritative for the running session; a failed
//! disk write is logged and does not roll anything back.

pub mod error;
pub mod persistence;
pub mod probe_store;
pub mod settings_store;

pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use probe_store::{ProbeState, ProbeStore};
pub use settings_store::{Settings, SettingsStore};
