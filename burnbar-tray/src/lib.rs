// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

//! # `BurnBar` Tray
//!
//! Turns per-provider usage fractions into a rasterized menu bar
//! glyph, and schedules glyph updates behind a debounce so rapid
//! probe results or settings flips collapse into one render.
//!
//! Rendering is synchronous tiny-skia work; only applying the
//! finished icon to the host tray is asynchronous. The output is a
//! template/mask image: shape lives in the alpha channel and the OS
//! recolors it for the current menu bar theme.

pub mod error;
mod glyphs;
pub mod render;
pub mod scheduler;

pub use error::TrayError;
pub use render::{quantize_visual_fraction, render_tray_icon, RenderParams, RenderedIcon};
pub use scheduler::{IconScheduler, RenderJob, UpdateTrigger};
