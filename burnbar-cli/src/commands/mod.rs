//! CLI command implementations.

pub mod bars;
pub mod config;
pub mod icon;
pub mod pace;
