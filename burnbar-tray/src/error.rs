//! Tray error types.

use thiserror::Error;

/// Errors that can occur while rendering the tray glyph.
///
/// None of these crash the host: the scheduler logs them and leaves
/// the previous glyph in place for that cycle.
#[derive(Debug, Error)]
pub enum TrayError {
    /// Pixel buffer allocation failed (zero-sized canvas).
    #[error("Cannot allocate {width}x{height} canvas")]
    Canvas {
        /// Requested width in device pixels.
        width: u32,
        /// Requested height in device pixels.
        height: u32,
    },

    /// A vector path failed to build.
    #[error("Path construction failed")]
    Path,

    /// PNG encoding of the finished raster failed.
    #[error("PNG encode failed: {0}")]
    Encode(String),
}
