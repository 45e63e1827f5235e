//! Tray glyph rasterization.
//!
//! Turns a small ordered list of per-provider fractions into an
//! off-screen raster using tiny-skia. The output only carries shape in
//! its alpha channel, so the host can submit it as a template/mask
//! image and let the OS recolor it per menu bar theme.

use burnbar_core::{TrayIconStyle, TrayPrimaryBar};
use tiny_skia::{
    Color, FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, StrokeDash, Transform,
};
use tracing::warn;

use crate::error::TrayError;
use crate::glyphs;

// ============================================================================
// Constants
// ============================================================================

/// Logical menu bar icon size in points.
const LOGICAL_SIZE: f32 = 18.0;

/// Bar track geometry, in logical units.
const BAR_TRACK_WIDTH: f32 = 16.0;
const BAR_HEIGHT: f32 = 3.0;
const BAR_SPACING: f32 = 1.0;
/// Corner radius on the track's fixed leading edge.
const TRACK_RADIUS: f32 = 1.5;
/// Radius scale applied to the fill's moving trailing edge.
const FILL_RADIUS_SCALE: f32 = 0.5;

/// Ring geometry for circle and provider-fallback styles.
const RING_STROKE: f32 = 2.0;

/// Percent text font size in logical units.
const FONT_SIZE: f32 = 10.0;
/// Gap between the glyph body and trailing percent text.
const TEXT_GAP: f32 = 2.0;

/// Alpha levels for template rendering (shape lives in alpha only).
const FILL_ALPHA: u8 = 230;
const TRACK_ALPHA: u8 = 77;

// ============================================================================
// Quantization
// ============================================================================

/// Adjusts a raw fraction so near-full bars stay visually
/// distinguishable from 100% at tray resolution.
///
/// Fractions in `(0.7, 1.0)` have their remainder rounded up to the
/// nearest 0.15 multiple and re-subtracted; everything else passes
/// through unchanged apart from clamping to `[0, 1]`.
pub fn quantize_visual_fraction(fraction: f64) -> f64 {
    if !fraction.is_finite() {
        return 0.0;
    }
    let f = fraction.clamp(0.0, 1.0);
    if f > 0.7 && f < 1.0 {
        // Epsilon keeps exact 0.15 multiples from ceiling one step up.
        let steps = ((1.0 - f) / 0.15 - 1e-9).ceil();
        (1.0 - steps * 0.15).clamp(0.0, 1.0)
    } else {
        f
    }
}

// ============================================================================
// Render Parameters
// ============================================================================

/// Inputs for a single tray render beyond the bar list.
#[derive(Debug, Clone, Copy)]
pub struct RenderParams<'a> {
    /// Visual style to draw.
    pub style: TrayIconStyle,
    /// Percent text drawn after the glyph, or alone for text-only.
    pub percent_text: Option<&'a str>,
    /// Encoded provider icon bytes for the provider style.
    pub provider_icon: Option<&'a [u8]>,
    /// Device pixel ratio of the target screen.
    pub dpr: f64,
}

impl Default for RenderParams<'_> {
    fn default() -> Self {
        Self {
            style: TrayIconStyle::default(),
            percent_text: None,
            provider_icon: None,
            dpr: 1.0,
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders the tray glyph for the given bars and parameters.
pub fn render_tray_icon(
    bars: &[TrayPrimaryBar],
    params: &RenderParams,
) -> Result<RenderedIcon, TrayError> {
    let device_size = device_size(params.dpr);
    let scale = device_size as f32 / LOGICAL_SIZE;

    // Circle, provider, and text-only use only the first bar.
    let resolved: &[TrayPrimaryBar] = match params.style {
        TrayIconStyle::Bars => {
            let n = bars.len().min(params.style.max_bars());
            &bars[..n]
        }
        _ => &bars[..bars.len().min(1)],
    };

    let text = params.percent_text;
    let all_undefined = resolved.iter().all(|b| b.fraction.is_none());

    let (logical_width, draw_body) = match params.style {
        TrayIconStyle::TextOnly => match text {
            Some(t) => (
                glyphs::estimated_text_width(t, FONT_SIZE).max(LOGICAL_SIZE),
                false,
            ),
            // Text-only with no text reverts to the fallback glyph.
            None => (LOGICAL_SIZE, false),
        },
        _ => {
            let text_width = text
                .map(|t| glyphs::estimated_text_width(t, FONT_SIZE) + TEXT_GAP)
                .unwrap_or(0.0);
            (
                LOGICAL_SIZE + text_width,
                !resolved.is_empty() && !all_undefined,
            )
        }
    };

    let width = (logical_width * scale).ceil().max(1.0) as u32;
    let mut pixmap =
        Pixmap::new(width, device_size).ok_or(TrayError::Canvas {
            width,
            height: device_size,
        })?;
    pixmap.fill(Color::TRANSPARENT);

    if draw_body {
        match params.style {
            TrayIconStyle::Bars => draw_bars(&mut pixmap, resolved, scale)?,
            TrayIconStyle::Circle => {
                let fraction = resolved.first().and_then(|b| b.fraction);
                draw_circle(&mut pixmap, fraction, scale)?;
            }
            TrayIconStyle::Provider => match params.provider_icon {
                Some(bytes) => draw_provider_icon(&mut pixmap, bytes, scale)?,
                None => draw_ring(&mut pixmap, scale)?,
            },
            TrayIconStyle::TextOnly => {}
        }
    } else {
        let needs_fallback = match params.style {
            // Empty or all-loading bars would render as blank tracks.
            TrayIconStyle::TextOnly => text.is_none(),
            _ => resolved.is_empty() || all_undefined,
        };
        if needs_fallback {
            draw_fallback_glyph(&mut pixmap, scale)?;
        }
    }

    if let Some(text) = text {
        let x = match params.style {
            TrayIconStyle::TextOnly => 0.0,
            _ => (LOGICAL_SIZE + TEXT_GAP) * scale,
        };
        let y = (LOGICAL_SIZE - FONT_SIZE) / 2.0 * scale;
        glyphs::draw_text(
            &mut pixmap,
            text,
            x,
            y,
            FONT_SIZE * scale,
            fill_color(),
        )?;
    }

    Ok(RenderedIcon {
        data: pixmap.data().to_vec(),
        width,
        height: device_size,
    })
}

/// Device pixel size for one logical icon edge.
fn device_size(dpr: f64) -> u32 {
    let scaled = (f64::from(LOGICAL_SIZE) * dpr.max(0.0)).round();
    (scaled as u32).max(LOGICAL_SIZE as u32)
}

fn fill_color() -> Color {
    Color::from_rgba8(0, 0, 0, FILL_ALPHA)
}

fn track_color() -> Color {
    Color::from_rgba8(0, 0, 0, TRACK_ALPHA)
}

fn create_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

// ============================================================================
// Bar Style
// ============================================================================

fn draw_bars(
    pixmap: &mut Pixmap,
    bars: &[TrayPrimaryBar],
    scale: f32,
) -> Result<(), TrayError> {
    let count = bars.len() as f32;
    let total_height = count * BAR_HEIGHT + (count - 1.0) * BAR_SPACING;
    let x = (LOGICAL_SIZE - BAR_TRACK_WIDTH) / 2.0 * scale;
    let mut y = (LOGICAL_SIZE - total_height) / 2.0 * scale;

    let track_w = BAR_TRACK_WIDTH * scale;
    let bar_h = BAR_HEIGHT * scale;
    let step = (BAR_HEIGHT + BAR_SPACING) * scale;

    for bar in bars {
        match bar.fraction {
            Some(f) => {
                let visual = quantize_visual_fraction(f) as f32;
                draw_single_bar(pixmap, x, y, track_w, bar_h, visual, scale)?;
            }
            None => {
                // Loading or error: track only.
                let path = rounded_rect_path(x, y, track_w, bar_h, TRACK_RADIUS * scale)?;
                pixmap.fill_path(
                    &path,
                    &create_paint(track_color()),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }
        y += step;
    }
    Ok(())
}

fn draw_single_bar(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    track_w: f32,
    bar_h: f32,
    fraction: f32,
    scale: f32,
) -> Result<(), TrayError> {
    let track_radius = TRACK_RADIUS * scale;

    let track = rounded_rect_path(x, y, track_w, bar_h, track_radius)?;
    pixmap.fill_path(
        &track,
        &create_paint(track_color()),
        FillRule::Winding,
        Transform::identity(),
        None,
    );

    // Keep the remainder at least this wide so a near-full bar still
    // reads as non-full after downsampling.
    let min_remainder = (4.0 * scale).max(0.2 * track_w);
    let remainder_w = (track_w * (1.0 - fraction)).max(0.0);
    let fill_w = if fraction >= 1.0 {
        track_w
    } else if remainder_w < min_remainder {
        (track_w - min_remainder).max(0.0)
    } else {
        track_w - remainder_w
    };

    if fill_w > 0.0 {
        // Trailing (moving) edge carries a reduced radius.
        let fill = rounded_rect_path(x, y, fill_w, bar_h, track_radius * FILL_RADIUS_SCALE)?;
        pixmap.fill_path(
            &fill,
            &create_paint(fill_color()),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
    Ok(())
}

// ============================================================================
// Circle Style
// ============================================================================

fn draw_circle(
    pixmap: &mut Pixmap,
    fraction: Option<f64>,
    scale: f32,
) -> Result<(), TrayError> {
    draw_ring(pixmap, scale)?;

    let Some(fraction) = fraction else {
        return Ok(());
    };
    let visual = quantize_visual_fraction(fraction) as f32;
    if visual <= 0.0 {
        return Ok(());
    }

    let center = LOGICAL_SIZE / 2.0 * scale;
    let radius = (LOGICAL_SIZE / 2.0 - RING_STROKE) * scale;
    let circumference = 2.0 * std::f32::consts::PI * radius;

    let mut pb = PathBuilder::new();
    pb.push_circle(center, center, radius);
    let path = pb.finish().ok_or(TrayError::Path)?;

    // Dash pattern exposes an arc of length circumference * fraction;
    // the -90 degree rotation starts it at 12 o'clock.
    let arc_len = circumference * visual;
    let dash = StrokeDash::new(vec![arc_len, circumference], 0.0).ok_or(TrayError::Path)?;
    let stroke = Stroke {
        width: RING_STROKE * scale,
        dash: Some(dash),
        ..Stroke::default()
    };
    let transform = Transform::from_rotate_at(-90.0, center, center);
    pixmap.stroke_path(&path, &create_paint(fill_color()), &stroke, transform, None);
    Ok(())
}

fn draw_ring(pixmap: &mut Pixmap, scale: f32) -> Result<(), TrayError> {
    let center = LOGICAL_SIZE / 2.0 * scale;
    let radius = (LOGICAL_SIZE / 2.0 - RING_STROKE) * scale;

    let mut pb = PathBuilder::new();
    pb.push_circle(center, center, radius);
    let path = pb.finish().ok_or(TrayError::Path)?;

    let stroke = Stroke {
        width: RING_STROKE * scale,
        ..Stroke::default()
    };
    pixmap.stroke_path(
        &path,
        &create_paint(track_color()),
        &stroke,
        Transform::identity(),
        None,
    );
    Ok(())
}

// ============================================================================
// Provider Style
// ============================================================================

fn draw_provider_icon(
    pixmap: &mut Pixmap,
    bytes: &[u8],
    scale: f32,
) -> Result<(), TrayError> {
    let decoded = match image::load_from_memory(bytes) {
        Ok(img) => img.to_rgba8(),
        Err(err) => {
            // A broken icon must not take the tray down; fall back.
            warn!(error = %err, "provider icon decode failed, using ring fallback");
            return draw_ring(pixmap, scale);
        }
    };

    let (w, h) = decoded.dimensions();
    let mut icon = Pixmap::new(w, h).ok_or(TrayError::Canvas { width: w, height: h })?;
    for (dst, src) in icon.data_mut().chunks_mut(4).zip(decoded.pixels()) {
        // tiny-skia stores premultiplied alpha.
        let a = u16::from(src[3]);
        dst[0] = ((u16::from(src[0]) * a) / 255) as u8;
        dst[1] = ((u16::from(src[1]) * a) / 255) as u8;
        dst[2] = ((u16::from(src[2]) * a) / 255) as u8;
        dst[3] = src[3];
    }

    let target = LOGICAL_SIZE * scale;
    let sx = target / w as f32;
    let sy = target / h as f32;
    pixmap.draw_pixmap(
        0,
        0,
        icon.as_ref(),
        &tiny_skia::PixmapPaint::default(),
        Transform::from_scale(sx, sy),
        None,
    );
    Ok(())
}

// ============================================================================
// Fallback Glyph
// ============================================================================

/// Static glyph used when there is nothing meaningful to draw: an
/// outline ring with a centered dot.
fn draw_fallback_glyph(pixmap: &mut Pixmap, scale: f32) -> Result<(), TrayError> {
    draw_ring(pixmap, scale)?;

    let center = LOGICAL_SIZE / 2.0 * scale;
    let mut pb = PathBuilder::new();
    pb.push_circle(center, center, 2.0 * scale);
    let path = pb.finish().ok_or(TrayError::Path)?;
    pixmap.fill_path(
        &path,
        &create_paint(fill_color()),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
    Ok(())
}

fn rounded_rect_path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Result<Path, TrayError> {
    let mut pb = PathBuilder::new();

    if radius <= 0.0 || width <= radius * 2.0 || height <= radius * 2.0 {
        let rect = Rect::from_xywh(x, y, width, height).ok_or(TrayError::Path)?;
        pb.push_rect(rect);
    } else {
        let r = radius.min(width / 2.0).min(height / 2.0);

        pb.move_to(x + r, y);
        pb.line_to(x + width - r, y);
        pb.quad_to(x + width, y, x + width, y + r);
        pb.line_to(x + width, y + height - r);
        pb.quad_to(x + width, y + height, x + width - r, y + height);
        pb.line_to(x + r, y + height);
        pb.quad_to(x, y + height, x, y + height - r);
        pb.line_to(x, y + r);
        pb.quad_to(x, y, x + r, y);
        pb.close();
    }

    pb.finish().ok_or(TrayError::Path)
}

// ============================================================================
// Rendered Icon
// ============================================================================

/// A rendered icon as RGBA pixel data.
#[derive(Debug, Clone)]
pub struct RenderedIcon {
    /// Premultiplied RGBA bytes, row-major.
    pub data: Vec<u8>,
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
}

impl RenderedIcon {
    /// Converts to PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, TrayError> {
        use image::{ImageBuffer, Rgba};

        let img: ImageBuffer<Rgba<u8>, _> =
            ImageBuffer::from_raw(self.width, self.height, self.data.clone())
                .ok_or(TrayError::Canvas {
                    width: self.width,
                    height: self.height,
                })?;

        let mut png_data = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut png_data);
        img.write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|e| TrayError::Encode(e.to_string()))?;

        Ok(png_data)
    }

    /// Gets the bytes as BGRA (for some platform APIs).
    pub fn to_bgra(&self) -> Vec<u8> {
        self.data
            .chunks(4)
            .flat_map(|rgba| [rgba[2], rgba[1], rgba[0], rgba[3]])
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
