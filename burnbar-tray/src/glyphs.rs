//! Built-in vector glyphs for tray percent text.
//!
//! At menu bar size a full text shaper is overkill; digits, `%`, and
//! `.` cover everything the tray ever prints, so they are drawn as
//! segment primitives the same way the other glyph shapes are.

use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::error::TrayError;

/// Advance per character relative to font size. The canvas is sized
/// with the matching empirical estimate in [`estimated_text_width`].
const ADVANCE_FACTOR: f32 = 0.62;
/// Glyph body width relative to font size.
const BODY_FACTOR: f32 = 0.52;
/// Segment thickness relative to font size.
const WEIGHT_FACTOR: f32 = 0.14;

/// Estimates rendered text width for canvas sizing.
pub fn estimated_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * ADVANCE_FACTOR + font_size * 0.2
}

/// Seven-segment encodings for 0-9: (a, b, c, d, e, f, g).
const SEGMENTS: [[bool; 7]; 10] = [
    [true, true, true, true, true, true, false],    // 0
    [false, true, true, false, false, false, false], // 1
    [true, true, false, true, true, false, true],   // 2
    [true, true, true, true, false, false, true],   // 3
    [false, true, true, false, false, true, true],  // 4
    [true, false, true, true, false, true, true],   // 5
    [true, false, true, true, true, true, true],    // 6
    [true, true, true, false, false, false, false], // 7
    [true, true, true, true, true, true, true],     // 8
    [true, true, true, true, false, true, true],    // 9
];

/// Draws `text` with the glyph baseline box starting at `(x, y)`
/// (top-left). Unknown characters advance without drawing.
pub fn draw_text(
    pixmap: &mut Pixmap,
    text: &str,
    x: f32,
    y: f32,
    font_size: f32,
    color: Color,
) -> Result<(), TrayError> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;

    let advance = font_size * ADVANCE_FACTOR;
    let mut cursor = x;
    for ch in text.chars() {
        match ch {
            '0'..='9' => {
                let digit = (ch as usize) - ('0' as usize);
                draw_digit(pixmap, digit, cursor, y, font_size, &paint)?;
            }
            '%' => draw_percent(pixmap, cursor, y, font_size, &paint)?,
            '.' => draw_dot(pixmap, cursor, y, font_size, &paint),
            _ => {}
        }
        cursor += advance;
    }
    Ok(())
}

fn draw_digit(
    pixmap: &mut Pixmap,
    digit: usize,
    x: f32,
    y: f32,
    font_size: f32,
    paint: &Paint,
) -> Result<(), TrayError> {
    let w = font_size * BODY_FACTOR;
    let h = font_size;
    let t = font_size * WEIGHT_FACTOR;
    let half = h / 2.0;

    let segments = SEGMENTS[digit];
    let rects = [
        (segments[0], Rect::from_xywh(x, y, w, t)),                       // a
        (segments[1], Rect::from_xywh(x + w - t, y, t, half)),            // b
        (segments[2], Rect::from_xywh(x + w - t, y + half, t, half)),     // c
        (segments[3], Rect::from_xywh(x, y + h - t, w, t)),               // d
        (segments[4], Rect::from_xywh(x, y + half, t, half)),             // e
        (segments[5], Rect::from_xywh(x, y, t, half)),                    // f
        (segments[6], Rect::from_xywh(x, y + half - t / 2.0, w, t)),      // g
    ];

    for (on, rect) in rects {
        if !on {
            continue;
        }
        let rect = rect.ok_or(TrayError::Path)?;
        pixmap.fill_rect(rect, paint, Transform::identity(), None);
    }
    Ok(())
}

fn draw_percent(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    font_size: f32,
    paint: &Paint,
) -> Result<(), TrayError> {
    let w = font_size * BODY_FACTOR;
    let h = font_size;
    let dot = font_size * 0.24;

    if let Some(rect) = Rect::from_xywh(x, y, dot, dot) {
        pixmap.fill_rect(rect, paint, Transform::identity(), None);
    }
    if let Some(rect) = Rect::from_xywh(x + w - dot, y + h - dot, dot, dot) {
        pixmap.fill_rect(rect, paint, Transform::identity(), None);
    }

    // Slash from bottom-left to top-right.
    let mut pb = PathBuilder::new();
    pb.move_to(x, y + h);
    pb.line_to(x + w, y);
    let path = pb.finish().ok_or(TrayError::Path)?;

    let stroke = Stroke {
        width: font_size * WEIGHT_FACTOR * 0.8,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    Ok(())
}

fn draw_dot(pixmap: &mut Pixmap, x: f32, y: f32, font_size: f32, paint: &Paint) {
    let t = font_size * WEIGHT_FACTOR;
    if let Some(rect) = Rect::from_xywh(x, y + font_size - t, t * 1.2, t) {
        pixmap.fill_rect(rect, paint, Transform::identity(), None);
    }
}

// ============================================================================
// Tests
// ============================================================================
