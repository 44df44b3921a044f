//! Shape generation for 2D primitives
//!
//! Everything is built in field space (origin top-left, y down) and mapped
//! to normalized device coordinates at upload time.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::sim::{PALETTE, RenderSnapshot};

/// Parse `#RRGGBB` into linear-ish RGBA floats
pub fn hex_to_rgba(hex: &str, alpha: f32) -> Option<[f32; 4]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| -> Option<f32> {
        let byte = u8::from_str_radix(digits.get(i..i + 2)?, 16).ok()?;
        Some(byte as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?, alpha])
}

/// RGBA for a palette slot
pub fn palette_rgba(index: u8) -> [f32; 4] {
    hex_to_rgba(PALETTE[index as usize % PALETTE.len()], 1.0).unwrap_or(colors::FALLBACK_BLOCK)
}

/// Two triangles covering an axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let max = min + size;
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

/// Build the vertex list for one frame.
///
/// `flash` (0-1) fades a highlight over the top placed block after a
/// perfect stack.
pub fn snapshot_vertices(snap: &RenderSnapshot, flash: f32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((snap.rects.len() + 2) * 6);

    vertices.extend(rect(
        Vec2::ZERO,
        Vec2::new(snap.field_width, snap.field_height),
        colors::FIELD,
    ));

    for r in &snap.rects {
        vertices.extend(rect(
            Vec2::new(r.x, r.y),
            Vec2::new(r.width, r.height),
            palette_rgba(r.color),
        ));
    }

    if flash > 0.0 {
        if let Some(top) = snap.rects.iter().rev().find(|r| !r.falling) {
            let mut color = colors::PERFECT_FLASH;
            color[3] *= flash.clamp(0.0, 1.0);
            vertices.extend(rect(
                Vec2::new(top.x, top.y),
                Vec2::new(top.width, top.height),
                color,
            ));
        }
    }

    vertices
}

/// Map a field-space point to NDC, letterboxing the field inside the
/// viewport while keeping its aspect ratio
pub fn field_to_ndc(point: Vec2, field: Vec2, viewport: (u32, u32)) -> Vec2 {
    let view = Vec2::new(viewport.0.max(1) as f32, viewport.1.max(1) as f32);
    let scale = (view.x / field.x).min(view.y / field.y);
    let centered = (point - field * 0.5) * scale;
    Vec2::new(centered.x / (view.x * 0.5), -centered.y / (view.y * 0.5))
}

/// Pixel rect `(x, y, width, height)` the letterboxed field covers.
/// Always lies inside the viewport.
pub fn field_scissor(field: Vec2, viewport: (u32, u32)) -> (u32, u32, u32, u32) {
    let (vw, vh) = (viewport.0.max(1), viewport.1.max(1));
    let scale = (vw as f32 / field.x).min(vh as f32 / field.y);
    let w = ((field.x * scale).round() as u32).clamp(1, vw);
    let h = ((field.y * scale).round() as u32).clamp(1, vh);
    ((vw - w) / 2, (vh - h) / 2, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;
    use crate::tuning::Tuning;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(hex_to_rgba("#FF0000", 1.0), Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(hex_to_rgba("FF0000", 1.0), None);
        assert_eq!(hex_to_rgba("#GG0000", 1.0), None);
        assert_eq!(hex_to_rgba("#FFF", 1.0), None);
    }

    #[test]
    fn test_every_palette_entry_parses() {
        for hex in PALETTE {
            assert!(hex_to_rgba(hex, 1.0).is_some(), "bad palette entry {hex}");
        }
    }

    #[test]
    fn test_snapshot_vertex_count() {
        let mut state = GameState::new(Tuning::default(), 0);
        state.start();
        let snap = state.snapshot();

        // Field + base + falling block
        assert_eq!(snapshot_vertices(&snap, 0.0).len(), 3 * 6);
        // Flash adds one more quad
        assert_eq!(snapshot_vertices(&snap, 1.0).len(), 4 * 6);
    }

    #[test]
    fn test_field_corners_map_to_letterboxed_ndc() {
        let field = Vec2::new(400.0, 600.0);

        // Exact aspect: corners hit the viewport corners
        let tl = field_to_ndc(Vec2::ZERO, field, (400, 600));
        let br = field_to_ndc(field, field, (400, 600));
        assert!((tl - Vec2::new(-1.0, 1.0)).length() < 1e-5);
        assert!((br - Vec2::new(1.0, -1.0)).length() < 1e-5);

        // Wide viewport: field is pillarboxed, full height
        let tl = field_to_ndc(Vec2::ZERO, field, (1200, 600));
        assert!((tl.y - 1.0).abs() < 1e-5);
        assert!((tl.x + 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_scissor_covers_only_the_field() {
        let field = Vec2::new(400.0, 600.0);

        assert_eq!(field_scissor(field, (400, 600)), (0, 0, 400, 600));
        // Pillarboxed: side bars stay clear
        assert_eq!(field_scissor(field, (1200, 600)), (400, 0, 400, 600));
        // Letterboxed top and bottom
        assert_eq!(field_scissor(field, (400, 1200)), (0, 300, 400, 600));
        // Degenerate viewport still yields a valid rect
        assert_eq!(field_scissor(field, (0, 0)), (0, 0, 1, 1));
    }
}
