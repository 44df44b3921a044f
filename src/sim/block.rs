//! Block geometry and horizontal overlap
//!
//! Blocks are axis-aligned rectangles in field space: origin at the top-left
//! corner of the play field, `y` growing downward.

use serde::{Deserialize, Serialize};

/// Block colours, cycled by stack depth
pub const PALETTE: [&str; 16] = [
    "#FF5252", "#FF4081", "#E040FB", "#7C4DFF", "#536DFE", "#448AFF", "#40C4FF", "#18FFFF",
    "#64FFDA", "#69F0AE", "#B2FF59", "#EEFF41", "#FFFF00", "#FFD740", "#FFAB40", "#FF6E40",
];

/// Palette slot for a block at the given stack depth
#[inline]
pub fn palette_index(depth: usize) -> u8 {
    (depth % PALETTE.len()) as u8
}

/// A stacked or falling block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Left edge; may lie outside the field while in flight
    pub x: f32,
    /// Top edge, fixed when the block is spawned
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Index into [`PALETTE`]
    pub color: u8,
}

impl Block {
    pub fn new(x: f32, y: f32, width: f32, height: f32, color: u8) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color,
        }
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Hex colour string for this block
    pub fn color_hex(&self) -> &'static str {
        PALETTE[self.color as usize % PALETTE.len()]
    }
}

/// Horizontal overlap between the top of the stack and the falling block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub start: f32,
    pub end: f32,
    /// Always within `[0, min(top.width, falling.width)]`
    pub width: f32,
}

impl Overlap {
    /// Compute the overlap interval of two blocks
    pub fn between(top: &Block, falling: &Block) -> Self {
        let start = top.x.max(falling.x);
        let end = top.right().min(falling.right());
        // Float rounding on `x + width` can push the raw difference a hair
        // past either width, so clamp into range.
        let width = (end - start).max(0.0).min(top.width).min(falling.width);
        Self { start, end, width }
    }

    /// True when the blocks do not touch at all
    #[inline]
    pub fn is_miss(&self) -> bool {
        self.width <= 0.0
    }

    /// Fraction of the lower block that is covered
    pub fn ratio(&self, top: &Block) -> f32 {
        if top.width > 0.0 {
            self.width / top.width
        } else {
            0.0
        }
    }
}
