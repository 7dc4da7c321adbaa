//! Shaping/rasterization contract the painter and glyph cache depend on.
//!
//! `FontBackend` is the trait form of the source's callback-shaped font
//! rasterizer (spec §9: "express as a trait/interface `FontBackend` with
//! one method; no mutable borrowed state across calls"). We give it two
//! methods — shape and rasterize — since the painter needs both and a
//! single method would force callers to encode a mode flag instead.

/// Opaque font handle; meaning is entirely up to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// One positioned glyph from shaping, in 26.6 fixed point per spec §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapedGlyph {
    pub glyph_id: u32,
    pub x_advance: i32,
    pub y_advance: i32,
    pub cluster: u32,
}

impl ShapedGlyph {
    /// Converts a 26.6 fixed-point advance to whole pixels, per §4.1's
    /// "Painter shifts right by 6 to convert".
    pub fn x_advance_px(self) -> i32 {
        self.x_advance >> 6
    }
}

/// An 8-bit coverage bitmap returned by the rasterizer, matching the
/// `load_glyph` contract in spec §6.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    /// Row stride in bytes; may exceed `width` (row padding).
    pub pitch: u32,
    pub buffer: Vec<u8>,
    pub bearing_x: i32,
    pub bearing_y: i32,
}

impl GlyphBitmap {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Font metrics relevant to line layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascender: f32,
    pub descender: f32,
    /// Recommended line advance; may differ from `ascender - descender`
    /// when the font carries line gap, per `painter.cpp`'s documented
    /// distinction between `measure_label` and `draw_label` line height.
    pub line_height: f32,
}

/// Shaping and rasterization, wrapping an external text engine.
///
/// Implementations must clear any internal shaping buffer before each
/// `shape` call (spec §4.3) and must not retain borrowed state across
/// calls — every call is self-contained.
pub trait FontBackend {
    fn metrics(&mut self, font: FontId) -> FontMetrics;

    fn shape(&mut self, font: FontId, text: &str) -> Vec<ShapedGlyph>;

    fn rasterize(&mut self, font: FontId, glyph_id: u32) -> GlyphBitmap;
}
