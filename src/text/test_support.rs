//! Synthetic [`FontBackend`] used across the test suite so tests don't
//! depend on real font files. Advances and bitmaps are deterministic
//! functions of the glyph id so scenario tests (spec §8 S2) can assert
//! exact pixel positions.

use std::collections::HashMap;

use super::shaper::{FontBackend, FontId, FontMetrics, GlyphBitmap, ShapedGlyph};

#[derive(Debug, Clone, Copy)]
pub struct FakeGlyph {
    pub x_advance_px: i32,
    pub bitmap_w: u32,
    pub bitmap_h: u32,
    pub bearing_y: i32,
}

pub struct FakeFontBackend {
    pub metrics: FontMetrics,
    /// Maps a character to its synthetic glyph id, advance and bitmap size.
    pub glyphs: HashMap<char, (u32, FakeGlyph)>,
    next_glyph_id: u32,
}

impl FakeFontBackend {
    pub fn new(metrics: FontMetrics) -> Self {
        Self {
            metrics,
            glyphs: HashMap::new(),
            next_glyph_id: 1,
        }
    }

    /// Adds a glyph with zero bitmap top-bearing (glyph origin lands
    /// exactly on the baseline), matching the spec's S2 scenario.
    pub fn with_char(self, ch: char, x_advance_px: i32, bitmap_w: u32, bitmap_h: u32) -> Self {
        self.with_char_bearing(ch, x_advance_px, bitmap_w, bitmap_h, 0)
    }

    pub fn with_char_bearing(
        mut self,
        ch: char,
        x_advance_px: i32,
        bitmap_w: u32,
        bitmap_h: u32,
        bearing_y: i32,
    ) -> Self {
        let id = self.next_glyph_id;
        self.next_glyph_id += 1;
        self.glyphs.insert(ch, (id, FakeGlyph { x_advance_px, bitmap_w, bitmap_h, bearing_y }));
        self
    }
}

impl FontBackend for FakeFontBackend {
    fn metrics(&mut self, _font: FontId) -> FontMetrics {
        self.metrics
    }

    fn shape(&mut self, _font: FontId, text: &str) -> Vec<ShapedGlyph> {
        text.chars()
            .enumerate()
            .filter_map(|(i, ch)| {
                let (glyph_id, info) = *self.glyphs.get(&ch)?;
                Some(ShapedGlyph {
                    glyph_id,
                    x_advance: info.x_advance_px << 6,
                    y_advance: 0,
                    cluster: i as u32,
                })
            })
            .collect()
    }

    fn rasterize(&mut self, _font: FontId, glyph_id: u32) -> GlyphBitmap {
        let Some((_, info)) = self.glyphs.values().find(|(id, _)| *id == glyph_id) else {
            return GlyphBitmap::default();
        };
        GlyphBitmap {
            width: info.bitmap_w,
            height: info.bitmap_h,
            pitch: info.bitmap_w,
            buffer: vec![0xFF; (info.bitmap_w * info.bitmap_h) as usize],
            bearing_x: 0,
            bearing_y: info.bearing_y,
        }
    }
}
