//! Default [`FontBackend`] implementation, wrapping `cosmic-text` the way
//! the teacher crate's `FontSystemWrapper` already does for shaping and
//! rasterization.

use std::collections::HashMap;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent};

use super::shaper::{FontBackend, FontId, FontMetrics, GlyphBitmap, ShapedGlyph};

/// Per-`FontId` shaping parameters the host registers up front. The trait
/// itself only carries an opaque `FontId`, so the backend needs its own
/// mapping from that handle to a concrete face and point size.
#[derive(Debug, Clone)]
pub struct FontFace {
    pub family: String,
    pub size_px: f32,
}

pub struct CosmicTextBackend {
    font_system: FontSystem,
    swash_cache: SwashCache,
    faces: HashMap<FontId, FontFace>,
    /// Cache keys for glyph ids returned by the most recent `shape` call.
    /// `rasterize` takes a bare `glyph_id` per the spec's rasterizer
    /// contract, but cosmic-text's swash cache is keyed on its own
    /// `CacheKey`, so we remember the mapping each shape pass produces.
    cache_keys: HashMap<(FontId, u32), cosmic_text::CacheKey>,
}

impl CosmicTextBackend {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            faces: HashMap::new(),
            cache_keys: HashMap::new(),
        }
    }

    pub fn register_face(&mut self, id: FontId, face: FontFace) {
        self.faces.insert(id, face);
    }

    fn face(&self, font: FontId) -> &FontFace {
        self.faces
            .get(&font)
            .unwrap_or_else(|| panic!("font backend: unregistered FontId({})", font.0))
    }

    fn buffer_for(&mut self, font: FontId, text: &str) -> Buffer {
        let face = self.face(font).clone();
        let metrics = Metrics::new(face.size_px, face.size_px * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let attrs = Attrs::new().family(Family::Name(&face.family));
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }
}

impl Default for CosmicTextBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBackend for CosmicTextBackend {
    fn metrics(&mut self, font: FontId) -> FontMetrics {
        let face = self.face(font);
        let size = face.size_px;
        // cosmic-text exposes hinted face metrics only via shaped runs; a
        // flat ascender/descender split off the requested point size is
        // the same approximation the teacher's renderer uses for layout
        // math before a run has been shaped.
        FontMetrics {
            ascender: size * 0.8,
            descender: -(size * 0.2),
            line_height: size * 1.2,
        }
    }

    fn shape(&mut self, font: FontId, text: &str) -> Vec<ShapedGlyph> {
        let buffer = self.buffer_for(font, text);
        let mut glyphs = Vec::new();
        for run in buffer.layout_runs() {
            for glyph in run.glyphs {
                let physical = glyph.physical((0.0, 0.0), 1.0);
                self.cache_keys.insert((font, physical.cache_key.glyph_id as u32), physical.cache_key);
                glyphs.push(ShapedGlyph {
                    glyph_id: physical.cache_key.glyph_id as u32,
                    x_advance: (glyph.w * 64.0) as i32,
                    y_advance: 0,
                    cluster: glyph.start as u32,
                });
            }
        }
        glyphs
    }

    fn rasterize(&mut self, font: FontId, glyph_id: u32) -> GlyphBitmap {
        let Some(cache_key) = self.cache_keys.get(&(font, glyph_id)).copied() else {
            return GlyphBitmap::default();
        };
        match self.swash_cache.get_image_uncached(&mut self.font_system, cache_key) {
            Some(image) if image.content != SwashContent::SubpixelMask => GlyphBitmap {
                width: image.placement.width,
                height: image.placement.height,
                pitch: image.placement.width,
                buffer: image.data,
                bearing_x: image.placement.left,
                bearing_y: image.placement.top,
            },
            _ => GlyphBitmap::default(),
        }
    }
}
