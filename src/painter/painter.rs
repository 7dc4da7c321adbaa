//! The per-frame draw-record builder: appends typed primitives and their
//! packed indices, and shapes/draws text through a glyph cache per font.

use std::collections::HashMap;

use glam::{IVec2, Vec2};
use tracing::debug;

use crate::color::Color;
use crate::geometry::Rect;
use crate::text::glyph_cache::GlyphCache;
use crate::text::shaper::{FontBackend, FontId};

use super::arena::{IndexArena, VertexArena};
use super::primitives::{
    rect_indices, ColorPrimitive, PrimitiveType, SdfRoundRectPrimitive, TexturedPrimitive, CLIP_NONE,
};

/// Default glyph-cache sizing; a font's first use lazily allocates a cache
/// with these parameters. Hosts with unusual font sizes can override via
/// [`Painter::set_glyph_cache_config`] before first use of that font.
const DEFAULT_GLYPH_SLOT_SIZE: u32 = 32;
const DEFAULT_GLYPH_ENTRY_CAPACITY: u32 = 1024;

pub struct Painter<F: FontBackend> {
    vertex_arena: VertexArena,
    index_arena: IndexArena,
    font_backend: F,
    glyph_caches: HashMap<FontId, GlyphCache>,
    glyph_cache_config: (u32, u32),
    /// Bindless index of the glyph atlas texture; set by the backend after
    /// it uploads atlas contents. Glyph draws reference this index.
    glyph_atlas_index: u32,
}

impl<F: FontBackend> Painter<F> {
    pub fn new(font_backend: F, vertex_capacity_bytes: usize, index_capacity: usize) -> Self {
        Self {
            vertex_arena: VertexArena::with_capacity(vertex_capacity_bytes),
            index_arena: IndexArena::with_capacity(index_capacity),
            font_backend,
            glyph_caches: HashMap::new(),
            glyph_cache_config: (DEFAULT_GLYPH_ENTRY_CAPACITY, DEFAULT_GLYPH_SLOT_SIZE),
            glyph_atlas_index: 0,
        }
    }

    pub fn set_glyph_cache_config(&mut self, entry_capacity: u32, slot_size: u32) {
        self.glyph_cache_config = (entry_capacity, slot_size);
    }

    pub fn set_glyph_atlas_index(&mut self, index: u32) {
        self.glyph_atlas_index = index;
    }

    pub fn font_backend_mut(&mut self) -> &mut F {
        &mut self.font_backend
    }

    pub fn vertex_bytes_offset(&self) -> usize {
        self.vertex_arena.vertex_bytes_offset()
    }

    pub fn index_count(&self) -> usize {
        self.index_arena.index_count()
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        self.vertex_arena.as_bytes()
    }

    pub fn indices(&self) -> &[u32] {
        self.index_arena.as_slice()
    }

    /// Zeros both buffer offsets. Called once per frame before any draw.
    /// Glyph caches are NOT reset here; they persist across frames.
    pub fn reset(&mut self) {
        self.vertex_arena.reset();
        self.index_arena.reset();
        for cache in self.glyph_caches.values_mut() {
            cache.begin_frame();
        }
    }

    fn glyph_cache_for(&mut self, font: FontId) -> &mut GlyphCache {
        let (capacity, slot_size) = self.glyph_cache_config;
        self.glyph_caches.entry(font).or_insert_with(|| GlyphCache::new(capacity, slot_size))
    }

    /// Rasterizes every glyph queued by `draw_label` calls since the last
    /// pump, across every font's cache. The backend drives this once per
    /// frame, between `end_frame` and the next `new_frame` (spec §5).
    pub fn pump_glyph_uploads(&mut self) {
        let fonts: Vec<FontId> = self.glyph_caches.keys().copied().collect();
        for font in fonts {
            let pending = self.glyph_caches.get_mut(&font).unwrap().drain_pending_uploads();
            for upload in pending {
                let bitmap = self.font_backend.rasterize(font, upload.glyph_id);
                if bitmap.is_empty() {
                    debug!(glyph_id = upload.glyph_id, "rasterized glyph has zero area, reserving empty slot");
                }
                self.glyph_caches.get_mut(&font).unwrap().mark_uploaded(
                    upload.glyph_id,
                    IVec2::new(bitmap.bearing_x, bitmap.bearing_y),
                    IVec2::new(bitmap.width as i32, bitmap.height as i32),
                );
            }
        }
    }

    pub fn draw_color_rect(&mut self, rect: Rect, clip_idx: u32, color: Color) {
        if color.is_transparent() {
            return;
        }
        let index = self.vertex_arena.push(ColorPrimitive::new(rect, clip_idx, color));
        self.index_arena.extend(rect_indices(PrimitiveType::Color, index));
    }

    pub fn draw_textured_rect(&mut self, rect: Rect, clip_idx: u32, uv: Rect, texture_idx: u32) {
        let index = self.vertex_arena.push(TexturedPrimitive::new(rect, clip_idx, uv, texture_idx));
        self.index_arena.extend(rect_indices(PrimitiveType::Textured, index));
    }

    pub fn draw_color_round_rect(
        &mut self,
        rect: Rect,
        clip_idx: u32,
        color: Color,
        border_color: Color,
        border_thickness: u32,
    ) {
        if color.is_transparent() && border_color.is_transparent() {
            return;
        }
        let index = self
            .vertex_arena
            .push(SdfRoundRectPrimitive::new(rect, clip_idx, color, border_color, border_thickness));
        self.index_arena.extend(rect_indices(PrimitiveType::SdfRoundRect, index));
    }

    pub fn draw_color_circle(
        &mut self,
        rect: Rect,
        clip_idx: u32,
        color: Color,
        border_color: Color,
        border_thickness: u32,
    ) {
        if color.is_transparent() && border_color.is_transparent() {
            return;
        }
        let index = self
            .vertex_arena
            .push(SdfRoundRectPrimitive::new(rect, clip_idx, color, border_color, border_thickness));
        self.index_arena.extend(rect_indices(PrimitiveType::SdfCircle, index));
    }

    /// `register_clip_rect`: emits a degenerate `Color` primitive whose six
    /// indices are retagged as `Clip`-typed, so the shader can treat them
    /// as scissor-defining only. Returns the primitive's index, which is
    /// what callers pass as `clip_rect_index` on later draws.
    pub fn register_clip_rect(&mut self, rect: Rect) -> u32 {
        let index = self.vertex_arena.push(ColorPrimitive::new(rect, CLIP_NONE, Color::TRANSPARENT));
        self.index_arena.extend(rect_indices(PrimitiveType::Clip, index));
        index
    }

    /// Shapes `text` line by line and returns `(sum of x_advance, line_height)`
    /// using `ascender - descender` for the height, per spec §4.1. Does not
    /// modify painter state (no glyph cache touches, no arena writes).
    pub fn measure_label(&mut self, font: FontId, text: &str) -> IVec2 {
        let metrics = self.font_backend.metrics(font);
        let line_height = (metrics.ascender - metrics.descender).round() as i32;
        let mut max_width = 0i32;
        let mut lines = 0i32;
        for line in text.split('\n') {
            lines += 1;
            let glyphs = self.font_backend.shape(font, line);
            let width: i32 = glyphs.iter().map(|g| g.x_advance_px()).sum();
            max_width = max_width.max(width);
        }
        IVec2::new(max_width, line_height * lines.max(1))
    }

    /// Shapes and draws `text` starting at `rect.pos`, clipped by `clip_idx`.
    /// Newlines reset the cursor's x and advance y by `font.metrics.line_height`
    /// (distinct from `measure_label`'s `ascender - descender`, per the
    /// observed difference between the two in the original renderer).
    pub fn draw_label(&mut self, rect: Rect, clip_idx: u32, font: FontId, text: &str) {
        let metrics = self.font_backend.metrics(font);
        let atlas_resolution = self.glyph_cache_for(font).atlas_resolution().max(1) as f32;
        let slot_size = self.glyph_cache_for(font).slot_size();

        let mut cursor = Vec2::new(rect.pos.x, rect.pos.y + metrics.ascender);
        for line in text.split('\n') {
            let glyphs = self.font_backend.shape(font, line);
            for glyph in &glyphs {
                if let Some(resident) = self.glyph_cache_for(font).request(glyph.glyph_id) {
                    if resident.bitmap_size.x > 0 && resident.bitmap_size.y > 0 {
                        let origin = Vec2::new(
                            cursor.x + resident.bitmap_top_left.x as f32,
                            cursor.y - resident.bitmap_top_left.y as f32,
                        );
                        let glyph_rect =
                            Rect::new(origin, Vec2::new(resident.bitmap_size.x as f32, resident.bitmap_size.y as f32));
                        let tile_origin = Vec2::new(
                            (resident.tile_x * slot_size) as f32,
                            (resident.tile_y * slot_size) as f32,
                        );
                        let uv = Rect::new(
                            tile_origin / atlas_resolution,
                            Vec2::new(resident.bitmap_size.x as f32, resident.bitmap_size.y as f32) / atlas_resolution,
                        );
                        self.draw_textured_rect(glyph_rect, clip_idx, uv, self.glyph_atlas_index);
                    }
                }
                cursor.x += glyph.x_advance_px() as f32;
            }
            cursor.x = rect.pos.x;
            cursor.y += metrics.line_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::shaper::FontMetrics;
    use crate::text::test_support::FakeFontBackend;

    fn backend() -> FakeFontBackend {
        FakeFontBackend::new(FontMetrics { ascender: 10.0, descender: -2.0, line_height: 12.0 })
            .with_char('H', 7, 6, 8)
            .with_char('i', 3, 2, 8)
    }

    fn upload_all<F: FontBackend>(painter: &mut Painter<F>) {
        painter.pump_glyph_uploads();
    }

    #[test]
    fn s1_empty_frame_has_no_primitives() {
        let mut painter = Painter::new(backend(), 4096, 256);
        painter.reset();
        assert_eq!(painter.vertex_bytes_offset(), 0);
        assert_eq!(painter.index_count(), 0);
    }

    #[test]
    fn s2_label_measure_and_glyph_positions() {
        let font = FontId(1);
        let mut painter = Painter::new(backend(), 4096, 256);
        painter.reset();

        let measured = painter.measure_label(font, "Hi");
        assert_eq!(measured, IVec2::new(10, 12));

        let rect = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        // First pass: glyphs are not yet resident, nothing is drawn.
        painter.draw_label(rect, CLIP_NONE, font, "Hi");
        assert_eq!(painter.index_count(), 0);

        upload_all(&mut painter);
        painter.draw_label(rect, CLIP_NONE, font, "Hi");
        assert_eq!(painter.index_count(), 12, "two glyphs, six indices each");

        // First glyph ('H') origin.x == 0, second ('i') origin.x == 7 (H's advance);
        // both at y == ascender == 10 since the fake backend's glyphs carry
        // zero bitmap top-bearing.
        let first: TexturedPrimitive = painter.vertex_arena.get(0);
        let second: TexturedPrimitive = painter.vertex_arena.get(1);
        assert_eq!(first.rect[0], 0.0);
        assert_eq!(first.rect[1], 10.0);
        assert_eq!(second.rect[0], 7.0);
        assert_eq!(second.rect[1], 10.0);
    }

    #[test]
    fn arena_monotonic_within_frame() {
        let font = FontId(1);
        let mut painter = Painter::new(backend(), 4096, 256);
        painter.reset();
        upload_all(&mut painter); // no-op, nothing queued yet
        painter.draw_label(Rect::from_xywh(0.0, 0.0, 10.0, 10.0), CLIP_NONE, font, "H");
        upload_all(&mut painter);
        let before = painter.vertex_bytes_offset();
        painter.draw_label(Rect::from_xywh(0.0, 0.0, 10.0, 10.0), CLIP_NONE, font, "H");
        assert!(painter.vertex_bytes_offset() >= before);
        painter.reset();
        assert_eq!(painter.vertex_bytes_offset(), 0);
        assert_eq!(painter.index_count(), 0);
    }

    #[test]
    fn transparent_color_rect_is_a_noop() {
        let mut painter = Painter::new(backend(), 4096, 256);
        painter.reset();
        painter.draw_color_rect(Rect::from_xywh(0.0, 0.0, 10.0, 10.0), CLIP_NONE, Color::TRANSPARENT);
        assert_eq!(painter.index_count(), 0);
        assert_eq!(painter.vertex_bytes_offset(), 0);
    }
}
