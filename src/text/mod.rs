//! Text shaping, rasterization, and glyph caching.
//!
//! - `shaper`: the backend-agnostic [`shaper::FontBackend`] trait and its
//!   value types.
//! - `cosmic_backend`: the production `FontBackend` built on cosmic-text.
//! - `glyph_cache`: the fixed-capacity LRU atlas cache the painter drives.
//! - `test_support`: a deterministic fake backend for tests.

pub mod cosmic_backend;
pub mod glyph_cache;
pub mod shaper;

#[cfg(test)]
pub mod test_support;

pub use cosmic_backend::CosmicTextBackend;
pub use glyph_cache::{GlyphCache, PendingUpload, ResidentGlyph};
pub use shaper::{FontBackend, FontId, FontMetrics, GlyphBitmap, ShapedGlyph};
