//! # immediate-ui
//!
//! An immediate-mode 2D UI core: a typed-primitive painter, a glyph-atlas
//! text pipeline, and a per-frame widget runtime with a persistent dock
//! tree. Rendered output is a vertex byte arena plus a packed index list;
//! this crate does not own a GPU backend, window, or event loop — a host
//! renders the arena however it likes and feeds `ui::Input` back in.
//!
//! ## Layout
//!
//! - [`geometry`]: `Rect` and `RectSplit`, shared by the painter and UI.
//! - [`color`]: packed `Color`.
//! - [`painter`]: the primitive buffer and draw API.
//! - [`text`]: shaping (`FontBackend`), rasterization, and the glyph cache.
//! - [`ui`]: per-frame state, widgets, scroll areas, and docking.

pub mod color;
pub mod geometry;
pub mod painter;
pub mod text;
pub mod ui;

pub use color::Color;
pub use geometry::{Axis, Rect, RectSplit};
pub use painter::Painter;
pub use text::{CosmicTextBackend, FontBackend, FontId, FontMetrics};
pub use ui::{DockTree, Input, UiState, UiTheme};
