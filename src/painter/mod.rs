mod arena;
mod painter;
mod primitives;

pub use arena::{align_up, IndexArena, VertexArena};
pub use painter::Painter;
pub use primitives::{
    rect_indices, ColorPrimitive, PrimitiveType, SdfCirclePrimitive, SdfRoundRectPrimitive, TexturedPrimitive,
    CLIP_NONE,
};
