//! Typed primitive records written into the painter's byte arena.
//!
//! Each variant below occupies its own region of the arena (see
//! [`super::arena::PrimitiveArena`]); the region a given primitive lives in
//! is selected by its [`PrimitiveType`] tag, never by an enum discriminant
//! stored alongside the data.

use crate::geometry::Rect;

/// Marks a primitive as unclipped.
pub const CLIP_NONE: u32 = u32::MAX;

/// Discriminant selecting which typed arena region an index addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PrimitiveType {
    Color = 0,
    Textured = 1,
    SdfRoundRect = 2,
    SdfCircle = 3,
    Clip = 4,
}

impl PrimitiveType {
    pub const fn from_bits(bits: u32) -> Self {
        match bits {
            0 => PrimitiveType::Color,
            1 => PrimitiveType::Textured,
            2 => PrimitiveType::SdfRoundRect,
            3 => PrimitiveType::SdfCircle,
            4 => PrimitiveType::Clip,
            _ => panic!("invalid primitive type tag"),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorPrimitive {
    pub rect: [f32; 4],
    pub clip_rect_index: u32,
    pub color: u32,
    pub _pad: [u32; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TexturedPrimitive {
    pub rect: [f32; 4],
    pub uv: [f32; 4],
    pub clip_rect_index: u32,
    pub texture: u32,
    pub _pad: [u32; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SdfRoundRectPrimitive {
    pub rect: [f32; 4],
    pub clip_rect_index: u32,
    pub color: u32,
    pub border_color: u32,
    pub border_thickness: u32,
}

/// Identical layout to [`SdfRoundRectPrimitive`]; a distinct type only so
/// the `PrimitiveType::SdfCircle` region is addressed separately from
/// `SdfRoundRect`, per the spec's "one region per type" rule.
pub type SdfCirclePrimitive = SdfRoundRectPrimitive;

impl ColorPrimitive {
    pub fn new(rect: Rect, clip_rect_index: u32, color: crate::color::Color) -> Self {
        Self {
            rect: [rect.pos.x, rect.pos.y, rect.size.x, rect.size.y],
            clip_rect_index,
            color: color.0,
            _pad: [0; 2],
        }
    }
}

impl TexturedPrimitive {
    pub fn new(rect: Rect, clip_rect_index: u32, uv: Rect, texture: u32) -> Self {
        Self {
            rect: [rect.pos.x, rect.pos.y, rect.size.x, rect.size.y],
            uv: [uv.pos.x, uv.pos.y, uv.size.x, uv.size.y],
            clip_rect_index,
            texture,
            _pad: [0; 2],
        }
    }
}

impl SdfRoundRectPrimitive {
    pub fn new(
        rect: Rect,
        clip_rect_index: u32,
        color: crate::color::Color,
        border_color: crate::color::Color,
        border_thickness: u32,
    ) -> Self {
        Self {
            rect: [rect.pos.x, rect.pos.y, rect.size.x, rect.size.y],
            clip_rect_index,
            color: color.0,
            border_color: border_color.0,
            border_thickness,
        }
    }
}

/// Packs a primitive's `(type, index, corner)` triple into one draw index.
///
/// Layout (low to high bit): `corner` (2 bits), `type` (6 bits), `index`
/// (remaining bits). Exact bit positions are a CPU/GPU-shared convention,
/// not part of the public index value itself.
pub const CORNER_BITS: u32 = 2;
pub const TYPE_BITS: u32 = 6;

pub fn pack_index(prim_type: PrimitiveType, index: u32, corner: u32) -> u32 {
    debug_assert!(corner < (1 << CORNER_BITS));
    let type_bits = prim_type as u32;
    debug_assert!(type_bits < (1 << TYPE_BITS));
    debug_assert!(index < (1 << (32 - CORNER_BITS - TYPE_BITS)));
    (index << (CORNER_BITS + TYPE_BITS)) | (type_bits << CORNER_BITS) | corner
}

pub fn unpack_index(packed: u32) -> (PrimitiveType, u32, u32) {
    let corner = packed & ((1 << CORNER_BITS) - 1);
    let type_bits = (packed >> CORNER_BITS) & ((1 << TYPE_BITS) - 1);
    let index = packed >> (CORNER_BITS + TYPE_BITS);
    (PrimitiveType::from_bits(type_bits), index, corner)
}

/// Corner ordering for the two triangles making up a rectangle:
/// TL, BL, BR, TL, BR, TR.
pub const RECT_CORNER_ORDER: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Builds the six packed indices for one rectangle at `prim_index` of
/// `prim_type`, in the two-triangle corner order.
pub fn rect_indices(prim_type: PrimitiveType, prim_index: u32) -> [u32; 6] {
    RECT_CORNER_ORDER.map(|corner| pack_index(prim_type, prim_index, corner))
}

/// Appends the six packed indices for one rectangle at `prim_index` of
/// `prim_type` to `out`.
pub fn push_rect_indices(out: &mut Vec<u32>, prim_type: PrimitiveType, prim_index: u32) {
    out.extend(rect_indices(prim_type, prim_index));
}
