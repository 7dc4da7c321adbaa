//! Byte and index arenas backing the painter's per-frame primitive buffer.
//!
//! The real engine hands the painter caller-owned vertex/index byte
//! regions sized for the frame; this crate has no host to hand them in, so
//! [`VertexArena`]/[`IndexArena`] own fixed-capacity buffers themselves.
//! Capacity is set once at construction and never grows — a write past
//! capacity is the same "precondition violation" the spec assigns to an
//! undersized caller-provided arena (§4.1), so it panics rather than
//! reallocating.

use bytemuck::Pod;

/// Rounds `cursor` up to a multiple of `align` (`align` must be a power of two).
pub fn align_up(cursor: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (cursor + align - 1) & !(align - 1)
}

/// A typed byte arena: each `push::<T>` aligns the cursor to `size_of::<T>()`,
/// writes `T`, and returns `offset / size_of::<T>()` as the element index.
pub struct VertexArena {
    bytes: Vec<u8>,
    cursor: usize,
}

impl VertexArena {
    pub fn with_capacity(capacity_bytes: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity_bytes],
            cursor: 0,
        }
    }

    /// Bytes occupied so far; monotonically non-decreasing within a frame.
    pub fn vertex_bytes_offset(&self) -> usize {
        self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.cursor]
    }

    /// Writes `value` at the next `size_of::<T>()`-aligned offset, returning
    /// its index within the typed region (`offset / size_of::<T>()`).
    pub fn push<T: Pod>(&mut self, value: T) -> u32 {
        let stride = std::mem::size_of::<T>();
        let aligned = align_up(self.cursor, stride);
        let end = aligned + stride;
        assert!(
            end <= self.bytes.len(),
            "vertex arena capacity exceeded: need {end} bytes, have {}",
            self.bytes.len()
        );
        self.bytes[aligned..end].copy_from_slice(bytemuck::bytes_of(&value));
        self.cursor = end;
        (aligned / stride) as u32
    }

    /// Reads back the primitive at `index` of type `T`. Used by tests to
    /// assert index validity (spec §8 invariant 2).
    pub fn get<T: Pod>(&self, index: u32) -> T {
        let stride = std::mem::size_of::<T>();
        let start = index as usize * stride;
        *bytemuck::from_bytes(&self.bytes[start..start + stride])
    }
}

/// The index buffer: a flat `Vec<u32>` of packed `(type, index, corner)` triples.
pub struct IndexArena {
    indices: Vec<u32>,
    capacity: usize,
}

impl IndexArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn reset(&mut self) {
        self.indices.clear();
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.indices
    }

    pub fn extend(&mut self, packed: impl IntoIterator<Item = u32>) {
        for idx in packed {
            assert!(
                self.indices.len() < self.capacity,
                "index arena capacity exceeded: have {}",
                self.capacity
            );
            self.indices.push(idx);
        }
    }
}
