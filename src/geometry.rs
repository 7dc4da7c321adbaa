//! Pure value types shared by the painter and UI runtime: screen-space
//! rectangles and the `RectSplit` layout cursor.

use glam::{IVec2, Vec2};

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { pos: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// A rect of `size` centered inside `self`.
    pub fn center(&self, size: Vec2) -> Rect {
        Rect {
            pos: self.pos + (self.size - size) * 0.5,
            size,
        }
    }

    /// Shrink on all sides by `amount`.
    pub fn inset(&self, amount: Vec2) -> Rect {
        Rect {
            pos: self.pos + amount,
            size: (self.size - amount * 2.0).max(Vec2::ZERO),
        }
    }

    /// Grow on all sides by `amount`. Dual of `inset`.
    pub fn outset(&self, amount: Vec2) -> Rect {
        Rect {
            pos: self.pos - amount,
            size: self.size + amount * 2.0,
        }
    }

    /// Carve off a `h`-tall strip from the top, shrinking `self` to the
    /// remainder. If `h` exceeds `self`'s height, the full rect is returned
    /// and `self` becomes a zero-height remainder at the bottom edge.
    pub fn split_top(&mut self, h: f32) -> Rect {
        let h = h.min(self.size.y);
        let carved = Rect::from_xywh(self.pos.x, self.pos.y, self.size.x, h);
        self.pos.y += h;
        self.size.y -= h;
        carved
    }

    pub fn split_bottom(&mut self, h: f32) -> Rect {
        let h = h.min(self.size.y);
        self.size.y -= h;
        Rect::from_xywh(self.pos.x, self.pos.y + self.size.y, self.size.x, h)
    }

    pub fn split_left(&mut self, w: f32) -> Rect {
        let w = w.min(self.size.x);
        let carved = Rect::from_xywh(self.pos.x, self.pos.y, w, self.size.y);
        self.pos.x += w;
        self.size.x -= w;
        carved
    }

    pub fn split_right(&mut self, w: f32) -> Rect {
        let w = w.min(self.size.x);
        self.size.x -= w;
        Rect::from_xywh(self.pos.x + self.size.x, self.pos.y, w, self.size.y)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }

    pub fn contains_ivec2(&self, point: IVec2) -> bool {
        self.contains(point.as_vec2())
    }
}

/// Axis a `RectSplit` carves slices along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A cursor that serially carves slices off a rect along one axis.
///
/// Unlike `Rect::split_*`, which mutates the rect it's called on in place,
/// `RectSplit` owns the remaining rect and returns successive slices from
/// one end, advancing the cursor each call.
#[derive(Debug, Clone, Copy)]
pub struct RectSplit {
    pub rect: Rect,
    pub direction: Axis,
}

impl RectSplit {
    pub fn new(rect: Rect, direction: Axis) -> Self {
        Self { rect, direction }
    }

    pub fn horizontal(rect: Rect) -> Self {
        Self::new(rect, Axis::Horizontal)
    }

    pub fn vertical(rect: Rect) -> Self {
        Self::new(rect, Axis::Vertical)
    }

    /// Carve the next slice of `size` along the split's axis and advance.
    pub fn split(&mut self, size: f32) -> Rect {
        match self.direction {
            Axis::Horizontal => self.rect.split_left(size),
            Axis::Vertical => self.rect.split_top(size),
        }
    }

    /// The space remaining after all splits so far.
    pub fn remaining(&self) -> Rect {
        self.rect
    }
}
