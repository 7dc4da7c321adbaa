//! Per-frame UI state: focus/activation, the clip stack, the scroll-area
//! nesting stack, and the input snapshot (spec §3, §4.4).

use glam::Vec2;

use super::clip::ClipStack;
use super::input::{CursorIcon, Input};
use super::scroll::ScrollStack;

/// `0` means "no widget"; real ids start at 1 (`make_id` pre-increments).
pub const NO_ID: u64 = 0;

pub struct UiState {
    pub focused: u64,
    pub active: u64,
    gen: u64,
    pub clip_stack: ClipStack,
    pub scroll_stack: ScrollStack,
    pub cursor: CursorIcon,
    pub active_drag_offset: Vec2,
    pub inputs: Input,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            focused: NO_ID,
            active: NO_ID,
            gen: 0,
            clip_stack: ClipStack::new(),
            scroll_stack: ScrollStack::new(),
            cursor: CursorIcon::default(),
            active_drag_offset: Vec2::ZERO,
            inputs: Input::default(),
        }
    }

    /// Must happen-before any widget call this frame (spec §5).
    pub fn new_frame(&mut self, inputs: Input) {
        self.gen = 0;
        self.focused = NO_ID;
        self.cursor = CursorIcon::default();
        self.inputs = inputs;
    }

    /// Must happen after all widget calls this frame.
    pub fn end_frame(&mut self) {
        debug_assert_eq!(self.clip_stack.depth(), 0, "clip stack unbalanced at end_frame");
        debug_assert_eq!(self.scroll_stack.depth(), 0, "scroll stack unbalanced at end_frame");
        if !self.inputs.left_pressed() {
            self.active = NO_ID;
        }
    }

    /// Positional id: identity is determined purely by call order.
    pub fn make_id(&mut self) -> u64 {
        self.gen += 1;
        self.gen
    }

    pub fn is_hovering(&self, rect: crate::geometry::Rect) -> bool {
        rect.contains(self.inputs.mouse_position.as_vec2())
    }

    /// The activation state machine evaluated by every interactive widget
    /// (spec §4.4). Returns whether a click fired on this widget this frame.
    pub fn widget_interact(&mut self, id: u64, hovered: bool) -> bool {
        if hovered {
            self.focused = id;
            if self.active == NO_ID && self.inputs.left_pressed() {
                self.active = id;
            }
        }
        self.inputs.left_pressed_last_frame()
            && !self.inputs.left_pressed()
            && self.focused == id
            && self.active == id
    }
}
