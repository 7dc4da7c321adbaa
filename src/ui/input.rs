//! Per-frame input snapshot the host writes before `new_frame` and the UI
//! reads thereafter (spec §5, §6).

use std::collections::HashMap;

use glam::IVec2;

/// Mouse button slots, indexed positionally (left, right, middle, x1, x2).
pub const MOUSE_BUTTON_COUNT: usize = 5;
pub const MOUSE_LEFT: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Tab,
    Escape,
    Enter,
}

/// Cursor shape hint for the current frame. Reset every `new_frame` and
/// set by widgets (splitters, buttons) that want a particular hover cursor;
/// the host is responsible for actually applying it to the platform cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    ResizeEw,
    ResizeNs,
    Pointer,
    Text,
}

#[derive(Debug, Clone, Default)]
pub struct Input {
    pub mouse_position: IVec2,
    pub mouse_buttons_pressed: [bool; MOUSE_BUTTON_COUNT],
    pub mouse_buttons_pressed_last_frame: [bool; MOUSE_BUTTON_COUNT],
    pub mouse_wheel: Option<IVec2>,
    pub character_events: Vec<String>,
    pub keys_pressed: HashMap<VirtualKey, bool>,
}

impl Input {
    pub fn left_pressed(&self) -> bool {
        self.mouse_buttons_pressed[MOUSE_LEFT]
    }

    pub fn left_pressed_last_frame(&self) -> bool {
        self.mouse_buttons_pressed_last_frame[MOUSE_LEFT]
    }

    /// Left button was down last frame and is up this frame.
    pub fn left_released(&self) -> bool {
        self.left_pressed_last_frame() && !self.left_pressed()
    }
}
