//! Immediate-mode UI runtime: per-frame focus/activation state, clip and
//! scroll nesting, stateless widgets, and the persistent dock tree.

pub mod clip;
pub mod docking;
pub mod input;
pub mod scroll;
pub mod state;
pub mod theme;
pub mod widgets;

pub use clip::ClipStack;
pub use docking::{DockPersistError, DockTree, DropZone, NodeIndex, PersistedNode};
pub use input::{CursorIcon, Input, VirtualKey, MOUSE_BUTTON_COUNT, MOUSE_LEFT};
pub use scroll::{begin_scroll_area, end_scroll_area, ScrollAreaState, ScrollStack};
pub use state::{UiState, NO_ID};
pub use theme::{ThemeError, UiTheme};
pub use widgets::{button, button_split, invisible_button, label_in_rect, label_split, splitter_x, splitter_y, Align};
