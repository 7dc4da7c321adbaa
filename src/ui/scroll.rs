//! Scroll areas (spec §4.8): a content rect larger than its viewport,
//! scrolled via wheel or a drag thumb, clipped to the viewport.

use glam::Vec2;

use crate::color::Color;
use crate::geometry::Rect;
use crate::painter::Painter;
use crate::text::shaper::FontBackend;

use super::clip::UI_MAX_DEPTH;
use super::state::UiState;
use super::theme::UiTheme;

/// Large enough that callers never need to pre-measure content before
/// drawing into a scroll area (spec §4.8 step 1).
const MAX_SCROLL_SIZE: f32 = 65536.0;

/// One nesting level of the scroll stack. Pure bookkeeping for the current
/// frame's `begin`/`end` pairing and interaction; cross-frame persistence
/// (offset, measured content size) lives in the caller-owned
/// [`ScrollAreaState`], mirroring how splitters own their own `ratio`.
struct ScrollFrame {
    starting_rect: Rect,
    clip_index: u32,
}

#[derive(Default)]
pub struct ScrollStack {
    frames: Vec<ScrollFrame>,
}

impl ScrollStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// Caller-owned, cross-frame scroll state: the current scroll offset and
/// the content extents measured by the previous frame's `end_scroll_area`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollAreaState {
    pub offset: Vec2,
    pub content_size: Vec2,
}

/// `begin_scroll_area`: pushes a nesting frame, computes and clamps the
/// scrollbar thumb from the previous frame's content extents, handles
/// wheel/drag interaction, and returns the inner (content) rect.
pub fn begin_scroll_area<F: FontBackend>(
    ui: &mut UiState,
    painter: &mut Painter<F>,
    theme: &UiTheme,
    content_rect: Rect,
    state: &mut ScrollAreaState,
) -> Rect {
    assert!(ui.scroll_stack.depth() < UI_MAX_DEPTH, "scroll stack overflow: exceeded UI_MAX_DEPTH");

    let viewport_height = content_rect.size.y;
    let max_offset_y = (state.content_size.y - viewport_height).max(0.0);

    let area_id = ui.make_id();
    let thumb_id = ui.make_id();

    if ui.is_hovering(content_rect) {
        if let Some(wheel) = ui.inputs.mouse_wheel {
            ui.widget_interact(area_id, true);
            state.offset.y -= theme.font_size * wheel.y as f32;
        }
    }

    let mut bar_rect = content_rect;
    let bar = bar_rect.split_right(theme.font_size);
    let track = bar.inset(Vec2::new(2.0, 2.0));

    let thumb_ratio = if state.content_size.y > 0.0 { (viewport_height / state.content_size.y).clamp(0.05, 1.0) } else { 1.0 };
    let scroll_ratio = if max_offset_y > 0.0 { state.offset.y / max_offset_y } else { 0.0 };
    let thumb_height = (track.size.y * thumb_ratio).max(8.0);
    let thumb_travel = (track.size.y - thumb_height).max(0.0);
    let thumb_rect = Rect::from_xywh(track.pos.x, track.pos.y + thumb_travel * scroll_ratio, track.size.x, thumb_height);

    let thumb_hovered = ui.is_hovering(thumb_rect);
    let thumb_clicked_or_dragging = ui.widget_interact(thumb_id, thumb_hovered);
    let _ = thumb_clicked_or_dragging; // click semantics unused; drag drives the offset below
    if ui.active == thumb_id && thumb_travel > 0.0 {
        let pointer_y = ui.inputs.mouse_position.y as f32;
        let ratio = ((pointer_y - track.pos.y - thumb_height * 0.5) / thumb_travel).clamp(0.0, 1.0);
        state.offset.y = ratio * max_offset_y;
    }

    state.offset.y = state.offset.y.clamp(0.0, max_offset_y).round();
    state.offset.x = state.offset.x.clamp(0.0, 0.0);

    let thumb_color = if ui.active == thumb_id { theme.accent_active } else if thumb_hovered { theme.accent_hover } else { theme.accent };
    painter.draw_color_round_rect(thumb_rect, ui.clip_stack.current(), thumb_color, Color::TRANSPARENT, 0);

    let scrollview_rect = bar_rect;
    let clip_index = painter.register_clip_rect(scrollview_rect);
    ui.clip_stack.push(clip_index);

    let starting_rect = Rect::new(
        scrollview_rect.pos - state.offset,
        Vec2::new(MAX_SCROLL_SIZE, MAX_SCROLL_SIZE),
    );
    ui.scroll_stack.frames.push(ScrollFrame { starting_rect, clip_index });

    Rect::new(starting_rect.pos, scrollview_rect.size)
}

/// `end_scroll_area`: records the content rect the caller actually drew
/// into (so the next frame's ratio math has real extents) and pops the
/// clip and scroll-stack entries.
pub fn end_scroll_area(ui: &mut UiState, state: &mut ScrollAreaState, ending_rect: Rect) {
    let frame = ui.scroll_stack.frames.pop().expect("end_scroll_area called with no matching begin_scroll_area");
    state.content_size = ending_rect.size.max(Vec2::ZERO);
    let popped = ui.clip_stack.pop();
    debug_assert_eq!(popped, frame.clip_index, "clip stack and scroll stack desynchronized");
}
