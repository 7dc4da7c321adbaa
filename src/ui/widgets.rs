//! Stateless widget functions (spec §4.7). Each widget is a plain function
//! taking `&mut UiState`, `&mut Painter`, and whatever rect/value it needs;
//! none retain state beyond what the caller already owns (a `&mut ratio`,
//! a `&mut bool`, etc).

use glam::Vec2;

use crate::color::Color;
use crate::geometry::{Rect, RectSplit};
use crate::painter::Painter;
use crate::text::shaper::FontBackend;
use crate::text::shaper::FontId;

use super::input::CursorIcon;
use super::state::UiState;
use super::theme::UiTheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Registers `rect` as a clip, centers `text` by its measured extent, and
/// draws it. Text clipped by the rect is simply not drawn — there is no
/// truncation UI.
pub fn label_in_rect<F: FontBackend>(
    ui: &mut UiState,
    painter: &mut Painter<F>,
    rect: Rect,
    font: FontId,
    text: &str,
    align: Align,
) {
    let clip_index = painter.register_clip_rect(rect);
    ui.clip_stack.push(clip_index);

    let measured = painter.measure_label(font, text);
    let size = Vec2::new(measured.x as f32, measured.y as f32);
    let origin = match align {
        Align::Center => rect.center(size).pos,
        Align::Left => Vec2::new(rect.pos.x, rect.center(size).pos.y),
        Align::Right => Vec2::new(rect.right() - size.x, rect.center(size).pos.y),
    };
    painter.draw_label(Rect::new(origin, size), ui.clip_stack.current(), font, text);

    ui.clip_stack.pop();
}

/// Carves a slice of height = measured text height off `split`, draws the
/// label into it, and returns the carved rect. Intended for stacking forms
/// of labels inside a scroll area.
pub fn label_split<F: FontBackend>(
    ui: &mut UiState,
    painter: &mut Painter<F>,
    split: &mut RectSplit,
    font: FontId,
    text: &str,
) -> Rect {
    let measured = painter.measure_label(font, text);
    let slice = split.split(measured.y as f32);
    painter.draw_label(slice, ui.clip_stack.current(), font, text);
    slice
}

/// Three-state (normal/hover/pressed) button. Returns true on the frame the
/// click completes.
pub fn button<F: FontBackend>(
    ui: &mut UiState,
    painter: &mut Painter<F>,
    theme: &UiTheme,
    rect: Rect,
    font: FontId,
    label: &str,
) -> bool {
    let id = ui.make_id();
    let hovered = ui.is_hovering(rect);
    let clicked = ui.widget_interact(id, hovered);

    let pressed = ui.active == id;
    let fill = if pressed {
        theme.accent_active
    } else if hovered {
        theme.accent_hover
    } else {
        theme.accent
    };
    painter.draw_color_round_rect(rect, ui.clip_stack.current(), fill, theme.border, 1);

    let measured = painter.measure_label(font, label);
    let text_rect = rect.center(Vec2::new(measured.x as f32, measured.y as f32));
    painter.draw_label(text_rect, ui.clip_stack.current(), font, label);

    clicked
}

/// Same as [`button`] but carves `measured_width + 0.5em` off `split`
/// before drawing.
pub fn button_split<F: FontBackend>(
    ui: &mut UiState,
    painter: &mut Painter<F>,
    theme: &UiTheme,
    split: &mut RectSplit,
    font: FontId,
    label: &str,
) -> bool {
    let measured = painter.measure_label(font, label);
    let width = measured.x as f32 + theme.font_size * 0.5;
    let rect = split.split(width);
    button(ui, painter, theme, rect, font, label)
}

/// Activation machine only; draws nothing. Useful for custom-drawn
/// clickable regions.
pub fn invisible_button(ui: &mut UiState, rect: Rect) -> bool {
    let id = ui.make_id();
    let hovered = ui.is_hovering(rect);
    ui.widget_interact(id, hovered)
}

/// A draggable vertical strip that redistributes `rect` between a left and
/// right pane according to `ratio`. While dragged, widens to
/// `theme.splitter_hover_thickness` and sets the cursor hint to `ResizeEw`.
pub fn splitter_x<F: FontBackend>(ui: &mut UiState, painter: &mut Painter<F>, theme: &UiTheme, rect: Rect, ratio: &mut f32) -> (Rect, Rect) {
    let id = ui.make_id();
    let split_x = rect.left() + ratio.clamp(0.0, 1.0) * rect.size.x;

    let hit_rect = Rect::from_xywh(split_x - theme.splitter_hover_thickness * 0.5, rect.top(), theme.splitter_hover_thickness, rect.size.y);
    let hovered = ui.is_hovering(hit_rect);
    ui.widget_interact(id, hovered);
    let active = ui.active == id;

    if active {
        *ratio = ((ui.inputs.mouse_position.x as f32 - rect.left()) / rect.size.x).clamp(0.0, 1.0);
    }

    let thickness = if active || hovered { theme.splitter_hover_thickness } else { theme.splitter_thickness };
    let color = if active { theme.accent_active } else if hovered { theme.accent_hover } else { theme.border };
    let draw_rect = Rect::from_xywh(split_x - thickness * 0.5, rect.top(), thickness, rect.size.y);
    painter.draw_color_rect(draw_rect, ui.clip_stack.current(), color);

    if active || hovered {
        ui.cursor = CursorIcon::ResizeEw;
    }

    let left = Rect::from_xywh(rect.left(), rect.top(), split_x - rect.left(), rect.size.y);
    let right = Rect::from_xywh(split_x, rect.top(), rect.right() - split_x, rect.size.y);
    (left, right)
}

/// Dual of [`splitter_x`] on the vertical axis.
pub fn splitter_y<F: FontBackend>(ui: &mut UiState, painter: &mut Painter<F>, theme: &UiTheme, rect: Rect, ratio: &mut f32) -> (Rect, Rect) {
    let id = ui.make_id();
    let split_y = rect.top() + ratio.clamp(0.0, 1.0) * rect.size.y;

    let hit_rect = Rect::from_xywh(rect.left(), split_y - theme.splitter_hover_thickness * 0.5, rect.size.x, theme.splitter_hover_thickness);
    let hovered = ui.is_hovering(hit_rect);
    ui.widget_interact(id, hovered);
    let active = ui.active == id;

    if active {
        *ratio = ((ui.inputs.mouse_position.y as f32 - rect.top()) / rect.size.y).clamp(0.0, 1.0);
    }

    let thickness = if active || hovered { theme.splitter_hover_thickness } else { theme.splitter_thickness };
    let color = if active { theme.accent_active } else if hovered { theme.accent_hover } else { theme.border };
    let draw_rect = Rect::from_xywh(rect.left(), split_y - thickness * 0.5, rect.size.x, thickness);
    painter.draw_color_rect(draw_rect, ui.clip_stack.current(), color);

    if active || hovered {
        ui.cursor = CursorIcon::ResizeNs;
    }

    let top = Rect::from_xywh(rect.left(), rect.top(), rect.size.x, split_y - rect.top());
    let bottom = Rect::from_xywh(rect.left(), split_y, rect.size.x, rect.bottom() - split_y);
    (top, bottom)
}
