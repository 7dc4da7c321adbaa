//! Persistent dock tree: the one truly graph-like piece of UI state,
//! modeled as an arena (`Vec<Option<DockNode>>`) addressed by `NodeIndex`
//! rather than owning pointers, so removal is a tombstone-and-fixup
//! instead of a borrow-checker fight (spec §9's design note for this
//! component specifically).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::color::Color;
use crate::geometry::{Axis, Rect};
use crate::painter::Painter;
use crate::text::shaper::{FontBackend, FontId};

use super::state::UiState;
use super::theme::UiTheme;
use super::widgets;

pub type NodeIndex = u32;
const NIL: NodeIndex = u32::MAX;

/// Pointer must move this many pixels from its press-origin before a
/// tab-header press is treated as the start of a drag rather than a
/// plain click (spec §4.9's drag-vs-click distinction).
const DRAG_THRESHOLD_PX: f32 = 4.0;

/// Drag-and-drop target zone, picked by which quadrant of the hovered
/// container the pointer sits in at mouse-up (spec §4.9, §9 Open Question
/// resolution: no more specific geometry is recoverable from the source,
/// so quarter-rect overlays split into these four halves plus a center
/// "merge" zone).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    Left,
    Right,
    Top,
    Bottom,
    Center,
}

enum DockNodeKind {
    Split { axis: Axis, ratio: f32, left: NodeIndex, right: NodeIndex },
    Tabs { tabs: Vec<String>, active: usize, rect: Rect },
}

struct DockNode {
    kind: DockNodeKind,
    parent: NodeIndex,
}

#[derive(Debug, Error)]
pub enum DockPersistError {
    #[error("persisted dock tree has a tab container with no tabs")]
    EmptyTabContainer,
    #[error("persisted dock tree split ratio {0} is outside [0.0, 1.0]")]
    RatioOutOfRange(f32),
    #[error("(de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// The on-disk shape (spec §6: "a recursive preorder walk emitting a
/// discriminant, then either `(axis, ratio, left, right)` or
/// `(active_index, tab_names...)`").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PersistedNode {
    Split { axis: Axis, ratio: f32, left: Box<PersistedNode>, right: Box<PersistedNode> },
    Tabs { tabs: Vec<String>, active: usize },
}

// `Axis` lives in `geometry` and is shared with `RectSplit`; dock splits
// use the same H/V meaning (H = side-by-side, producing left/right panes).
impl Serialize for Axis {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Axis::Horizontal => serializer.serialize_u8(0),
            Axis::Vertical => serializer.serialize_u8(1),
        }
    }
}

impl<'de> Deserialize<'de> for Axis {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Axis::Horizontal),
            1 => Ok(Axis::Vertical),
            other => Err(serde::de::Error::custom(format!("invalid axis discriminant {other}"))),
        }
    }
}

pub struct DockTree {
    nodes: Vec<Option<DockNode>>,
    free: Vec<NodeIndex>,
    root: NodeIndex,
    floating_containers: Vec<NodeIndex>,
    seen_this_frame: HashSet<String>,
    dragging_tab: Option<(NodeIndex, usize, String)>,
    /// Header currently held down and its press-origin position, tracked
    /// separately from `dragging_tab` until the pointer actually moves
    /// past `DRAG_THRESHOLD_PX` — see `render_tab_container`.
    drag_candidate: Option<(NodeIndex, usize, String, glam::Vec2)>,
}

impl Default for DockTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DockTree {
    pub fn new() -> Self {
        let mut nodes = Vec::new();
        nodes.push(Some(DockNode {
            kind: DockNodeKind::Tabs { tabs: Vec::new(), active: 0, rect: Rect::default() },
            parent: NIL,
        }));
        Self {
            nodes,
            free: Vec::new(),
            root: 0,
            floating_containers: Vec::new(),
            seen_this_frame: HashSet::new(),
            dragging_tab: None,
            drag_candidate: None,
        }
    }

    fn alloc(&mut self, kind: DockNodeKind, parent: NodeIndex) -> NodeIndex {
        let node = DockNode { kind, parent };
        if let Some(index) = self.free.pop() {
            self.nodes[index as usize] = Some(node);
            index
        } else {
            self.nodes.push(Some(node));
            (self.nodes.len() - 1) as u32
        }
    }

    fn free_node(&mut self, index: NodeIndex) {
        self.nodes[index as usize] = None;
        self.free.push(index);
    }

    fn node(&self, index: NodeIndex) -> &DockNode {
        self.nodes[index as usize].as_ref().expect("dock tree: dangling NodeIndex")
    }

    fn node_mut(&mut self, index: NodeIndex) -> &mut DockNode {
        self.nodes[index as usize].as_mut().expect("dock tree: dangling NodeIndex")
    }

    /// Walks from `index` always taking the first child until it finds a
    /// tab container; that is where freshly-seen tab names land.
    fn first_tab_container(&self, index: NodeIndex) -> NodeIndex {
        match &self.node(index).kind {
            DockNodeKind::Tabs { .. } => index,
            DockNodeKind::Split { left, .. } => self.first_tab_container(*left),
        }
    }

    fn find_tab(&self, name: &str) -> Option<(NodeIndex, usize)> {
        self.all_tab_containers().into_iter().find_map(|container| match &self.node(container).kind {
            DockNodeKind::Tabs { tabs, .. } => tabs.iter().position(|t| t == name).map(|i| (container, i)),
            _ => None,
        })
    }

    fn all_tab_containers(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        self.collect_tab_containers(self.root, &mut out);
        for &floating in &self.floating_containers {
            self.collect_tab_containers(floating, &mut out);
        }
        out
    }

    fn collect_tab_containers(&self, index: NodeIndex, out: &mut Vec<NodeIndex>) {
        match &self.node(index).kind {
            DockNodeKind::Tabs { .. } => out.push(index),
            DockNodeKind::Split { left, right, .. } => {
                self.collect_tab_containers(*left, out);
                self.collect_tab_containers(*right, out);
            }
        }
    }

    /// `tabview(name)`: registers `name` as seen this frame, inserting it
    /// into the default container the first time it's seen, and returns
    /// the content rect iff its container is currently showing it.
    ///
    /// Calling this twice in the same frame without an intervening
    /// `end_docking` returns the same result both times (spec §8
    /// invariant 8) — the method only reads state besides the one-time
    /// insert-if-missing, so repeat calls are naturally idempotent.
    pub fn tabview(&mut self, name: &str) -> Option<Rect> {
        self.seen_this_frame.insert(name.to_string());

        if self.find_tab(name).is_none() {
            let container = self.first_tab_container(self.root);
            if let DockNodeKind::Tabs { tabs, .. } = &mut self.node_mut(container).kind {
                tabs.push(name.to_string());
            }
        }

        let (container, tab_index) = self.find_tab(name)?;
        match &self.node(container).kind {
            DockNodeKind::Tabs { active, rect, .. } if *active == tab_index => Some(*rect),
            _ => None,
        }
    }

    /// `header_height` extends the `Center` zone down over the tab strip,
    /// so a drop that lands back on the header row (rather than the
    /// content area) still counts as "keep this container" instead of
    /// reading as a `Top` split.
    fn quadrant_at(rect: Rect, point: glam::Vec2, header_height: f32) -> DropZone {
        if point.y - rect.top() < header_height {
            return DropZone::Center;
        }
        let center = rect.center(glam::Vec2::ZERO).pos;
        let dx = (point.x - center.x) / rect.size.x.max(1.0);
        let dy = (point.y - center.y) / rect.size.y.max(1.0);
        if dx.abs() < 0.2 && dy.abs() < 0.2 {
            DropZone::Center
        } else if dx.abs() > dy.abs() {
            if dx < 0.0 { DropZone::Left } else { DropZone::Right }
        } else if dy < 0.0 {
            DropZone::Top
        } else {
            DropZone::Bottom
        }
    }

    fn split_container_with_tab(&mut self, container: NodeIndex, zone: DropZone, tab_name: String) {
        let parent = self.node(container).parent;
        let axis = match zone {
            DropZone::Left | DropZone::Right => Axis::Horizontal,
            _ => Axis::Vertical,
        };
        let new_leaf = self.alloc(DockNodeKind::Tabs { tabs: vec![tab_name], active: 0, rect: Rect::default() }, NIL);

        // Re-home `container`'s existing content under a fresh split node,
        // in the order the drop zone implies.
        let placeholder = self.alloc(DockNodeKind::Tabs { tabs: Vec::new(), active: 0, rect: Rect::default() }, NIL);
        let old_kind = std::mem::replace(&mut self.node_mut(container).kind, DockNodeKind::Split { axis, ratio: 0.5, left: placeholder, right: placeholder });
        let moved_content = self.alloc(old_kind, container);

        let (left, right) = match zone {
            DropZone::Left | DropZone::Top => (new_leaf, moved_content),
            _ => (moved_content, new_leaf),
        };
        self.node_mut(container).kind = DockNodeKind::Split { axis, ratio: 0.5, left, right };
        self.node_mut(left).parent = container;
        self.node_mut(right).parent = container;
        self.free_node(placeholder);
        let _ = parent;
    }

    /// Draws the dock tree starting at `rect` and handles tab-strip
    /// interaction (active-tab switching, close buttons, drag-and-drop).
    pub fn begin_docking<F: FontBackend>(
        &mut self,
        ui: &mut UiState,
        painter: &mut Painter<F>,
        theme: &UiTheme,
        font: FontId,
        rect: Rect,
    ) {
        self.seen_this_frame.clear();
        self.render_node(ui, painter, theme, font, self.root, rect);
    }

    fn render_node<F: FontBackend>(&mut self, ui: &mut UiState, painter: &mut Painter<F>, theme: &UiTheme, font: FontId, index: NodeIndex, rect: Rect) {
        let kind_is_split = matches!(self.node(index).kind, DockNodeKind::Split { .. });
        if kind_is_split {
            let (axis, mut ratio, left, right) = match &self.node(index).kind {
                DockNodeKind::Split { axis, ratio, left, right } => (*axis, *ratio, *left, *right),
                _ => unreachable!(),
            };
            let (left_rect, right_rect) = match axis {
                Axis::Horizontal => widgets::splitter_x(ui, painter, theme, rect, &mut ratio),
                Axis::Vertical => widgets::splitter_y(ui, painter, theme, rect, &mut ratio),
            };
            ratio = ratio.clamp(0.05, 0.95);
            if let DockNodeKind::Split { ratio: stored, .. } = &mut self.node_mut(index).kind {
                *stored = ratio;
            }
            self.render_node(ui, painter, theme, font, left, left_rect);
            self.render_node(ui, painter, theme, font, right, right_rect);
            return;
        }

        self.render_tab_container(ui, painter, theme, font, index, rect);
    }

    fn render_tab_container<F: FontBackend>(&mut self, ui: &mut UiState, painter: &mut Painter<F>, theme: &UiTheme, font: FontId, index: NodeIndex, rect: Rect) {
        let mut strip = rect;
        let strip_rect = strip.split_top(theme.font_size + 8.0);
        painter.draw_color_rect(rect, ui.clip_stack.current(), theme.panel);

        let tabs = match &self.node(index).kind {
            DockNodeKind::Tabs { tabs, .. } => tabs.clone(),
            _ => Vec::new(),
        };

        let mut split = crate::geometry::RectSplit::horizontal(strip_rect);
        let mut clicked_tab = None;
        let mut closed_tab = None;
        for (i, tab_name) in tabs.iter().enumerate() {
            let tab_rect = split.split(theme.font_size * 6.0);
            let (label_rect, close_rect) = {
                let mut inner = tab_rect;
                let close = inner.split_right(theme.font_size);
                (inner, close)
            };

            let header_id = ui.make_id();
            let hovered = ui.is_hovering(label_rect);
            let header_clicked = ui.widget_interact(header_id, hovered);
            if ui.active == header_id && self.dragging_tab.is_none() {
                let mouse = ui.inputs.mouse_position.as_vec2();
                let same_candidate = matches!(
                    &self.drag_candidate,
                    Some((cand_index, cand_tab, ..)) if *cand_index == index && *cand_tab == i
                );
                if !same_candidate {
                    self.drag_candidate = Some((index, i, tab_name.clone(), mouse));
                } else if let Some((_, _, _, origin)) = self.drag_candidate {
                    if (mouse - origin).length() > DRAG_THRESHOLD_PX {
                        self.dragging_tab = Some((index, i, tab_name.clone()));
                        self.drag_candidate = None;
                    }
                }
            }
            if header_clicked {
                clicked_tab = Some(i);
            }
            let fill = if ui.active == header_id { theme.accent_active } else if hovered { theme.accent_hover } else { theme.panel };
            painter.draw_color_rect(label_rect, ui.clip_stack.current(), fill);
            painter.draw_label(label_rect, ui.clip_stack.current(), font, tab_name);

            if widgets::invisible_button(ui, close_rect) {
                closed_tab = Some(i);
            }
            painter.draw_color_rect(close_rect.inset(glam::Vec2::new(3.0, 3.0)), ui.clip_stack.current(), theme.border);
        }

        if let Some(i) = clicked_tab {
            if let DockNodeKind::Tabs { active, .. } = &mut self.node_mut(index).kind {
                *active = i;
            }
        }
        if let Some(i) = closed_tab {
            self.close_tab(index, i);
        }

        let content_rect = strip;
        if let DockNodeKind::Tabs { rect: stored_rect, .. } = &mut self.node_mut(index).kind {
            *stored_rect = content_rect;
        }

        self.render_drop_overlay(ui, painter, theme, index, rect);
    }

    fn render_drop_overlay<F: FontBackend>(&mut self, ui: &mut UiState, painter: &mut Painter<F>, theme: &UiTheme, index: NodeIndex, rect: Rect) {
        let Some((_, _, ref tab_name)) = self.dragging_tab else { return };
        if !ui.is_hovering(rect) {
            return;
        }
        let zone = Self::quadrant_at(rect, ui.inputs.mouse_position.as_vec2(), theme.font_size + 8.0);
        let overlay_rect = match zone {
            DropZone::Left => Rect::from_xywh(rect.left(), rect.top(), rect.size.x * 0.5, rect.size.y),
            DropZone::Right => Rect::from_xywh(rect.left() + rect.size.x * 0.5, rect.top(), rect.size.x * 0.5, rect.size.y),
            DropZone::Top => Rect::from_xywh(rect.left(), rect.top(), rect.size.x, rect.size.y * 0.5),
            DropZone::Bottom => Rect::from_xywh(rect.left(), rect.top() + rect.size.y * 0.5, rect.size.x, rect.size.y * 0.5),
            DropZone::Center => rect,
        };
        painter.draw_color_rect(overlay_rect, ui.clip_stack.current(), Color::rgba(theme.accent.r(), theme.accent.g(), theme.accent.b(), 90));

        if ui.inputs.left_released() {
            let tab_name = tab_name.clone();
            let (source_container, source_index, _) = self.dragging_tab.take().unwrap();
            if zone == DropZone::Center {
                self.move_tab(source_container, source_index, index, &tab_name);
            } else {
                self.remove_tab(source_container, source_index);
                self.split_container_with_tab(index, zone, tab_name);
            }
        }
    }

    fn remove_tab(&mut self, container: NodeIndex, tab_index: usize) {
        let became_empty = if let DockNodeKind::Tabs { tabs, active, .. } = &mut self.node_mut(container).kind {
            if tab_index < tabs.len() {
                tabs.remove(tab_index);
                if *active >= tabs.len() {
                    *active = tabs.len().saturating_sub(1);
                }
            }
            tabs.is_empty()
        } else {
            false
        };
        if became_empty && container != self.root {
            self.collapse_empty_container(container);
        }
    }

    fn move_tab(&mut self, source_container: NodeIndex, source_index: usize, dest_container: NodeIndex, tab_name: &str) {
        if source_container == dest_container {
            return;
        }
        self.remove_tab(source_container, source_index);
        if let DockNodeKind::Tabs { tabs, .. } = &mut self.node_mut(dest_container).kind {
            if !tabs.iter().any(|t| t == tab_name) {
                tabs.push(tab_name.to_string());
            }
        }
    }

    fn close_tab(&mut self, container: NodeIndex, tab_index: usize) {
        self.remove_tab(container, tab_index);
    }

    /// Removes an emptied tab container and collapses its parent split,
    /// the surviving sibling replacing the split in place. Ratios on
    /// collapsed splits are not preserved (spec §4.9 invariant).
    fn collapse_empty_container(&mut self, container: NodeIndex) {
        let parent = self.node(container).parent;
        if parent == NIL {
            return;
        }
        let sibling = match &self.node(parent).kind {
            DockNodeKind::Split { left, right, .. } => if *left == container { *right } else { *left },
            DockNodeKind::Tabs { .. } => unreachable!("a tab container's parent is always a split"),
        };
        let grandparent = self.node(parent).parent;
        self.node_mut(sibling).parent = grandparent;

        if grandparent == NIL {
            self.root = sibling;
        } else if let DockNodeKind::Split { left, right, .. } = &mut self.node_mut(grandparent).kind {
            if *left == parent {
                *left = sibling;
            } else {
                *right = sibling;
            }
        }
        self.free_node(container);
        self.free_node(parent);
    }

    /// Garbage-collects tabs not seen this frame and recursively removes
    /// the containers that become empty as a result. `ui` is the same
    /// state passed to `begin_docking` this frame — needed so a drag
    /// released outside every container (no `render_drop_overlay` call
    /// ever saw the release) still clears `dragging_tab`.
    pub fn end_docking(&mut self, ui: &UiState) {
        let stale: Vec<(NodeIndex, usize, String)> = self
            .all_tab_containers()
            .into_iter()
            .flat_map(|container| match &self.node(container).kind {
                DockNodeKind::Tabs { tabs, .. } => tabs
                    .iter()
                    .enumerate()
                    .filter(|(_, name)| !self.seen_this_frame.contains(*name))
                    .map(|(i, name)| (container, i, name.clone()))
                    .collect::<Vec<_>>(),
                _ => Vec::new(),
            })
            .collect();

        // Remove in reverse index order per container so earlier removals
        // don't shift later indices out from under us.
        let mut by_container: std::collections::HashMap<NodeIndex, Vec<usize>> = std::collections::HashMap::new();
        for (container, index, name) in &stale {
            debug!(tab = %name, "garbage-collecting tab not seen this frame");
            by_container.entry(*container).or_default().push(*index);
        }
        for (container, mut indices) in by_container {
            indices.sort_unstable_by(|a, b| b.cmp(a));
            for index in indices {
                self.remove_tab(container, index);
            }
        }

        if ui_left_released_outside_drag(self, ui) {
            self.dragging_tab = None;
            self.drag_candidate = None;
        }
    }

    fn to_persisted(&self, index: NodeIndex) -> PersistedNode {
        match &self.node(index).kind {
            DockNodeKind::Split { axis, ratio, left, right } => PersistedNode::Split {
                axis: *axis,
                ratio: *ratio,
                left: Box::new(self.to_persisted(*left)),
                right: Box::new(self.to_persisted(*right)),
            },
            DockNodeKind::Tabs { tabs, active, .. } => PersistedNode::Tabs { tabs: tabs.clone(), active: *active },
        }
    }

    fn from_persisted(&mut self, node: &PersistedNode, parent: NodeIndex) -> Result<NodeIndex, DockPersistError> {
        match node {
            PersistedNode::Split { axis, ratio, left, right } => {
                if !(0.0..=1.0).contains(ratio) {
                    return Err(DockPersistError::RatioOutOfRange(*ratio));
                }
                let index = self.alloc(DockNodeKind::Split { axis: *axis, ratio: *ratio, left: NIL, right: NIL }, parent);
                let left_index = self.from_persisted(left, index)?;
                let right_index = self.from_persisted(right, index)?;
                if let DockNodeKind::Split { left: l, right: r, .. } = &mut self.node_mut(index).kind {
                    *l = left_index;
                    *r = right_index;
                }
                Ok(index)
            }
            PersistedNode::Tabs { tabs, active } => {
                if tabs.is_empty() {
                    return Err(DockPersistError::EmptyTabContainer);
                }
                Ok(self.alloc(DockNodeKind::Tabs { tabs: tabs.clone(), active: (*active).min(tabs.len() - 1), rect: Rect::default() }, parent))
            }
        }
    }

    pub fn save(&self) -> Result<String, DockPersistError> {
        Ok(serde_json::to_string(&self.to_persisted(self.root))?)
    }

    pub fn load(json: &str) -> Result<Self, DockPersistError> {
        let persisted: PersistedNode = serde_json::from_str(json)?;
        let mut tree = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NIL,
            floating_containers: Vec::new(),
            seen_this_frame: HashSet::new(),
            dragging_tab: None,
            drag_candidate: None,
        };
        tree.root = tree.from_persisted(&persisted, NIL)?;
        Ok(tree)
    }
}

/// A drag is in flight and the left mouse button was released this frame
/// without `render_drop_overlay` ever resolving it (the pointer never
/// re-entered any container's rect before release).
fn ui_left_released_outside_drag(tree: &DockTree, ui: &UiState) -> bool {
    tree.dragging_tab.is_some() && ui.inputs.left_released()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabview_registers_and_returns_rect_for_active_tab() {
        let mut tree = DockTree::new();
        let rect = tree.tabview("scene");
        assert!(rect.is_none(), "no content rect has been laid out yet (rect defaults)");
        // `tabview` returns Some only once the container's `rect` field has
        // been populated by a render pass; verify idempotence instead.
        let a = tree.tabview("scene");
        let b = tree.tabview("scene");
        assert_eq!(a, b, "double tabview call without end_docking must be idempotent (spec invariant 8)");
    }

    #[test]
    fn second_tab_shares_default_container() {
        let mut tree = DockTree::new();
        tree.tabview("a");
        tree.tabview("b");
        let containers = tree.all_tab_containers();
        assert_eq!(containers.len(), 1);
        if let DockNodeKind::Tabs { tabs, .. } = &tree.node(containers[0]).kind {
            assert_eq!(tabs, &vec!["a".to_string(), "b".to_string()]);
        }
    }

    #[test]
    fn end_docking_gcs_tabs_not_seen() {
        let mut tree = DockTree::new();
        let ui = UiState::new();
        tree.tabview("a");
        tree.tabview("b");
        tree.end_docking(&ui);

        tree.tabview("a");
        tree.end_docking(&ui);

        let containers = tree.all_tab_containers();
        if let DockNodeKind::Tabs { tabs, .. } = &tree.node(containers[0]).kind {
            assert_eq!(tabs, &vec!["a".to_string()]);
        }
    }

    #[test]
    fn round_trip_preserves_topology() {
        let mut tree = DockTree::new();
        tree.tabview("a");
        tree.tabview("b");
        tree.split_container_with_tab(tree.root, DropZone::Right, "c".to_string());

        let json = tree.save().expect("serialize");
        let restored = DockTree::load(&json).expect("deserialize");

        assert_eq!(tree.to_persisted(tree.root_for_test()), restored.to_persisted(restored.root_for_test()));
    }

    #[test]
    fn load_rejects_empty_tab_container() {
        let json = serde_json::to_string(&PersistedNode::Tabs { tabs: Vec::new(), active: 0 }).unwrap();
        let err = DockTree::load(&json).unwrap_err();
        assert!(matches!(err, DockPersistError::EmptyTabContainer));
    }

    #[test]
    fn load_rejects_ratio_out_of_range() {
        let json = serde_json::to_string(&PersistedNode::Split {
            axis: Axis::Horizontal,
            ratio: 1.5,
            left: Box::new(PersistedNode::Tabs { tabs: vec!["a".into()], active: 0 }),
            right: Box::new(PersistedNode::Tabs { tabs: vec!["b".into()], active: 0 }),
        })
        .unwrap();
        let err = DockTree::load(&json).unwrap_err();
        assert!(matches!(err, DockPersistError::RatioOutOfRange(_)));
    }

    impl DockTree {
        fn root_for_test(&self) -> NodeIndex {
            self.root
        }
    }

    fn fake_backend() -> crate::text::test_support::FakeFontBackend {
        use crate::text::shaper::FontMetrics;
        crate::text::test_support::FakeFontBackend::new(FontMetrics { ascender: 10.0, descender: -2.0, line_height: 12.0 })
            .with_char('a', 8, 6, 8)
    }

    fn input_at(x: i32, y: i32, pressed: bool, pressed_last_frame: bool) -> super::super::input::Input {
        use super::super::input::{Input, MOUSE_LEFT};
        let mut input = Input { mouse_position: glam::IVec2::new(x, y), ..Input::default() };
        input.mouse_buttons_pressed[MOUSE_LEFT] = pressed;
        input.mouse_buttons_pressed_last_frame[MOUSE_LEFT] = pressed_last_frame;
        input
    }

    /// A press-release on a tab header with no pointer movement in between
    /// must switch the active tab, not arm a drag that then splits the
    /// container it came from (the bug this test guards against: a plain
    /// click used to immediately set `dragging_tab`, and release-in-place
    /// fell into the `Center` zone only by the old, too-narrow threshold —
    /// any jitter landed it in an edge zone and destructively split).
    #[test]
    fn plain_header_click_switches_tab_without_splitting() {
        let mut tree = DockTree::new();
        tree.tabview("a");
        tree.tabview("b");
        tree.end_docking(&UiState::new());

        let mut ui = UiState::new();
        let mut painter = Painter::new(fake_backend(), 1 << 16, 1 << 12);
        let theme = UiTheme::default();
        let font = FontId(1);
        let root_rect = Rect::from_xywh(0.0, 0.0, 400.0, 300.0);

        // Tab "b" is the second header, roughly at x = font_size*6 .. *12
        // along the header strip; click well inside its label, near the
        // top of the container as a real header click would be.
        let click_x = (theme.font_size * 6.0 + 10.0) as i32;
        let click_y = (theme.font_size * 0.5) as i32;

        ui.new_frame(input_at(click_x, click_y, true, false));
        painter.reset();
        tree.begin_docking(&mut ui, &mut painter, &theme, font, root_rect);
        ui.end_frame();
        tree.end_docking(&ui);

        ui.new_frame(input_at(click_x, click_y, false, true));
        painter.reset();
        tree.begin_docking(&mut ui, &mut painter, &theme, font, root_rect);
        ui.end_frame();
        tree.end_docking(&ui);

        let containers = tree.all_tab_containers();
        assert_eq!(containers.len(), 1, "a plain click-in-place must not split the container into two");
        if let DockNodeKind::Tabs { tabs, active, .. } = &tree.node(containers[0]).kind {
            assert_eq!(tabs, &vec!["a".to_string(), "b".to_string()]);
            assert_eq!(*active, 1, "clicking tab b's header must make it the active tab");
        } else {
            panic!("expected a tab container at the root");
        }
    }

    /// A press that moves past the drag threshold before release must be
    /// treated as a drag, resolving through `render_drop_overlay` rather
    /// than a tab switch.
    #[test]
    fn header_drag_past_threshold_arms_dragging_tab() {
        let mut tree = DockTree::new();
        tree.tabview("a");
        tree.tabview("b");
        tree.end_docking(&UiState::new());

        let mut ui = UiState::new();
        let mut painter = Painter::new(fake_backend(), 1 << 16, 1 << 12);
        let theme = UiTheme::default();
        let font = FontId(1);
        let root_rect = Rect::from_xywh(0.0, 0.0, 400.0, 300.0);

        let press_x = (theme.font_size * 6.0 + 10.0) as i32;
        let press_y = (theme.font_size * 0.5) as i32;

        ui.new_frame(input_at(press_x, press_y, true, false));
        painter.reset();
        tree.begin_docking(&mut ui, &mut painter, &theme, font, root_rect);
        ui.end_frame();
        tree.end_docking(&ui);

        // Still holding, moved well past the pixel threshold.
        ui.new_frame(input_at(press_x + 40, press_y + 40, true, true));
        painter.reset();
        tree.begin_docking(&mut ui, &mut painter, &theme, font, root_rect);
        ui.end_frame();
        tree.end_docking(&ui);

        assert!(tree.dragging_tab.is_some(), "pointer moving past the threshold while held must arm a drag");
    }
}
