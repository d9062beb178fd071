//! Pointer-drag state machine for moving canvas items.

use crate::components::ComponentId;
use crate::geometry::PercentPoint;
use crate::selection::Selection;
use crate::shapes::ShapeId;
use kurbo::{Point, Rect, Vec2};

/// Editor side-panel tab. Decides which category of item may be dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTab {
    /// Component properties; components are draggable.
    #[default]
    Component,
    /// Page colors and background shapes; shapes are draggable.
    General,
    /// Template gallery; nothing is draggable.
    Templates,
}

/// The item a drag operates on, tagged by category so updates are routed to
/// the owning collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Component(ComponentId),
    Shape(ShapeId),
}

impl DragTarget {
    /// Whether this item may be grabbed while `tab` is active.
    pub fn draggable_in(self, tab: EditorTab) -> bool {
        matches!(
            (self, tab),
            (DragTarget::Component(_), EditorTab::Component) | (DragTarget::Shape(_), EditorTab::General)
        )
    }

    pub fn selection(self) -> Selection {
        match self {
            DragTarget::Component(id) => Selection::Component(id),
            DragTarget::Shape(id) => Selection::Shape(id),
        }
    }
}

/// Drag controller state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No item grabbed.
    #[default]
    Idle,
    /// One item grabbed.
    Dragging {
        target: DragTarget,
        /// Pointer minus the item's top-left corner, in pixels, at grab time.
        offset: Vec2,
    },
}

/// New position for a dragged item, already clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub target: DragTarget,
    pub position: PercentPoint,
}

/// Single-consumer drag state machine.
///
/// The controller never caches pixel geometry: every call takes the
/// container's current bounds.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn target(&self) -> Option<DragTarget> {
        match self.state {
            DragState::Dragging { target, .. } => Some(target),
            DragState::Idle => None,
        }
    }

    /// Idle -> Dragging. Returns false when `tab` does not allow dragging
    /// `target`; the state is left untouched in that case.
    pub fn grab(
        &mut self,
        target: DragTarget,
        item_position: PercentPoint,
        pointer: Point,
        container: Rect,
        tab: EditorTab,
    ) -> bool {
        if !target.draggable_in(tab) {
            return false;
        }
        let top_left = item_position.to_pixels(container);
        self.state = DragState::Dragging {
            target,
            offset: pointer - top_left,
        };
        log::debug!("Grabbed {:?}", target);
        true
    }

    /// Dragging -> Dragging. Computes the item's new position for `pointer`.
    pub fn drag_to(&self, pointer: Point, container: Rect) -> Option<DragUpdate> {
        let DragState::Dragging { target, offset } = self.state else {
            return None;
        };
        let top_left = pointer - offset;
        let position = PercentPoint::from_pixels(top_left, container).clamped();
        Some(DragUpdate { target, position })
    }

    /// Dragging -> Idle. Returns the item that was released, if any.
    pub fn release(&mut self) -> Option<DragTarget> {
        let released = self.target();
        self.state = DragState::Idle;
        if let Some(target) = released {
            log::debug!("Released {:?}", target);
        }
        released
    }
}
