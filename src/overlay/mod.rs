//! Overlay placement: create text annotations and pin them over the image.

mod constraint;
mod container;
mod drag;
mod element;

pub use constraint::{Anchor, ConstraintDiff, ConstraintKey, ConstraintSet, Edge, EdgeBinding};
pub use container::{ChildKind, ChildNode, LayoutContainer, ViewContainer};
pub use drag::{DragDelta, OverlayDrag};
pub use element::{
    ElementId, IdAllocator, OverlayElement, OverlayStyle, DEFAULT_OVERLAY_COLOR,
    DEFAULT_OVERLAY_FONT_SIZE, DEFAULT_OVERLAY_TEXT,
};

/// Binds every edge of `element` to the same parent edge with zero margin.
pub fn pin_to_parent(set: &mut ConstraintSet, element: ElementId) {
    for edge in Edge::ALL {
        set.connect(element, edge, Anchor::Parent, edge, 0);
    }
}

/// Adds a new text overlay to `container`, stretched over its content area.
pub fn create_overlay<C>(container: &mut C, style: &OverlayStyle) -> OverlayElement
where
    C: ViewContainer + ?Sized,
{
    let id = container.allocate_id();
    let element = OverlayElement::new(id, style);
    container.add_child(element.clone());

    let mut set = container.current_constraints();
    pin_to_parent(&mut set, id);
    container.apply_constraints(set);

    tracing::debug!(element = %id, "added text overlay");
    element
}

/// Translates an overlay by `delta` without resizing it.
///
/// Leading margins grow by the delta and trailing margins shrink by it, so the
/// element keeps its size. Returns `false` when `delta.element` is not bound on
/// all four edges.
pub fn reposition_overlay<C>(container: &mut C, delta: DragDelta) -> bool
where
    C: ViewContainer + ?Sized,
{
    let mut set = container.current_constraints();
    if Edge::ALL
        .iter()
        .any(|edge| set.binding(delta.element, *edge).is_none())
    {
        tracing::debug!(element = %delta.element, "ignoring drag for unpinned element");
        return false;
    }
    set.shift_margin(delta.element, Edge::Start, delta.dx);
    set.shift_margin(delta.element, Edge::End, delta.dx.saturating_neg());
    set.shift_margin(delta.element, Edge::Top, delta.dy);
    set.shift_margin(delta.element, Edge::Bottom, delta.dy.saturating_neg());
    container.apply_constraints(set);
    true
}
