use super::constraint::ConstraintSet;
use super::element::{ElementId, IdAllocator, OverlayElement};

/// Parent view that owns children and their constraint graph.
pub trait ViewContainer {
    /// Mints an id unique for this container's lifetime.
    fn allocate_id(&mut self) -> ElementId;
    fn add_child(&mut self, element: OverlayElement);
    fn current_constraints(&self) -> ConstraintSet;
    /// Merges `set` into the container's graph in one step.
    fn apply_constraints(&mut self, set: ConstraintSet);
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChildKind {
    Image,
    Overlay(OverlayElement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChildNode {
    pub id: ElementId,
    pub kind: ChildKind,
}

/// In-memory container; children are kept in z-order (last is on top).
#[derive(Debug, Default)]
pub struct LayoutContainer {
    ids: IdAllocator,
    children: Vec<ChildNode>,
    constraints: ConstraintSet,
}

impl LayoutContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the image view child pinned to every parent edge.
    pub fn insert_image_child(&mut self) -> ElementId {
        let id = self.ids.allocate();
        self.children.push(ChildNode {
            id,
            kind: ChildKind::Image,
        });
        let mut set = self.current_constraints();
        super::pin_to_parent(&mut set, id);
        self.apply_constraints(set);
        id
    }

    pub fn children(&self) -> &[ChildNode] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn overlays(&self) -> impl Iterator<Item = &OverlayElement> {
        self.children.iter().filter_map(|child| match &child.kind {
            ChildKind::Overlay(element) => Some(element),
            ChildKind::Image => None,
        })
    }

    pub fn overlay(&self, id: ElementId) -> Option<&OverlayElement> {
        self.overlays().find(|element| element.id == id)
    }
}

impl ViewContainer for LayoutContainer {
    fn allocate_id(&mut self) -> ElementId {
        self.ids.allocate()
    }

    fn add_child(&mut self, element: OverlayElement) {
        self.children.push(ChildNode {
            id: element.id,
            kind: ChildKind::Overlay(element),
        });
    }

    fn current_constraints(&self) -> ConstraintSet {
        self.constraints.clone()
    }

    fn apply_constraints(&mut self, set: ConstraintSet) {
        self.constraints.merge(&set);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{Anchor, Edge};

    #[test]
    fn image_child_is_pinned_to_parent_edges() {
        let mut container = LayoutContainer::new();
        let image = container.insert_image_child();

        assert_eq!(container.child_count(), 1);
        assert_eq!(container.children()[0].kind, ChildKind::Image);
        assert_eq!(container.constraints().bindings_for(image).count(), 4);
        assert!(container
            .constraints()
            .bindings_for(image)
            .all(|(edge, binding)| binding.target == Anchor::Parent
                && binding.target_edge == edge
                && binding.margin == 0));
        assert_eq!(container.overlays().count(), 0);
    }

    #[test]
    fn apply_constraints_merges_instead_of_replacing() {
        let mut container = LayoutContainer::new();
        let image = container.insert_image_child();
        let other = container.allocate_id();

        let mut partial = ConstraintSet::new();
        partial.connect(other, Edge::Top, Anchor::Element(image), Edge::Top, 0);
        container.apply_constraints(partial);

        assert_eq!(container.constraints().len(), 5);
        assert!(container.constraints().binding(image, Edge::End).is_some());
    }
}
