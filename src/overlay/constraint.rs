use std::collections::BTreeMap;

use super::element::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Edge {
    Top,
    Bottom,
    Start,
    End,
}

impl Edge {
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Start, Self::End];
}

/// What an edge is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Anchor {
    Parent,
    Element(ElementId),
}

/// `element.edge` sits `margin` inside `target.target_edge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeBinding {
    pub target: Anchor,
    pub target_edge: Edge,
    pub margin: i32,
}

impl EdgeBinding {
    pub const fn to_parent(edge: Edge, margin: i32) -> Self {
        Self {
            target: Anchor::Parent,
            target_edge: edge,
            margin,
        }
    }
}

pub type ConstraintKey = (ElementId, Edge);

/// Edge bindings between children and their container, at most one per
/// `(element, edge)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    bindings: BTreeMap<ConstraintKey, EdgeBinding>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `element.edge`, replacing any previous binding for that edge.
    pub fn connect(
        &mut self,
        element: ElementId,
        edge: Edge,
        target: Anchor,
        target_edge: Edge,
        margin: i32,
    ) -> Option<EdgeBinding> {
        self.bindings.insert(
            (element, edge),
            EdgeBinding {
                target,
                target_edge,
                margin,
            },
        )
    }

    pub fn binding(&self, element: ElementId, edge: Edge) -> Option<&EdgeBinding> {
        self.bindings.get(&(element, edge))
    }

    /// Shifts an existing binding's margin. Returns `false` if `element.edge`
    /// is unbound.
    pub fn shift_margin(&mut self, element: ElementId, edge: Edge, delta: i32) -> bool {
        match self.bindings.get_mut(&(element, edge)) {
            Some(binding) => {
                binding.margin = binding.margin.saturating_add(delta);
                true
            }
            None => false,
        }
    }

    pub fn bindings_for(&self, element: ElementId) -> impl Iterator<Item = (Edge, &EdgeBinding)> {
        self.bindings
            .range((element, Edge::Top)..=(element, Edge::End))
            .map(|((_, edge), binding)| (*edge, binding))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Union with `other`; bindings in `other` win on the same key.
    pub fn merge(&mut self, other: &ConstraintSet) {
        for (key, binding) in &other.bindings {
            self.bindings.insert(*key, *binding);
        }
    }

    /// Structural difference going from `self` to `after`.
    pub fn diff(&self, after: &ConstraintSet) -> ConstraintDiff {
        let mut diff = ConstraintDiff::default();
        for (key, binding) in &after.bindings {
            match self.bindings.get(key) {
                None => diff.added.push((*key, *binding)),
                Some(before) if before != binding => diff.changed.push((*key, *before, *binding)),
                Some(_) => {}
            }
        }
        for (key, binding) in &self.bindings {
            if !after.bindings.contains_key(key) {
                diff.removed.push((*key, *binding));
            }
        }
        diff
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintDiff {
    pub added: Vec<(ConstraintKey, EdgeBinding)>,
    pub removed: Vec<(ConstraintKey, EdgeBinding)>,
    pub changed: Vec<(ConstraintKey, EdgeBinding, EdgeBinding)>,
}

impl ConstraintDiff {
    /// True when the only differences are new bindings.
    pub fn is_additive(&self) -> bool {
        self.removed.is_empty() && self.changed.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.is_additive()
    }
}
