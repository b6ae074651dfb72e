use std::collections::HashMap;

use gtk4::glib::translate::IntoGlib;
use gtk4::prelude::*;
use gtk4::{
    pango, ConstraintAttribute, ConstraintLayout, ConstraintRelation, ConstraintStrength, Label,
    Orientation, Picture, Widget,
};

use crate::overlay::{
    self, Anchor, ConstraintKey, ConstraintSet, Edge, EdgeBinding, ElementId, IdAllocator,
    OverlayElement, ViewContainer,
};

/// Base layout backed by a `GtkConstraintLayout`.
///
/// The model graph in `constraints` is the source of truth; `installed` holds
/// the GTK constraint currently realising each binding.
pub(super) struct GtkLayoutContainer {
    base: gtk4::Box,
    layout: ConstraintLayout,
    picture: Picture,
    ids: IdAllocator,
    widgets: HashMap<ElementId, Widget>,
    constraints: ConstraintSet,
    installed: HashMap<ConstraintKey, gtk4::Constraint>,
}

impl GtkLayoutContainer {
    pub(super) fn new() -> Self {
        let layout = ConstraintLayout::new();
        let base = gtk4::Box::new(Orientation::Vertical, 0);
        base.set_layout_manager(Some(layout.clone()));
        base.set_hexpand(true);
        base.set_vexpand(true);
        base.add_css_class("picnote-base");

        let picture = Picture::new();
        picture.set_can_shrink(true);

        let mut container = Self {
            base,
            layout,
            picture,
            ids: IdAllocator::new(),
            widgets: HashMap::new(),
            constraints: ConstraintSet::new(),
            installed: HashMap::new(),
        };

        let picture_id = container.ids.allocate();
        container.picture.set_parent(&container.base);
        container
            .widgets
            .insert(picture_id, container.picture.clone().upcast());
        let mut set = container.current_constraints();
        overlay::pin_to_parent(&mut set, picture_id);
        container.apply_constraints(set);
        container
    }

    pub(super) fn widget(&self) -> &gtk4::Box {
        &self.base
    }

    pub(super) fn picture(&self) -> &Picture {
        &self.picture
    }

    pub(super) fn label_for(&self, id: ElementId) -> Option<Label> {
        self.widgets
            .get(&id)
            .and_then(|widget| widget.clone().downcast::<Label>().ok())
    }

    fn build_constraint(
        &self,
        (element, edge): ConstraintKey,
        binding: &EdgeBinding,
    ) -> Option<gtk4::Constraint> {
        let target = self.widgets.get(&element)?;
        let source = match binding.target {
            Anchor::Parent => None,
            Anchor::Element(id) => Some(self.widgets.get(&id)?),
        };
        Some(gtk4::Constraint::new(
            Some(target),
            constraint_attribute(edge),
            ConstraintRelation::Eq,
            source,
            constraint_attribute(binding.target_edge),
            1.0,
            constraint_constant(edge, binding.margin),
            ConstraintStrength::Required.into_glib(),
        ))
    }

    fn install(&mut self, key: ConstraintKey, binding: &EdgeBinding) {
        if let Some(previous) = self.installed.remove(&key) {
            self.layout.remove_constraint(&previous);
        }
        match self.build_constraint(key, binding) {
            Some(constraint) => {
                self.layout.add_constraint(constraint.clone());
                self.installed.insert(key, constraint);
            }
            None => {
                tracing::warn!(element = %key.0, edge = ?key.1, "no widget for constraint binding");
            }
        }
    }
}

impl ViewContainer for GtkLayoutContainer {
    fn allocate_id(&mut self) -> ElementId {
        self.ids.allocate()
    }

    fn add_child(&mut self, element: OverlayElement) {
        let label = Label::new(Some(element.text.as_str()));
        label.set_wrap(true);
        label.set_attributes(Some(&text_attributes(&element)));
        label.add_css_class("picnote-overlay");
        label.set_parent(&self.base);
        self.widgets.insert(element.id, label.upcast());
    }

    fn current_constraints(&self) -> ConstraintSet {
        self.constraints.clone()
    }

    fn apply_constraints(&mut self, set: ConstraintSet) {
        let mut merged = self.constraints.clone();
        merged.merge(&set);
        let diff = self.constraints.diff(&merged);

        for (key, binding) in &diff.added {
            self.install(*key, binding);
        }
        for (key, _, binding) in &diff.changed {
            self.install(*key, binding);
        }
        self.constraints = merged;
    }
}

fn text_attributes(element: &OverlayElement) -> pango::AttrList {
    let attributes = pango::AttrList::new();
    let size = (element.font_size * pango::SCALE as f32).round() as i32;
    attributes.insert(pango::AttrSize::new(size));
    let (r, g, b) = element.color.rgb();
    attributes.insert(pango::AttrColor::new_foreground(
        channel_to_u16(r),
        channel_to_u16(g),
        channel_to_u16(b),
    ));
    attributes
}

const fn channel_to_u16(value: u8) -> u16 {
    (value as u16) * 257
}

fn constraint_attribute(edge: Edge) -> ConstraintAttribute {
    match edge {
        Edge::Top => ConstraintAttribute::Top,
        Edge::Bottom => ConstraintAttribute::Bottom,
        Edge::Start => ConstraintAttribute::Start,
        Edge::End => ConstraintAttribute::End,
    }
}

/// Margins point inward, so trailing edges take a negative constant.
fn constraint_constant(edge: Edge, margin: i32) -> f64 {
    match edge {
        Edge::Top | Edge::Start => f64::from(margin),
        Edge::Bottom | Edge::End => -f64::from(margin),
    }
}
