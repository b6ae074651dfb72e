use std::fmt;

use crate::geometry::Color;

pub const DEFAULT_OVERLAY_TEXT: &str = "Introduce your text here";
pub const DEFAULT_OVERLAY_FONT_SIZE: f32 = 20.0;
pub const DEFAULT_OVERLAY_COLOR: Color = Color::WHITE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic identifier source owned by one container. Ids are never reused.
#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: u64,
}

impl IdAllocator {
    pub const fn new() -> Self {
        Self { issued: 0 }
    }

    pub fn allocate(&mut self) -> ElementId {
        self.issued += 1;
        ElementId(self.issued)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub text: String,
    pub font_size: f32,
    pub color: Color,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            text: DEFAULT_OVERLAY_TEXT.to_string(),
            font_size: DEFAULT_OVERLAY_FONT_SIZE,
            color: DEFAULT_OVERLAY_COLOR,
        }
    }
}

/// Text annotation placed over the displayed image.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayElement {
    pub id: ElementId,
    pub text: String,
    pub font_size: f32,
    pub color: Color,
}

impl OverlayElement {
    pub fn new(id: ElementId, style: &OverlayStyle) -> Self {
        Self {
            id,
            text: style.text.clone(),
            font_size: style.font_size,
            color: style.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_starts_at_one_and_never_repeats() {
        let mut ids = IdAllocator::new();
        let first = ids.allocate();
        let second = ids.allocate();
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
        assert_eq!(second.to_string(), "#2");
    }

    #[test]
    fn new_element_copies_default_style() {
        let element = OverlayElement::new(IdAllocator::new().allocate(), &OverlayStyle::default());
        assert_eq!(element.text, "Introduce your text here");
        assert_eq!(element.font_size, 20.0);
        assert_eq!(element.color, Color::WHITE);
    }
}
