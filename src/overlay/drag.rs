use super::element::ElementId;

/// Pointer movement, in container coordinates, to translate one overlay by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragDelta {
    pub element: ElementId,
    pub dx: i32,
    pub dy: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Grab {
    element: ElementId,
    last_x: i32,
    last_y: i32,
}

/// Tracks a single press-move-release drag on an overlay.
#[derive(Debug, Default)]
pub struct OverlayDrag {
    grab: Option<Grab>,
}

impl OverlayDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.grab.is_some()
    }

    pub fn press(&mut self, element: ElementId, x: i32, y: i32) {
        tracing::debug!(%element, x, y, "overlay drag pressed");
        self.grab = Some(Grab {
            element,
            last_x: x,
            last_y: y,
        });
    }

    /// Delta since the previous pointer position, or `None` without a grab.
    pub fn move_to(&mut self, x: i32, y: i32) -> Option<DragDelta> {
        let grab = self.grab.as_mut()?;
        let delta = DragDelta {
            element: grab.element,
            dx: x.saturating_sub(grab.last_x),
            dy: y.saturating_sub(grab.last_y),
        };
        grab.last_x = x;
        grab.last_y = y;
        tracing::debug!(element = %delta.element, dx = delta.dx, dy = delta.dy, "overlay drag moved");
        Some(delta)
    }

    pub fn release(&mut self) -> Option<ElementId> {
        let grab = self.grab.take()?;
        tracing::debug!(element = %grab.element, "overlay drag released");
        Some(grab.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::element::IdAllocator;

    #[test]
    fn move_reports_incremental_deltas() {
        let id = IdAllocator::new().allocate();
        let mut drag = OverlayDrag::new();
        drag.press(id, 10, 10);

        assert_eq!(
            drag.move_to(15, 7),
            Some(DragDelta {
                element: id,
                dx: 5,
                dy: -3
            })
        );
        assert_eq!(
            drag.move_to(16, 7),
            Some(DragDelta {
                element: id,
                dx: 1,
                dy: 0
            })
        );
        assert_eq!(drag.release(), Some(id));
        assert!(!drag.is_active());
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut drag = OverlayDrag::new();
        assert_eq!(drag.move_to(3, 4), None);
        assert_eq!(drag.release(), None);
    }
}
