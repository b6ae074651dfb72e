use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::pipeline::{AcquisitionPipeline, DisplaySurface};

pub(super) const COMPLETION_POLL_INTERVAL: Duration = Duration::from_millis(24);

/// Drains finished decodes on the GTK main loop until none are pending.
pub(super) fn pump_completions<S>(pipeline: Rc<RefCell<AcquisitionPipeline>>, surface: Rc<RefCell<S>>)
where
    S: DisplaySurface + 'static,
{
    gtk4::glib::timeout_add_local(COMPLETION_POLL_INTERVAL, move || {
        let mut pipeline = pipeline.borrow_mut();
        let report = pipeline.drain_completions(&mut *surface.borrow_mut());
        if report.total() > 0 {
            tracing::debug!(
                presented = report.presented,
                failed = report.failed,
                cancelled = report.cancelled,
                "drained image loads"
            );
        }
        if pipeline.pending_count() == 0 {
            gtk4::glib::ControlFlow::Break
        } else {
            gtk4::glib::ControlFlow::Continue
        }
    });
}
