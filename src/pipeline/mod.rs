//! Image acquisition: gate the open affordance, decode off the UI thread and
//! hand the raster back to the display surface.

mod decode;
mod error;
mod locator;
mod scheduler;
mod surface;

use std::collections::HashMap;
use std::ops::AddAssign;
use std::sync::Arc;
use std::time::Duration;

use crate::state::{GateEvent, GatePolicy, GateState, StateMachine};

pub use decode::{decode_image, DecodedImage};
pub use error::{LoadError, LoadResult, SubmitError};
pub use locator::{FsResolver, ImageLocator, ResourceHandle, ResourceResolver};
pub use scheduler::{
    ScheduleError, ScheduleResult, SchedulerConfig, TaskCompletion, TaskHandle, TaskId,
    TaskOutcome, TaskScheduler,
};
pub use surface::{Affordance, DisplaySurface, RecordingSurface, SurfaceState, SurfaceUpdate};

/// Proof that the gate was closed for one picker round-trip.
#[must_use = "an open ticket must be answered with on_selection_result"]
#[derive(Debug)]
pub struct OpenTicket {
    _private: (),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub presented: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl DrainReport {
    pub fn total(&self) -> usize {
        self.presented + self.failed + self.cancelled
    }
}

impl AddAssign for DrainReport {
    fn add_assign(&mut self, other: Self) {
        self.presented += other.presented;
        self.failed += other.failed;
        self.cancelled += other.cancelled;
    }
}

pub struct AcquisitionPipeline {
    gate: StateMachine,
    scheduler: TaskScheduler<LoadResult<DecodedImage>>,
    resolver: Arc<dyn ResourceResolver>,
    pending: HashMap<TaskId, ImageLocator>,
    failures_logged: usize,
}

impl AcquisitionPipeline {
    pub fn new(
        resolver: Arc<dyn ResourceResolver>,
        scheduler_config: SchedulerConfig,
        policy: GatePolicy,
    ) -> ScheduleResult<Self> {
        Ok(Self {
            gate: StateMachine::with_policy(policy),
            scheduler: TaskScheduler::new(scheduler_config)?,
            resolver,
            pending: HashMap::new(),
            failures_logged: 0,
        })
    }

    pub fn with_defaults() -> ScheduleResult<Self> {
        Self::new(
            Arc::new(FsResolver),
            SchedulerConfig::default(),
            GatePolicy::default(),
        )
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn failures_logged(&self) -> usize {
        self.failures_logged
    }

    /// Closes the gate before the picker is shown.
    pub fn request_open(&mut self) -> Result<OpenTicket, SubmitError> {
        let state = self.gate.state();
        self.gate
            .transition(GateEvent::OpenRequested)
            .map_err(|source| SubmitError::GateClosed { state, source })?;
        Ok(OpenTicket { _private: () })
    }

    /// Consumes the picker's answer. `None` means the user cancelled.
    pub fn on_selection_result(
        &mut self,
        ticket: OpenTicket,
        selection: Option<ImageLocator>,
    ) -> Result<Option<TaskHandle>, SubmitError> {
        match selection {
            Some(locator) => self.schedule(ticket, locator).map(Some),
            None => {
                tracing::info!("image selection cancelled");
                self.release_gate(GateEvent::SelectionCancelled);
                Ok(None)
            }
        }
    }

    /// Gate and schedule a decode in one step.
    pub fn submit_selection(&mut self, locator: ImageLocator) -> Result<TaskHandle, SubmitError> {
        let ticket = self.request_open()?;
        self.schedule(ticket, locator)
    }

    fn schedule(
        &mut self,
        _ticket: OpenTicket,
        locator: ImageLocator,
    ) -> Result<TaskHandle, SubmitError> {
        let resolver = self.resolver.clone();
        let task_locator = locator.clone();
        let submitted = self
            .scheduler
            .submit(move || decode_image(resolver.as_ref(), &task_locator));

        match submitted {
            Ok(handle) => {
                tracing::debug!(%locator, task_id = handle.id().get(), "scheduled image decode");
                self.pending.insert(handle.id(), locator);
                Ok(handle)
            }
            Err(err) => {
                tracing::warn!(%locator, %err, "failed to schedule image decode");
                self.failures_logged += 1;
                self.release_gate(GateEvent::LoadFailed);
                Err(err.into())
            }
        }
    }

    /// Applies every finished load to `surface`. Must run on the UI thread.
    pub fn drain_completions(&mut self, surface: &mut dyn DisplaySurface) -> DrainReport {
        let mut report = DrainReport::default();
        while let Some(completion) = self.scheduler.try_completion() {
            self.handle_completion(completion, surface, &mut report);
        }
        report
    }

    /// Blocks up to `timeout` for the next completion, then drains the rest.
    pub fn wait_and_drain(
        &mut self,
        surface: &mut dyn DisplaySurface,
        timeout: Duration,
    ) -> DrainReport {
        let mut report = DrainReport::default();
        if let Some(completion) = self.scheduler.wait_completion(timeout) {
            self.handle_completion(completion, surface, &mut report);
        }
        report += self.drain_completions(surface);
        report
    }

    fn handle_completion(
        &mut self,
        completion: TaskCompletion<LoadResult<DecodedImage>>,
        surface: &mut dyn DisplaySurface,
        report: &mut DrainReport,
    ) {
        let locator = self
            .pending
            .remove(&completion.task_id)
            .map(|locator| locator.to_string())
            .unwrap_or_default();

        match completion.outcome {
            TaskOutcome::Completed(Ok(image)) => {
                tracing::info!(
                    %locator,
                    width = image.width(),
                    height = image.height(),
                    "presenting decoded image"
                );
                surface.apply(SurfaceUpdate::reveal(image));
                report.presented += 1;
            }
            TaskOutcome::Completed(Err(err)) => {
                tracing::warn!(%locator, %err, "error loading image");
                self.failures_logged += 1;
                self.release_gate(GateEvent::LoadFailed);
                report.failed += 1;
            }
            TaskOutcome::Panicked => {
                tracing::warn!(%locator, "error loading image: decoder panicked");
                self.failures_logged += 1;
                self.release_gate(GateEvent::LoadFailed);
                report.failed += 1;
            }
            TaskOutcome::Cancelled => {
                tracing::debug!(%locator, "image decode cancelled before it started");
                self.release_gate(GateEvent::LoadFailed);
                report.cancelled += 1;
            }
        }
    }

    fn release_gate(&mut self, event: GateEvent) {
        if !self.gate.can_transition(event) {
            tracing::debug!(state = ?self.gate.state(), event = ?event, "gate stays closed");
            return;
        }
        if let Err(err) = self.gate.transition(event) {
            tracing::warn!(?err, "failed to reopen selection gate");
        }
    }
}
