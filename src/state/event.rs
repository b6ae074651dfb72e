use super::model::GateState;

/// Inputs that drive the selection gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    /// The user asked to open an image; closes the gate.
    OpenRequested,
    /// The picker closed without a selection.
    SelectionCancelled,
    /// A scheduled load finished without producing a raster.
    LoadFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<GateState>,
    pub event: GateEvent,
    pub to: GateState,
}

impl StateTransition {
    pub const fn new(from: Option<GateState>, event: GateEvent, to: GateState) -> Self {
        Self { from, event, to }
    }
}
