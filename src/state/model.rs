/// One-shot selection gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Ready,
    Loaded,
}

/// Whether the gate reopens after a selection that never produced a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatePolicy {
    #[default]
    OneShot,
    ReopenOnFailure,
}

impl GatePolicy {
    pub const fn from_reset_flag(reset_gate_on_failure: bool) -> Self {
        if reset_gate_on_failure {
            Self::ReopenOnFailure
        } else {
            Self::OneShot
        }
    }
}
