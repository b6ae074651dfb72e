use super::event::GateEvent;
use super::model::GateState;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid gate transition: from {from:?} using event {event:?}")]
    InvalidStateTransition { from: GateState, event: GateEvent },
}
