use super::error::{StateError, StateResult};
use super::{event::StateTransition, GateEvent, GatePolicy, GateState};

#[derive(Debug)]
pub struct StateMachine {
    state: GateState,
    policy: GatePolicy,
    transition_history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::with_policy(GatePolicy::default())
    }

    pub fn with_policy(policy: GatePolicy) -> Self {
        Self {
            state: GateState::default(),
            policy,
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    pub fn is_open(&self) -> bool {
        self.state == GateState::Ready
    }

    pub fn can_transition(&self, event: GateEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: GateEvent) -> Option<GateState> {
        use GateEvent::*;
        match (self.state, event, self.policy) {
            (GateState::Ready, OpenRequested, _) => Some(GateState::Loaded),
            (GateState::Loaded, SelectionCancelled | LoadFailed, GatePolicy::ReopenOnFailure) => {
                Some(GateState::Ready)
            }
            _ => None,
        }
    }

    pub fn transition(&mut self, event: GateEvent) -> StateResult<GateState> {
        tracing::debug!(from = ?self.state, event = ?event, "request gate transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::debug!(from = ?from, event = ?event, "gate transition rejected");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(Some(self.state), event, next);
        self.state = next;
        self.transition_history.push(record);

        Ok(self.state)
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GateState::{:?}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_request_closes_gate_exactly_once() {
        let mut machine = StateMachine::new();
        assert!(machine.is_open());
        assert!(machine.can_transition(GateEvent::OpenRequested));

        let state = machine
            .transition(GateEvent::OpenRequested)
            .expect("ready -> loaded should transition");
        assert_eq!(state, GateState::Loaded);
        assert!(!machine.is_open());
        assert!(!machine.can_transition(GateEvent::OpenRequested));

        let err = machine
            .transition(GateEvent::OpenRequested)
            .expect_err("second open request should be rejected");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: GateState::Loaded,
                event: GateEvent::OpenRequested
            }
        ));
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn one_shot_policy_never_reopens() {
        let mut machine = StateMachine::new();
        let _ = machine
            .transition(GateEvent::OpenRequested)
            .expect("open should work");

        assert!(!machine.can_transition(GateEvent::LoadFailed));
        assert!(!machine.can_transition(GateEvent::SelectionCancelled));
        assert!(machine.transition(GateEvent::LoadFailed).is_err());
        assert_eq!(machine.state(), GateState::Loaded);
    }

    #[test]
    fn reopen_policy_records_failure_and_reopen_in_history() {
        let mut machine = StateMachine::with_policy(GatePolicy::ReopenOnFailure);
        let _ = machine
            .transition(GateEvent::OpenRequested)
            .expect("open should work");
        let _ = machine
            .transition(GateEvent::LoadFailed)
            .expect("failure should reopen");
        let _ = machine
            .transition(GateEvent::OpenRequested)
            .expect("second open should work");

        assert_eq!(machine.state(), GateState::Loaded);
        assert_eq!(
            machine.history(),
            &[
                StateTransition::new(
                    Some(GateState::Ready),
                    GateEvent::OpenRequested,
                    GateState::Loaded
                ),
                StateTransition::new(
                    Some(GateState::Loaded),
                    GateEvent::LoadFailed,
                    GateState::Ready
                ),
                StateTransition::new(
                    Some(GateState::Ready),
                    GateEvent::OpenRequested,
                    GateState::Loaded
                ),
            ]
        );
    }

    #[test]
    fn failure_events_are_rejected_while_ready() {
        let mut machine = StateMachine::with_policy(GatePolicy::ReopenOnFailure);
        assert!(!machine.can_transition(GateEvent::LoadFailed));
        assert!(machine.transition(GateEvent::SelectionCancelled).is_err());
        assert!(machine.history().is_empty());
    }
}
