//! State Machine Runtime
//!
//! Flat statecharts for element interaction states (idle, hovered, pressed,
//! dragging). States are user-defined `Copy` enums; transitions fire on
//! [`EventType`](crate::events::EventType) values.
//!
//! A machine holds only its transition table and the current state, so it
//! can run for the lifetime of a scene without growing.

use crate::events::EventType;
use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Builder for creating state machines
pub struct StateMachineBuilder<S> {
    initial_state: S,
    transitions: FxHashMap<(S, EventType), S>,
}

impl<S: Copy + Eq + Hash + Debug> StateMachineBuilder<S> {
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: FxHashMap::default(),
        }
    }

    /// Add a transition (from, event, to)
    ///
    /// A later transition for the same state and event replaces the earlier one.
    pub fn on(mut self, from: S, event: EventType, to: S) -> Self {
        if let Some(previous) = self.transitions.insert((from, event), to) {
            tracing::warn!(?from, event, ?previous, ?to, "fsm transition replaced");
        }
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine<S> {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
        }
    }
}

/// A state machine instance
pub struct StateMachine<S> {
    current_state: S,
    transitions: FxHashMap<(S, EventType), S>,
}

impl<S: Copy + Eq + Hash + Debug> StateMachine<S> {
    /// Create a new state machine with an initial state and transitions
    pub fn new(initial_state: S, transitions: impl IntoIterator<Item = (S, EventType, S)>) -> Self {
        transitions
            .into_iter()
            .fold(Self::builder(initial_state), |builder, (from, event, to)| {
                builder.on(from, event, to)
            })
            .build()
    }

    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S> {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: EventType) -> bool {
        self.transitions.contains_key(&(self.current_state, event))
    }

    /// Send an event to the state machine, potentially triggering a transition.
    ///
    /// Returns the state after the event.
    pub fn send(&mut self, event: EventType) -> S {
        let current = self.current_state;
        let Some(&to_state) = self.transitions.get(&(current, event)) else {
            return current;
        };

        self.current_state = to_state;
        tracing::trace!(from = ?current, to = ?to_state, event, "fsm transition");
        to_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_types::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Button {
        Idle,
        Hovered,
        Pressed,
    }

    fn button_fsm() -> StateMachine<Button> {
        StateMachine::new(
            Button::Idle,
            [
                (Button::Idle, POINTER_ENTER, Button::Hovered),
                (Button::Hovered, POINTER_LEAVE, Button::Idle),
                (Button::Hovered, POINTER_DOWN, Button::Pressed),
                (Button::Pressed, POINTER_UP, Button::Hovered),
            ],
        )
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = button_fsm();
        assert_eq!(fsm.current_state(), Button::Idle);

        fsm.send(POINTER_ENTER);
        assert_eq!(fsm.current_state(), Button::Hovered);

        fsm.send(POINTER_DOWN);
        assert_eq!(fsm.current_state(), Button::Pressed);

        fsm.send(POINTER_UP);
        assert_eq!(fsm.current_state(), Button::Hovered);

        fsm.send(POINTER_LEAVE);
        assert_eq!(fsm.current_state(), Button::Idle);
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = button_fsm();

        // POINTER_DOWN is not valid in Idle
        assert!(!fsm.can_send(POINTER_DOWN));
        assert_eq!(fsm.send(POINTER_DOWN), Button::Idle);
        assert!(fsm.can_send(POINTER_ENTER));
    }

    #[test]
    fn test_later_transition_replaces_earlier() {
        let mut fsm = StateMachine::builder(Button::Idle)
            .on(Button::Idle, POINTER_ENTER, Button::Pressed)
            .on(Button::Idle, POINTER_ENTER, Button::Hovered)
            .build();

        assert_eq!(fsm.send(POINTER_ENTER), Button::Hovered);
    }

    #[test]
    fn test_long_running_hover_cycles() {
        let mut fsm = button_fsm();
        for _ in 0..50_000 {
            assert_eq!(fsm.send(POINTER_ENTER), Button::Hovered);
            assert_eq!(fsm.send(POINTER_LEAVE), Button::Idle);
        }
        assert!(fsm.is_in(Button::Idle));
        assert_eq!(fsm.transitions.len(), 4);
    }
}
