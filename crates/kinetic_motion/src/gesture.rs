//! Hover and tap gestures
//!
//! Each interactive element runs a small state machine fed with pointer
//! events. `while_hover` and `while_tap` targets layer over the element's
//! base target; the highest active layer wins per property:
//!
//! ```text
//! animate  <  while_hover  <  while_tap
//! ```

use crate::props::{Property, Target, TargetValue};
use kinetic_core::events::event_types::*;
use kinetic_core::{EventType, StateMachine};
use serde::{Deserialize, Serialize};

/// Interaction state of an element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    Idle,
    Hovered,
    /// Pointer down over the element
    Pressed,
    /// Pointer still down but moved off the element
    PressedOutside,
}

impl GestureState {
    pub fn is_hovered(self) -> bool {
        matches!(self, GestureState::Hovered | GestureState::Pressed)
    }

    pub fn is_pressed(self) -> bool {
        matches!(self, GestureState::Pressed | GestureState::PressedOutside)
    }

    pub fn name(self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Hovered => "hovered",
            GestureState::Pressed => "pressed",
            GestureState::PressedOutside => "pressed_outside",
        }
    }
}

/// Build the hover/tap state machine
pub fn gesture_machine() -> StateMachine<GestureState> {
    use GestureState::*;

    StateMachine::builder(Idle)
        .on(Idle, POINTER_ENTER, Hovered)
        .on(Idle, POINTER_DOWN, Pressed)
        .on(Hovered, POINTER_LEAVE, Idle)
        .on(Hovered, POINTER_DOWN, Pressed)
        .on(Pressed, POINTER_UP, Hovered)
        .on(Pressed, POINTER_LEAVE, PressedOutside)
        .on(PressedOutside, POINTER_ENTER, Pressed)
        .on(PressedOutside, POINTER_UP, Idle)
        .build()
}

/// Gesture state plus the layered targets it activates
pub struct GestureTracker {
    machine: StateMachine<GestureState>,
    hover: Option<Target>,
    tap: Option<Target>,
}

impl GestureTracker {
    pub fn new(hover: Option<Target>, tap: Option<Target>) -> Self {
        Self {
            machine: gesture_machine(),
            hover,
            tap,
        }
    }

    pub fn state(&self) -> GestureState {
        self.machine.current_state()
    }

    /// Feed a pointer event; returns true if the state changed
    pub fn send(&mut self, event: EventType) -> bool {
        let before = self.machine.current_state();
        let after = self.machine.send(event);
        before != after
    }

    /// Every property any gesture layer touches
    pub fn layered_properties(&self) -> Vec<Property> {
        let mut properties: Vec<Property> = Vec::new();
        for target in [&self.hover, &self.tap].into_iter().flatten() {
            for property in target.properties() {
                if !properties.contains(&property) {
                    properties.push(property);
                }
            }
        }
        properties
    }

    /// Value from the highest active layer, `None` if only the base applies
    pub fn active_value(&self, property: Property) -> Option<&TargetValue> {
        let state = self.state();
        let tap = self
            .tap
            .as_ref()
            .filter(|_| state.is_pressed())
            .and_then(|t| t.get(property));
        let hover = self
            .hover
            .as_ref()
            .filter(|_| state.is_hovered())
            .and_then(|t| t.get(property));
        tap.or(hover)
    }
}
