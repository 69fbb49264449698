//! Input events
//!
//! Unified input events delivered by a host (window, headless runner, test)
//! to a scene. Coordinates are logical pixels relative to the viewport.

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_ENTER: EventType = 4;
    pub const POINTER_LEAVE: EventType = 5;
    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;
}

/// A UI event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub data: EventData,
    /// Host time in milliseconds
    pub timestamp: u64,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Pointer {
        x: f32,
        y: f32,
        button: u8,
    },
    Scroll {
        delta_x: f32,
        delta_y: f32,
    },
    Resize {
        width: u32,
        height: u32,
    },
    None,
}

impl Event {
    pub fn pointer(event_type: EventType, x: f32, y: f32, timestamp: u64) -> Self {
        Self {
            event_type,
            data: EventData::Pointer { x, y, button: 0 },
            timestamp,
        }
    }

    pub fn scroll(delta_x: f32, delta_y: f32, timestamp: u64) -> Self {
        Self {
            event_type: event_types::SCROLL,
            data: EventData::Scroll { delta_x, delta_y },
            timestamp,
        }
    }

    pub fn resize(width: u32, height: u32, timestamp: u64) -> Self {
        Self {
            event_type: event_types::RESIZE,
            data: EventData::Resize { width, height },
            timestamp,
        }
    }

    /// Pointer position, if this is a pointer event
    pub fn position(&self) -> Option<(f32, f32)> {
        match self.data {
            EventData::Pointer { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::event_types::*;
    use super::*;

    #[test]
    fn test_constructors() {
        let e = Event::pointer(POINTER_MOVE, 10.0, 20.0, 16);
        assert_eq!(e.position(), Some((10.0, 20.0)));
        assert_eq!(e.timestamp, 16);

        let s = Event::scroll(0.0, 120.0, 32);
        assert_eq!(s.event_type, SCROLL);
        assert_eq!(s.position(), None);

        let r = Event::resize(800, 600, 0);
        assert_eq!(
            r.data,
            EventData::Resize {
                width: 800,
                height: 600
            }
        );
    }
}
