//! Kinetic Core Runtime
//!
//! Foundational primitives shared by the motion runtime and its hosts:
//!
//! - **Geometry**: points, sizes and rectangles in logical pixels
//! - **Events**: pointer, scroll and resize input
//! - **State Machines**: flat statecharts for element interaction states
//!
//! # Example
//!
//! ```rust
//! use kinetic_core::events::event_types::{POINTER_ENTER, POINTER_LEAVE};
//! use kinetic_core::fsm::StateMachine;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Hover {
//!     Idle,
//!     Hovered,
//! }
//!
//! let mut fsm = StateMachine::builder(Hover::Idle)
//!     .on(Hover::Idle, POINTER_ENTER, Hover::Hovered)
//!     .on(Hover::Hovered, POINTER_LEAVE, Hover::Idle)
//!     .build();
//!
//! fsm.send(POINTER_ENTER);
//! assert!(fsm.is_in(Hover::Hovered));
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;

pub use events::{Event, EventData, EventType};
pub use fsm::{StateMachine, StateMachineBuilder};
pub use geometry::{Point, Rect, Size};
