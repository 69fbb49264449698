//! Kinetic Motion
//!
//! Declarative motion for element trees, built on `kinetic_animation`.
//!
//! # Features
//!
//! - **Targets**: per-property values or keyframe lists with transitions
//! - **Variants**: named targets propagated to children with staggering
//! - **Gestures**: hover and tap layers that revert when released
//! - **Drag**: constrained, elastic dragging with release momentum
//! - **Scroll**: properties bound to page scroll offset or progress
//! - **In-view**: viewport observers with `once`, amount and margin
//!
//! Trees are built with [`MotionNode`] and mounted into a [`MotionScene`],
//! which owns layout (taffy), the animation scheduler and input routing.

pub mod controls;
pub mod drag;
pub mod error;
pub mod gesture;
pub mod in_view;
pub mod layout;
pub mod node;
pub mod props;
pub mod scene;
pub mod scroll;
pub mod snapshot;
pub mod transition;
pub mod variants;

pub use controls::{AnimationControls, ControlCommand, ControlsReader};
pub use drag::{DragAxis, DragConfig, DragConstraints, VelocityTracker};
pub use error::{MotionError, Result};
pub use gesture::{GestureState, GestureTracker};
pub use in_view::{InViewAmount, InViewObserver, InViewOptions};
pub use layout::{LayoutTree, TextContext};
pub use node::{Animate, Initial, MotionNode, NodeKind, VisualStyle};
pub use props::{PropValue, Property, Target, TargetValue};
pub use scene::{MotionScene, NodeId};
pub use scroll::{ScrollProgress, ScrollSource};
pub use snapshot::{ElementSnapshot, SceneSnapshot, ScrollSnapshot, SnapshotValue};
pub use transition::{Driver, Transition, TransitionMap};
pub use variants::Variants;

pub use kinetic_animation::{Easing, Repeat, RepeatType, SpringConfig};
