//! Kinetic Animation System
//!
//! Spring physics, keyframe animations, inertia, and a frame scheduler.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Keyframe Animations**: Timed sequences with per-segment easing
//! - **Repeats**: Finite or infinite, looping, reversing or mirroring
//! - **Inertia**: Exponential decay for gesture momentum
//! - **Interruptible**: Springs inherit velocity when retargeted

pub mod easing;
pub mod inertia;
pub mod keyframe;
pub mod scheduler;
pub mod spring;
pub mod values;

pub use easing::Easing;
pub use inertia::{Inertia, InertiaConfig};
pub use keyframe::{KeyframeAnimation, Repeat, RepeatType};
pub use scheduler::{
    AnimationHandle, AnimationScheduler, ColorKeyframeId, InertiaId, KeyframeId, ScheduledSpring,
    SpringId,
};
pub use spring::{Spring, SpringConfig};
pub use values::Interpolate;
