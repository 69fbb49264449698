//! Drag gestures
//!
//! A draggable element follows the pointer through its `x`/`y` values.
//! Constraints are offsets relative to the element's layout position:
//!
//! - with `elastic == 0` the offset is clamped to the constraint box;
//! - with `elastic > 0` it can be pulled past an edge by that fraction of
//!   the overshoot, and springs back with the bounce configuration on release.
//!
//! Releasing with velocity continues with inertia. The scene switches an
//! inertia that leaves the box to a bounce (elastic) or stops it at the edge.

use crate::transition::Transition;
use kinetic_animation::{Inertia, InertiaConfig, Spring};
use kinetic_core::Point;
use std::collections::VecDeque;

/// Samples older than this do not contribute to release velocity
const VELOCITY_WINDOW_MS: f64 = 100.0;

/// Release speeds below this (px/s) do not start inertia
const MIN_RELEASE_SPEED: f32 = 1.0;

/// Which axes follow the pointer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragAxis {
    #[default]
    Both,
    X,
    Y,
}

impl DragAxis {
    pub fn allows_x(self) -> bool {
        matches!(self, DragAxis::Both | DragAxis::X)
    }

    pub fn allows_y(self) -> bool {
        matches!(self, DragAxis::Both | DragAxis::Y)
    }
}

/// Allowed offset range, relative to the layout position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragConstraints {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl DragConstraints {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn range_x(&self) -> (f32, f32) {
        (self.left, self.right)
    }

    pub fn range_y(&self) -> (f32, f32) {
        (self.top, self.bottom)
    }

    pub fn contains(&self, offset: Point) -> bool {
        offset.x >= self.left
            && offset.x <= self.right
            && offset.y >= self.top
            && offset.y <= self.bottom
    }

    pub fn clamp(&self, offset: Point) -> Point {
        Point::new(
            offset.x.clamp(self.left, self.right),
            offset.y.clamp(self.top, self.bottom),
        )
    }
}

/// Drag behavior of one element
#[derive(Clone, Debug, PartialEq)]
pub struct DragConfig {
    pub axis: DragAxis,
    pub constraints: Option<DragConstraints>,
    /// Fraction of overshoot allowed past a constraint while dragging
    pub elastic: f32,
    /// Continue with inertia after release
    pub momentum: bool,
    pub inertia: InertiaConfig,
    /// Release transition; its bounce spring returns out-of-bounds offsets
    pub transition: Transition,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            axis: DragAxis::Both,
            constraints: None,
            elastic: 0.0,
            momentum: true,
            inertia: InertiaConfig::default(),
            transition: Transition::default(),
        }
    }
}

impl DragConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis(mut self, axis: DragAxis) -> Self {
        self.axis = axis;
        self
    }

    pub fn constraints(mut self, constraints: DragConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn elastic(mut self, elastic: f32) -> Self {
        self.elastic = elastic.clamp(0.0, 1.0);
        self
    }

    pub fn momentum(mut self, momentum: bool) -> Self {
        self.momentum = momentum;
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    pub fn range_x(&self) -> (f32, f32) {
        self.constraints
            .map_or((f32::NEG_INFINITY, f32::INFINITY), |c| c.range_x())
    }

    pub fn range_y(&self) -> (f32, f32) {
        self.constraints
            .map_or((f32::NEG_INFINITY, f32::INFINITY), |c| c.range_y())
    }

    /// Offset displayed for a raw pointer-driven offset
    pub fn apply_constraint(&self, raw: f32, (min, max): (f32, f32)) -> f32 {
        if raw < min {
            min + (raw - min) * self.elastic
        } else if raw > max {
            max + (raw - max) * self.elastic
        } else {
            raw
        }
    }

    /// Motion to run for one axis after the pointer is released
    pub fn release_motion(&self, value: f32, velocity: f32, (min, max): (f32, f32)) -> Option<ReleaseMotion> {
        if value < min || value > max {
            let edge = value.clamp(min, max);
            return Some(self.bounce(value, velocity, edge));
        }
        if self.momentum && velocity.abs() >= MIN_RELEASE_SPEED {
            return Some(ReleaseMotion::Inertia(Inertia::new(self.inertia, value, velocity)));
        }
        None
    }

    /// Motion for an inertia that crossed an edge; `None` stops at the edge
    pub fn boundary_motion(&self, value: f32, velocity: f32, (min, max): (f32, f32)) -> Option<ReleaseMotion> {
        if self.elastic <= 0.0 {
            return None;
        }
        Some(self.bounce(value, velocity, value.clamp(min, max)))
    }

    fn bounce(&self, value: f32, velocity: f32, edge: f32) -> ReleaseMotion {
        let spring = Spring::new(self.transition.bounce_config(), value)
            .with_target(edge)
            .with_velocity(velocity);
        ReleaseMotion::Bounce(spring)
    }
}

/// Post-release animation for one axis
#[derive(Clone, Debug)]
pub enum ReleaseMotion {
    Inertia(Inertia),
    Bounce(Spring),
}

/// Recent pointer-driven offsets for release velocity
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(f64, Point)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, time_ms: f64, position: Point) {
        self.samples.push_back((time_ms, position));
        while let Some(&(t, _)) = self.samples.front() {
            if time_ms - t > VELOCITY_WINDOW_MS && self.samples.len() > 2 {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Velocity in px/s over the recent window
    pub fn velocity(&self, now_ms: f64) -> Point {
        let Some(&(last_t, last)) = self.samples.back() else {
            return Point::ZERO;
        };
        if now_ms - last_t > VELOCITY_WINDOW_MS {
            return Point::ZERO;
        }
        let Some(&(first_t, first)) = self
            .samples
            .iter()
            .find(|(t, _)| last_t - t <= VELOCITY_WINDOW_MS)
        else {
            return Point::ZERO;
        };
        let dt = ((last_t - first_t) / 1000.0) as f32;
        if dt <= 0.0 {
            return Point::ZERO;
        }
        Point::new((last.x - first.x) / dt, (last.y - first.y) / dt)
    }
}

/// An in-progress drag
#[derive(Clone, Debug)]
pub struct DragSession {
    pub pointer_origin: Point,
    pub offset_origin: Point,
    pub tracker: VelocityTracker,
}

impl DragSession {
    pub fn new(pointer_origin: Point, offset_origin: Point, time_ms: f64) -> Self {
        let mut tracker = VelocityTracker::new();
        tracker.record(time_ms, offset_origin);
        Self {
            pointer_origin,
            offset_origin,
            tracker,
        }
    }

    /// Raw (unconstrained) offset for a pointer position
    pub fn raw_offset(&self, pointer: Point, axis: DragAxis) -> Point {
        let dx = if axis.allows_x() { pointer.x - self.pointer_origin.x } else { 0.0 };
        let dy = if axis.allows_y() { pointer.y - self.pointer_origin.y } else { 0.0 };
        Point::new(self.offset_origin.x + dx, self.offset_origin.y + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> DragConfig {
        DragConfig::new()
            .constraints(DragConstraints::new(-125.0, 150.0, 125.0, -150.0))
            .transition(Transition::new().bounce(600.0, 20.0))
    }

    #[test]
    fn test_rigid_constraints_clamp() {
        let config = demo();
        assert_eq!(config.apply_constraint(400.0, config.range_x()), 150.0);
        assert_eq!(config.apply_constraint(-400.0, config.range_y()), -125.0);
        assert_eq!(config.apply_constraint(10.0, config.range_x()), 10.0);
    }

    #[test]
    fn test_elastic_overshoot() {
        let config = demo().elastic(0.5);
        assert_eq!(config.apply_constraint(250.0, config.range_x()), 200.0);
        assert_eq!(config.apply_constraint(-225.0, config.range_y()), -175.0);
    }

    #[test]
    fn test_release_outside_bounces_back() {
        let config = demo().elastic(0.5);
        let Some(ReleaseMotion::Bounce(mut spring)) = config.release_motion(200.0, 0.0, config.range_x()) else {
            panic!("expected a bounce");
        };
        assert_eq!(spring.target(), 150.0);
        for _ in 0..120 {
            spring.step(1.0 / 60.0);
        }
        assert!((spring.value() - 150.0).abs() < 0.5);
    }

    #[test]
    fn test_release_inside_uses_inertia() {
        let config = demo();
        assert!(matches!(
            config.release_motion(0.0, 300.0, config.range_x()),
            Some(ReleaseMotion::Inertia(_))
        ));
        assert!(config.release_motion(0.0, 0.0, config.range_x()).is_none());
        assert!(config.boundary_motion(160.0, 300.0, config.range_x()).is_none());
    }

    #[test]
    fn test_velocity_tracker() {
        let mut tracker = VelocityTracker::new();
        tracker.record(0.0, Point::new(0.0, 0.0));
        tracker.record(50.0, Point::new(10.0, 0.0));
        tracker.record(100.0, Point::new(20.0, -5.0));

        let v = tracker.velocity(100.0);
        assert!((v.x - 200.0).abs() < 1e-3);
        assert!((v.y + 50.0).abs() < 1e-3);
        // stale samples give no velocity
        assert_eq!(tracker.velocity(500.0), Point::ZERO);
    }

    #[test]
    fn test_axis_lock() {
        let session = DragSession::new(Point::new(100.0, 100.0), Point::ZERO, 0.0);
        let offset = session.raw_offset(Point::new(130.0, 80.0), DragAxis::X);
        assert_eq!(offset, Point::new(30.0, 0.0));
    }
}
