//! Animation scheduler
//!
//! Owns every running animation and advances them together each frame.
//! Time is supplied by the caller (`tick(dt_ms)`) so hosts can run against a
//! wall clock or a simulated one.

use crate::inertia::Inertia;
use crate::keyframe::KeyframeAnimation;
use crate::spring::Spring;
use kinetic_paint::Color;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct SpringId;
    pub struct KeyframeId;
    pub struct ColorKeyframeId;
    pub struct InertiaId;
}

/// A spring that starts moving after an optional delay
#[derive(Clone, Debug)]
pub struct ScheduledSpring {
    pub spring: Spring,
    pub delay_remaining_ms: f32,
}

impl ScheduledSpring {
    pub fn new(spring: Spring) -> Self {
        Self {
            spring,
            delay_remaining_ms: 0.0,
        }
    }

    pub fn with_delay(mut self, delay_ms: f32) -> Self {
        self.delay_remaining_ms = delay_ms.max(0.0);
        self
    }

    pub fn is_active(&self) -> bool {
        self.delay_remaining_ms > 0.0 || !self.spring.is_settled()
    }

    fn tick(&mut self, dt_ms: f32) {
        let mut dt_ms = dt_ms;
        if self.delay_remaining_ms > 0.0 {
            let consumed = dt_ms.min(self.delay_remaining_ms);
            self.delay_remaining_ms -= consumed;
            dt_ms -= consumed;
        }
        if dt_ms > 0.0 {
            self.spring.step(dt_ms / 1000.0);
        }
    }
}

/// Handle to any animation owned by the scheduler
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationHandle {
    Spring(SpringId),
    Keyframe(KeyframeId),
    ColorKeyframe(ColorKeyframeId),
    Inertia(InertiaId),
}

/// The animation scheduler that ticks all active animations
#[derive(Default)]
pub struct AnimationScheduler {
    springs: SlotMap<SpringId, ScheduledSpring>,
    keyframes: SlotMap<KeyframeId, KeyframeAnimation<f32>>,
    color_keyframes: SlotMap<ColorKeyframeId, KeyframeAnimation<Color>>,
    inertias: SlotMap<InertiaId, Inertia>,
    elapsed_ms: f64,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_spring(&mut self, spring: ScheduledSpring) -> SpringId {
        self.springs.insert(spring)
    }

    pub fn get_spring(&self, id: SpringId) -> Option<&ScheduledSpring> {
        self.springs.get(id)
    }

    pub fn get_spring_mut(&mut self, id: SpringId) -> Option<&mut ScheduledSpring> {
        self.springs.get_mut(id)
    }

    pub fn add_keyframes(&mut self, animation: KeyframeAnimation<f32>) -> KeyframeId {
        self.keyframes.insert(animation)
    }

    pub fn get_keyframes(&self, id: KeyframeId) -> Option<&KeyframeAnimation<f32>> {
        self.keyframes.get(id)
    }

    pub fn add_color_keyframes(&mut self, animation: KeyframeAnimation<Color>) -> ColorKeyframeId {
        self.color_keyframes.insert(animation)
    }

    pub fn get_color_keyframes(&self, id: ColorKeyframeId) -> Option<&KeyframeAnimation<Color>> {
        self.color_keyframes.get(id)
    }

    pub fn add_inertia(&mut self, inertia: Inertia) -> InertiaId {
        self.inertias.insert(inertia)
    }

    pub fn get_inertia(&self, id: InertiaId) -> Option<&Inertia> {
        self.inertias.get(id)
    }

    /// Remove an animation; returns whether it existed
    pub fn remove(&mut self, handle: AnimationHandle) -> bool {
        match handle {
            AnimationHandle::Spring(id) => self.springs.remove(id).is_some(),
            AnimationHandle::Keyframe(id) => self.keyframes.remove(id).is_some(),
            AnimationHandle::ColorKeyframe(id) => self.color_keyframes.remove(id).is_some(),
            AnimationHandle::Inertia(id) => self.inertias.remove(id).is_some(),
        }
    }

    /// Current numeric value (`None` for color animations or stale handles)
    pub fn value(&self, handle: AnimationHandle) -> Option<f32> {
        match handle {
            AnimationHandle::Spring(id) => self.springs.get(id).map(|s| s.spring.value()),
            AnimationHandle::Keyframe(id) => self.keyframes.get(id).map(KeyframeAnimation::value),
            AnimationHandle::Inertia(id) => self.inertias.get(id).map(Inertia::value),
            AnimationHandle::ColorKeyframe(_) => None,
        }
    }

    /// Current color value (`None` for numeric animations or stale handles)
    pub fn color(&self, handle: AnimationHandle) -> Option<Color> {
        match handle {
            AnimationHandle::ColorKeyframe(id) => {
                self.color_keyframes.get(id).map(KeyframeAnimation::value)
            }
            _ => None,
        }
    }

    /// Current velocity in units per second, where the animation tracks one
    pub fn velocity(&self, handle: AnimationHandle) -> f32 {
        match handle {
            AnimationHandle::Spring(id) => self.springs.get(id).map_or(0.0, |s| s.spring.velocity()),
            AnimationHandle::Inertia(id) => self.inertias.get(id).map_or(0.0, Inertia::velocity),
            _ => 0.0,
        }
    }

    /// Whether the animation behind `handle` is still running
    pub fn is_active(&self, handle: AnimationHandle) -> bool {
        match handle {
            AnimationHandle::Spring(id) => self.springs.get(id).is_some_and(ScheduledSpring::is_active),
            AnimationHandle::Keyframe(id) => {
                self.keyframes.get(id).is_some_and(KeyframeAnimation::is_playing)
            }
            AnimationHandle::ColorKeyframe(id) => self
                .color_keyframes
                .get(id)
                .is_some_and(KeyframeAnimation::is_playing),
            AnimationHandle::Inertia(id) => self.inertias.get(id).is_some_and(|i| !i.is_finished()),
        }
    }

    /// Advance every animation by `dt_ms` milliseconds
    pub fn tick(&mut self, dt_ms: f32) {
        if dt_ms <= 0.0 {
            return;
        }
        self.elapsed_ms += dt_ms as f64;

        for (_, spring) in self.springs.iter_mut() {
            spring.tick(dt_ms);
        }
        for (_, animation) in self.keyframes.iter_mut() {
            animation.tick(dt_ms);
        }
        for (_, animation) in self.color_keyframes.iter_mut() {
            animation.tick(dt_ms);
        }
        for (_, inertia) in self.inertias.iter_mut() {
            inertia.tick(dt_ms);
        }
    }

    /// Total simulated time in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Check if any animations are still active
    pub fn has_active_animations(&self) -> bool {
        self.springs.values().any(ScheduledSpring::is_active)
            || self.keyframes.values().any(KeyframeAnimation::is_playing)
            || self.color_keyframes.values().any(KeyframeAnimation::is_playing)
            || self.inertias.values().any(|i| !i.is_finished())
    }

    /// Number of animations currently owned by the scheduler
    pub fn animation_count(&self) -> usize {
        self.springs.len() + self.keyframes.len() + self.color_keyframes.len() + self.inertias.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::inertia::InertiaConfig;
    use crate::keyframe::Repeat;
    use crate::spring::SpringConfig;

    #[test]
    fn test_spring_delay_holds_value() {
        let mut scheduler = AnimationScheduler::new();
        let spring = Spring::new(SpringConfig::snappy(), 0.0).with_target(1.0);
        let id = scheduler.add_spring(ScheduledSpring::new(spring).with_delay(100.0));
        let handle = AnimationHandle::Spring(id);

        scheduler.tick(50.0);
        assert_eq!(scheduler.value(handle), Some(0.0));
        assert!(scheduler.is_active(handle));

        scheduler.tick(100.0);
        assert!(scheduler.value(handle).is_some_and(|v| v > 0.0));
    }

    #[test]
    fn test_tick_advances_all_kinds() {
        let mut scheduler = AnimationScheduler::new();
        let kf = scheduler.add_keyframes(
            KeyframeAnimation::tween(0.0, 10.0, 100.0).with_ease(Easing::Linear),
        );
        let color = scheduler.add_color_keyframes(KeyframeAnimation::tween(
            Color::TRANSPARENT,
            Color::BLACK,
            100.0,
        ));
        let inertia = scheduler.add_inertia(Inertia::new(InertiaConfig::default(), 0.0, 100.0));

        scheduler.tick(50.0);
        assert_eq!(scheduler.value(AnimationHandle::Keyframe(kf)), Some(5.0));
        let mid = scheduler
            .color(AnimationHandle::ColorKeyframe(color))
            .map(|c| c.a);
        assert_eq!(mid, Some(0.5));
        assert!(scheduler
            .value(AnimationHandle::Inertia(inertia))
            .is_some_and(|v| v > 0.0));
        assert_eq!(scheduler.animation_count(), 3);
    }

    #[test]
    fn test_has_active_animations() {
        let mut scheduler = AnimationScheduler::new();
        assert!(!scheduler.has_active_animations());

        let id = scheduler.add_keyframes(KeyframeAnimation::tween(0.0, 1.0, 100.0));
        assert!(scheduler.has_active_animations());

        scheduler.tick(100.0);
        assert!(!scheduler.has_active_animations());

        assert!(scheduler.remove(AnimationHandle::Keyframe(id)));
        assert!(!scheduler.remove(AnimationHandle::Keyframe(id)));
    }

    #[test]
    fn test_infinite_keeps_scheduler_active() {
        let mut scheduler = AnimationScheduler::new();
        scheduler.add_keyframes(
            KeyframeAnimation::tween(0.0, 1.0, 100.0).with_repeat(Repeat::Infinite),
        );
        for _ in 0..1000 {
            scheduler.tick(16.0);
        }
        assert!(scheduler.has_active_animations());
        assert!((scheduler.elapsed_ms() - 16_000.0).abs() < 1e-6);
    }
}
