//! Keyframe animations
//!
//! A [`KeyframeAnimation`] moves a value through a list of keyframes over a
//! fixed duration, optionally delayed and repeated. Sampling is a pure
//! function of elapsed time ([`KeyframeAnimation::sample_at`]), so a host can
//! drive it with `tick()` or query any point in time directly.
//!
//! # Example
//!
//! ```
//! use kinetic_animation::{Easing, KeyframeAnimation, Repeat, RepeatType};
//!
//! // scale: [1, 2, 2, 1] over 5s, played three times with a 1s pause
//! let scale = KeyframeAnimation::new(vec![1.0f32, 2.0, 2.0, 1.0], 5000.0)
//!     .unwrap()
//!     .with_ease(Easing::EaseInOut)
//!     .with_repeat(Repeat::Count(2))
//!     .with_repeat_delay(1000.0);
//!
//! assert_eq!(scale.active_duration_ms(), Some(17_000.0));
//! assert_eq!(scale.sample_at(20_000.0), 1.0);
//! ```

use crate::easing::Easing;
use crate::values::Interpolate;
use smallvec::{smallvec, SmallVec};

/// How many times an animation plays after its first iteration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    /// Extra iterations after the first (0 = play once)
    Count(u32),
    /// Never finishes
    Infinite,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Count(0)
    }
}

/// Direction of repeated iterations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatType {
    /// Every iteration plays forward from the first keyframe
    #[default]
    Loop,
    /// Odd iterations play the timeline backwards (easing included)
    Reverse,
    /// Odd iterations play forwards through the keyframes in reverse order
    Mirror,
}

/// A keyframe animation over any [`Interpolate`] value
#[derive(Clone, Debug)]
pub struct KeyframeAnimation<T: Interpolate> {
    values: Vec<T>,
    /// Normalized offsets (0.0 to 1.0), one per value
    times: Vec<f32>,
    /// Easing per segment; cycled when shorter than the segment count
    easings: SmallVec<[Easing; 4]>,
    duration_ms: f32,
    delay_ms: f32,
    repeat: Repeat,
    repeat_type: RepeatType,
    repeat_delay_ms: f32,
    elapsed_ms: f32,
    playing: bool,
}

impl<T: Interpolate> KeyframeAnimation<T> {
    /// Create an animation through `values` (evenly spaced).
    ///
    /// Returns `None` when `values` is empty.
    pub fn new(values: Vec<T>, duration_ms: f32) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let times = even_times(values.len());
        Some(Self {
            values,
            times,
            easings: smallvec![Easing::Linear],
            duration_ms: duration_ms.max(0.0),
            delay_ms: 0.0,
            repeat: Repeat::default(),
            repeat_type: RepeatType::default(),
            repeat_delay_ms: 0.0,
            elapsed_ms: 0.0,
            playing: true,
        })
    }

    /// Two-keyframe animation from `from` to `to`
    pub fn tween(from: T, to: T, duration_ms: f32) -> Self {
        Self {
            values: vec![from, to],
            times: vec![0.0, 1.0],
            easings: smallvec![Easing::Linear],
            duration_ms: duration_ms.max(0.0),
            delay_ms: 0.0,
            repeat: Repeat::default(),
            repeat_type: RepeatType::default(),
            repeat_delay_ms: 0.0,
            elapsed_ms: 0.0,
            playing: true,
        }
    }

    /// Use one easing for every segment
    pub fn with_ease(mut self, easing: Easing) -> Self {
        self.easings = smallvec![easing];
        self
    }

    /// Use one easing per segment (cycled if fewer than segments)
    pub fn with_segment_easings(mut self, easings: &[Easing]) -> Self {
        if !easings.is_empty() {
            self.easings = easings.iter().copied().collect();
        }
        self
    }

    /// Explicit keyframe offsets (0.0 to 1.0).
    ///
    /// Ignored unless there is exactly one offset per value, ascending.
    pub fn with_times(mut self, times: &[f32]) -> Self {
        let ascending = times.windows(2).all(|w| w[0] <= w[1]);
        if times.len() == self.values.len() && ascending {
            self.times = times.iter().map(|t| t.clamp(0.0, 1.0)).collect();
        } else {
            tracing::warn!(
                expected = self.values.len(),
                got = times.len(),
                "ignoring keyframe times that do not match the keyframes"
            );
        }
        self
    }

    pub fn with_delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_repeat_type(mut self, repeat_type: RepeatType) -> Self {
        self.repeat_type = repeat_type;
        self
    }

    pub fn with_repeat_delay(mut self, repeat_delay_ms: f32) -> Self {
        self.repeat_delay_ms = repeat_delay_ms.max(0.0);
        self
    }

    /// Restart from the beginning (delay included)
    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn delay_ms(&self) -> f32 {
        self.delay_ms
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn keyframes(&self) -> &[T] {
        &self.values
    }

    /// Time from the end of the delay to completion; `None` if infinite
    pub fn active_duration_ms(&self) -> Option<f32> {
        match self.repeat {
            Repeat::Count(n) => {
                Some(self.duration_ms * (n + 1) as f32 + self.repeat_delay_ms * n as f32)
            }
            Repeat::Infinite => None,
        }
    }

    /// Whether the animation has completed at `elapsed_ms`
    pub fn is_finished_at(&self, elapsed_ms: f32) -> bool {
        self.active_duration_ms()
            .is_some_and(|active| elapsed_ms >= self.delay_ms + active)
    }

    pub fn is_finished(&self) -> bool {
        self.is_finished_at(self.elapsed_ms)
    }

    /// Zero-based iteration index at `elapsed_ms`
    pub fn iteration_at(&self, elapsed_ms: f32) -> u32 {
        let t = elapsed_ms - self.delay_ms;
        let cycle = self.duration_ms + self.repeat_delay_ms;
        if t <= 0.0 || cycle <= 0.0 {
            return 0;
        }
        let iteration = (t / cycle).floor() as u32;
        match self.repeat {
            Repeat::Count(n) => iteration.min(n),
            Repeat::Infinite => iteration,
        }
    }

    /// Current value
    pub fn value(&self) -> T {
        self.sample_at(self.elapsed_ms)
    }

    /// Advance the animation by delta time (in milliseconds)
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.playing {
            return;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        if self.is_finished() {
            self.playing = false;
        }
    }

    /// Value at `elapsed_ms` since start (delay included)
    pub fn sample_at(&self, elapsed_ms: f32) -> T {
        let t = elapsed_ms - self.delay_ms;
        if t <= 0.0 || self.values.len() == 1 {
            return self.values[0].clone();
        }

        if self.duration_ms <= 0.0 {
            let last = match self.repeat {
                Repeat::Count(n) => n,
                Repeat::Infinite => 0,
            };
            return self.sample_iteration(last, 1.0);
        }

        if let Some(active) = self.active_duration_ms() {
            if t >= active {
                let last = self.iteration_at(elapsed_ms);
                return self.sample_iteration(last, 1.0);
            }
        }

        let cycle = self.duration_ms + self.repeat_delay_ms;
        let iteration = (t / cycle).floor();
        let local = t - iteration * cycle;
        // Inside a repeat delay the iteration holds its end value
        let progress = (local / self.duration_ms).min(1.0);

        self.sample_iteration(iteration as u32, progress)
    }

    fn sample_iteration(&self, iteration: u32, progress: f32) -> T {
        let odd = iteration % 2 == 1;
        match (self.repeat_type, odd) {
            (RepeatType::Reverse, true) => self.interpolate(1.0 - progress, false),
            (RepeatType::Mirror, true) => self.interpolate(progress, true),
            _ => self.interpolate(progress, false),
        }
    }

    fn value_at(&self, index: usize, mirrored: bool) -> &T {
        if mirrored {
            &self.values[self.values.len() - 1 - index]
        } else {
            &self.values[index]
        }
    }

    fn time_at(&self, index: usize, mirrored: bool) -> f32 {
        if mirrored {
            1.0 - self.times[self.times.len() - 1 - index]
        } else {
            self.times[index]
        }
    }

    fn easing_at(&self, segment: usize, mirrored: bool) -> Easing {
        let segments = self.values.len() - 1;
        let index = if mirrored {
            segments - 1 - segment
        } else {
            segment
        };
        self.easings[index % self.easings.len()]
    }

    fn interpolate(&self, progress: f32, mirrored: bool) -> T {
        let last = self.values.len() - 1;
        let progress = progress.clamp(0.0, 1.0);

        if progress <= self.time_at(0, mirrored) {
            return self.value_at(0, mirrored).clone();
        }

        for segment in 0..last {
            let t0 = self.time_at(segment, mirrored);
            let t1 = self.time_at(segment + 1, mirrored);
            if progress <= t1 {
                let from = self.value_at(segment, mirrored);
                let to = self.value_at(segment + 1, mirrored);
                let span = t1 - t0;
                if span <= f32::EPSILON {
                    return to.clone();
                }
                let local = (progress - t0) / span;
                let eased = self.easing_at(segment, mirrored).apply(local);
                return from.interpolate(to, eased);
            }
        }

        self.value_at(last, mirrored).clone()
    }
}

fn even_times(count: usize) -> Vec<f32> {
    if count <= 1 {
        return vec![0.0; count];
    }
    (0..count)
        .map(|i| i as f32 / (count - 1) as f32)
        .collect()
}
