//! Inertia (momentum decay)
//!
//! After a gesture ends, the value keeps moving with the release velocity
//! and decays exponentially toward a projected resting point:
//!
//! ```text
//! amplitude = power × velocity
//! target    = origin + amplitude
//! value(t)  = target − amplitude × e^(−t / time_constant)
//! ```

/// Inertia tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InertiaConfig {
    /// Fraction of the release velocity (units/s) turned into travel distance
    pub power: f32,
    /// Decay time constant in milliseconds
    pub time_constant_ms: f32,
    /// Distance from the projected target at which the motion stops
    pub rest_delta: f32,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            power: 0.8,
            time_constant_ms: 700.0,
            rest_delta: 0.5,
        }
    }
}

/// A running inertia animation
#[derive(Clone, Debug)]
pub struct Inertia {
    config: InertiaConfig,
    origin: f32,
    amplitude: f32,
    elapsed_ms: f32,
}

impl Inertia {
    pub fn new(config: InertiaConfig, origin: f32, velocity: f32) -> Self {
        Self {
            config,
            origin,
            amplitude: config.power * velocity,
            elapsed_ms: 0.0,
        }
    }

    /// Where the motion will come to rest
    pub fn target(&self) -> f32 {
        self.origin + self.amplitude
    }

    /// Value after `elapsed_ms`
    pub fn sample_at(&self, elapsed_ms: f32) -> f32 {
        let decay = (-elapsed_ms / self.config.time_constant_ms).exp();
        self.target() - self.amplitude * decay
    }

    /// Velocity (units per second) after `elapsed_ms`
    pub fn velocity_at(&self, elapsed_ms: f32) -> f32 {
        let decay = (-elapsed_ms / self.config.time_constant_ms).exp();
        self.amplitude * decay * 1000.0 / self.config.time_constant_ms
    }

    pub fn value(&self) -> f32 {
        if self.is_finished() {
            self.target()
        } else {
            self.sample_at(self.elapsed_ms)
        }
    }

    pub fn velocity(&self) -> f32 {
        if self.is_finished() {
            0.0
        } else {
            self.velocity_at(self.elapsed_ms)
        }
    }

    pub fn tick(&mut self, dt_ms: f32) {
        self.elapsed_ms += dt_ms.max(0.0);
    }

    pub fn is_finished(&self) -> bool {
        (self.target() - self.sample_at(self.elapsed_ms)).abs() <= self.config.rest_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projects_with_power() {
        let inertia = Inertia::new(InertiaConfig::default(), 10.0, 100.0);
        assert!((inertia.target() - 90.0).abs() < 1e-4);
        assert_eq!(inertia.sample_at(0.0), 10.0);
    }

    #[test]
    fn test_decays_monotonically_and_finishes() {
        let mut inertia = Inertia::new(InertiaConfig::default(), 0.0, 500.0);
        let mut last = inertia.value();
        for _ in 0..400 {
            inertia.tick(16.0);
            assert!(inertia.value() >= last);
            last = inertia.value();
        }
        assert!(inertia.is_finished());
        assert_eq!(inertia.value(), inertia.target());
        assert_eq!(inertia.velocity(), 0.0);
    }

    #[test]
    fn test_zero_velocity_is_finished() {
        let inertia = Inertia::new(InertiaConfig::default(), 5.0, 0.0);
        assert!(inertia.is_finished());
        assert_eq!(inertia.value(), 5.0);
    }
}
