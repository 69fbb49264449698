//! Spring physics
//!
//! Damped harmonic oscillator integrated with RK4. Springs are retargetable:
//! changing the target keeps the current velocity, so interrupted motion
//! stays continuous.

/// Largest integration step (seconds); longer frames are sub-stepped
const MAX_STEP: f32 = 1.0 / 240.0;

/// Spring configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Quick and slightly bouncy; the default for transform properties
    pub const fn snappy() -> Self {
        Self::new(500.0, 25.0, 1.0)
    }

    /// Stiff spring with minimal overshoot
    pub const fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// Soft, slow spring
    pub const fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// Low damping, visible oscillation
    pub const fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// Spring with damping ratio exactly 1 (fastest approach without overshoot)
    pub fn critically_damped(stiffness: f32) -> Self {
        Self::new(stiffness, 2.0 * stiffness.sqrt(), 1.0)
    }

    /// ζ = c / (2·√(k·m)); below 1 the spring overshoots
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::snappy()
    }
}

/// A single animated spring value
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    rest_speed: f32,
    rest_delta: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            rest_speed: 0.01,
            rest_delta: 0.005,
        }
    }

    /// Builder: set the target
    pub fn with_target(mut self, target: f32) -> Self {
        self.target = target;
        self
    }

    /// Builder: set the initial velocity (units per second)
    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: thresholds below which the spring counts as settled
    pub fn with_rest_thresholds(mut self, rest_speed: f32, rest_delta: f32) -> Self {
        self.rest_speed = rest_speed;
        self.rest_delta = rest_delta;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Retarget without resetting velocity
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to a value and stop
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        self.velocity.abs() <= self.rest_speed && (self.target - self.value).abs() <= self.rest_delta
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 || self.is_settled() {
            if self.is_settled() {
                self.value = self.target;
                self.velocity = 0.0;
            }
            return;
        }

        let steps = (dt / MAX_STEP).ceil().max(1.0) as u32;
        let h = dt / steps as f32;
        for _ in 0..steps {
            self.rk4(h);
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }

    fn rk4(&mut self, h: f32) {
        let (x, v) = (self.value, self.velocity);

        let k1x = v;
        let k1v = self.acceleration(x, v);

        let k2x = v + 0.5 * h * k1v;
        let k2v = self.acceleration(x + 0.5 * h * k1x, k2x);

        let k3x = v + 0.5 * h * k2v;
        let k3v = self.acceleration(x + 0.5 * h * k2x, k3x);

        let k4x = v + h * k3v;
        let k4v = self.acceleration(x + h * k3x, k4x);

        self.value = x + h / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        self.velocity = v + h / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(spring: &mut Spring, seconds: f32) -> (f32, f32) {
        let mut max = spring.value();
        let mut min = spring.value();
        let frames = (seconds * 60.0) as usize;
        for _ in 0..frames {
            spring.step(1.0 / 60.0);
            max = max.max(spring.value());
            min = min.min(spring.value());
        }
        (min, max)
    }

    #[test]
    fn test_settles_at_target() {
        let mut spring = Spring::new(SpringConfig::snappy(), 0.0).with_target(100.0);
        run(&mut spring, 3.0);
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 100.0);
    }

    #[test]
    fn test_underdamped_overshoots() {
        let config = SpringConfig::new(600.0, 20.0, 1.0);
        assert!(config.damping_ratio() < 1.0);

        let mut spring = Spring::new(config, 0.0).with_target(1.0);
        let (_, max) = run(&mut spring, 2.0);
        assert!(max > 1.05, "expected overshoot, max was {max}");
    }

    #[test]
    fn test_critically_damped_does_not_overshoot() {
        let config = SpringConfig::critically_damped(550.0);
        assert!((config.damping_ratio() - 1.0).abs() < 1e-5);

        let mut spring = Spring::new(config, 0.0).with_target(1.0);
        let (_, max) = run(&mut spring, 2.0);
        assert!(max <= 1.0 + 1e-3, "max was {max}");
    }

    #[test]
    fn test_retarget_keeps_velocity() {
        let mut spring = Spring::new(SpringConfig::snappy(), 0.0).with_target(100.0);
        spring.step(0.05);
        let v = spring.velocity();
        assert!(v > 0.0);

        spring.set_target(-100.0);
        assert_eq!(spring.velocity(), v);
    }

    #[test]
    fn test_large_frame_is_stable() {
        let mut spring = Spring::new(SpringConfig::new(1000.0, 10.0, 1.0), 0.0).with_target(1.0);
        spring.step(0.5);
        assert!(spring.value().is_finite());
        assert!(spring.value().abs() < 10.0);
    }
}
