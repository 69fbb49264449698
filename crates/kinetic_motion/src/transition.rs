//! Transitions
//!
//! A [`Transition`] is literal timing: what kind of animation drives a value
//! (tween or spring), when it starts, and how it repeats. Fields left unset
//! fall back to per-property defaults when resolved with
//! [`Transition::driver_for`]:
//!
//! | property                  | keyframes | driver                          |
//! |---------------------------|-----------|---------------------------------|
//! | any                       | > 2       | 800ms tween, ease-in-out        |
//! | x, y, scale, rotate       | ≤ 2       | spring 500 / 25                 |
//! | scaleX, scaleY            | ≤ 2       | critically damped spring 550    |
//! | opacity, colors, others   | ≤ 2       | 300ms tween, (0.25, 0.1, 0.35, 1) |

use crate::props::Property;
use indexmap::IndexMap;
use kinetic_animation::{Easing, Repeat, RepeatType, SpringConfig};
use smallvec::{smallvec, SmallVec};

/// Tween duration when a tween is requested without one
pub const DEFAULT_TWEEN_MS: f32 = 300.0;

/// Tween duration for unspecified keyframe sequences
pub const DEFAULT_KEYFRAMES_MS: f32 = 800.0;

/// Bounce spring used by drag release when none is configured
pub const DEFAULT_BOUNCE: SpringConfig = SpringConfig::new(500.0, 10.0, 1.0);

/// Concrete animation driver chosen for one property
#[derive(Clone, Debug, PartialEq)]
pub enum Driver {
    Tween {
        duration_ms: f32,
        easings: SmallVec<[Easing; 2]>,
    },
    Spring(SpringConfig),
}

/// Literal animation timing
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transition {
    pub duration_ms: Option<f32>,
    /// Easing for all segments, or one per segment
    pub ease: SmallVec<[Easing; 2]>,
    pub spring: Option<SpringConfig>,
    pub delay_ms: f32,
    pub repeat: Repeat,
    pub repeat_type: RepeatType,
    pub repeat_delay_ms: f32,
    /// Keyframe offsets (0.0 to 1.0)
    pub times: Option<Vec<f32>>,
    /// Orchestration: delay between consecutive children
    pub stagger_children_ms: f32,
    /// Orchestration: delay before the first child
    pub delay_children_ms: f32,
    /// Spring used when a drag release bounces off its constraints
    pub bounce: Option<SpringConfig>,
}

impl Transition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tween(duration_ms: f32) -> Self {
        Self::default().duration(duration_ms)
    }

    pub fn spring(stiffness: f32, damping: f32) -> Self {
        Self {
            spring: Some(SpringConfig::new(stiffness, damping, 1.0)),
            ..Self::default()
        }
    }

    pub fn duration(mut self, duration_ms: f32) -> Self {
        self.duration_ms = Some(duration_ms.max(0.0));
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.ease = smallvec![easing];
        self
    }

    pub fn ease_segments(mut self, easings: &[Easing]) -> Self {
        self.ease = easings.iter().copied().collect();
        self
    }

    pub fn delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn repeat_type(mut self, repeat_type: RepeatType) -> Self {
        self.repeat_type = repeat_type;
        self
    }

    pub fn repeat_delay(mut self, repeat_delay_ms: f32) -> Self {
        self.repeat_delay_ms = repeat_delay_ms.max(0.0);
        self
    }

    pub fn times(mut self, times: Vec<f32>) -> Self {
        self.times = Some(times);
        self
    }

    pub fn stagger_children(mut self, stagger_ms: f32) -> Self {
        self.stagger_children_ms = stagger_ms.max(0.0);
        self
    }

    pub fn delay_children(mut self, delay_ms: f32) -> Self {
        self.delay_children_ms = delay_ms.max(0.0);
        self
    }

    pub fn bounce(mut self, stiffness: f32, damping: f32) -> Self {
        self.bounce = Some(SpringConfig::new(stiffness, damping, 1.0));
        self
    }

    /// Whether this transition names its own driver (duration, ease or spring)
    pub fn specifies_kind(&self) -> bool {
        self.duration_ms.is_some() || !self.ease.is_empty() || self.spring.is_some()
    }

    pub fn bounce_config(&self) -> SpringConfig {
        self.bounce.unwrap_or(DEFAULT_BOUNCE)
    }

    /// Resolve the driver for `property` animating through `keyframes` values
    pub fn driver_for(&self, property: Property, keyframes: usize) -> Driver {
        if let Some(spring) = self.spring {
            if keyframes <= 2 && !property.is_color() {
                return Driver::Spring(spring);
            }
        }

        if self.specifies_kind() {
            let easings = if self.ease.is_empty() {
                smallvec![Easing::EaseInOut]
            } else {
                self.ease.clone()
            };
            let duration_ms = match (self.duration_ms, keyframes > 2) {
                (Some(duration), _) => duration,
                (None, true) => DEFAULT_KEYFRAMES_MS,
                (None, false) => DEFAULT_TWEEN_MS,
            };
            return Driver::Tween {
                duration_ms,
                easings,
            };
        }

        default_driver(property, keyframes)
    }
}

fn default_driver(property: Property, keyframes: usize) -> Driver {
    if keyframes > 2 {
        return Driver::Tween {
            duration_ms: DEFAULT_KEYFRAMES_MS,
            easings: smallvec![Easing::EaseInOut],
        };
    }
    match property {
        Property::ScaleX | Property::ScaleY => Driver::Spring(SpringConfig::critically_damped(550.0)),
        p if p.is_transform() => Driver::Spring(SpringConfig::snappy()),
        _ => Driver::Tween {
            duration_ms: DEFAULT_TWEEN_MS,
            easings: smallvec![Easing::TWEEN_DEFAULT],
        },
    }
}

/// A default transition plus per-property overrides
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionMap {
    default: Transition,
    overrides: IndexMap<Property, Transition>,
}

impl TransitionMap {
    pub fn new(default: Transition) -> Self {
        Self {
            default,
            overrides: IndexMap::new(),
        }
    }

    pub fn with_override(mut self, property: Property, transition: Transition) -> Self {
        self.overrides.insert(property, transition);
        self
    }

    /// Transition for one property
    pub fn for_property(&self, property: Property) -> &Transition {
        self.overrides.get(&property).unwrap_or(&self.default)
    }

    /// The default transition; carries orchestration settings
    pub fn default_transition(&self) -> &Transition {
        &self.default
    }
}

impl From<Transition> for TransitionMap {
    fn from(default: Transition) -> Self {
        Self::new(default)
    }
}
