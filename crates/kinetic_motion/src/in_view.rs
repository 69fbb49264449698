//! Viewport intersection
//!
//! An [`InViewObserver`] compares an element's rect with the (optionally
//! grown or shrunk) viewport and reports when its visibility changes. With
//! `once`, the first entry latches: the element stays "in view" and nothing
//! is reported again.

use kinetic_core::Rect;

/// How much of the element must be visible
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum InViewAmount {
    /// Any overlapping pixel
    #[default]
    Some,
    /// The whole element
    All,
    /// At least this fraction of the element's area
    Fraction(f32),
}

impl InViewAmount {
    fn threshold(self) -> f32 {
        match self {
            InViewAmount::Some => 0.0,
            InViewAmount::All => 1.0,
            InViewAmount::Fraction(f) => f.clamp(0.0, 1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InViewOptions {
    pub once: bool,
    pub amount: InViewAmount,
    /// Pixels added to every side of the viewport (negative shrinks it)
    pub margin: f32,
}

impl InViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger on first entry only
    pub fn once() -> Self {
        Self {
            once: true,
            ..Self::default()
        }
    }

    pub fn amount(mut self, amount: InViewAmount) -> Self {
        self.amount = amount;
        self
    }

    pub fn margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }
}

/// Fraction of `target` covered by `root`
pub fn intersection_ratio(target: &Rect, root: &Rect) -> f32 {
    let area = target.area();
    if area <= 0.0 {
        return 0.0;
    }
    target
        .intersection(root)
        .map_or(0.0, |overlap| (overlap.area() / area).clamp(0.0, 1.0))
}

/// Tracks whether one element is in view
#[derive(Clone, Debug, Default)]
pub struct InViewObserver {
    options: InViewOptions,
    in_view: bool,
    latched: bool,
}

impl InViewObserver {
    pub fn new(options: InViewOptions) -> Self {
        Self {
            options,
            in_view: false,
            latched: false,
        }
    }

    pub fn options(&self) -> InViewOptions {
        self.options
    }

    pub fn is_in_view(&self) -> bool {
        self.in_view
    }

    /// Re-evaluate against the viewport; returns the new state if it changed
    pub fn update(&mut self, target: Rect, viewport: Rect) -> Option<bool> {
        if self.latched {
            return None;
        }

        let root = viewport.expand(self.options.margin);
        let ratio = intersection_ratio(&target, &root);
        let threshold = self.options.amount.threshold();
        let visible = if threshold <= 0.0 {
            ratio > 0.0
        } else {
            ratio >= threshold - f32::EPSILON
        };

        if visible == self.in_view {
            return None;
        }
        self.in_view = visible;
        if visible && self.options.once {
            self.latched = true;
        }
        Some(visible)
    }
}
