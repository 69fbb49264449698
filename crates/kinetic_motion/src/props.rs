//! Animatable properties and declarative targets

use crate::error::MotionError;
use crate::transition::TransitionMap;
use indexmap::IndexMap;
use kinetic_paint::Color;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// A visual property an element can animate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    Opacity,
    X,
    Y,
    Scale,
    ScaleX,
    ScaleY,
    /// Degrees
    Rotate,
    /// Percent of the element size
    BorderRadius,
    /// Drawn fraction of a path stroke (0.0 to 1.0)
    PathLength,
    Fill,
    BackgroundColor,
    #[serde(rename = "color")]
    TextColor,
}

impl Property {
    pub const ALL: [Property; 12] = [
        Property::Opacity,
        Property::X,
        Property::Y,
        Property::Scale,
        Property::ScaleX,
        Property::ScaleY,
        Property::Rotate,
        Property::BorderRadius,
        Property::PathLength,
        Property::Fill,
        Property::BackgroundColor,
        Property::TextColor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Property::Opacity => "opacity",
            Property::X => "x",
            Property::Y => "y",
            Property::Scale => "scale",
            Property::ScaleX => "scaleX",
            Property::ScaleY => "scaleY",
            Property::Rotate => "rotate",
            Property::BorderRadius => "borderRadius",
            Property::PathLength => "pathLength",
            Property::Fill => "fill",
            Property::BackgroundColor => "backgroundColor",
            Property::TextColor => "color",
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(
            self,
            Property::Fill | Property::BackgroundColor | Property::TextColor
        )
    }

    /// Transform components (translate, scale, rotate)
    pub fn is_transform(&self) -> bool {
        matches!(
            self,
            Property::X
                | Property::Y
                | Property::Scale
                | Property::ScaleX
                | Property::ScaleY
                | Property::Rotate
        )
    }

    /// Resting value for numeric properties
    pub fn default_number(&self) -> f32 {
        match self {
            Property::Opacity
            | Property::Scale
            | Property::ScaleX
            | Property::ScaleY
            | Property::PathLength => 1.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| MotionError::UnknownProperty(s.to_string()))
    }
}

/// A concrete property value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropValue {
    Number(f32),
    Color(Color),
}

impl PropValue {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PropValue::Number(n) => Some(*n),
            PropValue::Color(_) => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            PropValue::Color(c) => Some(*c),
            PropValue::Number(_) => None,
        }
    }
}

impl From<f32> for PropValue {
    fn from(value: f32) -> Self {
        PropValue::Number(value)
    }
}

impl From<Color> for PropValue {
    fn from(value: Color) -> Self {
        PropValue::Color(value)
    }
}

/// Either a single end value or a full keyframe list
#[derive(Clone, Debug, PartialEq)]
pub enum TargetValue {
    Single(PropValue),
    Keyframes(SmallVec<[PropValue; 4]>),
}

impl TargetValue {
    /// Numeric keyframes
    pub fn keyframes(values: impl IntoIterator<Item = f32>) -> Self {
        TargetValue::Keyframes(values.into_iter().map(PropValue::Number).collect())
    }

    pub fn color_keyframes(values: impl IntoIterator<Item = Color>) -> Self {
        TargetValue::Keyframes(values.into_iter().map(PropValue::Color).collect())
    }

    /// The value this target comes to rest at
    pub fn last(&self) -> Option<PropValue> {
        match self {
            TargetValue::Single(v) => Some(*v),
            TargetValue::Keyframes(values) => values.last().copied(),
        }
    }
}

impl From<PropValue> for TargetValue {
    fn from(value: PropValue) -> Self {
        TargetValue::Single(value)
    }
}

impl From<f32> for TargetValue {
    fn from(value: f32) -> Self {
        TargetValue::Single(PropValue::Number(value))
    }
}

impl From<Color> for TargetValue {
    fn from(value: Color) -> Self {
        TargetValue::Single(PropValue::Color(value))
    }
}

/// A set of property targets, optionally with its own transition
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Target {
    values: IndexMap<Property, TargetValue>,
    transition: Option<TransitionMap>,
}

impl Target {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, property: Property, value: impl Into<TargetValue>) -> Self {
        self.values.insert(property, value.into());
        self
    }

    pub fn keyframes(self, property: Property, values: impl IntoIterator<Item = f32>) -> Self {
        self.set(property, TargetValue::keyframes(values))
    }

    pub fn opacity(self, value: f32) -> Self {
        self.set(Property::Opacity, value)
    }

    pub fn x(self, value: f32) -> Self {
        self.set(Property::X, value)
    }

    pub fn y(self, value: f32) -> Self {
        self.set(Property::Y, value)
    }

    pub fn scale(self, value: f32) -> Self {
        self.set(Property::Scale, value)
    }

    pub fn path_length(self, value: f32) -> Self {
        self.set(Property::PathLength, value)
    }

    pub fn fill(self, color: Color) -> Self {
        self.set(Property::Fill, color)
    }

    pub fn background_color(self, color: Color) -> Self {
        self.set(Property::BackgroundColor, color)
    }

    pub fn text_color(self, color: Color) -> Self {
        self.set(Property::TextColor, color)
    }

    /// Transition used when animating to this target (overrides the element's)
    pub fn with_transition(mut self, transition: impl Into<TransitionMap>) -> Self {
        self.transition = Some(transition.into());
        self
    }

    pub fn get(&self, property: Property) -> Option<&TargetValue> {
        self.values.get(&property)
    }

    pub fn transition(&self) -> Option<&TransitionMap> {
        self.transition.as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, &TargetValue)> {
        self.values.iter().map(|(p, v)| (*p, v))
    }

    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.values.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_names_round_trip() {
        for property in Property::ALL {
            assert_eq!(property.name().parse::<Property>().ok(), Some(property));
        }
        assert!("skew".parse::<Property>().is_err());
    }

    #[test]
    fn test_property_classes() {
        assert!(Property::ScaleY.is_transform());
        assert!(!Property::Opacity.is_transform());
        assert!(Property::BackgroundColor.is_color());
        assert_eq!(Property::Scale.default_number(), 1.0);
        assert_eq!(Property::Rotate.default_number(), 0.0);
    }

    #[test]
    fn test_target_keeps_declaration_order() {
        let target = Target::new()
            .keyframes(Property::Scale, [1.0, 2.0, 2.0, 1.0])
            .keyframes(Property::Rotate, [0.0, 90.0, 90.0, 0.0])
            .opacity(1.0);

        let order: Vec<_> = target.properties().collect();
        assert_eq!(order, vec![Property::Scale, Property::Rotate, Property::Opacity]);
        assert_eq!(
            target.get(Property::Scale).and_then(TargetValue::last),
            Some(PropValue::Number(1.0))
        );
    }
}
