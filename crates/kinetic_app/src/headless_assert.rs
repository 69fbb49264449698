//! Assertion helpers for headless scenarios.

use crate::headless_scenario::ExpectedValue;
use kinetic_motion::{GestureState, Property, SceneSnapshot, SnapshotValue};
use kinetic_paint::Color;

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }

    fn missing(id: &str) -> Self {
        Self::failed("missing_element", format!("{id}: element not found"))
    }
}

pub fn evaluate_assert_exists(id: &str, snapshot: &SceneSnapshot) -> AssertionResult {
    if snapshot.element(id).is_some() {
        AssertionResult::Passed
    } else {
        AssertionResult::missing(id)
    }
}

pub fn evaluate_assert_text_contains(
    id: &str,
    expected: &str,
    snapshot: &SceneSnapshot,
) -> AssertionResult {
    let Some(element) = snapshot.element(id) else {
        return AssertionResult::missing(id);
    };
    let Some(text) = element.text.as_deref() else {
        return AssertionResult::failed("missing_text", format!("{id}: text not available"));
    };
    if text.contains(expected) {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "text_mismatch",
            format!("{id}: expected substring '{expected}', got '{text}'"),
        )
    }
}

fn number_of(id: &str, property: Property, snapshot: &SceneSnapshot) -> Result<f32, AssertionResult> {
    let element = snapshot.element(id).ok_or_else(|| AssertionResult::missing(id))?;
    match element.values.get(&property) {
        Some(SnapshotValue::Number(n)) => Ok(*n),
        Some(SnapshotValue::Color(_)) => Err(AssertionResult::failed(
            "value_kind",
            format!("{id}: {property} is a color"),
        )),
        // Never animated: reports the resting default
        None if !property.is_color() => Ok(property.default_number()),
        None => Err(AssertionResult::failed(
            "missing_value",
            format!("{id}: {property} not available"),
        )),
    }
}

pub fn evaluate_assert_value(
    id: &str,
    property: Property,
    expected: &ExpectedValue,
    tolerance: f32,
    snapshot: &SceneSnapshot,
) -> AssertionResult {
    match expected {
        ExpectedValue::Number(want) => match number_of(id, property, snapshot) {
            Ok(got) if (got - want).abs() <= tolerance => AssertionResult::Passed,
            Ok(got) => AssertionResult::failed(
                "value_mismatch",
                format!("{id}: expected {property} = {want} (±{tolerance}), got {got}"),
            ),
            Err(failure) => failure,
        },
        ExpectedValue::Color(text) => {
            let want = match Color::parse(text) {
                Ok(color) => color,
                Err(err) => return AssertionResult::failed("invalid_expectation", err.to_string()),
            };
            let Some(element) = snapshot.element(id) else {
                return AssertionResult::missing(id);
            };
            let Some(SnapshotValue::Color(got)) = element.values.get(&property) else {
                return AssertionResult::failed(
                    "missing_value",
                    format!("{id}: {property} has no color value"),
                );
            };
            let matches = Color::parse(got)
                .map(|got| color_close(got, want, tolerance))
                .unwrap_or(false);
            if matches {
                AssertionResult::Passed
            } else {
                AssertionResult::failed(
                    "value_mismatch",
                    format!("{id}: expected {property} = {text}, got {got}"),
                )
            }
        }
    }
}

/// Channels compared in 0-255 units, alpha in 0-1
fn color_close(a: Color, b: Color, tolerance: f32) -> bool {
    let channel_tolerance = (tolerance * 255.0).max(1.0);
    let [ar, ag, ab, _] = a.to_rgba8();
    let [br, bg, bb, _] = b.to_rgba8();
    [(ar, br), (ag, bg), (ab, bb)]
        .iter()
        .all(|&(x, y)| (x as f32 - y as f32).abs() <= channel_tolerance)
        && (a.a - b.a).abs() <= tolerance.max(1.0 / 255.0)
}

pub fn evaluate_assert_range(
    id: &str,
    property: Property,
    min: f32,
    max: f32,
    snapshot: &SceneSnapshot,
) -> AssertionResult {
    match number_of(id, property, snapshot) {
        Ok(got) if (min..=max).contains(&got) => AssertionResult::Passed,
        Ok(got) => AssertionResult::failed(
            "out_of_range",
            format!("{id}: {property} = {got} outside [{min}, {max}]"),
        ),
        Err(failure) => failure,
    }
}

pub fn evaluate_assert_gesture(
    id: &str,
    expected: GestureState,
    snapshot: &SceneSnapshot,
) -> AssertionResult {
    let Some(element) = snapshot.element(id) else {
        return AssertionResult::missing(id);
    };
    match element.gesture {
        Some(state) if state == expected => AssertionResult::Passed,
        Some(state) => AssertionResult::failed(
            "gesture_mismatch",
            format!("{id}: expected {}, got {}", expected.name(), state.name()),
        ),
        None => AssertionResult::failed("no_gestures", format!("{id}: element has no gestures")),
    }
}

pub fn evaluate_assert_in_view(id: &str, expected: bool, snapshot: &SceneSnapshot) -> AssertionResult {
    let Some(element) = snapshot.element(id) else {
        return AssertionResult::missing(id);
    };
    match element.in_view {
        Some(in_view) if in_view == expected => AssertionResult::Passed,
        Some(in_view) => AssertionResult::failed(
            "in_view_mismatch",
            format!("{id}: expected in view = {expected}, got {in_view}"),
        ),
        None => AssertionResult::failed("not_observed", format!("{id}: element is not observed")),
    }
}

pub fn evaluate_assert_scroll_progress(
    expected: f32,
    tolerance: f32,
    snapshot: &SceneSnapshot,
) -> AssertionResult {
    let got = snapshot.scroll.progress;
    if (got - expected).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "scroll_mismatch",
            format!("expected scroll progress {expected} (±{tolerance}), got {got}"),
        )
    }
}

pub fn evaluate_assert_scroll_binding(
    id: &str,
    property: Property,
    tolerance: f32,
    snapshot: &SceneSnapshot,
) -> AssertionResult {
    let progress = snapshot.scroll.progress;
    match number_of(id, property, snapshot) {
        Ok(got) if (got - progress).abs() <= tolerance => AssertionResult::Passed,
        Ok(got) => AssertionResult::failed(
            "binding_mismatch",
            format!("{id}: {property} = {got}, scroll progress = {progress}"),
        ),
        Err(failure) => failure,
    }
}

pub fn evaluate_assert_animating(id: &str, expected: bool, snapshot: &SceneSnapshot) -> AssertionResult {
    let Some(element) = snapshot.element(id) else {
        return AssertionResult::missing(id);
    };
    if element.animating == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "animating_mismatch",
            format!("{id}: expected animating = {expected}, got {}", element.animating),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_core::Size;
    use kinetic_motion::{MotionNode, MotionScene, Target};
    use taffy::prelude::{Dimension, Style};

    fn snapshot() -> SceneSnapshot {
        let root = MotionNode::container("root").child(
            MotionNode::button("button", "Subscribe")
                .style(Style {
                    size: taffy::Size {
                        width: Dimension::Length(100.0),
                        height: Dimension::Length(40.0),
                    },
                    ..Default::default()
                })
                .background(Color::from_hex(0x059669))
                .initial(Target::new().opacity(0.5).background_color(Color::from_hex(0x059669)))
                .while_hover(Target::new().scale(1.1)),
        );
        MotionScene::mount(root, Size::new(200.0, 100.0))
            .unwrap()
            .snapshot()
    }

    #[test]
    fn test_exists_and_text() {
        let snapshot = snapshot();
        assert_eq!(evaluate_assert_exists("button", &snapshot), AssertionResult::Passed);
        assert!(matches!(
            evaluate_assert_exists("nope", &snapshot),
            AssertionResult::Failed { code, .. } if code == "missing_element"
        ));
        assert_eq!(
            evaluate_assert_text_contains("button", "Sub", &snapshot),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_assert_text_contains("root", "Sub", &snapshot),
            AssertionResult::Failed { code, .. } if code == "missing_text"
        ));
    }

    #[test]
    fn test_numeric_values_and_defaults() {
        let snapshot = snapshot();
        let half = ExpectedValue::Number(0.5);
        assert_eq!(
            evaluate_assert_value("button", Property::Opacity, &half, 0.01, &snapshot),
            AssertionResult::Passed
        );
        // scale was never set: resting default
        assert_eq!(
            evaluate_assert_range("button", Property::Scale, 1.0, 1.0, &snapshot),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_assert_range("button", Property::Opacity, 0.9, 1.0, &snapshot),
            AssertionResult::Failed { code, .. } if code == "out_of_range"
        ));
    }

    #[test]
    fn test_color_values() {
        let snapshot = snapshot();
        let emerald = ExpectedValue::Color("#059669".to_string());
        assert_eq!(
            evaluate_assert_value("button", Property::BackgroundColor, &emerald, 0.01, &snapshot),
            AssertionResult::Passed
        );
        let gray = ExpectedValue::Color("#d1d5db".to_string());
        assert!(matches!(
            evaluate_assert_value("button", Property::BackgroundColor, &gray, 0.01, &snapshot),
            AssertionResult::Failed { code, .. } if code == "value_mismatch"
        ));
    }

    #[test]
    fn test_gesture_state() {
        let snapshot = snapshot();
        assert_eq!(
            evaluate_assert_gesture("button", GestureState::Idle, &snapshot),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_assert_gesture("root", GestureState::Idle, &snapshot),
            AssertionResult::Failed { code, .. } if code == "no_gestures"
        ));
    }
}
