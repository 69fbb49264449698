//! Scenario definition for headless page runs.

use anyhow::Result;
use kinetic_motion::{GestureState, Property};
use serde::Deserialize;
use std::path::Path;

/// Sequence of headless steps.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Scenario covering the page's acceptance properties.
    pub fn acceptance() -> Result<Self> {
        Self::from_json(ACCEPTANCE_SCENARIO)
    }
}

/// Built-in acceptance scenario.
pub const ACCEPTANCE_SCENARIO: &str = include_str!("../scenarios/acceptance.json");

/// Expected property value: a number or CSS color text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExpectedValue {
    Number(f32),
    Color(String),
}

fn default_tolerance() -> f32 {
    0.01
}

fn default_drag_steps() -> u32 {
    10
}

/// Steps: time, input, and assertions against the latest scene.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Wait {
        ms: u64,
    },
    Tick {
        frames: u32,
    },
    ScrollTo {
        y: f32,
    },
    ScrollBy {
        dy: f32,
    },
    /// Viewport coordinates
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerDown {
        x: f32,
        y: f32,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    /// Move the pointer to the element's center
    Hover {
        id: String,
    },
    /// Move the pointer off the page
    Unhover,
    /// Press at the element's center, move by (dx, dy) over `steps` frames, release
    Drag {
        id: String,
        dx: f32,
        dy: f32,
        #[serde(default = "default_drag_steps")]
        steps: u32,
    },
    Resize {
        width: u32,
        height: u32,
    },
    AssertExists {
        id: String,
    },
    AssertTextContains {
        id: String,
        value: String,
    },
    AssertValue {
        id: String,
        property: Property,
        value: ExpectedValue,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    AssertRange {
        id: String,
        property: Property,
        min: f32,
        max: f32,
    },
    AssertGesture {
        id: String,
        state: GestureState,
    },
    AssertInView {
        id: String,
        value: bool,
    },
    /// Scroll progress as a fraction
    AssertScrollProgress {
        value: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    /// Property equals the current scroll progress
    AssertScrollBinding {
        id: String,
        property: Property,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    AssertAnimating {
        id: String,
        value: bool,
    },
    /// Keep checking a range on every probe for the rest of the run
    WatchRange {
        id: String,
        property: Property,
        min: f32,
        max: f32,
    },
}

impl ScenarioStep {
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::Wait { .. } => "wait",
            ScenarioStep::Tick { .. } => "tick",
            ScenarioStep::ScrollTo { .. } => "scroll_to",
            ScenarioStep::ScrollBy { .. } => "scroll_by",
            ScenarioStep::PointerMove { .. } => "pointer_move",
            ScenarioStep::PointerDown { .. } => "pointer_down",
            ScenarioStep::PointerUp { .. } => "pointer_up",
            ScenarioStep::Hover { .. } => "hover",
            ScenarioStep::Unhover => "unhover",
            ScenarioStep::Drag { .. } => "drag",
            ScenarioStep::Resize { .. } => "resize",
            ScenarioStep::AssertExists { .. } => "assert_exists",
            ScenarioStep::AssertTextContains { .. } => "assert_text_contains",
            ScenarioStep::AssertValue { .. } => "assert_value",
            ScenarioStep::AssertRange { .. } => "assert_range",
            ScenarioStep::AssertGesture { .. } => "assert_gesture",
            ScenarioStep::AssertInView { .. } => "assert_in_view",
            ScenarioStep::AssertScrollProgress { .. } => "assert_scroll_progress",
            ScenarioStep::AssertScrollBinding { .. } => "assert_scroll_binding",
            ScenarioStep::AssertAnimating { .. } => "assert_animating",
            ScenarioStep::WatchRange { .. } => "watch_range",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_every_step_shape() {
        let scenario = HeadlessScenario::from_json(
            r##"{
                "name": "shapes",
                "steps": [
                    {"type": "wait", "ms": 100},
                    {"type": "tick", "frames": 2},
                    {"type": "scroll_to", "y": 300},
                    {"type": "hover", "id": "subscribe"},
                    {"type": "unhover"},
                    {"type": "drag", "id": "drag-box", "dx": 400, "dy": 0},
                    {"type": "assert_value", "id": "subscribe", "property": "backgroundColor", "value": "#d1d5db"},
                    {"type": "assert_value", "id": "progress-bar", "property": "scaleY", "value": 0.5, "tolerance": 0.001},
                    {"type": "assert_gesture", "id": "subscribe", "state": "hovered"},
                    {"type": "watch_range", "id": "drag-box", "property": "x", "min": -150, "max": 150}
                ]
            }"##,
        )
        .unwrap();

        assert_eq!(scenario.name.as_deref(), Some("shapes"));
        assert_eq!(scenario.steps.len(), 10);
        assert!(matches!(
            &scenario.steps[5],
            ScenarioStep::Drag { steps: 10, .. }
        ));
        assert!(matches!(
            &scenario.steps[6],
            ScenarioStep::AssertValue { property: Property::BackgroundColor, value: ExpectedValue::Color(_), .. }
        ));
        assert!(matches!(
            &scenario.steps[7],
            ScenarioStep::AssertValue { value: ExpectedValue::Number(_), .. }
        ));
        assert!(matches!(
            &scenario.steps[8],
            ScenarioStep::AssertGesture { state: GestureState::Hovered, .. }
        ));
    }

    #[test]
    fn test_rejects_unknown_step() {
        assert!(HeadlessScenario::from_json(r#"{"steps": [{"type": "teleport"}]}"#).is_err());
    }

    #[test]
    fn test_acceptance_scenario_loads() {
        let scenario = HeadlessScenario::acceptance().unwrap();
        assert!(!scenario.steps.is_empty());
    }
}
