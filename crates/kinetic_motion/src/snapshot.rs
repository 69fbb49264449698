//! Serializable scene state

use crate::gesture::GestureState;
use crate::props::{PropValue, Property};
use indexmap::IndexMap;
use kinetic_core::{Rect, Size};
use kinetic_paint::StrokeDash;
use serde::Serialize;

/// A property value as written to JSON
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SnapshotValue {
    Number(f32),
    /// CSS `rgba()` text
    Color(String),
}

impl From<PropValue> for SnapshotValue {
    fn from(value: PropValue) -> Self {
        match value {
            PropValue::Number(n) => SnapshotValue::Number(n),
            PropValue::Color(c) => SnapshotValue::Color(c.to_css()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScrollSnapshot {
    pub offset: f32,
    pub max_offset: f32,
    pub progress: f32,
}

/// One element at one point in time
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ElementSnapshot {
    pub id: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Layout box in document coordinates
    pub layout: Rect,
    /// Layout box after translation and scale
    pub bounds: Rect,
    pub effective_opacity: f32,
    pub values: IndexMap<Property, SnapshotValue>,
    pub animating: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gesture: Option<GestureState>,
    pub dragging: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_view: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_dash: Option<StrokeDash>,
}

impl ElementSnapshot {
    pub fn number(&self, property: Property) -> Option<f32> {
        match self.values.get(&property) {
            Some(SnapshotValue::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

/// Every element of a scene at one point in time
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub time_ms: f64,
    pub viewport: Size,
    pub content_height: f32,
    pub scroll: ScrollSnapshot,
    pub elements: Vec<ElementSnapshot>,
}

impl SceneSnapshot {
    pub fn element(&self, id: &str) -> Option<&ElementSnapshot> {
        self.elements.iter().find(|e| e.id == id)
    }
}
