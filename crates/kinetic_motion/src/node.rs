//! Declarative motion elements
//!
//! A [`MotionNode`] describes one element: its layout style, static paint,
//! and the motion it takes part in. Nodes are plain data until mounted into a
//! [`MotionScene`](crate::scene::MotionScene).
//!
//! ```
//! use kinetic_motion::{MotionNode, Target, Transition};
//! use kinetic_animation::Easing;
//!
//! let square = MotionNode::container("square")
//!     .initial(Target::new().opacity(0.0).y(100.0))
//!     .animate(Target::new().opacity(1.0).y(0.0))
//!     .transition(Transition::tween(1000.0).ease(Easing::EaseOut).delay(200.0));
//! assert_eq!(square.id(), "square");
//! ```

use crate::controls::AnimationControls;
use crate::drag::DragConfig;
use crate::in_view::InViewOptions;
use crate::props::{Property, Target};
use crate::scroll::ScrollSource;
use crate::transition::TransitionMap;
use crate::variants::Variants;
use kinetic_paint::{Color, Path};
use taffy::Style;

/// What an element is
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Container,
    Text(String),
    Button(String),
    /// Vector container with a square view box of this size
    Svg { view_box: f32 },
    Path(Path),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Container => "container",
            NodeKind::Text(_) => "text",
            NodeKind::Button(_) => "button",
            NodeKind::Svg { .. } => "svg",
            NodeKind::Path(_) => "path",
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            NodeKind::Text(text) | NodeKind::Button(text) => Some(text),
            _ => None,
        }
    }
}

/// Static paint
#[derive(Clone, Debug, PartialEq)]
pub struct VisualStyle {
    pub background: Option<Color>,
    pub color: Option<Color>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    pub corner_radius: f32,
    pub font_size: f32,
    pub line_height: f32,
}

impl Default for VisualStyle {
    fn default() -> Self {
        Self {
            background: None,
            color: None,
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
            font_size: 16.0,
            line_height: 24.0,
        }
    }
}

/// Where an element's first values come from
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Initial {
    /// Follow the parent's initial label
    #[default]
    Inherit,
    Variant(String),
    Target(Target),
}

/// What an element animates to
#[derive(Clone, Debug)]
pub enum Animate {
    Target(Target),
    Variant(String),
    /// Animates when the controls are started
    Controls(AnimationControls),
}

/// Callback fired when an observed element's visibility changes
pub type InViewCallback = Box<dyn FnMut(bool)>;

/// A viewport observer attached to an element
pub struct InViewHook {
    pub options: InViewOptions,
    pub callback: InViewCallback,
}

/// Declarative element description
pub struct MotionNode {
    pub(crate) id: String,
    pub(crate) kind: NodeKind,
    pub(crate) layout: Style,
    pub(crate) visual: VisualStyle,
    pub(crate) initial: Initial,
    pub(crate) animate: Option<Animate>,
    pub(crate) variants: Variants,
    pub(crate) transition: TransitionMap,
    pub(crate) while_hover: Option<Target>,
    pub(crate) while_tap: Option<Target>,
    pub(crate) drag: Option<DragConfig>,
    pub(crate) bindings: Vec<(Property, ScrollSource)>,
    pub(crate) in_view: Option<InViewHook>,
    /// Transform origin as fractions of the element box
    pub(crate) origin: (f32, f32),
    pub(crate) children: Vec<MotionNode>,
}

impl MotionNode {
    fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            layout: Style::default(),
            visual: VisualStyle::default(),
            initial: Initial::Inherit,
            animate: None,
            variants: Variants::default(),
            transition: TransitionMap::default(),
            while_hover: None,
            while_tap: None,
            drag: None,
            bindings: Vec::new(),
            in_view: None,
            origin: (0.5, 0.5),
            children: Vec::new(),
        }
    }

    pub fn container(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Container)
    }

    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Text(text.into()))
    }

    pub fn button(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Button(label.into()))
    }

    pub fn svg(id: impl Into<String>, view_box: f32) -> Self {
        Self::new(id, NodeKind::Svg { view_box })
    }

    pub fn path(id: impl Into<String>, path: Path) -> Self {
        Self::new(id, NodeKind::Path(path))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn style(mut self, layout: Style) -> Self {
        self.layout = layout;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.visual.background = Some(color);
        self
    }

    pub fn text_color(mut self, color: Color) -> Self {
        self.visual.color = Some(color);
        self
    }

    pub fn stroke(mut self, color: Color, width: f32) -> Self {
        self.visual.stroke = Some(color);
        self.visual.stroke_width = width;
        self
    }

    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.visual.corner_radius = radius;
        self
    }

    pub fn font(mut self, size: f32, line_height: f32) -> Self {
        self.visual.font_size = size;
        self.visual.line_height = line_height;
        self
    }

    pub fn initial(mut self, target: Target) -> Self {
        self.initial = Initial::Target(target);
        self
    }

    pub fn initial_variant(mut self, label: impl Into<String>) -> Self {
        self.initial = Initial::Variant(label.into());
        self
    }

    pub fn animate(mut self, target: Target) -> Self {
        self.animate = Some(Animate::Target(target));
        self
    }

    pub fn animate_variant(mut self, label: impl Into<String>) -> Self {
        self.animate = Some(Animate::Variant(label.into()));
        self
    }

    pub fn animate_controls(mut self, controls: &AnimationControls) -> Self {
        self.animate = Some(Animate::Controls(controls.clone()));
        self
    }

    pub fn variants(mut self, variants: Variants) -> Self {
        self.variants = variants;
        self
    }

    pub fn transition(mut self, transition: impl Into<TransitionMap>) -> Self {
        self.transition = transition.into();
        self
    }

    pub fn while_hover(mut self, target: Target) -> Self {
        self.while_hover = Some(target);
        self
    }

    pub fn while_tap(mut self, target: Target) -> Self {
        self.while_tap = Some(target);
        self
    }

    pub fn drag(mut self, config: DragConfig) -> Self {
        self.drag = Some(config);
        self
    }

    /// Drive `property` from the page scroll every frame
    pub fn bind_scroll(mut self, property: Property, source: ScrollSource) -> Self {
        self.bindings.push((property, source));
        self
    }

    pub fn on_in_view<F: FnMut(bool) + 'static>(mut self, options: InViewOptions, callback: F) -> Self {
        self.in_view = Some(InViewHook {
            options,
            callback: Box::new(callback),
        });
        self
    }

    /// Transform origin, as fractions of width and height
    pub fn origin(mut self, x: f32, y: f32) -> Self {
        self.origin = (x, y);
        self
    }

    pub fn child(mut self, child: MotionNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = MotionNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn has_gestures(&self) -> bool {
        self.while_hover.is_some() || self.while_tap.is_some()
    }
}
