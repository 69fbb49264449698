//! Motion scene
//!
//! A [`MotionScene`] is a mounted tree of [`MotionNode`]s: it lays the tree
//! out, owns every running animation, routes input to gestures and drags,
//! tracks page scroll, and runs viewport observers. Time only moves through
//! [`MotionScene::tick`], so a scene driven by the same inputs always
//! produces the same frames.
//!
//! # Example
//!
//! ```
//! use kinetic_core::Size;
//! use kinetic_motion::{MotionNode, MotionScene, Property, Target, Transition};
//!
//! let root = MotionNode::container("root").child(
//!     MotionNode::container("box")
//!         .initial(Target::new().opacity(0.0))
//!         .animate(Target::new().opacity(1.0))
//!         .transition(Transition::tween(100.0)),
//! );
//! let mut scene = MotionScene::mount(root, Size::new(800.0, 600.0)).unwrap();
//! assert_eq!(scene.number("box", Property::Opacity).unwrap(), 0.0);
//!
//! for _ in 0..10 {
//!     scene.tick(16.0);
//! }
//! assert_eq!(scene.number("box", Property::Opacity).unwrap(), 1.0);
//! ```

use crate::controls::{AnimationControls, ControlCommand, ControlsReader};
use crate::drag::{DragConfig, DragSession, ReleaseMotion};
use crate::error::{MotionError, Result};
use crate::gesture::{GestureState, GestureTracker};
use crate::in_view::InViewObserver;
use crate::layout::{LayoutTree, TextContext};
use crate::node::{Animate, InViewCallback, Initial, MotionNode, NodeKind, VisualStyle};
use crate::props::{PropValue, Property, Target, TargetValue};
use crate::scroll::{ScrollProgress, ScrollSource};
use crate::snapshot::{ElementSnapshot, SceneSnapshot, ScrollSnapshot, SnapshotValue};
use crate::transition::{Driver, Transition, TransitionMap, DEFAULT_TWEEN_MS};
use crate::variants::Variants;
use indexmap::IndexMap;
use kinetic_animation::{
    AnimationHandle, AnimationScheduler, Easing, Interpolate, KeyframeAnimation, ScheduledSpring,
    Spring,
};
use kinetic_core::events::event_types::*;
use kinetic_core::{Event, EventData, Point, Rect, Size};
use kinetic_paint::Color;
use slotmap::{new_key_type, SlotMap};
use smallvec::{smallvec, SmallVec};

new_key_type! {
    pub struct NodeId;
}

/// Current value of one property and the animation driving it
#[derive(Clone, Copy, Debug)]
struct MotionValue {
    value: PropValue,
    handle: Option<AnimationHandle>,
}

impl MotionValue {
    fn at_rest(value: PropValue) -> Self {
        Self {
            value,
            handle: None,
        }
    }
}

struct SceneNode {
    id: String,
    kind: NodeKind,
    visual: VisualStyle,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    values: IndexMap<Property, MotionValue>,
    /// Resting values of the base (non-gesture) layer
    base: IndexMap<Property, PropValue>,
    /// Last targets requested by gesture layers
    gesture_targets: IndexMap<Property, TargetValue>,
    initial: Initial,
    animate: Option<Animate>,
    variants: Variants,
    transition: TransitionMap,
    gestures: Option<GestureTracker>,
    drag: Option<DragConfig>,
    drag_session: Option<DragSession>,
    bindings: Vec<(Property, ScrollSource)>,
    observer: Option<(InViewObserver, InViewCallback)>,
    origin: (f32, f32),
    controls_reader: Option<ControlsReader>,
    label: Option<String>,
}

impl SceneNode {
    fn default_value(&self, property: Property) -> PropValue {
        match property {
            Property::Fill => PropValue::Color(self.visual.fill.unwrap_or(Color::TRANSPARENT)),
            Property::BackgroundColor => {
                PropValue::Color(self.visual.background.unwrap_or(Color::TRANSPARENT))
            }
            Property::TextColor => PropValue::Color(self.visual.color.unwrap_or(Color::BLACK)),
            p => PropValue::Number(p.default_number()),
        }
    }

    fn value(&self, property: Property) -> PropValue {
        self.values
            .get(&property)
            .map(|v| v.value)
            .unwrap_or_else(|| self.default_value(property))
    }

    fn number(&self, property: Property) -> f32 {
        self.value(property)
            .as_number()
            .unwrap_or_else(|| property.default_number())
    }

    fn is_animating(&self) -> bool {
        self.values.values().any(|v| v.handle.is_some())
    }

    fn controls(&self) -> Option<&AnimationControls> {
        match &self.animate {
            Some(Animate::Controls(controls)) => Some(controls),
            _ => None,
        }
    }

    /// Set a value immediately, cancelling any animation on it
    fn jump(&mut self, scheduler: &mut AnimationScheduler, property: Property, value: PropValue) {
        if let Some(handle) = self.values.get(&property).and_then(|v| v.handle) {
            scheduler.remove(handle);
        }
        self.values.insert(property, MotionValue::at_rest(value));
    }
}

/// A mounted, animating element tree
pub struct MotionScene {
    nodes: SlotMap<NodeId, SceneNode>,
    /// Element ids in document order
    ids: IndexMap<String, NodeId>,
    root: NodeId,
    layout: LayoutTree,
    scheduler: AnimationScheduler,
    viewport: Size,
    scroll: ScrollProgress,
    /// Pointer position in viewport coordinates
    pointer: Option<Point>,
    dragging: Option<NodeId>,
    time_ms: f64,
}

impl MotionScene {
    /// Mount a tree: lay it out, apply initial values and start animations
    pub fn mount(root: MotionNode, viewport: Size) -> Result<Self> {
        let mut scene = Self {
            nodes: SlotMap::with_key(),
            ids: IndexMap::new(),
            root: NodeId::default(),
            layout: LayoutTree::new(),
            scheduler: AnimationScheduler::new(),
            viewport,
            scroll: ScrollProgress::default(),
            pointer: None,
            dragging: None,
            time_ms: 0.0,
        };

        scene.root = scene.insert(root, None)?;
        scene.relayout()?;
        scene.apply_initial(scene.root, None);

        let keys: Vec<NodeId> = scene.ids.values().copied().collect();
        for key in keys {
            scene.start_own_animation(key);
        }

        scene.apply_bindings();
        scene.update_observers();

        tracing::info!(
            elements = scene.ids.len(),
            width = viewport.width,
            height = viewport.height,
            content_height = scene.scroll.content_height(),
            "scene mounted"
        );
        Ok(scene)
    }

    fn insert(&mut self, node: MotionNode, parent: Option<NodeId>) -> Result<NodeId> {
        let MotionNode {
            id,
            kind,
            layout,
            visual,
            initial,
            animate,
            variants,
            transition,
            while_hover,
            while_tap,
            drag,
            bindings,
            in_view,
            origin,
            children,
        } = node;

        if self.ids.contains_key(&id) {
            return Err(MotionError::DuplicateNode(id));
        }

        let text = kind.text().map(|text| TextContext {
            text: text.to_string(),
            font_size: visual.font_size,
            line_height: visual.line_height,
        });
        let gestures = (while_hover.is_some() || while_tap.is_some())
            .then(|| GestureTracker::new(while_hover, while_tap));
        let observer = in_view.map(|hook| (InViewObserver::new(hook.options), hook.callback));
        let controls_reader = match &animate {
            Some(Animate::Controls(controls)) => Some(controls.subscribe()),
            _ => None,
        };

        let key = self.nodes.insert(SceneNode {
            id: id.clone(),
            kind,
            visual,
            parent,
            children: Vec::new(),
            values: IndexMap::new(),
            base: IndexMap::new(),
            gesture_targets: IndexMap::new(),
            initial,
            animate,
            variants,
            transition,
            gestures,
            drag,
            drag_session: None,
            bindings,
            observer,
            origin,
            controls_reader,
            label: None,
        });
        self.ids.insert(id, key);

        self.layout.create_node(key, layout, text)?;
        if let Some(parent) = parent {
            self.layout.add_child(parent, key)?;
        }

        for child in children {
            let child_key = self.insert(child, Some(key))?;
            if let Some(node) = self.nodes.get_mut(key) {
                node.children.push(child_key);
            }
        }
        Ok(key)
    }

    fn relayout(&mut self) -> Result<()> {
        self.layout.compute(self.root, self.viewport.width)?;
        let content_height = self.layout.rect(self.root).map_or(0.0, |r| r.height());
        self.scroll.set_extent(content_height, self.viewport.height);
        Ok(())
    }

    // Initial values and variant propagation

    fn apply_initial(&mut self, key: NodeId, inherited: Option<String>) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };

        let (target, child_label) = match &node.initial {
            Initial::Target(target) => (Some(target.clone()), inherited),
            Initial::Variant(label) => (node.variants.get(label).cloned(), Some(label.clone())),
            Initial::Inherit => (
                inherited
                    .as_deref()
                    .and_then(|label| node.variants.get(label))
                    .cloned(),
                inherited,
            ),
        };

        if let Some(label) = child_label.as_deref().filter(|l| node.variants.contains(l)) {
            node.label = Some(label.to_string());
        }

        if let Some(target) = target {
            for (property, value) in target.iter() {
                if let Some(value) = value.last() {
                    node.values.insert(property, MotionValue::at_rest(value));
                    node.base.insert(property, value);
                }
            }
        }

        let children = node.children.clone();
        for child in children {
            self.apply_initial(child, child_label.clone());
        }
    }

    fn start_own_animation(&mut self, key: NodeId) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        match node.animate.clone() {
            Some(Animate::Target(target)) => self.animate_target(key, &target, None, 0.0),
            Some(Animate::Variant(label)) => self.animate_variant(key, &label, 0.0),
            Some(Animate::Controls(_)) | None => {}
        }
    }

    /// Animate an element to one of its variants and propagate the label
    /// to children that have no `animate` of their own
    pub(crate) fn animate_variant(&mut self, key: NodeId, label: &str, delay_ms: f32) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        if node.variants.contains(label) {
            node.label = Some(label.to_string());
        }

        let target = node.variants.get(label).cloned();
        let transition = target
            .as_ref()
            .and_then(|t| t.transition().cloned())
            .unwrap_or_else(|| node.transition.clone());
        let children = node.children.clone();
        tracing::debug!(node = %node.id, label, delay_ms, "variant");

        if let Some(target) = &target {
            self.animate_target(key, target, Some(&transition), delay_ms);
        }

        let orchestration = transition.default_transition();
        let mut index = 0usize;
        for child in children {
            let Some(child_node) = self.nodes.get(child) else {
                continue;
            };
            if child_node.animate.is_some() {
                continue;
            }
            let child_delay = delay_ms
                + orchestration.delay_children_ms
                + index as f32 * orchestration.stagger_children_ms;
            if !child_node.variants.is_empty() {
                index += 1;
            }
            self.animate_variant(child, label, child_delay);
        }
    }

    /// Jump an element (and following children) to a variant
    fn set_variant(&mut self, key: NodeId, label: &str) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        if let Some(target) = node.variants.get(label).cloned() {
            node.label = Some(label.to_string());
            for (property, value) in target.iter() {
                if let Some(value) = value.last() {
                    node.jump(&mut self.scheduler, property, value);
                    node.base.insert(property, value);
                }
            }
        }
        let children = node.children.clone();
        for child in children {
            if self.nodes.get(child).is_some_and(|c| c.animate.is_none()) {
                self.set_variant(child, label);
            }
        }
    }

    fn animate_target(
        &mut self,
        key: NodeId,
        target: &Target,
        transition: Option<&TransitionMap>,
        delay_ms: f32,
    ) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        let transition = transition
            .or(target.transition())
            .unwrap_or(&node.transition)
            .clone();

        let mut started = Vec::new();
        for (property, value) in target.iter() {
            if let Some(rest) = value.last() {
                node.base.insert(property, rest);
            }
            let overridden = node
                .gestures
                .as_ref()
                .is_some_and(|g| g.active_value(property).is_some());
            if !overridden {
                started.push((property, value.clone()));
            }
        }

        for (property, value) in started {
            self.start_animation(
                key,
                property,
                &value,
                transition.for_property(property),
                delay_ms,
            );
        }
    }

    fn start_animation(
        &mut self,
        key: NodeId,
        property: Property,
        target: &TargetValue,
        transition: &Transition,
        extra_delay_ms: f32,
    ) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };

        let current = node.value(property);
        let previous = node.values.get(&property).and_then(|v| v.handle);
        let velocity = previous.map_or(0.0, |h| self.scheduler.velocity(h));
        if let Some(handle) = previous {
            self.scheduler.remove(handle);
        }

        let keyframes: SmallVec<[PropValue; 4]> = match target {
            TargetValue::Single(value) => smallvec![current, *value],
            TargetValue::Keyframes(values) => values.clone(),
        };
        let delay_ms = transition.delay_ms + extra_delay_ms;

        let started = match current {
            PropValue::Number(_) => keyframes
                .iter()
                .map(PropValue::as_number)
                .collect::<Option<Vec<f32>>>()
                .and_then(|values| {
                    start_numeric(&mut self.scheduler, property, values, transition, velocity, delay_ms)
                }),
            PropValue::Color(_) => keyframes
                .iter()
                .map(PropValue::as_color)
                .collect::<Option<Vec<Color>>>()
                .and_then(|values| start_color(&mut self.scheduler, property, values, transition, delay_ms)),
        };

        let Some((handle, driver)) = started else {
            tracing::warn!(node = %node.id, %property, "target does not match the property's value kind");
            node.values.insert(property, MotionValue::at_rest(current));
            return;
        };

        let value = read_handle(&self.scheduler, handle).unwrap_or(current);
        node.values.insert(
            property,
            MotionValue {
                value,
                handle: Some(handle),
            },
        );
        tracing::debug!(node = %node.id, %property, ?driver, delay_ms, "animation started");
    }

    // Frame loop

    /// Advance the scene by `dt_ms` milliseconds
    pub fn tick(&mut self, dt_ms: f32) {
        self.drain_controls();
        if dt_ms <= 0.0 {
            return;
        }
        self.time_ms += dt_ms as f64;
        self.scheduler.tick(dt_ms);
        self.sync_values();
        self.settle_drag();
        self.apply_bindings();
    }

    fn sync_values(&mut self) {
        for node in self.nodes.values_mut() {
            for value in node.values.values_mut() {
                let Some(handle) = value.handle else {
                    continue;
                };
                if let Some(current) = read_handle(&self.scheduler, handle) {
                    value.value = current;
                }
                if !self.scheduler.is_active(handle) {
                    self.scheduler.remove(handle);
                    value.handle = None;
                }
            }
        }
    }

    /// Keep released drags inside their constraints
    fn settle_drag(&mut self) {
        for (key, node) in self.nodes.iter_mut() {
            if Some(key) == self.dragging {
                continue;
            }
            let Some(config) = node.drag.as_ref() else {
                continue;
            };
            if config.constraints.is_none() {
                continue;
            }

            for (property, (min, max)) in [
                (Property::X, config.range_x()),
                (Property::Y, config.range_y()),
            ] {
                let Some(motion_value) = node.values.get_mut(&property) else {
                    continue;
                };
                let Some(value) = motion_value.value.as_number() else {
                    continue;
                };
                if (min..=max).contains(&value) {
                    continue;
                }

                match motion_value.handle {
                    Some(handle @ AnimationHandle::Inertia(_)) => {
                        let velocity = self.scheduler.velocity(handle);
                        self.scheduler.remove(handle);
                        motion_value.handle = match config.boundary_motion(value, velocity, (min, max)) {
                            Some(motion) => Some(add_release(&mut self.scheduler, motion)),
                            None => {
                                motion_value.value = PropValue::Number(value.clamp(min, max));
                                None
                            }
                        };
                    }
                    _ if config.elastic <= 0.0 => {
                        motion_value.value = PropValue::Number(value.clamp(min, max));
                    }
                    _ => {}
                }
            }
        }
    }

    fn apply_bindings(&mut self) {
        let scroll = self.scroll;
        for node in self.nodes.values_mut() {
            for &(property, source) in node.bindings.iter() {
                let value = PropValue::Number(source.sample(&scroll));
                if let Some(handle) = node.values.get(&property).and_then(|v| v.handle) {
                    self.scheduler.remove(handle);
                }
                node.values.insert(property, MotionValue::at_rest(value));
            }
        }
    }

    fn drain_controls(&mut self) {
        let bound: Vec<(NodeId, AnimationControls, ControlsReader)> = self
            .nodes
            .iter()
            .filter_map(|(key, node)| {
                let controls = node.controls()?.clone();
                Some((key, controls, node.controls_reader?))
            })
            .collect();

        for (key, controls, reader) in bound {
            for command in controls.take(reader) {
                match command {
                    ControlCommand::Start(label) => self.animate_variant(key, &label, 0.0),
                    ControlCommand::Set(label) => self.set_variant(key, &label),
                    ControlCommand::Stop => self.stop_node(key),
                }
            }
        }
    }

    fn stop_node(&mut self, key: NodeId) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        for value in node.values.values_mut() {
            if let Some(handle) = value.handle.take() {
                self.scheduler.remove(handle);
            }
        }
    }

    fn update_observers(&mut self) {
        let viewport = Rect::new(
            0.0,
            self.scroll.offset(),
            self.viewport.width,
            self.viewport.height,
        );
        for (key, node) in self.nodes.iter_mut() {
            let Some((observer, callback)) = node.observer.as_mut() else {
                continue;
            };
            let Some(rect) = self.layout.rect(key) else {
                continue;
            };
            if let Some(visible) = observer.update(rect, viewport) {
                tracing::debug!(node = %node.id, visible, "in-view changed");
                callback(visible);
            }
        }
        self.drain_controls();
    }

    // Input

    /// Route an input event to scroll, resize, gestures and drags
    pub fn handle_event(&mut self, event: &Event) -> Result<()> {
        match (event.event_type, &event.data) {
            (POINTER_MOVE, EventData::Pointer { x, y, .. }) => {
                self.pointer_moved(Point::new(*x, *y));
            }
            (POINTER_DOWN, EventData::Pointer { x, y, .. }) => {
                self.pointer_moved(Point::new(*x, *y));
                self.pointer_down();
            }
            (POINTER_UP, EventData::Pointer { x, y, .. }) => {
                self.pointer_moved(Point::new(*x, *y));
                self.pointer_up();
            }
            (POINTER_LEAVE, _) => self.pointer_left(),
            (SCROLL, EventData::Scroll { delta_y, .. }) => {
                self.scroll_by(*delta_y);
            }
            (RESIZE, EventData::Resize { width, height }) => {
                self.resize(Size::new(*width as f32, *height as f32))?;
            }
            _ => {}
        }
        Ok(())
    }

    pub fn scroll_to(&mut self, offset: f32) -> f32 {
        let applied = self.scroll.set_offset(offset);
        self.after_scroll();
        applied
    }

    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        let applied = self.scroll.scroll_by(delta);
        self.after_scroll();
        applied
    }

    fn after_scroll(&mut self) {
        tracing::trace!(
            offset = self.scroll.offset(),
            progress = self.scroll.progress(),
            "scrolled"
        );
        self.apply_bindings();
        self.update_observers();
        self.update_hover();
    }

    pub fn resize(&mut self, viewport: Size) -> Result<()> {
        self.viewport = viewport;
        self.relayout()?;
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            content_height = self.scroll.content_height(),
            "resized"
        );
        self.after_scroll();
        Ok(())
    }

    fn pointer_moved(&mut self, pointer: Point) {
        self.pointer = Some(pointer);
        if let Some(key) = self.dragging {
            self.drag_move(key, pointer);
        }
        self.update_hover();
    }

    fn pointer_left(&mut self) {
        self.pointer = None;
        self.update_hover();
    }

    fn document_pointer(&self) -> Option<Point> {
        self.pointer
            .map(|p| Point::new(p.x, p.y + self.scroll.offset()))
    }

    fn gesture_nodes(&self) -> Vec<NodeId> {
        self.ids
            .values()
            .copied()
            .filter(|&key| self.nodes.get(key).is_some_and(|n| n.gestures.is_some()))
            .collect()
    }

    fn is_under_pointer(&self, key: NodeId) -> bool {
        match (self.document_pointer(), self.bounds_of(key)) {
            (Some(pointer), Some(bounds)) => bounds.contains(pointer),
            _ => false,
        }
    }

    fn update_hover(&mut self) {
        for key in self.gesture_nodes() {
            let inside = self.is_under_pointer(key);
            let Some(tracker) = self.nodes.get_mut(key).and_then(|n| n.gestures.as_mut()) else {
                continue;
            };
            let over = matches!(tracker.state(), GestureState::Hovered | GestureState::Pressed);
            let event = match (inside, over) {
                (true, false) => POINTER_ENTER,
                (false, true) => POINTER_LEAVE,
                _ => continue,
            };
            if tracker.send(event) {
                self.refresh_gesture_layers(key);
            }
        }
    }

    fn pointer_down(&mut self) {
        for key in self.gesture_nodes() {
            if !self.is_under_pointer(key) {
                continue;
            }
            let changed = self
                .nodes
                .get_mut(key)
                .and_then(|n| n.gestures.as_mut())
                .is_some_and(|tracker| tracker.send(POINTER_DOWN));
            if changed {
                self.refresh_gesture_layers(key);
            }
        }

        let draggable = self.ids.values().rev().copied().find(|&key| {
            self.nodes.get(key).is_some_and(|n| n.drag.is_some()) && self.is_under_pointer(key)
        });
        if let (Some(key), Some(pointer)) = (draggable, self.pointer) {
            self.start_drag(key, pointer);
        }
    }

    fn pointer_up(&mut self) {
        for key in self.gesture_nodes() {
            let changed = self
                .nodes
                .get_mut(key)
                .and_then(|n| n.gestures.as_mut())
                .filter(|tracker| tracker.state().is_pressed())
                .is_some_and(|tracker| tracker.send(POINTER_UP));
            if changed {
                self.refresh_gesture_layers(key);
            }
        }

        if let Some(key) = self.dragging.take() {
            self.end_drag(key);
        }
    }

    /// Re-resolve gesture-layered properties after a gesture state change
    fn refresh_gesture_layers(&mut self, key: NodeId) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        let Some(tracker) = node.gestures.as_ref() else {
            return;
        };
        tracing::debug!(node = %node.id, state = tracker.state().name(), "gesture");

        let mut changes = Vec::new();
        for property in tracker.layered_properties() {
            let target = match tracker.active_value(property) {
                Some(value) => value.clone(),
                None => TargetValue::Single(
                    node.base
                        .get(&property)
                        .copied()
                        .unwrap_or_else(|| node.default_value(property)),
                ),
            };
            if node.gesture_targets.get(&property) != Some(&target) {
                changes.push((property, target));
            }
        }
        for (property, target) in &changes {
            node.gesture_targets.insert(*property, target.clone());
        }

        let transition = node.transition.clone();
        for (property, target) in changes {
            self.start_animation(key, property, &target, transition.for_property(property), 0.0);
        }
    }

    fn start_drag(&mut self, key: NodeId, pointer: Point) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        for property in [Property::X, Property::Y] {
            let value = node.value(property);
            node.jump(&mut self.scheduler, property, value);
        }
        let offset = Point::new(node.number(Property::X), node.number(Property::Y));
        node.drag_session = Some(DragSession::new(pointer, offset, self.time_ms));
        self.dragging = Some(key);
        tracing::debug!(node = %node.id, x = offset.x, y = offset.y, "drag start");
    }

    fn drag_move(&mut self, key: NodeId, pointer: Point) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        let (Some(config), Some(session)) = (node.drag.as_ref(), node.drag_session.as_mut()) else {
            return;
        };

        let raw = session.raw_offset(pointer, config.axis);
        session.tracker.record(self.time_ms, raw);
        let x = config.apply_constraint(raw.x, config.range_x());
        let y = config.apply_constraint(raw.y, config.range_y());
        let axis = config.axis;

        if axis.allows_x() {
            node.jump(&mut self.scheduler, Property::X, PropValue::Number(x));
        }
        if axis.allows_y() {
            node.jump(&mut self.scheduler, Property::Y, PropValue::Number(y));
        }
    }

    fn end_drag(&mut self, key: NodeId) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        let (Some(config), Some(session)) = (node.drag.clone(), node.drag_session.take()) else {
            return;
        };

        let velocity = session.tracker.velocity(self.time_ms);
        let axes = [
            (Property::X, velocity.x, config.range_x(), config.axis.allows_x()),
            (Property::Y, velocity.y, config.range_y(), config.axis.allows_y()),
        ];
        for (property, speed, bounds, allowed) in axes {
            if !allowed {
                continue;
            }
            let value = node.number(property);
            if let Some(motion) = config.release_motion(value, speed, bounds) {
                let handle = add_release(&mut self.scheduler, motion);
                node.values.insert(
                    property,
                    MotionValue {
                        value: PropValue::Number(value),
                        handle: Some(handle),
                    },
                );
            }
        }
        tracing::debug!(node = %node.id, vx = velocity.x, vy = velocity.y, "drag end");
    }

    // Queries

    fn key(&self, id: &str) -> Result<NodeId> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| MotionError::UnknownNode(id.to_string()))
    }

    fn node(&self, id: &str) -> Result<&SceneNode> {
        let key = self.key(id)?;
        self.nodes
            .get(key)
            .ok_or_else(|| MotionError::UnknownNode(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Element ids in document order
    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(String::as_str)
    }

    pub fn value(&self, id: &str, property: Property) -> Result<PropValue> {
        Ok(self.node(id)?.value(property))
    }

    pub fn number(&self, id: &str, property: Property) -> Result<f32> {
        self.value(id, property)?
            .as_number()
            .ok_or_else(|| MotionError::ValueKind {
                node: id.to_string(),
                property: property.name(),
                expected: "number",
            })
    }

    pub fn color(&self, id: &str, property: Property) -> Result<Color> {
        self.value(id, property)?
            .as_color()
            .ok_or_else(|| MotionError::ValueKind {
                node: id.to_string(),
                property: property.name(),
                expected: "color",
            })
    }

    pub fn text(&self, id: &str) -> Result<Option<&str>> {
        Ok(self.node(id)?.kind.text())
    }

    /// Layout box in document coordinates
    pub fn layout_rect(&self, id: &str) -> Result<Rect> {
        let key = self.key(id)?;
        self.layout
            .rect(key)
            .ok_or_else(|| MotionError::UnknownNode(id.to_string()))
    }

    /// Layout box after translation (own and ancestors') and scale
    pub fn bounds(&self, id: &str) -> Result<Rect> {
        let key = self.key(id)?;
        self.bounds_of(key)
            .ok_or_else(|| MotionError::UnknownNode(id.to_string()))
    }

    fn bounds_of(&self, key: NodeId) -> Option<Rect> {
        let node = self.nodes.get(key)?;
        let rect = self.layout.rect(key)?;

        let mut tx = 0.0;
        let mut ty = 0.0;
        let mut current = Some(key);
        while let Some(k) = current {
            let n = self.nodes.get(k)?;
            tx += n.number(Property::X);
            ty += n.number(Property::Y);
            current = n.parent;
        }

        let scale = node.number(Property::Scale);
        let sx = scale * node.number(Property::ScaleX);
        let sy = scale * node.number(Property::ScaleY);
        let (ox, oy) = node.origin;
        let origin_x = rect.x() + rect.width() * ox;
        let origin_y = rect.y() + rect.height() * oy;

        Some(Rect::new(
            origin_x + (rect.x() - origin_x) * sx + tx,
            origin_y + (rect.y() - origin_y) * sy + ty,
            rect.width() * sx,
            rect.height() * sy,
        ))
    }

    /// Opacity multiplied through all ancestors
    pub fn effective_opacity(&self, id: &str) -> Result<f32> {
        let key = self.key(id)?;
        Ok(self.effective_opacity_of(key))
    }

    fn effective_opacity_of(&self, key: NodeId) -> f32 {
        let mut opacity = 1.0;
        let mut current = Some(key);
        while let Some(node) = current.and_then(|k| self.nodes.get(k)) {
            opacity *= node.number(Property::Opacity).clamp(0.0, 1.0);
            current = node.parent;
        }
        opacity
    }

    pub fn gesture_state(&self, id: &str) -> Result<Option<GestureState>> {
        Ok(self.node(id)?.gestures.as_ref().map(GestureTracker::state))
    }

    pub fn in_view(&self, id: &str) -> Result<Option<bool>> {
        Ok(self
            .node(id)?
            .observer
            .as_ref()
            .map(|(observer, _)| observer.is_in_view()))
    }

    pub fn is_dragging(&self, id: &str) -> Result<bool> {
        Ok(self.dragging == Some(self.key(id)?))
    }

    /// Last variant label applied to the element
    pub fn variant(&self, id: &str) -> Result<Option<&str>> {
        Ok(self.node(id)?.label.as_deref())
    }

    pub fn is_element_animating(&self, id: &str) -> Result<bool> {
        Ok(self.node(id)?.is_animating())
    }

    /// Whether any animation is still running
    pub fn is_animating(&self) -> bool {
        self.scheduler.has_active_animations()
    }

    pub fn scroll(&self) -> &ScrollProgress {
        &self.scroll
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn time_ms(&self) -> f64 {
        self.time_ms
    }

    /// Capture every element's layout and current values
    pub fn snapshot(&self) -> SceneSnapshot {
        let elements = self
            .ids
            .values()
            .filter_map(|&key| self.element_snapshot(key))
            .collect();

        SceneSnapshot {
            time_ms: self.time_ms,
            viewport: self.viewport,
            content_height: self.scroll.content_height(),
            scroll: ScrollSnapshot {
                offset: self.scroll.offset(),
                max_offset: self.scroll.max_offset(),
                progress: self.scroll.progress(),
            },
            elements,
        }
    }

    fn element_snapshot(&self, key: NodeId) -> Option<ElementSnapshot> {
        let node = self.nodes.get(key)?;
        let layout = self.layout.rect(key)?;

        let mut values: IndexMap<Property, SnapshotValue> = IndexMap::new();
        values.insert(Property::Opacity, node.value(Property::Opacity).into());
        for (&property, value) in node.values.iter() {
            values.insert(property, value.value.into());
        }

        let stroke_dash = match &node.kind {
            NodeKind::Path(path) => Some(path.stroke_dash(node.number(Property::PathLength))),
            _ => None,
        };

        Some(ElementSnapshot {
            id: node.id.clone(),
            kind: node.kind.name(),
            text: node.kind.text().map(str::to_string),
            layout,
            bounds: self.bounds_of(key).unwrap_or(layout),
            effective_opacity: self.effective_opacity_of(key),
            values,
            animating: node.is_animating(),
            variant: node.label.clone(),
            gesture: node.gestures.as_ref().map(GestureTracker::state),
            dragging: self.dragging == Some(key),
            in_view: node.observer.as_ref().map(|(o, _)| o.is_in_view()),
            stroke_dash,
        })
    }
}

impl Drop for MotionScene {
    fn drop(&mut self) {
        for node in self.nodes.values() {
            if let (Some(controls), Some(reader)) = (node.controls(), node.controls_reader) {
                controls.release(reader);
            }
        }
    }
}

fn read_handle(scheduler: &AnimationScheduler, handle: AnimationHandle) -> Option<PropValue> {
    match handle {
        AnimationHandle::ColorKeyframe(_) => scheduler.color(handle).map(PropValue::Color),
        _ => scheduler.value(handle).map(PropValue::Number),
    }
}

fn add_release(scheduler: &mut AnimationScheduler, motion: ReleaseMotion) -> AnimationHandle {
    match motion {
        ReleaseMotion::Inertia(inertia) => AnimationHandle::Inertia(scheduler.add_inertia(inertia)),
        ReleaseMotion::Bounce(spring) => {
            AnimationHandle::Spring(scheduler.add_spring(ScheduledSpring::new(spring)))
        }
    }
}

fn timed<T: Interpolate>(
    animation: KeyframeAnimation<T>,
    transition: &Transition,
    easings: &[Easing],
    delay_ms: f32,
) -> KeyframeAnimation<T> {
    let animation = animation
        .with_segment_easings(easings)
        .with_delay(delay_ms)
        .with_repeat(transition.repeat)
        .with_repeat_type(transition.repeat_type)
        .with_repeat_delay(transition.repeat_delay_ms);
    match &transition.times {
        Some(times) => animation.with_times(times),
        None => animation,
    }
}

fn start_numeric(
    scheduler: &mut AnimationScheduler,
    property: Property,
    values: Vec<f32>,
    transition: &Transition,
    velocity: f32,
    delay_ms: f32,
) -> Option<(AnimationHandle, Driver)> {
    let driver = transition.driver_for(property, values.len());
    let handle = match &driver {
        Driver::Spring(config) => {
            let from = *values.first()?;
            let to = *values.last()?;
            let spring = Spring::new(*config, from)
                .with_target(to)
                .with_velocity(velocity);
            AnimationHandle::Spring(scheduler.add_spring(ScheduledSpring::new(spring).with_delay(delay_ms)))
        }
        Driver::Tween {
            duration_ms,
            easings,
        } => {
            let animation = KeyframeAnimation::new(values, *duration_ms)?;
            AnimationHandle::Keyframe(scheduler.add_keyframes(timed(animation, transition, easings, delay_ms)))
        }
    };
    Some((handle, driver))
}

fn start_color(
    scheduler: &mut AnimationScheduler,
    property: Property,
    values: Vec<Color>,
    transition: &Transition,
    delay_ms: f32,
) -> Option<(AnimationHandle, Driver)> {
    let driver = match transition.driver_for(property, values.len()) {
        Driver::Spring(_) => Driver::Tween {
            duration_ms: DEFAULT_TWEEN_MS,
            easings: smallvec![Easing::TWEEN_DEFAULT],
        },
        tween => tween,
    };
    let Driver::Tween {
        duration_ms,
        easings,
    } = &driver
    else {
        return None;
    };
    let animation = KeyframeAnimation::new(values, *duration_ms)?;
    let handle = AnimationHandle::ColorKeyframe(
        scheduler.add_color_keyframes(timed(animation, transition, easings, delay_ms)),
    );
    Some((handle, driver))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragConstraints;
    use crate::in_view::InViewOptions;
    use kinetic_animation::Repeat;
    use std::cell::Cell;
    use std::rc::Rc;
    use taffy::prelude::{Dimension, Display, FlexDirection, Style};

    fn boxed(id: &str, width: f32, height: f32) -> MotionNode {
        MotionNode::container(id).style(Style {
            size: taffy::Size {
                width: Dimension::Length(width),
                height: Dimension::Length(height),
            },
            flex_shrink: 0.0,
            ..Default::default()
        })
    }

    fn column(id: &str) -> MotionNode {
        MotionNode::container(id).style(Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            ..Default::default()
        })
    }

    fn mount(root: MotionNode) -> MotionScene {
        MotionScene::mount(root, Size::new(400.0, 300.0)).unwrap()
    }

    fn run(scene: &mut MotionScene, ms: f32) {
        let frames = (ms / 16.0).ceil() as usize;
        for _ in 0..frames {
            scene.tick(16.0);
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let root = column("root").child(boxed("a", 10.0, 10.0)).child(boxed("a", 10.0, 10.0));
        assert!(matches!(
            MotionScene::mount(root, Size::new(100.0, 100.0)),
            Err(MotionError::DuplicateNode(id)) if id == "a"
        ));
    }

    #[test]
    fn test_layout_is_absolute() {
        let scene = mount(column("root").child(boxed("a", 50.0, 40.0)).child(boxed("b", 50.0, 60.0)));
        assert_eq!(scene.layout_rect("b").unwrap(), Rect::new(0.0, 40.0, 50.0, 60.0));
        assert_eq!(scene.scroll().content_height(), 100.0);
        assert!(matches!(scene.layout_rect("zzz"), Err(MotionError::UnknownNode(_))));
    }

    #[test]
    fn test_delayed_tween() {
        let mut scene = mount(
            column("root").child(
                boxed("a", 10.0, 10.0)
                    .initial(Target::new().opacity(0.0).y(100.0))
                    .animate(Target::new().opacity(1.0).y(0.0))
                    .transition(Transition::tween(1000.0).ease(Easing::EaseOut).delay(200.0)),
            ),
        );
        run(&mut scene, 160.0);
        assert_eq!(scene.number("a", Property::Y).unwrap(), 100.0);

        run(&mut scene, 600.0);
        let y = scene.number("a", Property::Y).unwrap();
        assert!(y < 100.0 && y > 0.0);

        run(&mut scene, 600.0);
        assert_eq!(scene.number("a", Property::Y).unwrap(), 0.0);
        assert_eq!(scene.number("a", Property::Opacity).unwrap(), 1.0);
        assert!(!scene.is_animating());
    }

    #[test]
    fn test_variant_stagger_orders_children() {
        let cell = |id: &str| {
            boxed(id, 10.0, 10.0).variants(
                Variants::new()
                    .with("hidden", Target::new().opacity(0.0))
                    .with("show", Target::new().opacity(1.0)),
            )
        };
        let mut scene = mount(
            column("grid")
                .variants(
                    Variants::new()
                        .with("hidden", Target::new().opacity(0.0))
                        .with(
                            "show",
                            Target::new()
                                .opacity(1.0)
                                .with_transition(Transition::new().stagger_children(250.0)),
                        ),
                )
                .initial_variant("hidden")
                .animate_variant("show")
                .children([cell("c0"), cell("c1"), cell("c2")]),
        );

        assert_eq!(scene.number("c2", Property::Opacity).unwrap(), 0.0);
        run(&mut scene, 400.0);
        assert_eq!(scene.number("c0", Property::Opacity).unwrap(), 1.0);
        assert!(scene.number("c1", Property::Opacity).unwrap() > 0.0);
        assert_eq!(scene.number("c2", Property::Opacity).unwrap(), 0.0);
        assert_eq!(scene.variant("c2").unwrap(), Some("show"));

        run(&mut scene, 800.0);
        assert_eq!(scene.number("c2", Property::Opacity).unwrap(), 1.0);
    }

    #[test]
    fn test_keyframes_with_repeat_finish() {
        let mut scene = mount(
            column("root").child(
                boxed("m", 10.0, 10.0)
                    .animate(Target::new().keyframes(Property::Rotate, [0.0, 90.0, 90.0, 0.0]))
                    .transition(
                        Transition::tween(500.0)
                            .ease(Easing::EaseInOut)
                            .repeat(Repeat::Count(2))
                            .repeat_delay(100.0),
                    ),
            ),
        );
        run(&mut scene, 250.0);
        assert!(scene.number("m", Property::Rotate).unwrap() > 80.0);
        run(&mut scene, 1600.0);
        assert_eq!(scene.number("m", Property::Rotate).unwrap(), 0.0);
        assert!(!scene.is_element_animating("m").unwrap());
    }

    #[test]
    fn test_hover_layers_and_reverts() {
        let mut scene = mount(
            column("root").child(
                boxed("button", 100.0, 50.0)
                    .background(Color::from_hex(0x059669))
                    .while_hover(Target::new().scale(1.1).background_color(Color::from_hex(0xd1d5db)))
                    .while_tap(Target::new().scale(0.9)),
            ),
        );

        scene.handle_event(&Event::pointer(POINTER_MOVE, 50.0, 25.0, 0)).unwrap();
        assert_eq!(scene.gesture_state("button").unwrap(), Some(GestureState::Hovered));
        run(&mut scene, 1000.0);
        assert!((scene.number("button", Property::Scale).unwrap() - 1.1).abs() < 1e-3);
        assert_eq!(
            scene.color("button", Property::BackgroundColor).unwrap().to_rgba8(),
            [0xd1, 0xd5, 0xdb, 255]
        );

        scene.handle_event(&Event::pointer(POINTER_DOWN, 50.0, 25.0, 0)).unwrap();
        run(&mut scene, 1000.0);
        assert!((scene.number("button", Property::Scale).unwrap() - 0.9).abs() < 1e-3);

        scene.handle_event(&Event::pointer(POINTER_UP, 50.0, 25.0, 0)).unwrap();
        scene.handle_event(&Event::pointer(POINTER_MOVE, 300.0, 250.0, 0)).unwrap();
        assert_eq!(scene.gesture_state("button").unwrap(), Some(GestureState::Idle));
        run(&mut scene, 1000.0);
        assert_eq!(scene.number("button", Property::Scale).unwrap(), 1.0);
        assert_eq!(
            scene.color("button", Property::BackgroundColor).unwrap().to_rgba8(),
            [0x05, 0x96, 0x69, 255]
        );
    }

    #[test]
    fn test_drag_is_clamped_and_momentum_stays_inside() {
        let mut scene = mount(
            column("root").child(
                boxed("drag", 50.0, 50.0).drag(
                    DragConfig::new()
                        .constraints(DragConstraints::new(-20.0, 30.0, 20.0, -30.0))
                        .transition(Transition::new().bounce(600.0, 20.0)),
                ),
            ),
        );

        scene.handle_event(&Event::pointer(POINTER_DOWN, 25.0, 25.0, 0)).unwrap();
        assert!(scene.is_dragging("drag").unwrap());
        for step in 1..=10 {
            scene.tick(16.0);
            let p = 25.0 + step as f32 * 40.0;
            scene.handle_event(&Event::pointer(POINTER_MOVE, p, p, 0)).unwrap();
            assert!(scene.number("drag", Property::X).unwrap() <= 30.0);
            assert!(scene.number("drag", Property::Y).unwrap() <= 20.0);
        }
        scene.handle_event(&Event::pointer(POINTER_UP, 425.0, 425.0, 0)).unwrap();
        assert!(!scene.is_dragging("drag").unwrap());

        for _ in 0..200 {
            scene.tick(16.0);
            let x = scene.number("drag", Property::X).unwrap();
            let y = scene.number("drag", Property::Y).unwrap();
            assert!((-30.0..=30.0).contains(&x), "x = {x}");
            assert!((-20.0..=20.0).contains(&y), "y = {y}");
        }
    }

    #[test]
    fn test_elastic_drag_bounces_back() {
        let mut scene = mount(
            column("root").child(
                boxed("drag", 50.0, 50.0).drag(
                    DragConfig::new()
                        .constraints(DragConstraints::new(-20.0, 30.0, 20.0, -30.0))
                        .elastic(0.5)
                        .momentum(false),
                ),
            ),
        );
        scene.handle_event(&Event::pointer(POINTER_DOWN, 25.0, 25.0, 0)).unwrap();
        scene.handle_event(&Event::pointer(POINTER_MOVE, 125.0, 25.0, 0)).unwrap();
        // 100px raw, 30 allowed, half the 70px overshoot
        assert_eq!(scene.number("drag", Property::X).unwrap(), 65.0);

        scene.handle_event(&Event::pointer(POINTER_UP, 125.0, 25.0, 0)).unwrap();
        run(&mut scene, 3000.0);
        assert!((scene.number("drag", Property::X).unwrap() - 30.0).abs() < 0.5);
    }

    #[test]
    fn test_scroll_binding_and_once_observer() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let controls = AnimationControls::new();
        let trigger = controls.clone();

        let mut scene = mount(
            column("root")
                .child(boxed("spacer", 400.0, 500.0))
                .child(
                    boxed("bar", 50.0, 100.0)
                        .origin(0.5, 1.0)
                        .bind_scroll(Property::ScaleY, ScrollSource::Progress),
                )
                .child(
                    boxed("section", 400.0, 100.0)
                        .on_in_view(InViewOptions::once(), move |visible| {
                            if visible {
                                counter.set(counter.get() + 1);
                                trigger.start("visible");
                            }
                        })
                        .child(
                            boxed("heading", 400.0, 50.0)
                                .variants(
                                    Variants::new()
                                        .with("hidden", Target::new().opacity(0.0))
                                        .with("visible", Target::new().opacity(1.0)),
                                )
                                .initial_variant("hidden")
                                .animate_controls(&controls),
                        ),
                ),
        );

        // content 700, viewport 300: 400px of scroll
        assert_eq!(scene.scroll().max_offset(), 400.0);
        assert_eq!(scene.number("bar", Property::ScaleY).unwrap(), 0.0);
        assert_eq!(scene.in_view("section").unwrap(), Some(false));

        scene.scroll_to(100.0);
        assert_eq!(scene.number("bar", Property::ScaleY).unwrap(), 0.25);
        let bar = scene.bounds("bar").unwrap();
        assert_eq!(bar.height(), 25.0);
        assert_eq!(bar.bottom(), 600.0);
        assert_eq!(fired.get(), 0);

        scene.scroll_to(400.0);
        assert_eq!(fired.get(), 1);
        run(&mut scene, 500.0);
        assert_eq!(scene.number("heading", Property::Opacity).unwrap(), 1.0);

        scene.scroll_to(0.0);
        scene.scroll_to(400.0);
        assert_eq!(fired.get(), 1);
        assert_eq!(controls.start_count(), 1);
        assert_eq!(scene.in_view("section").unwrap(), Some(true));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut scene = mount(
            column("root").child(MotionNode::text("t", "hello world").font(20.0, 30.0)),
        );
        scene.tick(16.0);
        let snapshot = scene.snapshot();
        let t = snapshot.element("t").unwrap();
        assert_eq!(t.text.as_deref(), Some("hello world"));
        assert_eq!(t.layout.height(), 30.0);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["elements"][1]["id"], "t");
        assert_eq!(json["elements"][1]["values"]["opacity"], 1.0);
    }
}
