//! Integration tests for mounted motion scenes
//!
//! These tests verify that:
//! - Controls drive variant trees with children delays and staggering
//! - Controls `set` jumps without animating and `stop` freezes a tween
//! - Repeating in-view observers report every entry and exit
//! - Elastic drags overshoot their constraints and spring back
//! - Resizes relayout the tree and scroll bindings follow the offset

use kinetic_core::events::event_types::*;
use kinetic_core::{Event, Size};
use kinetic_motion::{
    AnimationControls, DragConfig, DragConstraints, InViewAmount, InViewOptions, MotionNode,
    MotionScene, Property, ScrollSource, Target, Transition, Variants,
};
use std::cell::RefCell;
use std::rc::Rc;
use taffy::prelude::{Dimension, Display, FlexDirection, Style};

fn sized(width: Dimension, height: Dimension) -> Style {
    Style {
        size: taffy::Size { width, height },
        flex_shrink: 0.0,
        ..Default::default()
    }
}

fn column(width: f32) -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        size: taffy::Size {
            width: Dimension::Length(width),
            height: Dimension::Auto,
        },
        ..Default::default()
    }
}

fn block(id: &str, width: f32, height: f32) -> MotionNode {
    MotionNode::container(id).style(sized(Dimension::Length(width), Dimension::Length(height)))
}

fn run_for(scene: &mut MotionScene, ms: u32, step_ms: u32) {
    for _ in 0..ms / step_ms {
        scene.tick(step_ms as f32);
    }
}

/// Test that controls start a variant that reaches children in stagger order
#[test]
fn test_controls_drive_staggered_children() {
    let controls = AnimationControls::new();
    let fade = || {
        Variants::new()
            .with("closed", Target::new().opacity(0.0))
            .with("open", Target::new().opacity(1.0))
    };

    let root = MotionNode::container("menu")
        .style(column(200.0))
        .variants(
            Variants::new().with("closed", Target::new().opacity(0.0)).with(
                "open",
                Target::new().opacity(1.0).with_transition(
                    Transition::tween(50.0)
                        .delay_children(100.0)
                        .stagger_children(50.0),
                ),
            ),
        )
        .initial_variant("closed")
        .animate_controls(&controls)
        .children([
            block("first", 200.0, 40.0)
                .variants(fade())
                .transition(Transition::tween(100.0)),
            // No variants: skipped when counting stagger slots
            block("divider", 200.0, 2.0),
            block("second", 200.0, 40.0)
                .variants(fade())
                .transition(Transition::tween(100.0)),
        ]);

    let mut scene = MotionScene::mount(root, Size::new(400.0, 400.0)).unwrap();
    assert_eq!(scene.variant("first").unwrap(), Some("closed"));
    assert_eq!(scene.number("second", Property::Opacity).unwrap(), 0.0);

    run_for(&mut scene, 200, 10);
    assert_eq!(scene.number("menu", Property::Opacity).unwrap(), 0.0);

    controls.start("open");
    run_for(&mut scene, 140, 10);
    assert!(scene.number("first", Property::Opacity).unwrap() > 0.0);
    assert_eq!(scene.number("second", Property::Opacity).unwrap(), 0.0);

    run_for(&mut scene, 60, 10);
    assert!(scene.number("second", Property::Opacity).unwrap() > 0.0);

    run_for(&mut scene, 500, 10);
    assert_eq!(scene.variant("menu").unwrap(), Some("open"));
    assert_eq!(scene.variant("divider").unwrap(), None);
    for id in ["menu", "first", "second"] {
        assert!((scene.number(id, Property::Opacity).unwrap() - 1.0).abs() < 1e-3, "{id}");
    }
    assert!(!scene.is_animating());

    controls.start("closed");
    run_for(&mut scene, 1000, 10);
    assert!(scene.number("second", Property::Opacity).unwrap() < 1e-3);
    assert_eq!(controls.start_count(), 2);
}

fn controlled_heading(controls: &AnimationControls) -> MotionNode {
    MotionNode::container("page").style(column(400.0)).child(
        block("heading", 400.0, 60.0)
            .variants(
                Variants::new()
                    .with("hidden", Target::new().opacity(0.0).y(50.0))
                    .with("visible", Target::new().opacity(1.0).y(0.0)),
            )
            .initial_variant("hidden")
            .animate_controls(controls)
            .transition(Transition::tween(1000.0)),
    )
}

/// Test that `set` jumps bound elements to a variant without animating
#[test]
fn test_controls_set_jumps_without_animating() {
    let controls = AnimationControls::new();
    let mut scene = MotionScene::mount(controlled_heading(&controls), Size::new(400.0, 400.0)).unwrap();
    assert_eq!(scene.number("heading", Property::Y).unwrap(), 50.0);

    controls.set("visible");
    scene.tick(16.0);
    assert_eq!(scene.number("heading", Property::Opacity).unwrap(), 1.0);
    assert_eq!(scene.number("heading", Property::Y).unwrap(), 0.0);
    assert!(!scene.is_element_animating("heading").unwrap());
    assert_eq!(scene.variant("heading").unwrap(), Some("visible"));

    // A running tween is cancelled by a later `set`
    controls.start("hidden");
    run_for(&mut scene, 200, 10);
    assert!(scene.is_element_animating("heading").unwrap());
    controls.set("visible");
    scene.tick(16.0);
    assert!(!scene.is_element_animating("heading").unwrap());
    assert_eq!(scene.number("heading", Property::Opacity).unwrap(), 1.0);
    run_for(&mut scene, 1500, 10);
    assert_eq!(scene.number("heading", Property::Y).unwrap(), 0.0);
    assert_eq!(controls.start_count(), 1);
}

/// Test that `stop` freezes a running tween at its current value
#[test]
fn test_controls_stop_freezes_tween() {
    let controls = AnimationControls::new();
    let mut scene = MotionScene::mount(controlled_heading(&controls), Size::new(400.0, 400.0)).unwrap();

    controls.start("visible");
    run_for(&mut scene, 400, 10);
    let opacity = scene.number("heading", Property::Opacity).unwrap();
    let y = scene.number("heading", Property::Y).unwrap();
    assert!(opacity > 0.0 && opacity < 1.0, "mid-tween opacity {opacity}");
    assert!(scene.is_element_animating("heading").unwrap());

    controls.stop();
    run_for(&mut scene, 1600, 10);
    assert!(!scene.is_element_animating("heading").unwrap());
    assert_eq!(scene.number("heading", Property::Opacity).unwrap(), opacity);
    assert_eq!(scene.number("heading", Property::Y).unwrap(), y);
}

/// Test that consumed commands leave the controls queue
#[test]
fn test_controls_queue_drains_after_tick() {
    let controls = AnimationControls::new();
    let mut scene = MotionScene::mount(controlled_heading(&controls), Size::new(400.0, 400.0)).unwrap();

    for _ in 0..500 {
        controls.start("visible");
        controls.start("hidden");
        scene.tick(16.0);
        assert_eq!(controls.pending(), 0);
    }
    assert_eq!(controls.start_count(), 1000);

    // Unmounted scenes no longer hold commands back
    drop(scene);
    let mut other = MotionScene::mount(controlled_heading(&controls), Size::new(400.0, 400.0)).unwrap();
    controls.set("visible");
    other.tick(16.0);
    assert_eq!(controls.pending(), 0);
    assert_eq!(other.number("heading", Property::Opacity).unwrap(), 1.0);
}

/// Test that an observer without `once` reports every visibility change
#[test]
fn test_repeating_observer_reports_entries_and_exits() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();

    let root = MotionNode::container("page")
        .style(column(400.0))
        .child(block("top", 400.0, 1000.0))
        .child(
            block("target", 400.0, 100.0).on_in_view(
                InViewOptions::new().amount(InViewAmount::All),
                move |visible| sink.borrow_mut().push(visible),
            ),
        )
        .child(block("bottom", 400.0, 500.0));
    let mut scene = MotionScene::mount(root, Size::new(400.0, 720.0)).unwrap();
    assert_eq!(scene.scroll().max_offset(), 880.0);
    assert_eq!(scene.in_view("target").unwrap(), Some(false));

    // Partly visible is not enough for `All`
    scene.scroll_to(330.0);
    assert!(seen.borrow().is_empty());

    scene.scroll_to(400.0);
    scene.scroll_to(0.0);
    scene.scroll_to(500.0);
    assert_eq!(*seen.borrow(), vec![true, false, true]);
    assert_eq!(scene.in_view("target").unwrap(), Some(true));
    assert_eq!(scene.in_view("top").unwrap(), None);
}

/// Test that an elastic drag overshoots and bounces back to the edge
#[test]
fn test_elastic_drag_bounces_back() {
    let root = MotionNode::container("stage")
        .style(sized(Dimension::Length(400.0), Dimension::Length(400.0)))
        .child(
            block("puck", 100.0, 100.0).drag(
                DragConfig::new()
                    .constraints(DragConstraints::new(-50.0, 50.0, 50.0, -50.0))
                    .elastic(0.5)
                    .momentum(false)
                    .transition(Transition::new().bounce(500.0, 25.0)),
            ),
        );
    let mut scene = MotionScene::mount(root, Size::new(400.0, 400.0)).unwrap();

    let press = |scene: &mut MotionScene, event_type, x, y| {
        let event = Event::pointer(event_type, x, y, scene.time_ms() as u64);
        scene.handle_event(&event).unwrap();
    };

    press(&mut scene, POINTER_DOWN, 50.0, 50.0);
    assert!(scene.is_dragging("puck").unwrap());
    for i in 1..=10 {
        scene.tick(16.0);
        press(&mut scene, POINTER_MOVE, 50.0 + 20.0 * i as f32, 50.0);
    }
    // 200 px of pointer travel, 150 of it past the edge at half strength
    assert!((scene.number("puck", Property::X).unwrap() - 125.0).abs() < 1e-3);
    assert_eq!(scene.number("puck", Property::Y).unwrap(), 0.0);

    press(&mut scene, POINTER_UP, 250.0, 50.0);
    assert!(scene.is_element_animating("puck").unwrap());
    run_for(&mut scene, 3000, 16);
    assert!((scene.number("puck", Property::X).unwrap() - 50.0).abs() < 0.5);
    assert!(!scene.is_element_animating("puck").unwrap());

    // The visual bounds follow the drag offset
    let bounds = scene.bounds("puck").unwrap();
    assert!((bounds.x() - 50.0).abs() < 0.5);
}

/// Test that resizing relayouts percentages and updates the scroll extent
#[test]
fn test_resize_relayouts_tree() {
    let root = MotionNode::container("page")
        .style(Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            size: taffy::Size {
                width: Dimension::Percent(1.0),
                height: Dimension::Auto,
            },
            ..Default::default()
        })
        .child(
            MotionNode::container("half")
                .style(sized(Dimension::Percent(0.5), Dimension::Length(900.0))),
        );
    let mut scene = MotionScene::mount(root, Size::new(800.0, 600.0)).unwrap();
    assert_eq!(scene.layout_rect("half").unwrap().width(), 400.0);
    assert_eq!(scene.scroll().max_offset(), 300.0);

    let event = Event::resize(400, 800, 0);
    scene.handle_event(&event).unwrap();
    assert_eq!(scene.viewport(), Size::new(400.0, 800.0));
    assert_eq!(scene.layout_rect("half").unwrap().width(), 200.0);
    assert_eq!(scene.scroll().max_offset(), 100.0);
}

/// Test offset bindings and opacity inherited through ancestors
#[test]
fn test_offset_binding_and_inherited_opacity() {
    let root = MotionNode::container("page")
        .style(column(400.0))
        .initial(Target::new().opacity(0.5))
        .child(
            block("parallax", 400.0, 100.0)
                .initial(Target::new().opacity(0.5))
                .bind_scroll(Property::Y, ScrollSource::Offset),
        )
        .child(block("filler", 400.0, 2000.0));
    let mut scene = MotionScene::mount(root, Size::new(400.0, 720.0)).unwrap();

    assert!((scene.effective_opacity("parallax").unwrap() - 0.25).abs() < 1e-6);

    scene.scroll_to(120.0);
    assert_eq!(scene.number("parallax", Property::Y).unwrap(), 120.0);
    let event = Event::scroll(0.0, 30.0, 0);
    scene.handle_event(&event).unwrap();
    assert_eq!(scene.number("parallax", Property::Y).unwrap(), 150.0);
}
