//! The motion showcase page
//!
//! A column holding a three-column grid of demonstration cells (fade, morph,
//! hover/tap button, drag, scroll progress, animated icon) followed by a text
//! section whose heading is revealed the first time it scrolls into view.
//!
//! Everything here is literal configuration handed to `kinetic_motion`.

use crate::error::Result;
use kinetic_animation::{Easing, Repeat, RepeatType};
use kinetic_core::Size;
use kinetic_motion::{
    AnimationControls, DragConfig, DragConstraints, InViewOptions, MotionNode, MotionScene,
    Property, ScrollSource, Target, Transition, TransitionMap, Variants,
};
use kinetic_paint::{Color, Path};
use taffy::prelude::{
    fr, AlignItems, Dimension, Display, FlexDirection, JustifyContent, LengthPercentage,
    LengthPercentageAuto, Style,
};

/// Element ids
pub mod ids {
    pub const PAGE: &str = "page";
    pub const GRID: &str = "grid";
    pub const CELL_FADE: &str = "cell-fade";
    pub const FADE_SQUARE: &str = "fade-square";
    pub const FADE_CIRCLE: &str = "fade-circle";
    pub const CELL_MORPH: &str = "cell-morph";
    pub const MORPH: &str = "morph";
    pub const CELL_BUTTON: &str = "cell-button";
    pub const BUTTON: &str = "subscribe";
    pub const CELL_DRAG: &str = "cell-drag";
    pub const DRAG_BOX: &str = "drag-box";
    pub const CELL_PROGRESS: &str = "cell-progress";
    pub const PROGRESS_TRACK: &str = "progress-track";
    pub const PROGRESS_BAR: &str = "progress-bar";
    pub const CELL_ICON: &str = "cell-icon";
    pub const ICON: &str = "icon";
    pub const ICON_PATH: &str = "icon-path";
    pub const TEXT_SECTION: &str = "text-section";
    pub const HEADING: &str = "heading";
    pub const PARAGRAPH_1: &str = "paragraph-1";
    pub const PARAGRAPH_2: &str = "paragraph-2";

    /// Grid cells in document order
    pub const CELLS: [&str; 6] = [CELL_FADE, CELL_MORPH, CELL_BUTTON, CELL_DRAG, CELL_PROGRESS, CELL_ICON];
}

/// Lightning bolt, 24x24 view box
pub const BOLT_PATH: &str = "m3.75 13.5 10.5-11.25L12 10.5h8.25L9.75 21.75 12 13.5H3.75Z";

pub const HEADING_TEXT: &str = "Just keep scrolling";

pub const BODY_TEXT: &str = "Lorem, ipsum dolor sit amet consectetur adipisicing elit. Eaque, libero eum \
deleniti veritatis accusantium excepturi quia tempore error modi odio dicta est. Nostrum, ex ipsam? \
Nemo repellat tenetur aliquid cum.";

/// Drag constraint box around the drag box's layout position
pub const DRAG_CONSTRAINTS: DragConstraints = DragConstraints {
    top: -125.0,
    right: 150.0,
    bottom: 125.0,
    left: -150.0,
};

const GAP: f32 = 40.0;

mod palette {
    pub const SLATE_800: u32 = 0x1e293b;
    pub const SLATE_100: u32 = 0xf1f5f9;
    pub const STONE_100: u32 = 0xf5f5f4;
    pub const ROSE_400: u32 = 0xfb7185;
    pub const EMERALD_600: u32 = 0x059669;
    pub const GRAY_50: u32 = 0xf9fafb;
    pub const GRAY_100: u32 = 0xf3f4f6;
    pub const GRAY_300: u32 = 0xd1d5db;
    pub const GRAY_400: u32 = 0x9ca3af;
    pub const ORANGE_500: u32 = 0xf97316;
    pub const AMBER_500: u32 = 0xf59e0b;
}

fn amber_300(alpha: u8) -> Color {
    Color::from_rgba8(252, 211, 77, alpha)
}

/// The page tree plus the controls that reveal the heading
pub struct Page {
    pub root: MotionNode,
    pub heading_controls: AnimationControls,
}

/// Build the page tree
pub fn build_page() -> Result<Page> {
    let heading_controls = AnimationControls::new();

    let root = MotionNode::container(ids::PAGE)
        .style(column(GAP, Style {
            size: taffy::Size {
                width: Dimension::Percent(1.0),
                height: Dimension::Auto,
            },
            ..Default::default()
        }))
        .child(grid()?)
        .child(text_section(&heading_controls));

    Ok(Page {
        root,
        heading_controls,
    })
}

/// Build and mount the page at a viewport size
pub fn mount_page(viewport: Size) -> Result<MotionScene> {
    let page = build_page()?;
    Ok(MotionScene::mount(page.root, viewport)?)
}

fn column(gap: f32, base: Style) -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        gap: taffy::Size {
            width: LengthPercentage::Length(gap),
            height: LengthPercentage::Length(gap),
        },
        ..base
    }
}

fn fixed(width: Dimension, height: Dimension) -> Style {
    Style {
        size: taffy::Size { width, height },
        flex_shrink: 0.0,
        ..Default::default()
    }
}

fn grid() -> Result<MotionNode> {
    let container_variants = Variants::new()
        .with("hidden", Target::new().opacity(0.0))
        .with(
            "show",
            Target::new()
                .opacity(1.0)
                .with_transition(Transition::new().stagger_children(250.0)),
        );

    let padding = LengthPercentage::Length(GAP);
    Ok(MotionNode::container(ids::GRID)
        .style(Style {
            display: Display::Grid,
            grid_template_columns: vec![fr(1.0), fr(1.0), fr(1.0)],
            gap: taffy::Size {
                width: LengthPercentage::Length(GAP),
                height: LengthPercentage::Length(GAP),
            },
            padding: taffy::Rect {
                left: padding,
                right: padding,
                top: padding,
                bottom: padding,
            },
            ..Default::default()
        })
        .variants(container_variants)
        .initial_variant("hidden")
        .animate_variant("show")
        .child(cell(ids::CELL_FADE).children([fade_square(), fade_circle()]))
        .child(cell(ids::CELL_MORPH).child(morph()))
        .child(cell(ids::CELL_BUTTON).child(button()))
        .child(cell(ids::CELL_DRAG).child(drag_box()))
        .child(cell(ids::CELL_PROGRESS).child(progress_track()))
        .child(cell(ids::CELL_ICON).child(icon()?)))
}

/// Square dark cell centering its content
fn cell(id: &str) -> MotionNode {
    MotionNode::container(id)
        .style(Style {
            display: Display::Flex,
            justify_content: Some(JustifyContent::Center),
            align_items: Some(AlignItems::Center),
            aspect_ratio: Some(1.0),
            gap: taffy::Size {
                width: LengthPercentage::Length(GAP),
                height: LengthPercentage::Length(GAP),
            },
            ..Default::default()
        })
        .background(Color::from_hex(palette::SLATE_800))
        .corner_radius(8.0)
        .variants(
            Variants::new()
                .with("hidden", Target::new().opacity(0.0))
                .with("show", Target::new().opacity(1.0)),
        )
}

fn fade_square() -> MotionNode {
    MotionNode::container(ids::FADE_SQUARE)
        .style(fixed(Dimension::Length(80.0), Dimension::Length(80.0)))
        .background(Color::from_hex(palette::STONE_100))
        .corner_radius(8.0)
        .initial(Target::new().opacity(0.0).y(100.0))
        .animate(Target::new().opacity(1.0).y(0.0))
        .transition(Transition::tween(1000.0).ease(Easing::EaseOut).delay(200.0))
}

fn fade_circle() -> MotionNode {
    MotionNode::container(ids::FADE_CIRCLE)
        .style(fixed(Dimension::Length(80.0), Dimension::Length(80.0)))
        .background(Color::from_hex(palette::STONE_100))
        .corner_radius(40.0)
        .initial(Target::new().opacity(0.0).y(-100.0))
        .animate(Target::new().opacity(1.0).y(0.0))
        .transition(Transition::tween(1000.0).ease(Easing::EaseOut).delay(400.0))
}

fn morph() -> MotionNode {
    let third = Dimension::Percent(1.0 / 3.0);
    MotionNode::container(ids::MORPH)
        .style(fixed(third, third))
        .background(Color::from_hex(palette::ROSE_400))
        .animate(
            Target::new()
                .keyframes(Property::Scale, [1.0, 2.0, 2.0, 1.0])
                .keyframes(Property::Rotate, [0.0, 90.0, 90.0, 0.0])
                .keyframes(Property::BorderRadius, [10.0, 50.0, 50.0, 10.0]),
        )
        .transition(
            Transition::tween(5000.0)
                .ease(Easing::EaseInOut)
                .repeat(Repeat::Count(2))
                .repeat_delay(1000.0),
        )
}

fn button() -> MotionNode {
    let pad = LengthPercentage::Length(16.0);
    MotionNode::button(ids::BUTTON, "Subscribe")
        .style(Style {
            size: taffy::Size {
                width: Dimension::Percent(1.0 / 3.0),
                height: Dimension::Auto,
            },
            padding: taffy::Rect {
                left: pad,
                right: pad,
                top: pad,
                bottom: pad,
            },
            flex_shrink: 0.0,
            ..Default::default()
        })
        .background(Color::from_hex(palette::EMERALD_600))
        .text_color(Color::from_hex(palette::GRAY_100))
        .corner_radius(8.0)
        .font(24.0, 32.0)
        .while_tap(Target::new().scale(0.9))
        .while_hover(
            Target::new()
                .scale(1.1)
                .background_color(Color::from_hex(palette::GRAY_300))
                .text_color(Color::BLACK),
        )
        .transition(Transition::new().bounce(600.0, 20.0))
}

fn drag_box() -> MotionNode {
    let third = Dimension::Percent(1.0 / 3.0);
    MotionNode::container(ids::DRAG_BOX)
        .style(fixed(third, third))
        .background(Color::from_hex(palette::ORANGE_500))
        .corner_radius(24.0)
        .drag(
            DragConfig::new()
                .constraints(DRAG_CONSTRAINTS)
                .transition(Transition::new().bounce(600.0, 20.0)),
        )
}

fn progress_track() -> MotionNode {
    MotionNode::container(ids::PROGRESS_TRACK)
        .style(fixed(Dimension::Length(160.0), Dimension::Length(160.0)))
        .background(Color::from_hex(palette::GRAY_50).with_alpha(0.2))
        .corner_radius(12.0)
        .child(
            MotionNode::container(ids::PROGRESS_BAR)
                .style(fixed(Dimension::Percent(1.0), Dimension::Percent(1.0)))
                .background(Color::from_hex(palette::GRAY_400))
                .corner_radius(12.0)
                .origin(0.5, 1.0)
                .bind_scroll(Property::ScaleY, ScrollSource::Progress),
        )
}

fn icon() -> Result<MotionNode> {
    let bolt = Path::parse_svg(BOLT_PATH)?;

    let variants = Variants::new()
        .with(
            "hidden",
            Target::new().opacity(0.0).path_length(0.0).fill(amber_300(0)),
        )
        .with(
            "visible",
            Target::new().opacity(1.0).path_length(1.0).fill(amber_300(255)),
        );

    let draw = Transition::tween(2000.0)
        .ease(Easing::EaseInOut)
        .delay(1000.0)
        .repeat(Repeat::Infinite)
        .repeat_type(RepeatType::Reverse)
        .repeat_delay(1000.0);
    let fill = Transition::tween(2000.0)
        .ease(Easing::EaseIn)
        .delay(2000.0)
        .repeat(Repeat::Infinite)
        .repeat_type(RepeatType::Reverse)
        .repeat_delay(1000.0);

    Ok(MotionNode::svg(ids::ICON, 24.0)
        .style(Style {
            size: taffy::Size {
                width: Dimension::Percent(0.5),
                height: Dimension::Auto,
            },
            aspect_ratio: Some(1.0),
            flex_shrink: 0.0,
            ..Default::default()
        })
        .stroke(Color::from_hex(palette::AMBER_500), 0.5)
        .child(
            MotionNode::path(ids::ICON_PATH, bolt)
                .style(fixed(Dimension::Percent(1.0), Dimension::Percent(1.0)))
                .stroke(Color::from_hex(palette::AMBER_500), 0.5)
                .variants(variants)
                .initial_variant("hidden")
                .animate_variant("visible")
                .transition(TransitionMap::new(draw).with_override(Property::Fill, fill)),
        ))
}

fn text_section(controls: &AnimationControls) -> MotionNode {
    let trigger = controls.clone();
    let slate_100 = Color::from_hex(palette::SLATE_100);

    let heading = MotionNode::text(ids::HEADING, HEADING_TEXT)
        .text_color(slate_100)
        .font(48.0, 48.0)
        .variants(
            Variants::new()
                .with("hidden", Target::new().opacity(0.0).y(75.0))
                .with("visible", Target::new().opacity(1.0).y(0.0)),
        )
        .initial_variant("hidden")
        .animate_controls(controls)
        .transition(Transition::new().delay(300.0));

    let paragraph = |id: &str| {
        MotionNode::text(id, BODY_TEXT)
            .style(Style {
                size: taffy::Size {
                    width: Dimension::Percent(0.5),
                    height: Dimension::Auto,
                },
                margin: taffy::Rect {
                    left: LengthPercentageAuto::Auto,
                    right: LengthPercentageAuto::Auto,
                    top: LengthPercentageAuto::Length(0.0),
                    bottom: LengthPercentageAuto::Length(0.0),
                },
                ..Default::default()
            })
            .text_color(slate_100)
            .font(36.0, 40.0)
    };

    MotionNode::container(ids::TEXT_SECTION)
        .style(column(GAP, Style {
            margin: taffy::Rect {
                left: LengthPercentageAuto::Length(0.0),
                right: LengthPercentageAuto::Length(0.0),
                top: LengthPercentageAuto::Length(0.0),
                bottom: LengthPercentageAuto::Length(GAP),
            },
            ..Default::default()
        }))
        .on_in_view(InViewOptions::once(), move |visible| {
            if visible {
                trigger.start("visible");
            }
        })
        .child(heading)
        .child(paragraph(ids::PARAGRAPH_1))
        .child(paragraph(ids::PARAGRAPH_2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_builds_every_element() {
        let scene = mount_page(Size::new(1280.0, 720.0)).unwrap();
        let mounted: Vec<&str> = scene.element_ids().collect();
        assert_eq!(mounted.len(), 21);
        for id in ids::CELLS {
            assert!(scene.contains(id), "{id} missing");
        }
        assert_eq!(scene.text(ids::BUTTON).unwrap(), Some("Subscribe"));
        assert_eq!(scene.text(ids::HEADING).unwrap(), Some(HEADING_TEXT));
    }

    #[test]
    fn test_grid_is_three_columns() {
        let scene = mount_page(Size::new(1280.0, 720.0)).unwrap();
        let first = scene.layout_rect(ids::CELL_FADE).unwrap();
        let second = scene.layout_rect(ids::CELL_MORPH).unwrap();
        let fourth = scene.layout_rect(ids::CELL_DRAG).unwrap();

        assert_eq!(first.x(), 40.0);
        assert_eq!(first.y(), 40.0);
        assert!((second.x() - (first.right() + 40.0)).abs() < 0.01);
        assert!((fourth.x() - first.x()).abs() < 0.01);
        assert!(fourth.y() > first.bottom());
    }

    #[test]
    fn test_text_section_starts_below_the_fold() {
        let scene = mount_page(Size::new(1280.0, 720.0)).unwrap();
        let section = scene.layout_rect(ids::TEXT_SECTION).unwrap();
        assert!(section.y() > 720.0);
        assert_eq!(scene.in_view(ids::TEXT_SECTION).unwrap(), Some(false));
        assert!(scene.scroll().max_offset() > 0.0);
    }

    #[test]
    fn test_initial_values() {
        let scene = mount_page(Size::new(1280.0, 720.0)).unwrap();
        assert_eq!(scene.number(ids::GRID, Property::Opacity).unwrap(), 0.0);
        assert_eq!(scene.number(ids::CELL_ICON, Property::Opacity).unwrap(), 0.0);
        assert_eq!(scene.number(ids::FADE_SQUARE, Property::Y).unwrap(), 100.0);
        assert_eq!(scene.number(ids::FADE_CIRCLE, Property::Y).unwrap(), -100.0);
        assert_eq!(scene.number(ids::HEADING, Property::Y).unwrap(), 75.0);
        assert_eq!(scene.number(ids::ICON_PATH, Property::PathLength).unwrap(), 0.0);
        assert_eq!(scene.number(ids::PROGRESS_BAR, Property::ScaleY).unwrap(), 0.0);
        assert_eq!(
            scene.color(ids::ICON_PATH, Property::Fill).unwrap().to_rgba8(),
            [252, 211, 77, 0]
        );
    }

    #[test]
    fn test_bolt_path_parses() {
        let bolt = Path::parse_svg(BOLT_PATH).unwrap();
        assert!(bolt.length() > 40.0);
    }
}
