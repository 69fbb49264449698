//! Layout tree management
//!
//! Wraps a taffy tree keyed by scene node ids. Text leaves carry a
//! [`TextContext`] and are measured with a fixed-advance font model: every
//! glyph is `CHAR_WIDTH_EM` of the font size wide, lines break greedily at
//! spaces, and a word longer than the line overflows instead of breaking.

use crate::error::Result;
use crate::scene::NodeId;
use kinetic_core::Rect;
use slotmap::SecondaryMap;
use taffy::prelude::{AvailableSpace, NodeId as TaffyNodeId, Style, TaffyTree};

/// Glyph advance as a fraction of the font size
pub const CHAR_WIDTH_EM: f32 = 0.5;

/// Text measured by the layout
#[derive(Clone, Debug, PartialEq)]
pub struct TextContext {
    pub text: String,
    pub font_size: f32,
    pub line_height: f32,
}

impl TextContext {
    fn char_width(&self) -> f32 {
        self.font_size * CHAR_WIDTH_EM
    }

    fn word_width(&self, word: &str) -> f32 {
        word.chars().count() as f32 * self.char_width()
    }

    /// Width of the text on one line
    pub fn natural_width(&self) -> f32 {
        self.text.chars().count() as f32 * self.char_width()
    }

    /// Width of the longest word
    pub fn min_width(&self) -> f32 {
        self.text
            .split_whitespace()
            .map(|w| self.word_width(w))
            .fold(0.0, f32::max)
    }

    /// Greedy line breaking; returns the width of each line
    pub fn wrap(&self, max_width: f32) -> Vec<f32> {
        let space = self.char_width();
        let mut lines = Vec::new();
        let mut current: Option<f32> = None;

        for word in self.text.split_whitespace() {
            let width = self.word_width(word);
            current = match current {
                Some(line) if line + space + width <= max_width + 0.01 => Some(line + space + width),
                Some(line) => {
                    lines.push(line);
                    Some(width)
                }
                None => Some(width),
            };
        }
        if let Some(line) = current {
            lines.push(line);
        }
        lines
    }

    pub fn measure(
        &self,
        known: taffy::Size<Option<f32>>,
        available: taffy::Size<AvailableSpace>,
    ) -> taffy::Size<f32> {
        let max_width = known.width.unwrap_or(match available.width {
            AvailableSpace::Definite(width) => width,
            AvailableSpace::MinContent => self.min_width(),
            AvailableSpace::MaxContent => self.natural_width(),
        });
        let lines = self.wrap(max_width);
        let widest = lines.iter().copied().fold(0.0, f32::max);

        taffy::Size {
            width: known.width.unwrap_or(widest),
            height: known
                .height
                .unwrap_or(lines.len() as f32 * self.line_height),
        }
    }
}

/// Maps scene node ids to taffy nodes
pub struct LayoutTree {
    taffy: TaffyTree<TextContext>,
    node_map: SecondaryMap<NodeId, TaffyNodeId>,
    rects: SecondaryMap<NodeId, Rect>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
            node_map: SecondaryMap::new(),
            rects: SecondaryMap::new(),
        }
    }

    /// Create a layout node, measured as text when `text` is given
    pub fn create_node(&mut self, id: NodeId, style: Style, text: Option<TextContext>) -> Result<()> {
        let taffy_node = match text {
            Some(context) => self.taffy.new_leaf_with_context(style, context)?,
            None => self.taffy.new_leaf(style)?,
        };
        self.node_map.insert(id, taffy_node);
        Ok(())
    }

    /// Add a child to a parent node
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if let (Some(&parent_node), Some(&child_node)) =
            (self.node_map.get(parent), self.node_map.get(child))
        {
            self.taffy.add_child(parent_node, child_node)?;
        }
        Ok(())
    }

    /// Lay out the tree at `width`, then resolve absolute rects
    pub fn compute(&mut self, root: NodeId, width: f32) -> Result<()> {
        let Some(&root_node) = self.node_map.get(root) else {
            return Ok(());
        };

        let available = taffy::Size {
            width: AvailableSpace::Definite(width),
            height: AvailableSpace::MaxContent,
        };
        self.taffy.compute_layout_with_measure(
            root_node,
            available,
            |known, available, _node, context, _style| match context {
                Some(text) => text.measure(known, available),
                None => taffy::Size::ZERO,
            },
        )?;

        let by_taffy: std::collections::HashMap<TaffyNodeId, NodeId> =
            self.node_map.iter().map(|(id, &node)| (node, id)).collect();
        self.rects.clear();
        self.resolve(root_node, 0.0, 0.0, &by_taffy)?;
        Ok(())
    }

    fn resolve(
        &mut self,
        node: TaffyNodeId,
        parent_x: f32,
        parent_y: f32,
        by_taffy: &std::collections::HashMap<TaffyNodeId, NodeId>,
    ) -> Result<()> {
        let layout = *self.taffy.layout(node)?;
        let x = parent_x + layout.location.x;
        let y = parent_y + layout.location.y;
        if let Some(&id) = by_taffy.get(&node) {
            self.rects
                .insert(id, Rect::new(x, y, layout.size.width, layout.size.height));
        }
        for child in self.taffy.children(node)? {
            self.resolve(child, x, y, by_taffy)?;
        }
        Ok(())
    }

    /// Absolute rect from the last `compute`, in document coordinates
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.rects.get(id).copied()
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}
