//! Core types for the layout engine

use std::fmt;

use crate::parser::NodeIndex;

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A tree node with its final, tree-relative position
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub index: NodeIndex,
    pub label: String,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    /// Position of the parent in [`LayoutInfo::nodes`]
    pub parent: Option<usize>,
}

/// Output of the layout engine
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutInfo {
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub page_margin_x: f64,
    pub page_margin_y: f64,
    pub page_width: f64,
    pub page_height: f64,
    /// Shift that makes every node x non-negative
    pub tree_offset_x: f64,
    pub radius: f64,
    /// Nodes in pre-order
    pub nodes: Vec<PlacedNode>,
}

impl LayoutInfo {
    pub fn to_absolute_x(&self, x: f64) -> f64 {
        x + self.tree_offset_x + self.page_margin_x
    }

    pub fn to_absolute_y(&self, y: f64) -> f64 {
        y + self.page_margin_y
    }

    /// Page coordinates of a placed node
    pub fn to_absolute(&self, node: &PlacedNode) -> Point {
        Point::new(self.to_absolute_x(node.x), self.to_absolute_y(node.y))
    }

    pub fn parent_of(&self, node: &PlacedNode) -> Option<&PlacedNode> {
        node.parent.and_then(|index| self.nodes.get(index))
    }

    pub fn find(&self, label: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|node| node.label == label)
    }
}

impl fmt::Display for LayoutInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "page {:.1} x {:.1}, radius {:.1}, offset {:.1}",
            self.page_width, self.page_height, self.radius, self.tree_offset_x
        )?;
        for node in &self.nodes {
            writeln!(
                f,
                "{}{} ({:.1}, {:.1})",
                "  ".repeat(node.depth),
                node.label,
                node.x,
                node.y
            )?;
        }
        Ok(())
    }
}
