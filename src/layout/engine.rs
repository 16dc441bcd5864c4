//! Layout computation engine
//!
//! Places a binary tree in three passes:
//!
//! 1. **Levels**: breadth-first, every node gets `y = depth * v` and its
//!    parent link is refreshed.
//! 2. **Relative x**: post-order, leaves start at 0 and every parent is
//!    centered over its children. Before centering, the right subtree is
//!    pushed right until no level of it comes closer than `2h` to the left
//!    subtree.
//! 3. **Finalize**: pre-order, accumulated subtree offsets are folded into
//!    x and the page extent is measured.
//!
//! All passes are iterative.

use log::debug;

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::types::{LayoutInfo, PlacedNode};
use crate::parser::{BiTree, NodeIndex};
use crate::properties::StyleAggregate;

/// Lay out `tree` with nodes of the given radius
///
/// Node coordinates are written back into the tree and collected, in
/// pre-order, into the returned [`LayoutInfo`].
pub fn compute(
    tree: &mut BiTree,
    radius: f64,
    style: &StyleAggregate,
    config: &LayoutConfig,
) -> Result<LayoutInfo, LayoutError> {
    let root = tree.root().ok_or(LayoutError::EmptyTree)?;
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(LayoutError::InvalidRadius { radius });
    }

    let (h, v) = config.spacing(radius, style);
    let (margin_x, margin_y) = config.margins(radius, style);
    let layouter = Layouter { h, v };

    let depths = layouter.assign_levels(tree, root);
    layouter.assign_relative_x(tree);
    let mut info = LayoutInfo {
        horizontal_spacing: h,
        vertical_spacing: v,
        page_margin_x: margin_x,
        page_margin_y: margin_y,
        page_width: 0.0,
        page_height: 0.0,
        tree_offset_x: 0.0,
        radius: radius + f64::from(style.extend.radius_increment),
        nodes: Vec::with_capacity(tree.len()),
    };
    layouter.finalize(tree, &depths, &mut info);

    debug!(
        nodes = info.nodes.len(),
        width = info.page_width,
        height = info.page_height,
        radius = info.radius;
        "Layout computed"
    );
    Ok(info)
}

struct Layouter {
    h: f64,
    v: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Leftmost,
    Rightmost,
}

impl Layouter {
    /// Pass 1: returns the depth of every node, indexed by arena position
    fn assign_levels(&self, tree: &mut BiTree, root: NodeIndex) -> Vec<usize> {
        let mut depths = vec![0; tree.len()];
        tree[root].parent = None;
        for (depth, level) in tree.levels_of(root).into_iter().enumerate() {
            for index in level {
                depths[index.index()] = depth;
                let node = &mut tree[index];
                node.y = self.v * depth as f64;
                node.x = 0.0;
                node.subtree_offset_x = 0.0;
                let children = [node.left, node.right];
                for child in children.into_iter().flatten() {
                    tree[child].parent = Some(index);
                }
            }
        }
        depths
    }

    /// Pass 2
    fn assign_relative_x(&self, tree: &mut BiTree) {
        for index in tree.post_order() {
            let x = match (tree[index].left, tree[index].right) {
                (None, None) => 0.0,
                (Some(left), None) => tree[left].x + self.h,
                (None, Some(right)) => tree[right].x - self.h,
                (Some(left), Some(right)) => self.middle_x(tree, left, right),
            };
            tree[index].x = x;
        }
    }

    /// Separate two sibling subtrees and return the x that centers their
    /// parent between them
    fn middle_x(&self, tree: &mut BiTree, left: NodeIndex, right: NodeIndex) -> f64 {
        // only levels both subtrees reach can collide
        let (mut left_level, mut right_level) = (vec![left], vec![right]);
        while !left_level.is_empty() && !right_level.is_empty() {
            let right_most = extreme_x(tree, left, &left_level, Edge::Rightmost);
            let left_most = extreme_x(tree, right, &right_level, Edge::Leftmost);
            let required = right_most + 2.0 * self.h;
            if required > left_most {
                tree[right].subtree_offset_x += required - left_most;
            }
            left_level = tree.next_level(&left_level);
            right_level = tree.next_level(&right_level);
        }

        let left_x = tree[left].x + tree[left].subtree_offset_x;
        let right_x = tree[right].x + tree[right].subtree_offset_x;
        left_x + (right_x - left_x) / 2.0
    }

    /// Pass 3
    fn finalize(&self, tree: &mut BiTree, depths: &[usize], info: &mut LayoutInfo) {
        let (mut min_x, mut max_x, mut max_y) = (0.0_f64, 0.0_f64, 0.0_f64);
        let mut positions: Vec<Option<usize>> = vec![None; tree.len()];

        for index in tree.pre_order() {
            let parent = tree[index].parent;
            if let Some(parent) = parent {
                let inherited = tree[parent].subtree_offset_x;
                tree[index].subtree_offset_x += inherited;
            }
            let node = &mut tree[index];
            node.x += node.subtree_offset_x;

            min_x = min_x.min(node.x);
            max_x = max_x.max(node.x);
            max_y = max_y.max(node.y);

            positions[index.index()] = Some(info.nodes.len());
            info.nodes.push(PlacedNode {
                index,
                label: node.label.clone(),
                depth: depths[index.index()],
                x: node.x,
                y: node.y,
                parent: parent.and_then(|p| positions[p.index()]),
            });
        }

        info.page_width = 2.0 * info.page_margin_x + (max_x - min_x);
        info.page_height = 2.0 * info.page_margin_y + max_y;
        info.tree_offset_x = if min_x < 0.0 { -min_x } else { 0.0 };
    }
}

/// Effective x of the outermost node among `level`, one level of the
/// subtree rooted at `start`
///
/// Effective x adds every subtree offset from the node up to and including
/// `start`.
fn extreme_x(tree: &BiTree, start: NodeIndex, level: &[NodeIndex], edge: Edge) -> f64 {
    let xs = level.iter().map(|&index| effective_x(tree, start, index));
    match edge {
        Edge::Leftmost => xs.fold(f64::INFINITY, f64::min),
        Edge::Rightmost => xs.fold(f64::NEG_INFINITY, f64::max),
    }
}

fn effective_x(tree: &BiTree, start: NodeIndex, index: NodeIndex) -> f64 {
    let mut x = tree[index].x;
    let mut cursor = Some(index);
    while let Some(current) = cursor {
        x += tree[current].subtree_offset_x;
        if current == start {
            break;
        }
        cursor = tree[current].parent;
    }
    x
}
