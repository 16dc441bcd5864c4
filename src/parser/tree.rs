//! Arena-backed binary tree
//!
//! Nodes live in a single `Vec` and refer to each other through
//! [`NodeIndex`] handles. Every traversal here is iterative, so tree depth is
//! bounded by memory rather than by the call stack.

use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

/// Handle to a node inside a [`BiTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub label: String,
    pub left: Option<NodeIndex>,
    pub right: Option<NodeIndex>,
    pub parent: Option<NodeIndex>,
    /// Horizontal position, relative until layout finalizes it
    pub x: f64,
    pub y: f64,
    /// Accumulated horizontal shift applied to this node's whole subtree
    pub subtree_offset_x: f64,
}

impl TreeNode {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            left: None,
            right: None,
            parent: None,
            x: 0.0,
            y: 0.0,
            subtree_offset_x: 0.0,
        }
    }
}

/// Which link of a node a child hangs from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Default)]
pub struct BiTree {
    nodes: Vec<TreeNode>,
    root: Option<NodeIndex>,
}

impl BiTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree holding just one node
    pub fn single(label: impl Into<String>) -> Self {
        let mut tree = Self::new();
        let root = tree.add_node(label);
        tree.set_root(root);
        tree
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    pub fn set_root(&mut self, index: NodeIndex) {
        self.nodes[index.0].parent = None;
        self.root = Some(index);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a detached node to the arena
    pub fn add_node(&mut self, label: impl Into<String>) -> NodeIndex {
        self.nodes.push(TreeNode::new(label));
        NodeIndex(self.nodes.len() - 1)
    }

    /// Hang `child` from `parent` on the given side
    pub fn attach(&mut self, parent: NodeIndex, side: Side, child: NodeIndex) {
        match side {
            Side::Left => self.nodes[parent.0].left = Some(child),
            Side::Right => self.nodes[parent.0].right = Some(child),
        }
        self.nodes[child.0].parent = Some(parent);
    }

    pub fn children(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let node = &self.nodes[index.0];
        node.left.into_iter().chain(node.right)
    }

    /// Nodes in root-left-right order
    pub fn pre_order(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeIndex> = self.root.into_iter().collect();
        while let Some(index) = stack.pop() {
            order.push(index);
            let node = &self.nodes[index.0];
            stack.extend(node.right);
            stack.extend(node.left);
        }
        order
    }

    /// Nodes in left-right-root order
    ///
    /// Uses two stacks: the first visits root-right-left, the second reverses
    /// that visit into a post-order.
    pub fn post_order(&self) -> Vec<NodeIndex> {
        let mut pending: Vec<NodeIndex> = self.root.into_iter().collect();
        let mut visited = Vec::with_capacity(self.nodes.len());
        while let Some(index) = pending.pop() {
            visited.push(index);
            let node = &self.nodes[index.0];
            pending.extend(node.left);
            pending.extend(node.right);
        }
        visited.reverse();
        visited
    }

    /// Nodes grouped by level, root level first
    pub fn levels(&self) -> Vec<Vec<NodeIndex>> {
        self.root.map(|root| self.levels_of(root)).unwrap_or_default()
    }

    /// Levels of the subtree rooted at `start`
    pub fn levels_of(&self, start: NodeIndex) -> Vec<Vec<NodeIndex>> {
        let mut levels = Vec::new();
        let mut current = vec![start];
        while !current.is_empty() {
            let next = self.next_level(&current);
            levels.push(current);
            current = next;
        }
        levels
    }

    /// Children of `level`, left to right
    pub fn next_level(&self, level: &[NodeIndex]) -> Vec<NodeIndex> {
        level
            .iter()
            .flat_map(|&index| self.children(index))
            .collect()
    }

    /// Number of levels in the subtree rooted at `start`
    pub fn depth(&self, start: NodeIndex) -> usize {
        let mut depth = 0;
        let mut queue = VecDeque::from([(start, 1usize)]);
        while let Some((index, level)) = queue.pop_front() {
            depth = depth.max(level);
            for child in self.children(index) {
                queue.push_back((child, level + 1));
            }
        }
        depth
    }
}

impl Index<NodeIndex> for BiTree {
    type Output = TreeNode;

    fn index(&self, index: NodeIndex) -> &TreeNode {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeIndex> for BiTree {
    fn index_mut(&mut self, index: NodeIndex) -> &mut TreeNode {
        &mut self.nodes[index.0]
    }
}
