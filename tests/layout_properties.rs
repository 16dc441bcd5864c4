//! Structural properties every layout must satisfy

use bitree_viz::parser::{BiTree, NodeIndex};
use bitree_viz::Session;
use proptest::prelude::*;

/// Shape of a strictly binary tree; every inner node has two children
#[derive(Debug, Clone)]
enum Shape {
    Leaf,
    Inner(Box<Shape>, Box<Shape>),
}

impl Shape {
    /// Bracketed notation with labels numbered in pre-order
    fn notation(&self) -> String {
        let mut out = String::new();
        let mut counter = 0;
        self.write(&mut out, &mut counter);
        out
    }

    fn write(&self, out: &mut String, counter: &mut usize) {
        *counter += 1;
        out.push_str(&counter.to_string());
        if let Shape::Inner(left, right) = self {
            out.push('(');
            left.write(out, counter);
            out.push(',');
            right.write(out, counter);
            out.push(')');
        }
    }
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    Just(Shape::Leaf).prop_recursive(10, 160, 2, |inner| {
        (inner.clone(), inner)
            .prop_map(|(left, right)| Shape::Inner(Box::new(left), Box::new(right)))
    })
}

fn complete_tree(depth: usize) -> String {
    complete_subtree(depth, &mut 0)
}

fn complete_subtree(depth: usize, counter: &mut usize) -> String {
    *counter += 1;
    let label = counter.to_string();
    if depth == 1 {
        return label;
    }
    let left = complete_subtree(depth - 1, counter);
    let right = complete_subtree(depth - 1, counter);
    format!("{}({},{})", label, left, right)
}

fn extreme(tree: &BiTree, start: NodeIndex, level: usize, rightmost: bool) -> Option<f64> {
    let nodes = tree.levels_of(start).into_iter().nth(level)?;
    nodes
        .into_iter()
        .map(|index| tree[index].x)
        .reduce(|a, b| if rightmost { a.max(b) } else { a.min(b) })
}

/// Sibling subtrees keep at least twice the horizontal spacing apart on
/// every level they share, and each parent sits between its children.
fn check_no_overlap(source: &str) -> Result<(), TestCaseError> {
    let session = Session::parse(&format!("bitree = {}", source)).expect("Should parse");
    let tree = session.tree();
    let h = session.layout().horizontal_spacing;

    for index in tree.pre_order() {
        let (Some(left), Some(right)) = (tree[index].left, tree[index].right) else {
            continue;
        };
        let shared = tree.depth(left).min(tree.depth(right));
        for level in 0..shared {
            let right_most = extreme(tree, left, level, true).expect("level exists");
            let left_most = extreme(tree, right, level, false).expect("level exists");
            prop_assert!(
                left_most - right_most >= 2.0 * h - 1e-6,
                "subtrees of {} overlap at level {}: {} vs {}",
                tree[index].label,
                level,
                right_most,
                left_most
            );
        }
        let x = tree[index].x;
        prop_assert!(tree[left].x < x && x < tree[right].x);
    }
    Ok(())
}

/// Every node's y is its depth times the vertical spacing.
fn check_depth_matches_y(source: &str) -> Result<(), TestCaseError> {
    let session = Session::parse(&format!("bitree = {}", source)).expect("Should parse");
    let layout = session.layout();
    for node in &layout.nodes {
        let expected = layout.vertical_spacing * node.depth as f64;
        prop_assert!((node.y - expected).abs() < 1e-9);
        if let Some(parent) = layout.parent_of(node) {
            prop_assert_eq!(parent.depth + 1, node.depth);
        }
    }
    Ok(())
}

/// Absolute positions stay inside the page, margins included.
fn check_inside_page(source: &str) -> Result<(), TestCaseError> {
    let session = Session::parse(&format!("bitree = {}", source)).expect("Should parse");
    let layout = session.layout();
    for node in &layout.nodes {
        let p = layout.to_absolute(node);
        prop_assert!(p.x >= layout.page_margin_x - 1e-9);
        prop_assert!(p.x <= layout.page_width - layout.page_margin_x + 1e-9);
        prop_assert!(p.y >= layout.page_margin_y - 1e-9);
        prop_assert!(p.y <= layout.page_height - layout.page_margin_y + 1e-9);
    }
    Ok(())
}

fn check_deterministic(source: &str) -> Result<(), TestCaseError> {
    let source = format!("bitree = {}", source);
    let first = Session::parse(&source).expect("Should parse");
    let second = Session::parse(&source).expect("Should parse");
    prop_assert_eq!(first.layout(), second.layout());
    Ok(())
}

proptest! {
    #[test]
    fn trees_do_not_overlap(shape in shape_strategy()) {
        check_no_overlap(&shape.notation())?;
    }

    #[test]
    fn depth_matches_y(shape in shape_strategy()) {
        check_depth_matches_y(&shape.notation())?;
    }

    #[test]
    fn nodes_stay_inside_page(shape in shape_strategy()) {
        check_inside_page(&shape.notation())?;
    }

    #[test]
    fn layout_is_deterministic(shape in shape_strategy()) {
        check_deterministic(&shape.notation())?;
    }
}

#[test]
fn test_complete_trees_do_not_overlap() {
    for depth in 1..=7 {
        check_no_overlap(&complete_tree(depth)).unwrap();
    }
}

#[test]
fn test_lopsided_trees_do_not_overlap() {
    // a deep right spine under the left child and a deep left spine under the right one
    let mut left = "a0".to_string();
    let mut right = "b0".to_string();
    for i in 1..12 {
        left = format!("a{}(x{},{})", i, i, left);
        right = format!("b{}({},y{})", i, right, i);
    }
    check_no_overlap(&format!("R({},{})", left, right)).unwrap();
}
