//! Parser for the bracketed binary tree notation

mod grammar;
pub mod lexer;
pub mod tree;

pub use grammar::{parse, ParsedTree};
pub use tree::{BiTree, NodeIndex, Side, TreeNode};
