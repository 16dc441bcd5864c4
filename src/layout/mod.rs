//! Layout engine for placing binary tree nodes on a page

pub mod config;
pub mod engine;
pub mod error;
pub mod types;

pub use config::LayoutConfig;
pub use engine::compute;
pub use error::LayoutError;
pub use types::*;
