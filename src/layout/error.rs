//! Error types for the layout engine

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("there is no tree to lay out")]
    EmptyTree,

    #[error("node radius must be positive, got {radius}")]
    InvalidRadius { radius: f64 },
}
