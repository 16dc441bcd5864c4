//! SVG renderer for laid-out trees
//!
//! Draws the page background, then for every node its clipped edge to the
//! parent, its circle and its label, each styled from the node's resolved
//! properties.

pub mod config;
pub mod paint;
pub mod svg;

pub use config::SvgConfig;
pub use svg::render_svg;
