//! bitree-viz - Binary tree diagrams from a bracketed text notation
//!
//! This library provides a parser for the tree notation and its property
//! lines, a layout engine that places nodes without overlap, and an SVG
//! renderer.
//!
//! # Example
//!
//! ```rust
//! use bitree_viz::render;
//!
//! let svg = render("bitree = R(L,G)").unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod error;
pub mod layout;
pub mod parser;
pub mod properties;
pub mod renderer;
pub mod session;
pub mod stylesheet;

pub use error::{Diagnostic, ParseError, ParseErrorKind};
pub use layout::{LayoutConfig, LayoutError, LayoutInfo, PlacedNode};
pub use parser::{parse, BiTree};
pub use renderer::{render_svg, SvgConfig};
pub use session::{Session, SessionError};

use thiserror::Error;

// Re-export Stylesheet for public API
pub use stylesheet::Stylesheet;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error while reading the tree or its properties
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

impl From<SessionError> for RenderError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Parse(err) => RenderError::Parse(err),
            SessionError::Layout(err) => RenderError::Layout(err),
        }
    }
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Global property defaults
    pub stylesheet: Stylesheet,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the stylesheet; its `[layout]` table, if any, replaces the
    /// layout configuration
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        if let Some(layout) = &stylesheet.layout {
            self.layout = layout.clone();
        }
        self.stylesheet = stylesheet;
        self
    }
}

/// Render a tree description to SVG with default configuration
///
/// # Example
///
/// ```rust
/// use bitree_viz::render;
///
/// let svg = render("bitree = 1(2,3)\n2[FillColor=0xff0000ff]").unwrap();
/// assert!(svg.contains(r##"fill="#ff0000""##));
/// ```
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, RenderConfig::default())
}

/// Render a tree description to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use bitree_viz::{render_with_config, LayoutConfig, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new()
///     .with_layout(LayoutConfig::default().with_spacing_factor(3.0))
///     .with_svg(SvgConfig::default().with_standalone(false));
///
/// let svg = render_with_config("bitree = A(B,C)", config).unwrap();
/// assert!(svg.starts_with("<svg"));
/// ```
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, RenderError> {
    render_with_diagnostics(source, config).map(|(svg, _)| svg)
}

/// Render a tree description and return the warnings collected on the way
pub fn render_with_diagnostics(
    source: &str,
    config: RenderConfig,
) -> Result<(String, Vec<Diagnostic>), RenderError> {
    let mut session = Session::parse_with(source, &config.layout, &config.stylesheet)?;
    let svg = render_svg(&mut session, &config.svg);
    Ok((svg, session.diagnostics().to_vec()))
}
