//! Configuration for the layout engine

use serde::Deserialize;

use crate::properties::StyleAggregate;

/// Geometry factors for tree layout
///
/// Spacing and margins scale with the node radius; the style's increments
/// are added on top.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Multiple of the radius between a parent and a child, measured along
    /// the edge
    pub spacing_factor: f64,

    /// Multiple of the radius reserved around the tree (halved per side)
    pub margin_factor: f64,

    /// Fixed page margin added on every side
    pub margin_base: f64,

    /// Average glyph width as a fraction of the font size
    pub glyph_width_ratio: f64,

    /// Smallest radius `best_radius` returns
    pub min_radius: f64,
}

const SIN_30: f64 = 0.5;
const SIN_60: f64 = 0.866_025_403_784_438_6;

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing_factor: 2.1,
            margin_factor: 2.5,
            margin_base: 5.0,
            glyph_width_ratio: 0.7,
            min_radius: 2.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spacing_factor(mut self, factor: f64) -> Self {
        self.spacing_factor = factor;
        self
    }

    pub fn with_margin(mut self, base: f64, factor: f64) -> Self {
        self.margin_base = base;
        self.margin_factor = factor;
        self
    }

    pub fn with_glyph_width_ratio(mut self, ratio: f64) -> Self {
        self.glyph_width_ratio = ratio;
        self
    }

    pub fn with_min_radius(mut self, radius: f64) -> Self {
        self.min_radius = radius;
        self
    }

    /// Horizontal and vertical distance between a parent and its children
    pub fn spacing(&self, radius: f64, style: &StyleAggregate) -> (f64, f64) {
        let reach = self.spacing_factor * radius;
        (
            SIN_30 * reach + f64::from(style.extend.edge_x_increment),
            SIN_60 * reach + f64::from(style.extend.edge_y_increment),
        )
    }

    /// Page margins on the x and y axes
    pub fn margins(&self, radius: f64, style: &StyleAggregate) -> (f64, f64) {
        let base = self.margin_base + SIN_30 * self.margin_factor * radius;
        (
            base + f64::from(style.extend.page_margin_x_increment),
            base + f64::from(style.extend.page_margin_y_increment),
        )
    }

    /// Radius that fits a label of `label_len` characters at the style's
    /// font size
    pub fn best_radius(&self, label_len: usize, style: &StyleAggregate) -> f64 {
        let mut glyph = self.glyph_width_ratio * f64::from(style.extend.font_size);
        if style.extend.font_weight > 0 {
            glyph *= 1.1;
        }
        (label_len as f64 * glyph / 2.0).max(self.min_radius)
    }
}
