//! SVG generation from a laid-out session

use log::{debug, warn};

use crate::layout::{LayoutInfo, PlacedNode};
use crate::properties::StyleAggregate;
use crate::session::Session;

use super::paint::{clip_edge, fmt_num, parse_dash, Rgba};
use super::SvgConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    background: Option<String>,
    edges: Vec<String>,
    nodes: Vec<String>,
    labels: Vec<String>,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            background: None,
            edges: vec![],
            nodes: vec![],
            labels: vec![],
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> &str {
        if self.config.pretty_print {
            "  "
        } else {
            ""
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Fill the whole page
    pub fn add_background(&mut self, width: f64, height: f64, color: Rgba) {
        self.background = Some(format!(
            r#"{}<rect class="{}background" x="0" y="0" width="{}" height="{}"{}/>"#,
            self.indent_str(),
            self.prefix(),
            fmt_num(width),
            fmt_num(height),
            color.attrs("fill")
        ));
    }

    /// Add an edge line
    pub fn add_edge(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, styles: &str) {
        self.edges.push(format!(
            r#"{}<line class="{}edge" x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            self.indent_str(),
            self.prefix(),
            fmt_num(x1),
            fmt_num(y1),
            fmt_num(x2),
            fmt_num(y2),
            styles
        ));
    }

    /// Add a node circle
    ///
    /// `id` is the node's arena position; labels may repeat, so they go into
    /// `data-label` instead.
    pub fn add_circle(&mut self, id: usize, label: &str, cx: f64, cy: f64, r: f64, styles: &str) {
        self.nodes.push(format!(
            r#"{}<circle id="{}n{}" class="{}node" data-label="{}" cx="{}" cy="{}" r="{}"{}/>"#,
            self.indent_str(),
            self.prefix(),
            id,
            self.prefix(),
            escape_xml(label),
            fmt_num(cx),
            fmt_num(cy),
            fmt_num(r),
            styles
        ));
    }

    /// Add a label centered on a point
    pub fn add_text(&mut self, text: &str, x: f64, y: f64, styles: &str) {
        self.labels.push(format!(
            r#"{}<text class="{}label" x="{}" y="{}" text-anchor="middle" dominant-baseline="central"{}>{}</text>"#,
            self.indent_str(),
            self.prefix(),
            fmt_num(x),
            fmt_num(y),
            styles,
            escape_xml(text)
        ));
    }

    /// Build the final SVG string
    pub fn build(self, width: f64, height: f64) -> String {
        let nl = self.newline();
        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        let scale = self.config.scale;
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            fmt_num(width * scale),
            fmt_num(height * scale),
            fmt_num(width),
            fmt_num(height)
        ));
        svg.push_str(nl);

        // edges first so circles cover their ends
        let parts = self
            .background
            .iter()
            .chain(&self.edges)
            .chain(&self.nodes)
            .chain(&self.labels);
        for part in parts {
            svg.push_str(part);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg.push_str(nl);
        svg
    }
}

/// Render a session's layout to an SVG string
pub fn render_svg(session: &mut Session, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    let layout = session.layout();
    let (width, height) = (layout.page_width, layout.page_height);
    builder.add_background(
        width,
        height,
        Rgba(session.overrides().extend.page_background_color),
    );

    session.for_each_styled(|layout, node, style| {
        render_node(&mut builder, config, layout, node, style);
    });

    debug!(width, height; "Rendered SVG");
    builder.build(width, height)
}

fn render_node(
    builder: &mut SvgBuilder,
    config: &SvgConfig,
    layout: &LayoutInfo,
    node: &PlacedNode,
    style: &StyleAggregate,
) {
    let base = &style.base;
    let extend = &style.extend;
    let center = layout.to_absolute(node);
    let radius = if base.node_radius > 0 {
        f64::from(base.node_radius)
    } else {
        layout.radius
    };

    if let Some(parent) = layout.parent_of(node) {
        let parent_center = layout.to_absolute(parent);
        if let Some((from, to)) = clip_edge(center, parent_center, radius) {
            let mut styles = Rgba(base.edge_color).attrs("stroke");
            styles.push_str(&format!(r#" stroke-width="{}""#, base.edge_width));
            styles.push_str(&dash_attrs(&base.edge_dash, "EdgeDash", &node.label));
            builder.add_edge(from.x, from.y, to.x, to.y, &styles);
        }
    }

    let mut styles = Rgba(base.fill_color).attrs("fill");
    styles.push_str(&Rgba(base.border_color).attrs("stroke"));
    styles.push_str(&format!(r#" stroke-width="{}""#, base.border_width));
    styles.push_str(&dash_attrs(&base.border_dash, "BorderDash", &node.label));
    builder.add_circle(
        node.index.index(),
        &node.label,
        center.x,
        center.y,
        radius,
        &styles,
    );

    let text = if base.node_label.is_empty() {
        &node.label
    } else {
        &base.node_label
    };
    let mut styles = format!(r#" font-size="{}""#, extend.font_size);
    if let Some(family) = config.font_family(&extend.font_family) {
        styles.push_str(&format!(r#" font-family="{}""#, escape_xml(&family)));
    }
    if extend.font_slant > 0 {
        styles.push_str(r#" font-style="italic""#);
    }
    if extend.font_weight > 0 {
        styles.push_str(r#" font-weight="bold""#);
    }
    styles.push_str(&Rgba(base.font_color).attrs("fill"));
    builder.add_text(text, center.x, center.y, &styles);
}

fn dash_attrs(text: &str, property: &str, label: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    match parse_dash(text) {
        Some(dash) => {
            let lengths: Vec<String> = dash.lengths.iter().map(|&v| fmt_num(v)).collect();
            format!(
                r#" stroke-dasharray="{}" stroke-dashoffset="{}""#,
                lengths.join(" "),
                fmt_num(dash.offset)
            )
        }
        None => {
            warn!(node = label, property, value = text; "Dash pattern is invalid and is not used");
            String::new()
        }
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
