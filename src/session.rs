//! Line-oriented driver for a complete tree description
//!
//! ```text
//! # comments and blank lines are skipped
//! bitree = R(1(3,4),2)
//! [FontSize=14]
//! 1[FillColor=0xffcc00ff, NodeLabel="left"]
//! ```
//!
//! The first significant line carries the start marker and the tree; every
//! later line is a property line. Any error aborts the whole session.

use log::{debug, info, warn};
use thiserror::Error;

use crate::error::{Diagnostic, ParseError};
use crate::layout::{self, LayoutConfig, LayoutError, LayoutInfo, PlacedNode};
use crate::parser::{self, BiTree};
use crate::properties::{self, NodeInfoArray, StyleAggregate, StyleContext};
use crate::stylesheet::Stylesheet;

/// Keyword that opens every input
pub const START_MARKER: &str = "bitree";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// A parsed, styled and laid-out tree
#[derive(Debug, Clone)]
pub struct Session {
    tree: BiTree,
    max_label_len: usize,
    properties: NodeInfoArray,
    styles: StyleContext,
    layout: LayoutInfo,
    diagnostics: Vec<Diagnostic>,
}

impl Session {
    /// Parse with the default layout and no stylesheet
    pub fn parse(source: &str) -> Result<Self, SessionError> {
        Self::parse_with(source, &LayoutConfig::default(), &Stylesheet::default())
    }

    pub fn parse_with(
        source: &str,
        config: &LayoutConfig,
        stylesheet: &Stylesheet,
    ) -> Result<Self, SessionError> {
        Self::parse_into(source, config, stylesheet, NodeInfoArray::new())
    }

    /// Parse into a caller-provided property table, e.g. one with a smaller
    /// capacity
    pub fn parse_into(
        source: &str,
        config: &LayoutConfig,
        stylesheet: &Stylesheet,
        mut properties: NodeInfoArray,
    ) -> Result<Self, SessionError> {
        let mut styles = StyleContext::new();
        stylesheet.apply(&mut styles);

        let mut parsed = None;
        let mut diagnostics = Vec::new();
        let mut property_lines = 0usize;

        for (offset, line) in significant_lines(source) {
            match parsed {
                None => {
                    let Some(start) = strip_start_marker(line) else {
                        return Err(ParseError::StartTokenMissing {
                            span: offset..offset + line.len(),
                            marker: START_MARKER,
                        }
                        .into());
                    };
                    let tree = parser::parse(&line[start..])
                        .map_err(|err| err.offset(offset + start))?;
                    info!(nodes = tree.tree.len(), max_label_len = tree.max_label_len; "Parsed tree");
                    parsed = Some(tree);
                }
                Some(_) => {
                    let found = properties::apply_line(line, &mut properties, &mut styles)
                        .map_err(|err| err.offset(offset))?;
                    for diag in found {
                        warn!(kind:% = diag.kind; "{}", diag.message);
                        diagnostics.push(diag.offset(offset));
                    }
                    property_lines += 1;
                }
            }
        }

        let Some(parsed) = parsed else {
            return Err(ParseError::StartTokenMissing {
                span: 0..0,
                marker: START_MARKER,
            }
            .into());
        };
        debug!(property_lines, nodes_with_properties = properties.len(); "Read properties");

        let mut tree = parsed.tree;
        let radius = config.best_radius(parsed.max_label_len, styles.overrides());
        let layout = layout::compute(&mut tree, radius, styles.overrides(), config)?;

        Ok(Self {
            tree,
            max_label_len: parsed.max_label_len,
            properties,
            styles,
            layout,
            diagnostics,
        })
    }

    pub fn tree(&self) -> &BiTree {
        &self.tree
    }

    pub fn max_label_len(&self) -> usize {
        self.max_label_len
    }

    pub fn layout(&self) -> &LayoutInfo {
        &self.layout
    }

    pub fn properties(&self) -> &NodeInfoArray {
        &self.properties
    }

    /// The global style every node starts from
    pub fn overrides(&self) -> &StyleAggregate {
        self.styles.overrides()
    }

    /// Non-fatal problems found while reading the input
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Resolved style of a placed node
    pub fn resolve(&mut self, node: &PlacedNode) -> &StyleAggregate {
        self.resolve_label(&node.label)
    }

    /// Resolved style of the node with the given tree label
    pub fn resolve_label(&mut self, label: &str) -> &StyleAggregate {
        let info = self.properties.find_by_label(label);
        self.styles.seed().resolve_one(info)
    }

    /// Visit every placed node in layout order together with its resolved
    /// style
    pub fn for_each_styled<F>(&mut self, mut visit: F)
    where
        F: FnMut(&LayoutInfo, &PlacedNode, &StyleAggregate),
    {
        let Self {
            layout,
            properties,
            styles,
            ..
        } = self;
        let layout = &*layout;
        let mut resolver = styles.seed();
        for node in &layout.nodes {
            let style = resolver.resolve(properties.find_by_label(&node.label));
            visit(layout, node, style);
        }
    }
}

/// Lines that are neither blank nor comments, trimmed, with their byte
/// offset in `source`
fn significant_lines(source: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    source.split('\n').filter_map(move |raw| {
        let start = offset;
        offset += raw.len() + 1;
        let trimmed = raw.trim_start_matches(|c: char| c <= ' ');
        let lead = raw.len() - trimmed.len();
        if trimmed.is_empty() || trimmed.starts_with('/') || trimmed.starts_with('#') {
            return None;
        }
        let trimmed =
            trimmed.trim_end_matches(|c: char| c <= ' ' || matches!(c, '/' | ';' | ','));
        Some((start + lead, trimmed))
    })
}

/// Byte offset just past `bitree =`, if the line starts with the marker
fn strip_start_marker(line: &str) -> Option<usize> {
    let head = line.get(..START_MARKER.len())?;
    if !head.eq_ignore_ascii_case(START_MARKER) {
        return None;
    }
    let rest = &line[START_MARKER.len()..];
    let after_space = rest.trim_start_matches(|c: char| c <= ' ');
    let after_eq = after_space.strip_prefix('=')?;
    Some(line.len() - after_eq.len())
}
