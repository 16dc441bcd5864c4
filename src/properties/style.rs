//! Resolved styles: the global override and the per-node view

use super::schema::{by_index, PropertyRecord, PropertyValue, StyleField};
use super::store::NodeInfo;

/// Opaque black
pub const DEFAULT_INK: u32 = 0x0000_00ff;

/// Properties that may be set per node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseStyle {
    /// Empty means the tree label is shown
    pub node_label: String,
    /// Zero means the layout radius is used
    pub node_radius: u32,
    pub border_color: u32,
    pub border_width: u32,
    pub border_dash: String,
    pub fill_color: u32,
    pub edge_color: u32,
    pub edge_width: u32,
    pub edge_dash: String,
    pub font_color: u32,
}

impl Default for BaseStyle {
    fn default() -> Self {
        Self {
            node_label: String::new(),
            node_radius: 0,
            border_color: DEFAULT_INK,
            border_width: 1,
            border_dash: String::new(),
            fill_color: 0,
            edge_color: DEFAULT_INK,
            edge_width: 1,
            edge_dash: String::new(),
            font_color: DEFAULT_INK,
        }
    }
}

/// Page and font properties, only settable globally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendStyle {
    pub font_family: String,
    pub font_size: u32,
    /// 0 upright, 1 italic
    pub font_slant: u32,
    /// 0 normal, 1 bold
    pub font_weight: u32,
    pub radius_increment: u32,
    pub edge_x_increment: u32,
    pub edge_y_increment: u32,
    pub page_background_color: u32,
    pub page_margin_x_increment: u32,
    pub page_margin_y_increment: u32,
}

impl Default for ExtendStyle {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_size: 10,
            font_slant: 0,
            font_weight: 0,
            radius_increment: 1,
            edge_x_increment: 5,
            edge_y_increment: 5,
            page_background_color: 32,
            page_margin_x_increment: 0,
            page_margin_y_increment: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleAggregate {
    pub base: BaseStyle,
    pub extend: ExtendStyle,
}

impl StyleAggregate {
    /// Write a validated value into the field the property names
    pub fn apply(&mut self, field: StyleField, value: &PropertyValue) {
        match value {
            PropertyValue::UnsignedInt(v) => {
                if let Some(slot) = self.uint_field(field) {
                    *slot = *v;
                }
            }
            PropertyValue::Text(s) => {
                if let Some(slot) = self.text_field(field) {
                    slot.clone_from(s);
                }
            }
        }
    }

    /// Current value of one field
    pub fn value(&self, field: StyleField) -> PropertyValue {
        let (base, extend) = (&self.base, &self.extend);
        match field {
            StyleField::NodeLabel => PropertyValue::Text(base.node_label.clone()),
            StyleField::BorderDash => PropertyValue::Text(base.border_dash.clone()),
            StyleField::EdgeDash => PropertyValue::Text(base.edge_dash.clone()),
            StyleField::FontFamily => PropertyValue::Text(extend.font_family.clone()),
            StyleField::NodeRadius => PropertyValue::UnsignedInt(base.node_radius),
            StyleField::BorderColor => PropertyValue::UnsignedInt(base.border_color),
            StyleField::BorderWidth => PropertyValue::UnsignedInt(base.border_width),
            StyleField::FillColor => PropertyValue::UnsignedInt(base.fill_color),
            StyleField::EdgeColor => PropertyValue::UnsignedInt(base.edge_color),
            StyleField::EdgeWidth => PropertyValue::UnsignedInt(base.edge_width),
            StyleField::FontColor => PropertyValue::UnsignedInt(base.font_color),
            StyleField::FontSize => PropertyValue::UnsignedInt(extend.font_size),
            StyleField::FontSlant => PropertyValue::UnsignedInt(extend.font_slant),
            StyleField::FontWeight => PropertyValue::UnsignedInt(extend.font_weight),
            StyleField::RadiusIncrement => PropertyValue::UnsignedInt(extend.radius_increment),
            StyleField::EdgeXIncrement => PropertyValue::UnsignedInt(extend.edge_x_increment),
            StyleField::EdgeYIncrement => PropertyValue::UnsignedInt(extend.edge_y_increment),
            StyleField::PageBackgroundColor => {
                PropertyValue::UnsignedInt(extend.page_background_color)
            }
            StyleField::PageMarginXIncrement => {
                PropertyValue::UnsignedInt(extend.page_margin_x_increment)
            }
            StyleField::PageMarginYIncrement => {
                PropertyValue::UnsignedInt(extend.page_margin_y_increment)
            }
        }
    }

    fn uint_field(&mut self, field: StyleField) -> Option<&mut u32> {
        let (base, extend) = (&mut self.base, &mut self.extend);
        Some(match field {
            StyleField::NodeRadius => &mut base.node_radius,
            StyleField::BorderColor => &mut base.border_color,
            StyleField::BorderWidth => &mut base.border_width,
            StyleField::FillColor => &mut base.fill_color,
            StyleField::EdgeColor => &mut base.edge_color,
            StyleField::EdgeWidth => &mut base.edge_width,
            StyleField::FontColor => &mut base.font_color,
            StyleField::FontSize => &mut extend.font_size,
            StyleField::FontSlant => &mut extend.font_slant,
            StyleField::FontWeight => &mut extend.font_weight,
            StyleField::RadiusIncrement => &mut extend.radius_increment,
            StyleField::EdgeXIncrement => &mut extend.edge_x_increment,
            StyleField::EdgeYIncrement => &mut extend.edge_y_increment,
            StyleField::PageBackgroundColor => &mut extend.page_background_color,
            StyleField::PageMarginXIncrement => &mut extend.page_margin_x_increment,
            StyleField::PageMarginYIncrement => &mut extend.page_margin_y_increment,
            StyleField::NodeLabel
            | StyleField::BorderDash
            | StyleField::EdgeDash
            | StyleField::FontFamily => return None,
        })
    }

    fn text_field(&mut self, field: StyleField) -> Option<&mut String> {
        match field {
            StyleField::NodeLabel => Some(&mut self.base.node_label),
            StyleField::BorderDash => Some(&mut self.base.border_dash),
            StyleField::EdgeDash => Some(&mut self.base.edge_dash),
            StyleField::FontFamily => Some(&mut self.extend.font_family),
            _ => None,
        }
    }
}

/// The global override plus a scratch aggregate reused for every
/// per-node resolution
#[derive(Debug, Clone, Default)]
pub struct StyleContext {
    overrides: StyleAggregate,
    resolved: StyleAggregate,
}

impl StyleContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overrides(&self) -> &StyleAggregate {
        &self.overrides
    }

    /// Apply a globally scoped assignment
    pub fn apply_global(&mut self, record: &PropertyRecord, value: &PropertyValue) {
        self.overrides.apply(record.field, value);
        self.resolved.apply(record.field, value);
    }

    /// Reset the resolved view to the override and start a resolution pass
    ///
    /// Global assignments are locked out until the returned [`Resolver`] is
    /// dropped.
    pub fn seed(&mut self) -> Resolver<'_> {
        self.resolved.clone_from(&self.overrides);
        Resolver {
            overrides: &self.overrides,
            resolved: &mut self.resolved,
            touched: Vec::new(),
        }
    }
}

/// One resolution pass over a seeded [`StyleContext`]
///
/// Each resolution only rewinds the fields the previous node changed, so the
/// view stays correct only as long as it started from [`StyleContext::seed`].
#[derive(Debug)]
pub struct Resolver<'a> {
    overrides: &'a StyleAggregate,
    resolved: &'a mut StyleAggregate,
    touched: Vec<StyleField>,
}

impl<'a> Resolver<'a> {
    /// Resolve the style of one node: the override, then the node's own
    /// properties on top
    ///
    /// The returned borrow must end before the next call.
    pub fn resolve(&mut self, info: Option<&NodeInfo>) -> &StyleAggregate {
        for field in self.touched.drain(..) {
            self.resolved.apply(field, &self.overrides.value(field));
        }
        if let Some(info) = info {
            for (index, value) in info.elements() {
                if let Some(record) = by_index(index) {
                    self.resolved.apply(record.field, value);
                    self.touched.push(record.field);
                }
            }
        }
        &*self.resolved
    }

    /// Resolve a single node and end the pass
    pub fn resolve_one(self, info: Option<&NodeInfo>) -> &'a StyleAggregate {
        let resolved = self.resolved;
        if let Some(info) = info {
            for (index, value) in info.elements() {
                if let Some(record) = by_index(index) {
                    resolved.apply(record.field, value);
                }
            }
        }
        resolved
    }
}
