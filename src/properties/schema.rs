//! The closed table of style properties
//!
//! Each record pairs a property name with its value rule and the style field
//! it writes. Validation happens once, when a raw value is turned into a
//! [`PropertyValue`]; consumers of validated values never re-check them.

use std::fmt;

use thiserror::Error;

/// Largest node id accepted on a property line or as a numeric label
pub const NODE_ID_MAX: u32 = 0xffff_fff0;

/// Number of properties a single node may carry
pub const MAX_PROPERTIES_PER_NODE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    UnsignedInt,
    Text,
}

/// Whether a property may be set per node (`Base`) or only globally (`Extend`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Base,
    Extend,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    UnsignedInt(u32),
    Text(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::UnsignedInt(v) => write!(f, "{}", v),
            PropertyValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// Inclusive numeric range
    Range { min: u32, max: u32 },
    /// Inclusive text length range, in bytes
    Length { min: usize, max: usize },
}

impl ValueRule {
    pub const fn kind(self) -> ValueKind {
        match self {
            ValueRule::Range { .. } => ValueKind::UnsignedInt,
            ValueRule::Length { .. } => ValueKind::Text,
        }
    }
}

/// The style field a property writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleField {
    NodeLabel,
    NodeRadius,
    BorderColor,
    BorderWidth,
    BorderDash,
    FillColor,
    EdgeColor,
    EdgeWidth,
    EdgeDash,
    FontColor,
    FontFamily,
    FontSize,
    FontSlant,
    FontWeight,
    RadiusIncrement,
    EdgeXIncrement,
    EdgeYIncrement,
    PageBackgroundColor,
    PageMarginXIncrement,
    PageMarginYIncrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyRecord {
    pub index: usize,
    pub name: &'static str,
    pub kind: ValueKind,
    pub scope: Scope,
    pub rule: ValueRule,
    pub field: StyleField,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("unknown property '{0}'")]
    UnknownName(String),

    #[error("'{0}' is not a decimal or 0x-prefixed hexadecimal number")]
    NotANumber(String),

    #[error("{value} is outside the range {min}..={max}")]
    OutOfRange { value: u64, min: u32, max: u32 },

    #[error("'{0}' does not fit in 32 bits")]
    TooLarge(String),

    #[error("length {len} is outside the range {min}..={max}")]
    BadLength { len: usize, min: usize, max: usize },
}

const fn record(
    index: usize,
    name: &'static str,
    scope: Scope,
    rule: ValueRule,
    field: StyleField,
) -> PropertyRecord {
    PropertyRecord {
        index,
        name,
        kind: rule.kind(),
        scope,
        rule,
        field,
    }
}

const fn range(min: u32, max: u32) -> ValueRule {
    ValueRule::Range { min, max }
}

const fn length(min: usize, max: usize) -> ValueRule {
    ValueRule::Length { min, max }
}

const ANY_U32: ValueRule = range(0, u32::MAX);

pub static PROPERTY_TABLE: [PropertyRecord; 20] = [
    record(0, "NodeLabel", Scope::Base, length(1, 64), StyleField::NodeLabel),
    record(1, "NodeRadius", Scope::Base, range(0, 255), StyleField::NodeRadius),
    record(2, "BorderColor", Scope::Base, ANY_U32, StyleField::BorderColor),
    record(3, "BorderWidth", Scope::Base, range(0, 12), StyleField::BorderWidth),
    record(4, "BorderDash", Scope::Base, length(1, 255), StyleField::BorderDash),
    record(5, "FillColor", Scope::Base, ANY_U32, StyleField::FillColor),
    record(6, "EdgeColor", Scope::Base, ANY_U32, StyleField::EdgeColor),
    record(7, "EdgeWidth", Scope::Base, range(0, 12), StyleField::EdgeWidth),
    record(8, "EdgeDash", Scope::Base, length(1, 255), StyleField::EdgeDash),
    record(9, "FontColor", Scope::Base, ANY_U32, StyleField::FontColor),
    record(10, "FontFamily", Scope::Extend, length(1, 64), StyleField::FontFamily),
    record(11, "FontSize", Scope::Extend, range(10, 36), StyleField::FontSize),
    record(12, "FontSlant", Scope::Extend, range(0, 1), StyleField::FontSlant),
    record(13, "FontWeight", Scope::Extend, range(0, 1), StyleField::FontWeight),
    record(14, "RadiusIncrement", Scope::Extend, range(0, 360), StyleField::RadiusIncrement),
    record(15, "EdgeXIncrement", Scope::Extend, range(0, 360), StyleField::EdgeXIncrement),
    record(16, "EdgeYIncrement", Scope::Extend, range(0, 360), StyleField::EdgeYIncrement),
    record(
        17,
        "PageBackgroundColor",
        Scope::Extend,
        ANY_U32,
        StyleField::PageBackgroundColor,
    ),
    record(
        18,
        "PageMarginXIncrement",
        Scope::Extend,
        range(0, 255),
        StyleField::PageMarginXIncrement,
    ),
    record(
        19,
        "PageMarginYIncrement",
        Scope::Extend,
        range(0, 255),
        StyleField::PageMarginYIncrement,
    ),
];

/// Find a property by its exact (case-sensitive) name
pub fn lookup(name: &str) -> Option<&'static PropertyRecord> {
    PROPERTY_TABLE.iter().find(|record| record.name == name)
}

/// Find a property by its table index
pub fn by_index(index: usize) -> Option<&'static PropertyRecord> {
    PROPERTY_TABLE.get(index)
}

/// Look up `name` and validate `raw` against its rule
pub fn validate(
    name: &str,
    raw: &str,
) -> Result<(&'static PropertyRecord, PropertyValue), PropertyError> {
    let record = lookup(name).ok_or_else(|| PropertyError::UnknownName(name.to_string()))?;
    let value = record.validate(raw)?;
    Ok((record, value))
}

impl PropertyRecord {
    /// Turn raw text into a value of this property's kind, enforcing its rule
    pub fn validate(&self, raw: &str) -> Result<PropertyValue, PropertyError> {
        match self.rule {
            ValueRule::Range { min, max } => {
                let value = parse_unsigned(raw)?;
                if value < u64::from(min) || value > u64::from(max) {
                    return Err(PropertyError::OutOfRange { value, min, max });
                }
                // in range implies it fits
                Ok(PropertyValue::UnsignedInt(value as u32))
            }
            ValueRule::Length { min, max } => {
                let len = raw.len();
                if len < min || len > max {
                    return Err(PropertyError::BadLength { len, min, max });
                }
                Ok(PropertyValue::Text(raw.to_string()))
            }
        }
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal number that fits in 32 bits
pub fn parse_unsigned(raw: &str) -> Result<u64, PropertyError> {
    let (digits, radix) = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (raw, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(PropertyError::NotANumber(raw.to_string()));
    }
    match u64::from_str_radix(digits, radix) {
        Ok(value) if value <= u64::from(u32::MAX) => Ok(value),
        _ => Err(PropertyError::TooLarge(raw.to_string())),
    }
}
