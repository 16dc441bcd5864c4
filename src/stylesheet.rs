//! Stylesheets: TOML files with global property defaults
//!
//! ```toml
//! [metadata]
//! name = "night"
//!
//! [defaults]
//! FontSize = 14
//! FillColor = "0x202040ff"
//! FontFamily = "DejaVu Sans"
//!
//! [layout]
//! spacing_factor = 2.4
//! ```
//!
//! Every default is validated against the property table when the sheet is
//! loaded and applied as a global assignment before the input is read.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::LayoutConfig;
use crate::properties::{schema, PropertyError, PropertyRecord, PropertyValue, StyleContext};

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid default for {name}: {source}")]
    InvalidDefault {
        name: String,
        #[source]
        source: PropertyError,
    },
    #[error("Default for {name} must be an integer or a string")]
    UnsupportedValue { name: String },
}

/// Validated global defaults and optional layout factors
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    defaults: Vec<(&'static PropertyRecord, PropertyValue)>,
    /// Layout factors, if the sheet has a `[layout]` table
    pub layout: Option<LayoutConfig>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    defaults: BTreeMap<String, toml::Value>,
    layout: Option<LayoutConfig>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        let mut defaults = Vec::with_capacity(parsed.defaults.len());
        for (name, value) in &parsed.defaults {
            let raw = match value {
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::String(s) => s.clone(),
                _ => return Err(StylesheetError::UnsupportedValue { name: name.clone() }),
            };
            let entry = schema::validate(name, &raw).map_err(|source| {
                StylesheetError::InvalidDefault {
                    name: name.clone(),
                    source,
                }
            })?;
            defaults.push(entry);
        }

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            defaults,
            layout: parsed.layout,
        })
    }

    /// Validated defaults, in property-name order
    pub fn defaults(&self) -> impl Iterator<Item = (&'static PropertyRecord, &PropertyValue)> {
        self.defaults.iter().map(|(record, value)| (*record, value))
    }

    /// Apply every default as a global assignment
    pub fn apply(&self, styles: &mut StyleContext) {
        for (record, value) in self.defaults() {
            styles.apply_global(record, value);
        }
    }
}
