//! Style properties: schema, per-node storage, resolution and line scanning

pub mod scanner;
pub mod schema;
pub mod store;
pub mod style;

pub use scanner::{apply_line, scan_line, Assignment, LineScope, ScannedLine};
pub use schema::{
    PropertyError, PropertyRecord, PropertyValue, Scope, StyleField, ValueKind, ValueRule,
    MAX_PROPERTIES_PER_NODE, NODE_ID_MAX, PROPERTY_TABLE,
};
pub use store::{node_id_from_label, NodeInfo, NodeInfoArray, StoreError};
pub use style::{BaseStyle, ExtendStyle, Resolver, StyleAggregate, StyleContext};
