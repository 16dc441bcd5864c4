//! Bounded per-node property sets and the node table that holds them

use std::collections::BTreeMap;

use thiserror::Error;

use super::schema::{PropertyValue, MAX_PROPERTIES_PER_NODE, NODE_ID_MAX};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("node {node_id} cannot hold more than {max} properties")]
    PropertySetOverflow { node_id: u32, max: usize },

    #[error("node table is full ({max} nodes)")]
    NodeTableOverflow { max: usize },
}

/// Properties explicitly assigned to one node, keyed by property index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeInfo {
    node_id: u32,
    elements: BTreeMap<usize, PropertyValue>,
}

impl NodeInfo {
    pub fn new(node_id: u32) -> Self {
        Self {
            node_id,
            elements: BTreeMap::new(),
        }
    }

    pub fn node_id(&self) -> u32 {
        self.node_id
    }

    pub fn get(&self, index: usize) -> Option<&PropertyValue> {
        self.elements.get(&index)
    }

    /// Elements in property-index order
    pub fn elements(&self) -> impl Iterator<Item = (usize, &PropertyValue)> {
        self.elements.iter().map(|(&index, value)| (index, value))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of entries `indices` would add that are not already present
    fn new_entries(&self, indices: &[usize]) -> usize {
        let mut fresh: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|index| !self.elements.contains_key(index))
            .collect();
        fresh.sort_unstable();
        fresh.dedup();
        fresh.len()
    }

    /// Set a property; an existing value for the same index is replaced
    pub fn insert(&mut self, index: usize, value: PropertyValue) -> Result<(), StoreError> {
        if self.new_entries(&[index]) + self.len() > MAX_PROPERTIES_PER_NODE {
            return Err(StoreError::PropertySetOverflow {
                node_id: self.node_id,
                max: MAX_PROPERTIES_PER_NODE,
            });
        }
        self.elements.insert(index, value);
        Ok(())
    }
}

/// Node id -> explicitly assigned properties, ordered by node id
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfoArray {
    nodes: BTreeMap<u32, NodeInfo>,
    capacity: usize,
}

impl Default for NodeInfoArray {
    fn default() -> Self {
        Self::with_capacity(NODE_ID_MAX as usize)
    }
}

impl NodeInfoArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table that holds at most `capacity` distinct nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: BTreeMap::new(),
            capacity,
        }
    }

    pub fn get(&self, node_id: u32) -> Option<&NodeInfo> {
        self.nodes.get(&node_id)
    }

    /// Properties of the tree node labelled `label`, if the label names a
    /// node id that has any
    pub fn find_by_label(&self, label: &str) -> Option<&NodeInfo> {
        node_id_from_label(label).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeInfo> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Merge a batch of assignments into a node, creating it if needed
    ///
    /// Either every assignment is stored or none is. Later assignments to
    /// the same index replace earlier ones.
    pub fn merge(
        &mut self,
        node_id: u32,
        assignments: Vec<(usize, PropertyValue)>,
    ) -> Result<(), StoreError> {
        let indices: Vec<usize> = assignments.iter().map(|(index, _)| *index).collect();
        match self.nodes.get(&node_id) {
            Some(info) => {
                if info.len() + info.new_entries(&indices) > MAX_PROPERTIES_PER_NODE {
                    return Err(StoreError::PropertySetOverflow {
                        node_id,
                        max: MAX_PROPERTIES_PER_NODE,
                    });
                }
            }
            None => {
                if self.nodes.len() >= self.capacity {
                    return Err(StoreError::NodeTableOverflow { max: self.capacity });
                }
                if NodeInfo::new(node_id).new_entries(&indices) > MAX_PROPERTIES_PER_NODE {
                    return Err(StoreError::PropertySetOverflow {
                        node_id,
                        max: MAX_PROPERTIES_PER_NODE,
                    });
                }
            }
        }

        let info = self
            .nodes
            .entry(node_id)
            .or_insert_with(|| NodeInfo::new(node_id));
        for (index, value) in assignments {
            info.insert(index, value)?;
        }
        Ok(())
    }
}

/// Interpret a tree label as a node id: decimal digits or `0x` hexadecimal,
/// at most [`NODE_ID_MAX`]
pub fn node_id_from_label(label: &str) -> Option<u32> {
    let (digits, radix) = match label.strip_prefix("0x").or_else(|| label.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (label, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix)
        .ok()
        .filter(|&id| id <= u64::from(NODE_ID_MAX))
        .map(|id| id as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint(v: u32) -> PropertyValue {
        PropertyValue::UnsignedInt(v)
    }

    #[test]
    fn test_merge_creates_and_orders() {
        let mut table = NodeInfoArray::new();
        table.merge(7, vec![(5, uint(1))]).unwrap();
        table.merge(3, vec![(2, uint(2)), (0, PropertyValue::Text("x".into()))]).unwrap();
        let ids: Vec<u32> = table.iter().map(NodeInfo::node_id).collect();
        assert_eq!(ids, vec![3, 7]);

        let indices: Vec<usize> = table.get(3).unwrap().elements().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_last_write_wins() {
        let mut table = NodeInfoArray::new();
        table.merge(1, vec![(1, uint(10)), (1, uint(20))]).unwrap();
        table.merge(1, vec![(1, uint(30))]).unwrap();
        let info = table.get(1).unwrap();
        assert_eq!(info.len(), 1);
        assert_eq!(info.get(1), Some(&uint(30)));
    }

    #[test]
    fn test_property_set_overflow_is_atomic() {
        let mut info = NodeInfo::new(0);
        for index in 0..MAX_PROPERTIES_PER_NODE {
            info.insert(index, uint(0)).unwrap();
        }
        // replacing an existing entry never overflows
        info.insert(3, uint(9)).unwrap();
        assert!(info.insert(99, uint(0)).is_err());

        let mut table = NodeInfoArray::new();
        table
            .merge(4, (0..MAX_PROPERTIES_PER_NODE - 1).map(|i| (i, uint(0))).collect())
            .unwrap();
        let err = table
            .merge(4, vec![(100, uint(1)), (101, uint(1))])
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::PropertySetOverflow {
                node_id: 4,
                max: MAX_PROPERTIES_PER_NODE
            }
        );
        let info = table.get(4).unwrap();
        assert_eq!(info.len(), MAX_PROPERTIES_PER_NODE - 1);
        assert!(info.get(100).is_none());
    }

    #[test]
    fn test_node_table_overflow() {
        let mut table = NodeInfoArray::with_capacity(2);
        table.merge(1, vec![(1, uint(1))]).unwrap();
        table.merge(2, vec![(1, uint(1))]).unwrap();
        // existing nodes still accept updates
        table.merge(2, vec![(2, uint(1))]).unwrap();
        assert_eq!(
            table.merge(3, vec![(1, uint(1))]),
            Err(StoreError::NodeTableOverflow { max: 2 })
        );
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_node_id_from_label() {
        assert_eq!(node_id_from_label("42"), Some(42));
        assert_eq!(node_id_from_label("0x1F"), Some(31));
        assert_eq!(node_id_from_label("4294967280"), Some(NODE_ID_MAX));
        assert_eq!(node_id_from_label("4294967281"), None);
        assert_eq!(node_id_from_label("A"), None);
        assert_eq!(node_id_from_label("12_3"), None);
        assert_eq!(node_id_from_label("0x"), None);
    }

    #[test]
    fn test_find_by_label() {
        let mut table = NodeInfoArray::new();
        table.merge(16, vec![(1, uint(4))]).unwrap();
        assert!(table.find_by_label("16").is_some());
        assert!(table.find_by_label("0x10").is_some());
        assert!(table.find_by_label("R").is_none());
    }
}
