use super::path::{self, ROOT};
use super::{NodeHandle, PropertyValue, Store};
use crate::error::StoreError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The properties held by a single node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct NodeData {
    pub(crate) properties: BTreeMap<String, PropertyValue>,
}

/// An in-memory `Store`, keyed by absolute node path.
#[derive(Debug)]
pub struct MemoryStore {
    nodes: RwLock<BTreeMap<String, NodeData>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(ROOT.to_string(), NodeData::default());
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    pub(crate) fn from_nodes(mut nodes: BTreeMap<String, NodeData>) -> Self {
        nodes.entry(ROOT.to_string()).or_default();
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    pub(crate) fn nodes(&self) -> BTreeMap<String, NodeData> {
        self.nodes.read().clone()
    }

    /// Builder-style property insertion, handy when seeding a store.
    pub fn with_property(
        self,
        path: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<Self, StoreError> {
        self.write_property(path, value.into())?;
        Ok(self)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.read().contains_key(path)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// Paths of the direct children of a node, in lexical order.
    pub fn children(&self, path: &str) -> Vec<String> {
        self.nodes
            .read()
            .keys()
            .filter(|candidate| path::parent(candidate) == Some(path))
            .cloned()
            .collect()
    }
}

impl Store for MemoryStore {
    fn resolve_property(&self, path: &str) -> Result<Option<PropertyValue>, StoreError> {
        let (node_path, name) = path::split_property_path(path)?;
        let nodes = self.nodes.read();
        let node = nodes
            .get(node_path)
            .ok_or_else(|| StoreError::NodeNotFound(node_path.to_string()))?;
        Ok(node.properties.get(name).cloned())
    }

    fn node(&self, path: &str) -> Option<NodeHandle> {
        self.nodes
            .read()
            .contains_key(path)
            .then(|| NodeHandle::new(path))
    }

    fn create_node(&self, path: &str) -> Result<NodeHandle, StoreError> {
        path::validate_node_path(path)?;
        let mut nodes = self.nodes.write();
        let mut current = Some(path);
        while let Some(node_path) = current {
            if nodes.contains_key(node_path) {
                break;
            }
            nodes.insert(node_path.to_string(), NodeData::default());
            current = path::parent(node_path);
        }
        Ok(NodeHandle::new(path))
    }

    fn remove_node(&self, handle: &NodeHandle) -> Result<(), StoreError> {
        let target = handle.path();
        if target == ROOT {
            return Err(StoreError::InvalidPath(target.to_string()));
        }
        let mut nodes = self.nodes.write();
        if !nodes.contains_key(target) {
            return Err(StoreError::NodeNotFound(target.to_string()));
        }
        nodes.retain(|path, _| !path::is_within(path, target));
        Ok(())
    }

    fn property(
        &self,
        handle: &NodeHandle,
        name: &str,
    ) -> Result<Option<PropertyValue>, StoreError> {
        let nodes = self.nodes.read();
        let node = nodes
            .get(handle.path())
            .ok_or_else(|| StoreError::NodeNotFound(handle.path().to_string()))?;
        Ok(node.properties.get(name).cloned())
    }

    fn set_property(
        &self,
        handle: &NodeHandle,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), StoreError> {
        let mut nodes = self.nodes.write();
        let node = nodes
            .get_mut(handle.path())
            .ok_or_else(|| StoreError::NodeNotFound(handle.path().to_string()))?;
        node.properties.insert(name.to_string(), value);
        Ok(())
    }

    fn remove_property(&self, handle: &NodeHandle, name: &str) -> Result<(), StoreError> {
        let mut nodes = self.nodes.write();
        let node = nodes
            .get_mut(handle.path())
            .ok_or_else(|| StoreError::NodeNotFound(handle.path().to_string()))?;
        node.properties.remove(name);
        Ok(())
    }
}
