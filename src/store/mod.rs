//! The hierarchical property store the engine reads from and writes to.
//!
//! The engine only needs the narrow surface of the [`Store`] trait; durability and
//! transactions are the implementation's concern. [`MemoryStore`] is the bundled
//! implementation used by the CLI and the tests.

pub mod memory;
pub mod path;
pub mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::StoreSnapshot;

use crate::error::StoreError;
use crate::value::Scalar;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lookup key for a node in the store. Holding one does not keep the node alive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHandle(String);

impl NodeHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The content of a stored property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Single(Scalar),
    Multi(Vec<Scalar>),
}

impl PropertyValue {
    pub fn is_multivalued(&self) -> bool {
        matches!(self, PropertyValue::Multi(_))
    }
}

impl From<Scalar> for PropertyValue {
    fn from(scalar: Scalar) -> Self {
        PropertyValue::Single(scalar)
    }
}

impl From<Vec<Scalar>> for PropertyValue {
    fn from(scalars: Vec<Scalar>) -> Self {
        PropertyValue::Multi(scalars)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Single(s.into())
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Single(b.into())
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Single(n.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Single(n.into())
    }
}

/// The operations the evaluation engine needs from a hierarchical store.
///
/// Paths are absolute and `/`-separated. A property path is the path of its node
/// followed by the property name, so `/sensors/a/value` is the `value` property of
/// node `/sensors/a`.
pub trait Store: Send + Sync {
    /// Reads a property by its full path.
    ///
    /// Returns `Err(StoreError::NodeNotFound)` when the owning node does not exist and
    /// `Ok(None)` when the node exists but the property is not set.
    fn resolve_property(&self, path: &str) -> Result<Option<PropertyValue>, StoreError>;

    /// Looks up an existing node.
    fn node(&self, path: &str) -> Option<NodeHandle>;

    /// Creates a node, along with any missing ancestors. Creating an existing node
    /// returns its handle.
    fn create_node(&self, path: &str) -> Result<NodeHandle, StoreError>;

    /// Removes a node and everything below it.
    fn remove_node(&self, handle: &NodeHandle) -> Result<(), StoreError>;

    fn property(&self, handle: &NodeHandle, name: &str)
    -> Result<Option<PropertyValue>, StoreError>;

    fn set_property(
        &self,
        handle: &NodeHandle,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), StoreError>;

    /// Removing a property that is not set is not an error.
    fn remove_property(&self, handle: &NodeHandle, name: &str) -> Result<(), StoreError>;

    /// Writes a property by its full path, creating the owning node if needed.
    fn write_property(&self, path: &str, value: PropertyValue) -> Result<NodeHandle, StoreError> {
        let (node_path, name) = path::split_property_path(path)?;
        let node = self.create_node(node_path)?;
        self.set_property(&node, name, value)?;
        Ok(node)
    }
}
