use super::MemoryStore;
use super::memory::NodeData;
use crate::error::StoreError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};

/// A serializable image of a `MemoryStore`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    nodes: BTreeMap<String, NodeData>,
}

impl StoreSnapshot {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl MemoryStore {
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            nodes: self.nodes(),
        }
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self::from_nodes(snapshot.nodes)
    }

    /// Serializes the store contents using the bincode format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        encode_to_vec(self.snapshot(), standard())
            .map_err(|e| StoreError::Snapshot(format!("Serialization failed: {}", e)))
    }

    /// Deserializes a store from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        decode_from_slice::<StoreSnapshot, _>(bytes, standard())
            .map(|(snapshot, _)| Self::from_snapshot(snapshot)) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| StoreError::Snapshot(format!("Deserialization failed: {}", e)))
    }

    /// Saves the store to a file.
    pub fn save(&self, path: &str) -> Result<(), StoreError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| {
            StoreError::Snapshot(format!("Could not create file '{}': {}", path, e))
        })?;
        file.write_all(&bytes).map_err(|e| {
            StoreError::Snapshot(format!("Could not write to file '{}': {}", path, e))
        })?;
        debug!("Saved {} store nodes to '{}'", self.node_count(), path);
        Ok(())
    }

    /// Loads a store previously written with `save`.
    pub fn from_file(path: &str) -> Result<Self, StoreError> {
        let mut file = fs::File::open(path)
            .map_err(|e| StoreError::Snapshot(format!("Could not open file '{}': {}", path, e)))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            StoreError::Snapshot(format!("Could not read from file '{}': {}", path, e))
        })?;
        Self::from_bytes(&bytes)
    }
}
