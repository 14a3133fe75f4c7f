use crate::error::DefinitionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The complete, canonical description of a workspace: seed properties for the store
/// and the transformations with their operations.
/// This is the target structure for any custom document conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceDefinition {
    /// Property path to JSON value. Arrays become multi-valued properties.
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub transformations: Vec<TransformationDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub operations: Vec<OperationDefinition>,
}

/// A single operation. `kind` may be a built-in kind id or a registered alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDefinition {
    pub path: String,
    pub kind: String,
    #[serde(default)]
    pub inputs: Vec<InputDefinition>,
}

/// One input. `descriptor` is either a full descriptor id (`add.terms`) or the part
/// after the kind (`terms`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDefinition {
    pub descriptor: String,
    pub value: ValueDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDefinition {
    Literal(serde_json::Value),
    /// A single-valued property reference.
    Property(String),
    /// A multi-valued property reference.
    Properties(String),
    Operation(String),
}

impl WorkspaceDefinition {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, DefinitionError> {
        serde_json::to_string_pretty(self).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }

    /// Total number of operations across all transformations.
    pub fn operation_count(&self) -> usize {
        self.transformations.iter().map(|t| t.operations.len()).sum()
    }
}
