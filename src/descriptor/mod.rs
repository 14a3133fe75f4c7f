//! Static schema metadata for operation kinds and their inputs.

pub mod catalog;
pub mod kind;
pub mod registry;

pub use kind::OperationKind;
pub use registry::Registry;

use crate::value::Scalar;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type a descriptor declares for the values flowing through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclaredType {
    Any,
    Number,
    Integer,
    Text,
    Bool,
}

impl DeclaredType {
    pub fn accepts(&self, scalar: &Scalar) -> bool {
        match self {
            DeclaredType::Any => true,
            DeclaredType::Number => scalar.as_numeric().is_some(),
            DeclaredType::Integer => scalar.as_numeric().is_some_and(|n| n.is_integral()),
            DeclaredType::Text => scalar.as_text().is_some(),
            DeclaredType::Bool => scalar.as_bool().is_some(),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclaredType::Any => "any",
            DeclaredType::Number => "number",
            DeclaredType::Integer => "integer",
            DeclaredType::Text => "text",
            DeclaredType::Bool => "bool",
        };
        write!(f, "{}", name)
    }
}

/// Immutable schema record for an input group or an operation's output.
///
/// `required_count` is the minimum number of inputs. When `unbounded` is false it is
/// also the maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub declared_type: DeclaredType,
    pub modifiable: bool,
    pub required_count: usize,
    pub unbounded: bool,
    /// A bounded slot that takes a multi-valued property as a whole.
    pub multivalued: bool,
}

impl Descriptor {
    /// Whether `count` inputs satisfy this descriptor's cardinality.
    pub fn accepts_count(&self, count: usize) -> bool {
        if self.unbounded {
            count >= self.required_count
        } else {
            count == self.required_count
        }
    }

    /// Human readable cardinality, e.g. "exactly 1" or "at least 2".
    pub fn cardinality(&self) -> String {
        if self.unbounded {
            format!("at least {}", self.required_count)
        } else {
            format!("exactly {}", self.required_count)
        }
    }
}

/// The schema of one operation kind: its output and every input group it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub kind: OperationKind,
    pub output: Descriptor,
    pub inputs: Vec<Descriptor>,
}

impl OperationDescriptor {
    pub fn input(&self, descriptor_id: &str) -> Option<&Descriptor> {
        self.inputs.iter().find(|d| d.id == descriptor_id)
    }
}
