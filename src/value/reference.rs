use super::{Resolved, Scalar};
use crate::error::{StoreError, ValueResolutionError};
use crate::operation::{EvaluationContext, OperationHandle};
use crate::store::{NodeHandle, PropertyValue, Store};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Property names used when a value is persisted onto an input node.
pub(crate) const KIND_PROPERTY: &str = "kind";
pub(crate) const VALUE_PROPERTY: &str = "value";
pub(crate) const PATH_PROPERTY: &str = "path";
pub(crate) const MULTIVALUED_PROPERTY: &str = "multivalued";

/// The unit of data flow between operations.
///
/// A value is either held directly, or points somewhere else and is resolved on
/// demand. References never own what they point at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Literal(Scalar),
    /// A property in the store. If the path names an operation instead, that
    /// operation is evaluated.
    Path { path: String, multivalued: bool },
    Operation(OperationHandle),
}

impl Value {
    pub fn literal(scalar: impl Into<Scalar>) -> Self {
        Value::Literal(scalar.into())
    }

    /// A reference to a single-valued property.
    pub fn path(path: impl Into<String>) -> Self {
        Value::Path {
            path: path.into(),
            multivalued: false,
        }
    }

    /// A reference to a multi-valued property.
    pub fn multivalued_path(path: impl Into<String>) -> Self {
        Value::Path {
            path: path.into(),
            multivalued: true,
        }
    }

    pub fn operation(handle: impl Into<OperationHandle>) -> Self {
        Value::Operation(handle.into())
    }

    pub fn is_multivalued(&self) -> bool {
        matches!(
            self,
            Value::Path {
                multivalued: true,
                ..
            }
        )
    }

    /// The path this value points at, if it is a reference.
    pub fn reference_path(&self) -> Option<&str> {
        match self {
            Value::Literal(_) => None,
            Value::Path { path, .. } => Some(path),
            Value::Operation(handle) => Some(handle.path()),
        }
    }

    /// Resolves the value against the store and the operation graph.
    pub fn resolve(&self, ctx: &EvaluationContext<'_>) -> Result<Resolved, ValueResolutionError> {
        match self {
            Value::Literal(scalar) => Ok(Resolved::Single(scalar.clone())),
            Value::Path { path, .. } => {
                trace!("Resolving path reference '{}'", path);
                ctx.resolve_path(path)
            }
            Value::Operation(handle) => ctx.evaluate(handle.path()),
        }
    }

    /// Persists the value onto an input node, replacing whatever encoding was there.
    pub fn write_to(&self, store: &dyn Store, node: &NodeHandle) -> Result<(), StoreError> {
        let (kind, stale): (&str, &[&str]) = match self {
            Value::Literal(scalar) => {
                store.set_property(node, VALUE_PROPERTY, PropertyValue::Single(scalar.clone()))?;
                ("literal", &[PATH_PROPERTY, MULTIVALUED_PROPERTY])
            }
            Value::Path { path, multivalued } => {
                store.set_property(node, PATH_PROPERTY, PropertyValue::from(path.as_str()))?;
                store.set_property(node, MULTIVALUED_PROPERTY, PropertyValue::from(*multivalued))?;
                ("path", &[VALUE_PROPERTY])
            }
            Value::Operation(handle) => {
                store.set_property(node, PATH_PROPERTY, PropertyValue::from(handle.path()))?;
                ("operation", &[VALUE_PROPERTY, MULTIVALUED_PROPERTY])
            }
        };
        for property in stale {
            store.remove_property(node, property)?;
        }
        store.set_property(node, KIND_PROPERTY, PropertyValue::from(kind))
    }

    /// Rebuilds a value from the encoding written by `write_to`.
    pub fn read_from(store: &dyn Store, node: &NodeHandle) -> Result<Value, ValueResolutionError> {
        let text = |name: &str| -> Result<String, ValueResolutionError> {
            match store.property(node, name)? {
                Some(PropertyValue::Single(Scalar::Text(s))) => Ok(s),
                _ => Err(ValueResolutionError::ValueAbsent {
                    node: node.path().to_string(),
                    property: name.to_string(),
                }),
            }
        };
        match text(KIND_PROPERTY)?.as_str() {
            "literal" => match store.property(node, VALUE_PROPERTY)? {
                Some(PropertyValue::Single(scalar)) => Ok(Value::Literal(scalar)),
                _ => Err(ValueResolutionError::ValueAbsent {
                    node: node.path().to_string(),
                    property: VALUE_PROPERTY.to_string(),
                }),
            },
            "path" => {
                let multivalued = matches!(
                    store.property(node, MULTIVALUED_PROPERTY)?,
                    Some(PropertyValue::Single(Scalar::Bool(true)))
                );
                Ok(Value::Path {
                    path: text(PATH_PROPERTY)?,
                    multivalued,
                })
            }
            "operation" => Ok(Value::Operation(OperationHandle::new(text(PATH_PROPERTY)?))),
            _ => Err(ValueResolutionError::ValueAbsent {
                node: node.path().to_string(),
                property: KIND_PROPERTY.to_string(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(scalar) => write!(f, "{}", scalar),
            Value::Path {
                path,
                multivalued: true,
            } => write!(f, "${}[]", path),
            Value::Path { path, .. } => write!(f, "${}", path),
            Value::Operation(handle) => write!(f, "#{}", handle),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Literal(scalar)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Literal(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Literal(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Literal(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Literal(b.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Literal(s.into())
    }
}

impl From<OperationHandle> for Value {
    fn from(handle: OperationHandle) -> Self {
        Value::Operation(handle)
    }
}
