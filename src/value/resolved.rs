use super::Scalar;
use crate::store::PropertyValue;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

/// The outcome of resolving a `Value` or evaluating an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Resolved {
    Single(Scalar),
    Many(Vec<Scalar>),
}

impl Resolved {
    pub fn is_many(&self) -> bool {
        matches!(self, Resolved::Many(_))
    }

    pub fn as_single(&self) -> Option<&Scalar> {
        match self {
            Resolved::Single(scalar) => Some(scalar),
            Resolved::Many(_) => None,
        }
    }

    /// Every scalar in the result, in order.
    pub fn scalars(&self) -> &[Scalar] {
        match self {
            Resolved::Single(scalar) => std::slice::from_ref(scalar),
            Resolved::Many(scalars) => scalars,
        }
    }

    pub fn into_scalars(self) -> Vec<Scalar> {
        match self {
            Resolved::Single(scalar) => vec![scalar],
            Resolved::Many(scalars) => scalars,
        }
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Single(scalar) => write!(f, "{}", scalar),
            Resolved::Many(scalars) => write!(f, "[{}]", scalars.iter().join(", ")),
        }
    }
}

impl From<PropertyValue> for Resolved {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Single(scalar) => Resolved::Single(scalar),
            PropertyValue::Multi(scalars) => Resolved::Many(scalars),
        }
    }
}

impl From<Resolved> for PropertyValue {
    fn from(value: Resolved) -> Self {
        match value {
            Resolved::Single(scalar) => PropertyValue::Single(scalar),
            Resolved::Many(scalars) => PropertyValue::Multi(scalars),
        }
    }
}

impl From<Scalar> for Resolved {
    fn from(scalar: Scalar) -> Self {
        Resolved::Single(scalar)
    }
}
