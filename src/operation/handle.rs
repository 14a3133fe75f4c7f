use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an operation by its path. Like a path reference, a handle is only a
/// lookup key and never keeps the operation alive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationHandle(String);

impl OperationHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OperationHandle {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for OperationHandle {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl From<&OperationHandle> for OperationHandle {
    fn from(handle: &OperationHandle) -> Self {
        handle.clone()
    }
}
