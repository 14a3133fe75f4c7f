use crate::operation::OperationHandle;
use serde::{Deserialize, Serialize};

/// A named container of operations. Its id attributes validation problems to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    id: String,
    name: String,
    operations: Vec<OperationHandle>,
}

impl Transformation {
    pub(crate) fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            operations: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operations created directly in this transformation, in creation order.
    /// Delegates of composite operations are not listed.
    pub fn operations(&self) -> &[OperationHandle] {
        &self.operations
    }

    pub fn contains(&self, handle: &OperationHandle) -> bool {
        self.operations.contains(handle)
    }

    pub(crate) fn push(&mut self, handle: OperationHandle) {
        self.operations.push(handle);
    }

    pub(crate) fn forget(&mut self, handle: &OperationHandle) {
        self.operations.retain(|h| h != handle);
    }
}
