use super::catalog::operation_descriptor;
use super::{Descriptor, OperationDescriptor, OperationKind};
use crate::error::StructuralError;
use crate::operation::{Operation, OperationHandle};
use ahash::AHashMap;
use log::warn;
use std::sync::Arc;

/// Maps operation kind identifiers to kinds, and descriptor ids to descriptors.
///
/// Descriptors are built once per kind and shared by every operation of that kind.
#[derive(Debug, Clone)]
pub struct Registry {
    kinds: AHashMap<String, OperationKind>,
    operations: AHashMap<OperationKind, Arc<OperationDescriptor>>,
    inputs: AHashMap<String, (OperationKind, usize)>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl Registry {
    /// A registry holding every built-in operation kind under its own id.
    pub fn standard() -> Self {
        let mut registry = Self {
            kinds: AHashMap::new(),
            operations: AHashMap::new(),
            inputs: AHashMap::new(),
        };
        for kind in OperationKind::ALL {
            registry.register(*kind);
        }
        registry
    }

    fn register(&mut self, kind: OperationKind) {
        let descriptor = Arc::new(operation_descriptor(kind));
        for (index, input) in descriptor.inputs.iter().enumerate() {
            self.inputs.insert(input.id.clone(), (kind, index));
        }
        self.kinds.insert(kind.id().to_string(), kind);
        self.operations.insert(kind, descriptor);
    }

    /// Makes `user_kind_id` resolve to the built-in kind `builtin_kind_id`.
    pub fn with_alias(mut self, user_kind_id: &str, builtin_kind_id: &str) -> Self {
        match OperationKind::from_id(builtin_kind_id) {
            Some(kind) => {
                self.kinds.insert(user_kind_id.to_string(), kind);
            }
            None => warn!(
                "Ignoring alias '{}': '{}' is not a built-in operation kind",
                user_kind_id, builtin_kind_id
            ),
        }
        self
    }

    pub fn lookup_kind(&self, kind_id: &str) -> Option<OperationKind> {
        self.kinds.get(kind_id).copied()
    }

    pub fn operation_descriptor(&self, kind: OperationKind) -> Arc<OperationDescriptor> {
        match self.operations.get(&kind) {
            Some(descriptor) => Arc::clone(descriptor),
            None => Arc::new(operation_descriptor(kind)),
        }
    }

    /// Looks up an input descriptor by its globally unique id.
    pub fn lookup_descriptor(&self, descriptor_id: &str) -> Option<&Descriptor> {
        let (kind, index) = self.inputs.get(descriptor_id)?;
        self.operations.get(kind)?.inputs.get(*index)
    }

    /// Every registered kind id, aliases included, in lexical order.
    pub fn kind_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Builds an unwired operation of the given kind. The workspace creates its store
    /// nodes and delegates.
    pub fn instantiate(
        &self,
        kind_id: &str,
        handle: OperationHandle,
        transformation_id: &str,
    ) -> Result<Operation, StructuralError> {
        let kind = self
            .lookup_kind(kind_id)
            .ok_or_else(|| StructuralError::UnknownOperationKind(kind_id.to_string()))?;
        Ok(Operation::new(
            handle,
            transformation_id,
            self.operation_descriptor(kind),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::catalog::ADD_TERMS;

    #[test]
    fn aliases_resolve_to_builtin_kinds() {
        let registry = Registry::standard()
            .with_alias("sum", "add")
            .with_alias("bogus", "not_a_kind");
        assert_eq!(registry.lookup_kind("sum"), Some(OperationKind::Add));
        assert_eq!(registry.lookup_kind("add"), Some(OperationKind::Add));
        assert_eq!(registry.lookup_kind("bogus"), None);
    }

    #[test]
    fn descriptors_are_shared() {
        let registry = Registry::standard();
        let a = registry.operation_descriptor(OperationKind::Add);
        let b = registry.operation_descriptor(OperationKind::Add);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(
            registry.lookup_descriptor(ADD_TERMS).map(|d| d.unbounded),
            Some(true)
        );
        assert!(registry.lookup_descriptor("add.nothing").is_none());
    }

    #[test]
    fn unknown_kinds_cannot_be_instantiated() {
        let registry = Registry::standard();
        assert!(matches!(
            registry.instantiate("frobnicate", OperationHandle::new("/f"), "t"),
            Err(StructuralError::UnknownOperationKind(_))
        ));
        let op = registry
            .instantiate("count", OperationHandle::new("/c"), "t")
            .unwrap();
        assert_eq!(op.kind(), OperationKind::Count);
        assert_eq!(op.transformation_id(), "t");
    }
}
