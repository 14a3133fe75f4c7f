use crate::operation::{Operation, OperationHandle};
use crate::store::Store;
use crate::value::{Resolved, Value};
use crate::workspace::Workspace;
use std::fmt;

/// Renders an operation and everything it references as a tree.
///
/// Property references show the property's current value. An operation that is
/// reached again through its own inputs is printed once and then marked as a cycle.
pub struct OperationTree<'a, S: Store> {
    pub workspace: &'a Workspace<S>,
    pub root: &'a OperationHandle,
}

impl<'a, S: Store> fmt::Display for OperationTree<'a, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = Vec::new();
        self.fmt_operation(self.root.path(), f, "", true, &mut stack)
    }
}

impl<'a, S: Store> OperationTree<'a, S> {
    pub fn new(workspace: &'a Workspace<S>, root: &'a OperationHandle) -> Self {
        Self { workspace, root }
    }

    fn fmt_operation(
        &self,
        path: &str,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        is_last: bool,
        stack: &mut Vec<String>,
    ) -> fmt::Result {
        let node_marker = if is_last { "└── " } else { "├── " };
        write!(f, "{}{}", prefix, node_marker)?;
        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

        let Some(operation) = self.workspace.operation(&OperationHandle::new(path)) else {
            return writeln!(f, "<Unknown Operation: {}>", path);
        };
        if stack.iter().any(|entry| entry == path) {
            return writeln!(f, "{} {} <cycle>", operation.kind(), path);
        }
        writeln!(f, "{} {} [{}]", operation.kind(), path, operation.transformation_id())?;

        stack.push(path.to_string());
        let children = self.children(operation);
        for (index, (label, value)) in children.iter().enumerate() {
            let last = index + 1 == children.len();
            self.fmt_value(label, value, f, &child_prefix, last, stack)?;
        }
        stack.pop();
        Ok(())
    }

    /// Inputs in order, then the delegates of a composite.
    fn children(&self, operation: &Operation) -> Vec<(String, Value)> {
        let mut children: Vec<(String, Value)> = operation
            .inputs()
            .iter()
            .map(|input| {
                let label = operation
                    .input_descriptor(input.descriptor_id())
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| input.descriptor_id().to_string());
                (label, input.value().clone())
            })
            .collect();
        if let Some(delegates) = operation.delegates() {
            for handle in delegates.handles() {
                children.push(("delegate".to_string(), Value::Operation(handle.clone())));
            }
        }
        children
    }

    fn fmt_value(
        &self,
        label: &str,
        value: &Value,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        is_last: bool,
        stack: &mut Vec<String>,
    ) -> fmt::Result {
        match value {
            Value::Operation(handle) => {
                self.fmt_operation_reference(label, handle.path(), f, prefix, is_last, stack)
            }
            Value::Path { path, .. } if self.workspace.operation(&OperationHandle::new(path.as_str())).is_some() => {
                self.fmt_operation_reference(label, path, f, prefix, is_last, stack)
            }
            Value::Path { .. } => {
                let node_marker = if is_last { "└── " } else { "├── " };
                let current = match value
                    .reference_path()
                    .map(|path| self.workspace.store().resolve_property(path))
                {
                    Some(Ok(Some(property))) => Resolved::from(property).to_string(),
                    Some(Ok(None)) => "<unset>".to_string(),
                    _ => "<missing>".to_string(),
                };
                writeln!(f, "{}{}{}: Property: {} = {}", prefix, node_marker, label, value, current)
            }
            Value::Literal(scalar) => {
                let node_marker = if is_last { "└── " } else { "├── " };
                writeln!(f, "{}{}{}: Literal: {}", prefix, node_marker, label, scalar)
            }
        }
    }

    fn fmt_operation_reference(
        &self,
        label: &str,
        path: &str,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        is_last: bool,
        stack: &mut Vec<String>,
    ) -> fmt::Result {
        let node_marker = if is_last { "└── " } else { "├── " };
        writeln!(f, "{}{}{}: Operation: #{}", prefix, node_marker, label, path)?;
        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        self.fmt_operation(path, f, &child_prefix, true, stack)
    }
}

impl<S: Store> Workspace<S> {
    /// A printable tree of the operation at `handle`.
    pub fn tree<'a>(&'a self, handle: &'a OperationHandle) -> OperationTree<'a, S> {
        OperationTree::new(self, handle)
    }
}
