use super::Operation;
use crate::error::{OperationError, StoreError, ValueResolutionError};
use crate::store::{Store, path};
use crate::validation::ValidationProblems;
use crate::value::Resolved;
use ahash::AHashMap;
use log::{trace, warn};
use std::cell::RefCell;

/// Everything an operation needs to resolve its inputs: the store, the operation
/// graph, and the chain of operations currently being evaluated.
pub struct EvaluationContext<'a> {
    store: &'a dyn Store,
    operations: &'a AHashMap<String, Operation>,
    max_depth: usize,
    read_only: bool,
    stack: RefCell<Vec<String>>,
}

/// Pops the evaluation stack when dropped.
struct Frame<'c> {
    stack: &'c RefCell<Vec<String>>,
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        store: &'a dyn Store,
        operations: &'a AHashMap<String, Operation>,
        max_depth: usize,
    ) -> Self {
        Self {
            store,
            operations,
            max_depth,
            read_only: false,
            stack: RefCell::new(Vec::new()),
        }
    }

    /// Evaluates without side effects on the store: Map returns the source value
    /// but leaves its target untouched.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn store(&self) -> &'a dyn Store {
        self.store
    }

    pub fn operation(&self, path: &str) -> Option<&'a Operation> {
        self.operations.get(path)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of operations currently being evaluated.
    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    fn enter(&self, path: &str) -> Result<Frame<'_>, ValueResolutionError> {
        let mut stack = self.stack.borrow_mut();
        if stack.iter().any(|entry| entry == path) {
            warn!(
                "Reference cycle detected: {} -> {}",
                stack.join(" -> "),
                path
            );
            return Err(ValueResolutionError::Cycle(path.to_string()));
        }
        if stack.len() >= self.max_depth {
            warn!(
                "Evaluation of '{}' exceeded the maximum depth of {}",
                path, self.max_depth
            );
            return Err(ValueResolutionError::DepthExceeded {
                path: path.to_string(),
                max_depth: self.max_depth,
            });
        }
        stack.push(path.to_string());
        Ok(Frame { stack: &self.stack })
    }

    /// Dereferences a path. Paths naming an operation evaluate that operation,
    /// anything else is read from the store.
    pub fn resolve_path(&self, target: &str) -> Result<Resolved, ValueResolutionError> {
        if self.operations.contains_key(target) {
            return self.evaluate(target);
        }
        match self.store.resolve_property(target) {
            Ok(Some(value)) => Ok(value.into()),
            Ok(None) => {
                let (node, property) = path::split_property_path(target)?;
                Err(ValueResolutionError::ValueAbsent {
                    node: node.to_string(),
                    property: property.to_string(),
                })
            }
            Err(StoreError::NodeNotFound(_)) | Err(StoreError::InvalidPath(_)) => {
                Err(ValueResolutionError::PathNotFound(target.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Evaluates a referenced operation on behalf of another one.
    pub fn evaluate(&self, path: &str) -> Result<Resolved, ValueResolutionError> {
        let operation = self
            .operation(path)
            .ok_or_else(|| ValueResolutionError::UnknownOperation(path.to_string()))?;
        let _frame = self.enter(path)?;
        operation
            .get(self)
            .map_err(|e| ValueResolutionError::Operation {
                path: path.to_string(),
                source: Box::new(e),
            })
    }

    /// Top-level `get` of an operation.
    pub fn run(&self, operation: &Operation) -> Result<Resolved, OperationError> {
        trace!("Evaluating '{}'", operation.handle());
        let _frame = self.enter(operation.handle().path())?;
        operation.get(self)
    }

    /// Top-level validation of an operation.
    pub fn validate(&self, operation: &Operation) -> ValidationProblems {
        match self.enter(operation.handle().path()) {
            Ok(_frame) => operation.validate(self),
            Err(e) => {
                let mut problems = ValidationProblems::new();
                problems.error(
                    operation.transformation_id(),
                    operation.handle().path(),
                    e.to_string(),
                );
                problems
            }
        }
    }
}
