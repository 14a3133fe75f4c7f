//! The public surface of the engine.
//!
//! A [`Workspace`] owns the store, the registry, the transformations and the arena of
//! live operations. Reading goes through `&self`; every mutation goes through
//! `&mut self`, so a mutation can never interleave with another one.

mod mutation;

use crate::descriptor::{OperationKind, Registry};
use crate::error::{OperationError, StoreError, StructuralError};
use crate::operation::composite;
use crate::operation::plan::{InputPlan, Planned};
use crate::operation::{Delegates, EvaluationContext, Input, Operation, OperationHandle};
use crate::store::{MemoryStore, PropertyValue, Store, path};
use crate::transformation::Transformation;
use crate::validation::ValidationProblems;
use crate::value::{Resolved, Value};
use ahash::AHashMap;
use log::{debug, warn};

/// Default limit on nested operation evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 64;

const KIND_PROPERTY: &str = "kind";
const TRANSFORMATION_PROPERTY: &str = "transformation";
const DESCRIPTOR_PROPERTY: &str = "descriptor";

pub struct Workspace<S: Store = MemoryStore> {
    store: S,
    registry: Registry,
    max_depth: usize,
    transformations: Vec<Transformation>,
    operations: AHashMap<String, Operation>,
}

pub struct WorkspaceBuilder<S: Store = MemoryStore> {
    store: S,
    registry: Registry,
    max_depth: usize,
}

impl<S: Store> WorkspaceBuilder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            registry: Registry::standard(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Lets documents and callers use `user_kind_id` for the built-in `builtin_kind_id`.
    pub fn with_alias(mut self, user_kind_id: &str, builtin_kind_id: &str) -> Self {
        self.registry = self.registry.with_alias(user_kind_id, builtin_kind_id);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn build(self) -> Workspace<S> {
        Workspace {
            store: self.store,
            registry: self.registry,
            max_depth: self.max_depth,
            transformations: Vec::new(),
            operations: AHashMap::new(),
        }
    }
}

impl Default for Workspace<MemoryStore> {
    fn default() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: Store> Workspace<S> {
    pub fn new(store: S) -> Self {
        WorkspaceBuilder::new(store).build()
    }

    pub fn builder(store: S) -> WorkspaceBuilder<S> {
        WorkspaceBuilder::new(store)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // --- Transformations ---

    pub fn create_transformation(
        &mut self,
        id: &str,
        name: &str,
    ) -> Result<&Transformation, StructuralError> {
        if self.transformation(id).is_some() {
            return Err(StructuralError::DuplicateTransformation(id.to_string()));
        }
        debug!("Created transformation '{}'", id);
        self.transformations.push(Transformation::new(id, name));
        Ok(&self.transformations[self.transformations.len() - 1])
    }

    pub fn transformation(&self, id: &str) -> Option<&Transformation> {
        self.transformations.iter().find(|t| t.id() == id)
    }

    pub fn transformations(&self) -> &[Transformation] {
        &self.transformations
    }

    fn transformation_mut(&mut self, id: &str) -> Result<&mut Transformation, StructuralError> {
        self.transformations
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| StructuralError::UnknownTransformation(id.to_string()))
    }

    /// Removes a transformation together with all of its operations and their nodes.
    pub fn remove_transformation(&mut self, id: &str) -> Result<Transformation, OperationError> {
        let handles = self
            .transformation(id)
            .ok_or_else(|| StructuralError::UnknownTransformation(id.to_string()))?
            .operations()
            .to_vec();
        for handle in &handles {
            self.remove_operation(handle)?;
        }
        let index = self
            .transformations
            .iter()
            .position(|t| t.id() == id)
            .ok_or_else(|| StructuralError::UnknownTransformation(id.to_string()))?;
        debug!("Removed transformation '{}'", id);
        Ok(self.transformations.remove(index))
    }

    // --- Operations ---

    /// Instantiates an operation kind at `path` inside a transformation, creating
    /// its store node. Composite kinds get their delegates wired up here.
    pub fn create_operation(
        &mut self,
        transformation_id: &str,
        path: &str,
        kind_id: &str,
    ) -> Result<OperationHandle, OperationError> {
        self.transformation_mut(transformation_id)?;
        path::validate_node_path(path)?;
        if path == path::ROOT {
            return Err(StoreError::InvalidPath(path.to_string()).into());
        }
        if self.operations.contains_key(path) {
            return Err(StructuralError::DuplicatePath(path.to_string()).into());
        }

        let handle = OperationHandle::new(path);
        let mut operation =
            self.registry
                .instantiate(kind_id, handle.clone(), transformation_id)?;
        let delegates = operation
            .kind()
            .is_composite()
            .then(|| composite::delegates_of(&handle));
        if let Some(delegates) = &delegates {
            if let Some(taken) = delegates
                .handles()
                .into_iter()
                .find(|h| self.operations.contains_key(h.path()))
            {
                return Err(StructuralError::DuplicatePath(taken.path().to_string()).into());
            }
        }
        self.create_operation_node(&operation)?;

        if let Some(delegates) = delegates {
            if let Err(e) = self.create_delegates(&operation, &delegates) {
                self.discard_partial(&handle, &delegates);
                return Err(e.into());
            }
            operation.set_delegates(delegates);
        }

        // Wires the delegates of a composite to its empty term list.
        let initial = InputPlan::unchanged(&operation);
        self.operations.insert(path.to_string(), operation);
        self.apply(initial)?;
        self.transformation_mut(transformation_id)?.push(handle.clone());
        debug!("Created {} operation '{}' in '{}'", kind_id, path, transformation_id);
        Ok(handle)
    }

    fn create_delegates(
        &mut self,
        owner: &Operation,
        delegates: &Delegates,
    ) -> Result<(), StoreError> {
        for (delegate_handle, kind) in composite::delegate_kinds(delegates) {
            let mut delegate = Operation::new(
                delegate_handle.clone(),
                owner.transformation_id(),
                self.registry.operation_descriptor(kind),
            );
            delegate.set_owner(owner.handle().clone());
            self.create_operation_node(&delegate)?;
            self.operations
                .insert(delegate_handle.path().to_string(), delegate);
        }
        Ok(())
    }

    /// Drops a composite whose delegates could not all be created. Removing the
    /// composite's node takes the delegate nodes beneath it along.
    fn discard_partial(&mut self, handle: &OperationHandle, delegates: &Delegates) {
        for delegate in delegates.handles() {
            self.operations.remove(delegate.path());
        }
        if let Some(node) = self.store.node(handle.path()) {
            if let Err(e) = self.store.remove_node(&node) {
                warn!("Failed to remove the node of '{}': {}", handle, e);
            }
        }
    }

    fn create_operation_node(&self, operation: &Operation) -> Result<(), StoreError> {
        let node = self.store.create_node(operation.path())?;
        self.store.set_property(
            &node,
            KIND_PROPERTY,
            PropertyValue::from(operation.kind().id()),
        )?;
        self.store.set_property(
            &node,
            TRANSFORMATION_PROPERTY,
            PropertyValue::from(operation.transformation_id()),
        )
    }

    /// Removes an operation, its delegates and its store node. References to it
    /// from other operations become validation errors.
    pub fn remove_operation(&mut self, handle: &OperationHandle) -> Result<(), OperationError> {
        let operation = self.editable(handle)?;
        let transformation_id = operation.transformation_id().to_string();
        let delegates = operation.delegates().cloned();

        if let Some(delegates) = delegates {
            for delegate in delegates.handles() {
                self.operations.remove(delegate.path());
            }
        }
        self.operations.remove(handle.path());
        if let Some(node) = self.store.node(handle.path()) {
            self.store.remove_node(&node)?;
        }
        if let Ok(transformation) = self.transformation_mut(&transformation_id) {
            transformation.forget(handle);
        }
        debug!("Removed operation '{}'", handle);
        Ok(())
    }

    pub fn operation(&self, handle: &OperationHandle) -> Option<&Operation> {
        self.operations.get(handle.path())
    }

    /// The operations of a transformation in creation order, delegates excluded.
    pub fn operations(&self, transformation_id: &str) -> Result<Vec<&Operation>, StructuralError> {
        let transformation = self
            .transformation(transformation_id)
            .ok_or_else(|| StructuralError::UnknownTransformation(transformation_id.to_string()))?;
        Ok(transformation
            .operations()
            .iter()
            .filter_map(|handle| self.operation(handle))
            .collect())
    }

    /// The delegates of a composite operation. Empty for every other kind.
    pub fn delegates(&self, handle: &OperationHandle) -> Result<Vec<&Operation>, StructuralError> {
        let operation = self.lookup(handle)?;
        Ok(operation
            .delegates()
            .map(|delegates| {
                delegates
                    .handles()
                    .into_iter()
                    .filter_map(|h| self.operation(h))
                    .collect()
            })
            .unwrap_or_default())
    }

    pub fn inputs(&self, handle: &OperationHandle) -> Result<&[Input], StructuralError> {
        Ok(self.lookup(handle)?.inputs())
    }

    pub fn inputs_for(
        &self,
        handle: &OperationHandle,
        descriptor_id: &str,
    ) -> Result<Vec<&Value>, StructuralError> {
        let operation = self.lookup(handle)?;
        self.input_descriptor(operation, descriptor_id)?;
        Ok(operation.inputs_for(descriptor_id))
    }

    fn lookup(&self, handle: &OperationHandle) -> Result<&Operation, StructuralError> {
        self.operation(handle)
            .ok_or_else(|| StructuralError::UnknownOperation(handle.path().to_string()))
    }

    // --- Evaluation ---

    /// A fresh evaluation context over this workspace.
    pub fn context(&self) -> EvaluationContext<'_> {
        EvaluationContext::new(&self.store, &self.operations, self.max_depth)
    }

    /// Rebuilds the problem set of an operation from scratch.
    ///
    /// Referenced operations are evaluated in a read-only context, so a Map reached
    /// through an input reports its value without writing its target. Only `get`
    /// writes.
    pub fn validate(&self, handle: &OperationHandle) -> Result<ValidationProblems, StructuralError> {
        let operation = self.lookup(handle)?;
        Ok(self.context().read_only().validate(operation))
    }

    /// Same as `validate`.
    pub fn problems(&self, handle: &OperationHandle) -> Result<ValidationProblems, StructuralError> {
        self.validate(handle)
    }

    /// Problems of every operation of every transformation.
    pub fn validate_all(&self) -> ValidationProblems {
        let mut problems = ValidationProblems::new();
        for transformation in &self.transformations {
            for handle in transformation.operations() {
                if let Some(operation) = self.operation(handle) {
                    for problem in &self.context().read_only().validate(operation) {
                        problems.push(problem.clone());
                    }
                }
            }
        }
        problems
    }

    /// Validates and computes an operation's result.
    pub fn get(&self, handle: &OperationHandle) -> Result<Resolved, OperationError> {
        let operation = self.lookup(handle)?;
        self.context().run(operation)
    }

    // --- Commit ---

    /// Writes a plan to the store and swaps in the operation's new input list.
    fn commit(&mut self, plan: InputPlan) -> Result<(), OperationError> {
        let operation = self
            .operations
            .get_mut(plan.operation.path())
            .ok_or_else(|| StructuralError::UnknownOperation(plan.operation.path().to_string()))?;
        for input in &plan.removed {
            if self.store.node(input.node().path()).is_some() {
                self.store.remove_node(input.node())?;
            }
        }

        let mut inputs = Vec::with_capacity(plan.inputs.len());
        for planned in plan.inputs {
            match planned {
                Planned::Keep(input) => inputs.push(input),
                Planned::Rewrite { input, value } => {
                    value.write_to(&self.store, input.node())?;
                    inputs.push(input.with_value(value));
                }
                Planned::New {
                    descriptor_id,
                    value,
                } => {
                    let node = self.store.create_node(&operation.allocate_input_path())?;
                    self.store.set_property(
                        &node,
                        DESCRIPTOR_PROPERTY,
                        PropertyValue::from(descriptor_id.as_str()),
                    )?;
                    value.write_to(&self.store, &node)?;
                    inputs.push(Input::new(descriptor_id, value, node));
                }
            }
        }
        operation.replace_inputs(inputs);
        Ok(())
    }

    /// Commits a plan for an operation together with the plans of its delegates.
    fn apply(&mut self, plan: InputPlan) -> Result<(), OperationError> {
        let operation = self.lookup(&plan.operation)?;
        let delegate_plans = composite::sync_plans(operation, &plan, &self.operations)?;
        debug!(
            "Updating inputs of '{}' ({} delegate plan(s))",
            plan.operation,
            delegate_plans.len()
        );
        self.commit(plan)?;
        for delegate_plan in delegate_plans {
            self.commit(delegate_plan)?;
        }
        Ok(())
    }
}

impl<S: Store> Workspace<S> {
    /// Kinds that can be instantiated, aliases included.
    pub fn kind_ids(&self) -> Vec<&str> {
        self.registry.kind_ids()
    }

    pub fn lookup_kind(&self, kind_id: &str) -> Option<OperationKind> {
        self.registry.lookup_kind(kind_id)
    }
}
