//! Operations: named computation nodes with typed inputs, a validation pass and a
//! calculation.
//!
//! An [`Operation`] never caches anything. Every call to [`Operation::validate`] or
//! [`Operation::get`] re-reads every input, so the result always reflects the
//! current state of the store and of the operations it references.

mod calculation;
pub mod composite;
pub mod context;
pub mod handle;
mod kinds;
pub(crate) mod plan;

pub use context::EvaluationContext;
pub use handle::OperationHandle;

use crate::descriptor::{Descriptor, OperationDescriptor, OperationKind};
use crate::error::OperationError;
use crate::store::NodeHandle;
use crate::validation::ValidationProblems;
use crate::value::{Resolved, Scalar, Value};
use log::trace;
use std::sync::Arc;

/// One input slot of an operation: the descriptor group it belongs to and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    descriptor_id: String,
    value: Value,
    node: NodeHandle,
}

impl Input {
    pub(crate) fn new(descriptor_id: impl Into<String>, value: Value, node: NodeHandle) -> Self {
        Self {
            descriptor_id: descriptor_id.into(),
            value,
            node,
        }
    }

    pub(crate) fn with_value(self, value: Value) -> Self {
        Self { value, ..self }
    }

    pub fn descriptor_id(&self) -> &str {
        &self.descriptor_id
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The store node holding this input.
    pub fn node(&self) -> &NodeHandle {
        &self.node
    }
}

/// The child operations a composite keeps in sync with its own inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegates {
    /// An `add` over the composite's terms.
    pub sum: OperationHandle,
    /// A `divide` of `sum` by the number of terms.
    pub mean: OperationHandle,
}

impl Delegates {
    pub fn handles(&self) -> [&OperationHandle; 2] {
        [&self.sum, &self.mean]
    }
}

#[derive(Debug, Clone)]
pub struct Operation {
    handle: OperationHandle,
    transformation_id: String,
    descriptor: Arc<OperationDescriptor>,
    inputs: Vec<Input>,
    next_input: usize,
    delegates: Option<Delegates>,
    owner: Option<OperationHandle>,
}

/// Resolved inputs, aligned with `Operation::inputs`. Inputs that are never resolved
/// (count items, map targets) or failed to resolve are `None`.
pub(crate) struct Prepared {
    resolved: Vec<Option<Resolved>>,
}

impl Operation {
    pub(crate) fn new(
        handle: OperationHandle,
        transformation_id: &str,
        descriptor: Arc<OperationDescriptor>,
    ) -> Self {
        Self {
            handle,
            transformation_id: transformation_id.to_string(),
            descriptor,
            inputs: Vec::new(),
            next_input: 0,
            delegates: None,
            owner: None,
        }
    }

    pub fn handle(&self) -> &OperationHandle {
        &self.handle
    }

    pub fn path(&self) -> &str {
        self.handle.path()
    }

    pub fn transformation_id(&self) -> &str {
        &self.transformation_id
    }

    pub fn kind(&self) -> OperationKind {
        self.descriptor.kind
    }

    pub fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    /// The schema of one of this operation's input groups.
    pub fn input_descriptor(&self, descriptor_id: &str) -> Option<&Descriptor> {
        self.descriptor.input(descriptor_id)
    }

    /// All inputs in insertion order.
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    /// The values of one input group, in insertion order.
    pub fn inputs_for(&self, descriptor_id: &str) -> Vec<&Value> {
        self.inputs
            .iter()
            .filter(|input| input.descriptor_id == descriptor_id)
            .map(|input| &input.value)
            .collect()
    }

    pub fn delegates(&self) -> Option<&Delegates> {
        self.delegates.as_ref()
    }

    /// The composite operation this one is a delegate of.
    pub fn owner(&self) -> Option<&OperationHandle> {
        self.owner.as_ref()
    }

    pub(crate) fn set_delegates(&mut self, delegates: Delegates) {
        self.delegates = Some(delegates);
    }

    pub(crate) fn set_owner(&mut self, owner: OperationHandle) {
        self.owner = Some(owner);
    }

    pub(crate) fn replace_inputs(&mut self, inputs: Vec<Input>) {
        self.inputs = inputs;
    }

    /// Reserves the store path of the next input node.
    pub(crate) fn allocate_input_path(&mut self) -> String {
        let path = format!("{}/inputs/{}", self.handle.path(), self.next_input);
        self.next_input += 1;
        path
    }

    /// Runs every structural and type check against the current inputs.
    ///
    /// Resolution failures are reported as problems, never returned.
    pub fn validate(&self, ctx: &EvaluationContext<'_>) -> ValidationProblems {
        self.prepare(ctx).0
    }

    /// Validates, then calculates. Fails with `HasErrors` whenever validation reports
    /// an error.
    pub fn get(&self, ctx: &EvaluationContext<'_>) -> Result<Resolved, OperationError> {
        trace!("get '{}' ({})", self.handle, self.kind());
        let (problems, prepared) = self.prepare(ctx);
        if problems.is_error() {
            return Err(OperationError::HasErrors {
                path: self.handle.path().to_string(),
                problems,
            });
        }
        calculation::calculate(self, &prepared, ctx)
    }

    fn prepare(&self, ctx: &EvaluationContext<'_>) -> (ValidationProblems, Prepared) {
        let mut problems = ValidationProblems::new();
        let path = self.handle.path();

        for descriptor in &self.descriptor.inputs {
            let count = self
                .inputs
                .iter()
                .filter(|input| input.descriptor_id == descriptor.id)
                .count();
            if !descriptor.accepts_count(count) {
                problems.error(
                    &self.transformation_id,
                    path,
                    format!(
                        "'{}' requires {} input(s), found {}",
                        descriptor.name,
                        descriptor.cardinality(),
                        count
                    ),
                );
            }
        }

        let mut resolved = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            resolved.push(self.check_input(input, ctx, &mut problems));
        }
        let prepared = Prepared { resolved };

        calculation::check(self, &prepared, ctx, &mut problems);
        (problems, prepared)
    }

    fn check_input(
        &self,
        input: &Input,
        ctx: &EvaluationContext<'_>,
        problems: &mut ValidationProblems,
    ) -> Option<Resolved> {
        let path = self.handle.path();
        let Some(descriptor) = self.descriptor.input(&input.descriptor_id) else {
            problems.error(
                &self.transformation_id,
                path,
                format!(
                    "Input '{}' does not belong to operation kind '{}'",
                    input.descriptor_id,
                    self.kind()
                ),
            );
            return None;
        };
        if !calculation::resolves(self.kind(), descriptor) {
            return None;
        }

        let resolved = match input.value.resolve(ctx) {
            Ok(resolved) => resolved,
            Err(e) => {
                problems.error(
                    &self.transformation_id,
                    path,
                    format!("Input '{}' ({}) could not be resolved: {}", descriptor.name, input.value, e),
                );
                return None;
            }
        };

        if resolved.is_many() && !descriptor.unbounded && !descriptor.multivalued {
            problems.error(
                &self.transformation_id,
                path,
                format!(
                    "Input '{}' ({}) is multi-valued but takes a single value",
                    descriptor.name, input.value
                ),
            );
        }
        for scalar in resolved.scalars() {
            if !descriptor.declared_type.accepts(scalar) {
                problems.error(
                    &self.transformation_id,
                    path,
                    format!(
                        "Input '{}' expects {}, found {} '{}'",
                        descriptor.name,
                        descriptor.declared_type,
                        scalar.type_name(),
                        scalar
                    ),
                );
            }
        }
        Some(resolved)
    }
}

impl Prepared {
    /// Resolved values of one group, each paired with the input it came from.
    fn group<'p>(
        &'p self,
        operation: &'p Operation,
        descriptor_id: &'p str,
    ) -> impl Iterator<Item = (&'p Input, &'p Resolved)> + 'p {
        operation
            .inputs
            .iter()
            .zip(&self.resolved)
            .filter(move |(input, _)| input.descriptor_id == descriptor_id)
            .filter_map(|(input, resolved)| resolved.as_ref().map(|r| (input, r)))
    }

    /// Every scalar of a group, with multi-valued inputs flattened in place.
    fn terms(&self, operation: &Operation, descriptor_id: &str) -> Vec<Scalar> {
        self.group(operation, descriptor_id)
            .flat_map(|(_, resolved)| resolved.scalars().iter().cloned())
            .collect()
    }

    /// The resolved value of a single-valued slot.
    fn single<'p>(&'p self, operation: &'p Operation, descriptor_id: &'p str) -> Option<&'p Resolved> {
        self.group(operation, descriptor_id)
            .next()
            .map(|(_, resolved)| resolved)
    }
}
