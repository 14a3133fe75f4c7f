use super::{Input, Operation, OperationHandle};
use crate::value::Value;

/// What happens to one input slot when a plan is committed.
#[derive(Debug, Clone)]
pub(crate) enum Planned {
    Keep(Input),
    /// Same node, new value.
    Rewrite { input: Input, value: Value },
    New { descriptor_id: String, value: Value },
}

impl Planned {
    pub(crate) fn descriptor_id(&self) -> &str {
        match self {
            Planned::Keep(input) | Planned::Rewrite { input, .. } => input.descriptor_id(),
            Planned::New { descriptor_id, .. } => descriptor_id,
        }
    }

    pub(crate) fn value(&self) -> &Value {
        match self {
            Planned::Keep(input) => input.value(),
            Planned::Rewrite { value, .. } | Planned::New { value, .. } => value,
        }
    }
}

/// The complete new input list of one operation, computed before anything changes.
#[derive(Debug, Clone)]
pub(crate) struct InputPlan {
    pub(crate) operation: OperationHandle,
    pub(crate) inputs: Vec<Planned>,
    pub(crate) removed: Vec<Input>,
}

impl InputPlan {
    fn empty(operation: &Operation) -> Self {
        Self {
            operation: operation.handle().clone(),
            inputs: Vec::with_capacity(operation.inputs().len()),
            removed: Vec::new(),
        }
    }

    fn push_new(&mut self, descriptor_id: &str, values: Vec<Value>) {
        self.inputs
            .extend(values.into_iter().map(|value| Planned::New {
                descriptor_id: descriptor_id.to_string(),
                value,
            }));
    }

    /// Keeps every input as it is.
    pub(crate) fn unchanged(operation: &Operation) -> Self {
        let mut plan = Self::empty(operation);
        plan.inputs
            .extend(operation.inputs().iter().cloned().map(Planned::Keep));
        plan
    }

    /// Appends `values` after every existing input.
    pub(crate) fn append(operation: &Operation, descriptor_id: &str, values: Vec<Value>) -> Self {
        let mut plan = Self::unchanged(operation);
        plan.push_new(descriptor_id, values);
        plan
    }

    /// Drops the whole group, then appends `values`.
    pub(crate) fn replace(operation: &Operation, descriptor_id: &str, values: Vec<Value>) -> Self {
        let mut plan = Self::empty(operation);
        for input in operation.inputs() {
            if input.descriptor_id() == descriptor_id {
                plan.removed.push(input.clone());
            } else {
                plan.inputs.push(Planned::Keep(input.clone()));
            }
        }
        plan.push_new(descriptor_id, values);
        plan
    }

    /// Removes the inputs at the given positions of `Operation::inputs`.
    pub(crate) fn remove(operation: &Operation, indices: &[usize]) -> Self {
        let mut plan = Self::empty(operation);
        for (index, input) in operation.inputs().iter().enumerate() {
            if indices.contains(&index) {
                plan.removed.push(input.clone());
            } else {
                plan.inputs.push(Planned::Keep(input.clone()));
            }
        }
        plan
    }

    /// Replaces the value at a position of `Operation::inputs`, keeping its node.
    pub(crate) fn rewrite(operation: &Operation, index: usize, value: Value) -> Self {
        let mut plan = Self::empty(operation);
        for (position, input) in operation.inputs().iter().enumerate() {
            if position == index && input.value() != &value {
                plan.inputs.push(Planned::Rewrite {
                    input: input.clone(),
                    value: value.clone(),
                });
            } else {
                plan.inputs.push(Planned::Keep(input.clone()));
            }
        }
        plan
    }

    /// Makes a group hold exactly `values`, reusing existing slots position by
    /// position so unchanged inputs keep their nodes.
    pub(crate) fn sync(operation: &Operation, descriptor_id: &str, values: Vec<Value>) -> Self {
        Self::sync_groups(operation, vec![(descriptor_id, values)])
    }

    /// `sync` over several groups of the same operation at once.
    pub(crate) fn sync_groups(operation: &Operation, groups: Vec<(&str, Vec<Value>)>) -> Self {
        let mut plan = Self::empty(operation);
        let mut pending: Vec<(&str, std::vec::IntoIter<Value>)> = groups
            .into_iter()
            .map(|(descriptor_id, values)| (descriptor_id, values.into_iter()))
            .collect();
        for input in operation.inputs() {
            let Some((_, values)) = pending
                .iter_mut()
                .find(|(descriptor_id, _)| *descriptor_id == input.descriptor_id())
            else {
                plan.inputs.push(Planned::Keep(input.clone()));
                continue;
            };
            match values.next() {
                Some(value) if &value == input.value() => {
                    plan.inputs.push(Planned::Keep(input.clone()))
                }
                Some(value) => plan.inputs.push(Planned::Rewrite {
                    input: input.clone(),
                    value,
                }),
                None => plan.removed.push(input.clone()),
            }
        }
        for (descriptor_id, values) in pending {
            plan.push_new(descriptor_id, values.collect());
        }
        plan
    }

    /// The planned values of one group, in order.
    pub(crate) fn values_for(&self, descriptor_id: &str) -> Vec<Value> {
        self.inputs
            .iter()
            .filter(|planned| planned.descriptor_id() == descriptor_id)
            .map(|planned| planned.value().clone())
            .collect()
    }

    /// True when committing would change nothing.
    pub(crate) fn is_noop(&self) -> bool {
        self.removed.is_empty()
            && self
                .inputs
                .iter()
                .all(|planned| matches!(planned, Planned::Keep(_)))
    }
}
