use super::Workspace;
use crate::descriptor::Descriptor;
use crate::error::{OperationError, StructuralError};
use crate::operation::plan::InputPlan;
use crate::operation::{Operation, OperationHandle};
use crate::store::Store;
use crate::value::Value;
use log::debug;

/// Unwraps every supplied value, failing on the first null before anything changes.
fn collect_values<I, V>(descriptor_id: &str, values: I) -> Result<Vec<Value>, StructuralError>
where
    I: IntoIterator<Item = V>,
    V: Into<Option<Value>>,
{
    values
        .into_iter()
        .map(|value| {
            value
                .into()
                .ok_or_else(|| StructuralError::NullInputValue(descriptor_id.to_string()))
        })
        .collect()
}

impl<S: Store> Workspace<S> {
    /// Looks up an operation the caller may edit. Delegates belong to their composite.
    pub(super) fn editable(&self, handle: &OperationHandle) -> Result<&Operation, StructuralError> {
        let operation = self.lookup(handle)?;
        if operation.owner().is_some() {
            return Err(StructuralError::DelegateOperation(handle.path().to_string()));
        }
        Ok(operation)
    }

    pub(super) fn input_descriptor<'o>(
        &self,
        operation: &'o Operation,
        descriptor_id: &str,
    ) -> Result<&'o Descriptor, StructuralError> {
        operation
            .input_descriptor(descriptor_id)
            .ok_or_else(|| StructuralError::UnknownDescriptor {
                kind: operation.kind().id().to_string(),
                descriptor_id: descriptor_id.to_string(),
            })
    }

    /// Appends values to an input group.
    ///
    /// `None` items are rejected with `NullInputValue`; use `Scalar::Null` for a
    /// literal null.
    pub fn add_input<I, V>(
        &mut self,
        handle: &OperationHandle,
        descriptor_id: &str,
        values: I,
    ) -> Result<(), OperationError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<Value>>,
    {
        let operation = self.editable(handle)?;
        self.input_descriptor(operation, descriptor_id)?;
        let values = collect_values(descriptor_id, values)?;
        debug!("Adding {} input(s) to '{}.{}'", values.len(), handle, descriptor_id);
        let plan = InputPlan::append(operation, descriptor_id, values);
        self.apply(plan)
    }

    /// Replaces every input of a group with `values`.
    pub fn set_input<I, V>(
        &mut self,
        handle: &OperationHandle,
        descriptor_id: &str,
        values: I,
    ) -> Result<(), OperationError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<Value>>,
    {
        let operation = self.editable(handle)?;
        self.input_descriptor(operation, descriptor_id)?;
        let values = collect_values(descriptor_id, values)?;
        debug!("Setting {} input(s) of '{}.{}'", values.len(), handle, descriptor_id);
        let plan = InputPlan::replace(operation, descriptor_id, values);
        self.apply(plan)
    }

    /// Removes one input per supplied value.
    ///
    /// A value matches an input that holds an equal value, else an input referencing
    /// the same path, else an input that resolves to the same result.
    pub fn remove_input<I, V>(
        &mut self,
        handle: &OperationHandle,
        descriptor_id: &str,
        values: I,
    ) -> Result<(), OperationError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<Value>>,
    {
        let operation = self.editable(handle)?;
        self.input_descriptor(operation, descriptor_id)?;
        let values = collect_values(descriptor_id, values)?;

        let group: Vec<usize> = operation
            .inputs()
            .iter()
            .enumerate()
            .filter(|(_, input)| input.descriptor_id() == descriptor_id)
            .map(|(index, _)| index)
            .collect();
        if group.is_empty() {
            return Err(StructuralError::NoMatchingInput(descriptor_id.to_string()).into());
        }

        let mut chosen: Vec<usize> = Vec::with_capacity(values.len());
        for value in &values {
            let index = self
                .find_match(operation, &group, &chosen, value)
                .ok_or_else(|| StructuralError::ValueNotFound {
                    descriptor_id: descriptor_id.to_string(),
                    value: value.to_string(),
                })?;
            chosen.push(index);
        }
        debug!("Removing {} input(s) from '{}.{}'", chosen.len(), handle, descriptor_id);
        let plan = InputPlan::remove(operation, &chosen);
        self.apply(plan)
    }

    fn find_match(
        &self,
        operation: &Operation,
        group: &[usize],
        chosen: &[usize],
        value: &Value,
    ) -> Option<usize> {
        let candidates = || {
            group
                .iter()
                .copied()
                .filter(|index| !chosen.contains(index))
                .map(|index| (index, operation.inputs()[index].value()))
        };

        if let Some((index, _)) = candidates().find(|(_, existing)| *existing == value) {
            return Some(index);
        }
        if let Some(path) = value.reference_path() {
            if let Some((index, _)) =
                candidates().find(|(_, existing)| existing.reference_path() == Some(path))
            {
                return Some(index);
            }
        }
        let ctx = self.context().read_only();
        let wanted = value.resolve(&ctx).ok()?;
        candidates()
            .find(|(_, existing)| existing.resolve(&ctx).ok().as_ref() == Some(&wanted))
            .map(|(index, _)| index)
    }

    /// Replaces the value of the `index`-th input of a group in place.
    ///
    /// Fails with `NotModifiable` when the group's descriptor forbids it.
    pub fn set_value(
        &mut self,
        handle: &OperationHandle,
        descriptor_id: &str,
        index: usize,
        value: impl Into<Option<Value>>,
    ) -> Result<(), OperationError> {
        let operation = self.editable(handle)?;
        let descriptor = self.input_descriptor(operation, descriptor_id)?;
        if !descriptor.modifiable {
            return Err(StructuralError::NotModifiable(descriptor_id.to_string()).into());
        }
        let value = value
            .into()
            .ok_or_else(|| StructuralError::NullInputValue(descriptor_id.to_string()))?;

        let positions: Vec<usize> = operation
            .inputs()
            .iter()
            .enumerate()
            .filter(|(_, input)| input.descriptor_id() == descriptor_id)
            .map(|(position, _)| position)
            .collect();
        let position = *positions
            .get(index)
            .ok_or_else(|| StructuralError::InputIndexOutOfRange {
                descriptor_id: descriptor_id.to_string(),
                index,
                len: positions.len(),
            })?;
        debug!("Setting '{}.{}'[{}] to {}", handle, descriptor_id, index, value);
        let plan = InputPlan::rewrite(operation, position, value);
        self.apply(plan)
    }
}
