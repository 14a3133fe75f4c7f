//! Wiring of composite operations.
//!
//! A composite owns two delegates living below its own node: `sum`, an `add` over
//! the composite's terms, and `mean`, a `divide` of `sum` by the number of terms.
//! Every mutation of the composite produces plans for both delegates, and the
//! workspace commits all of them together.

use super::plan::InputPlan;
use super::{Delegates, Operation, OperationHandle};
use crate::descriptor::OperationKind;
use crate::descriptor::catalog::{ADD_TERMS, DIVIDE_DIVIDEND, DIVIDE_DIVISOR};
use crate::error::StructuralError;
use crate::store::path;
use crate::value::Value;
use ahash::AHashMap;

pub const SUM: &str = "sum";
pub const MEAN: &str = "mean";

/// Handles of the delegates of the composite at `handle`.
pub fn delegates_of(handle: &OperationHandle) -> Delegates {
    Delegates {
        sum: OperationHandle::new(path::join(handle.path(), SUM)),
        mean: OperationHandle::new(path::join(handle.path(), MEAN)),
    }
}

/// The kinds to instantiate for a composite's delegates.
pub(crate) fn delegate_kinds(delegates: &Delegates) -> [(&OperationHandle, OperationKind); 2] {
    [
        (&delegates.sum, OperationKind::Add),
        (&delegates.mean, OperationKind::Divide),
    ]
}

fn lookup<'o>(
    operations: &'o AHashMap<String, Operation>,
    handle: &OperationHandle,
) -> Result<&'o Operation, StructuralError> {
    operations
        .get(handle.path())
        .ok_or_else(|| StructuralError::UnknownOperation(handle.path().to_string()))
}

/// Plans that bring the delegates in line with the composite's planned terms.
/// Delegates are looked up, never recreated. Plans that change nothing are dropped.
pub(crate) fn sync_plans(
    composite: &Operation,
    plan: &InputPlan,
    operations: &AHashMap<String, Operation>,
) -> Result<Vec<InputPlan>, StructuralError> {
    let Some(delegates) = composite.delegates() else {
        return Ok(Vec::new());
    };
    let terms_id = composite
        .descriptor()
        .inputs
        .first()
        .map(|d| d.id.as_str())
        .unwrap_or_default();
    let terms = plan.values_for(terms_id);
    let count = Value::from(terms.len() as i64);

    let sum = InputPlan::sync(lookup(operations, &delegates.sum)?, ADD_TERMS, terms);
    let mean = InputPlan::sync_groups(
        lookup(operations, &delegates.mean)?,
        vec![
            (DIVIDE_DIVIDEND, vec![Value::Operation(delegates.sum.clone())]),
            (DIVIDE_DIVISOR, vec![count]),
        ],
    );
    Ok([sum, mean]
        .into_iter()
        .filter(|plan| !plan.is_noop())
        .collect())
}
