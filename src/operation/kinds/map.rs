use crate::descriptor::catalog::{MAP_SOURCE, MAP_TARGET};
use crate::error::{OperationError, StoreError};
use crate::operation::{EvaluationContext, Operation, Prepared};
use crate::validation::ValidationProblems;
use crate::value::{Resolved, Value};
use log::trace;

/// The target must be a property reference. A target that does not exist yet is
/// only worth a warning since `apply` creates it.
pub(crate) fn check(
    operation: &Operation,
    ctx: &EvaluationContext<'_>,
    problems: &mut ValidationProblems,
) {
    let transformation_id = operation.transformation_id();
    for target in operation.inputs_for(MAP_TARGET) {
        let Value::Path { path, .. } = target else {
            problems.error(
                transformation_id,
                operation.path(),
                format!("Map target must be a property reference, found {}", target),
            );
            continue;
        };
        if ctx.operation(path).is_some() {
            problems.error(
                transformation_id,
                operation.path(),
                format!("Map target '{}' is an operation, not a property", path),
            );
            continue;
        }
        match ctx.store().resolve_property(path) {
            Ok(Some(_)) => {}
            Ok(None) | Err(StoreError::NodeNotFound(_)) => problems.warning(
                transformation_id,
                operation.path(),
                format!("Map target '{}' does not exist yet and will be created", path),
            ),
            Err(e) => problems.error(
                transformation_id,
                operation.path(),
                format!("Map target '{}' is unusable: {}", path, e),
            ),
        }
    }
}

/// Copies the source value onto the target property and returns it. A read-only
/// context only returns it.
pub(crate) fn apply(
    operation: &Operation,
    prepared: &Prepared,
    ctx: &EvaluationContext<'_>,
) -> Result<Resolved, OperationError> {
    let source = prepared
        .single(operation, MAP_SOURCE)
        .ok_or_else(|| OperationError::TypeMismatch {
            operation: operation.path().to_string(),
            expected: "a source value".to_string(),
            found: crate::value::Scalar::Null,
        })?;
    let source_path = operation
        .inputs_for(MAP_SOURCE)
        .first()
        .map(|value| value.to_string())
        .unwrap_or_default();
    let (target_path, declared_multivalued) = match operation.inputs_for(MAP_TARGET).first() {
        Some(Value::Path { path, multivalued }) => (path.clone(), *multivalued),
        other => {
            return Err(OperationError::SourceTargetArityMismatch {
                source_path,
                target_path: other.map(|v| v.to_string()).unwrap_or_default(),
            });
        }
    };

    let target_multivalued = match ctx.store().resolve_property(&target_path) {
        Ok(Some(existing)) => existing.is_multivalued(),
        Ok(None) | Err(StoreError::NodeNotFound(_)) => declared_multivalued,
        Err(e) => return Err(e.into()),
    };
    if source.is_many() != target_multivalued {
        return Err(OperationError::SourceTargetArityMismatch {
            source_path,
            target_path,
        });
    }

    if ctx.is_read_only() {
        trace!("Skipping write of '{}' in a read-only evaluation", target_path);
    } else {
        ctx.store()
            .write_property(&target_path, source.clone().into())?;
    }
    Ok(source.clone())
}
