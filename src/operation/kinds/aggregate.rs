use crate::error::{OperationError, ValueResolutionError};
use crate::operation::calculation::{first_group, numeric};
use crate::operation::{EvaluationContext, Operation, Prepared};
use crate::validation::ValidationProblems;
use crate::value::{Numeric, Resolved, Scalar};
use ahash::AHashMap;

/// The number of inputs, whatever they resolve to.
pub(crate) fn count(operation: &Operation) -> Resolved {
    Resolved::Single(Scalar::from(
        operation.inputs_for(first_group(operation)).len(),
    ))
}

/// The values tied for the highest frequency, in first-seen order.
///
/// There is no mode when nothing repeats, or when two or more distinct values all
/// occur equally often. A single repeated value is its own mode.
pub(crate) fn mode(operation: &Operation, prepared: &Prepared) -> Resolved {
    let items = prepared.terms(operation, first_group(operation));
    let mut frequencies: AHashMap<&Scalar, usize> = AHashMap::new();
    let mut order: Vec<&Scalar> = Vec::new();
    for item in &items {
        let count = frequencies.entry(item).or_insert(0);
        if *count == 0 {
            order.push(item);
        }
        *count += 1;
    }

    let highest = frequencies.values().copied().max().unwrap_or(0);
    if highest <= 1 {
        return Resolved::Many(Vec::new());
    }
    let modes: Vec<Scalar> = order
        .into_iter()
        .filter(|item| frequencies.get(item) == Some(&highest))
        .cloned()
        .collect();
    if modes.len() > 1 && modes.len() == frequencies.len() {
        return Resolved::Many(Vec::new());
    }
    Resolved::Many(modes)
}

/// Sorts the terms and picks the middle one, or the mean of the two middle ones.
pub(crate) fn median(operation: &Operation, prepared: &Prepared) -> Result<Resolved, OperationError> {
    let mut terms = prepared
        .terms(operation, first_group(operation))
        .iter()
        .map(|scalar| numeric(operation, scalar).cloned())
        .collect::<Result<Vec<Numeric>, _>>()?;
    terms.sort_by(Numeric::total_cmp);

    let middle = terms.len() / 2;
    let median = match terms.len() {
        0 => {
            return Err(OperationError::Arithmetic {
                operation: operation.path().to_string(),
                message: "median of no terms".to_string(),
            });
        }
        n if n % 2 == 1 => terms[middle].clone(),
        _ => terms[middle - 1].midpoint(&terms[middle]),
    };
    Ok(Resolved::Single(Scalar::Number(median)))
}

/// An average is the value of its `mean` delegate.
pub(crate) fn average(
    operation: &Operation,
    ctx: &EvaluationContext<'_>,
) -> Result<Resolved, OperationError> {
    let delegates = operation.delegates().ok_or_else(|| {
        ValueResolutionError::UnknownOperation(format!("{}/mean", operation.path()))
    })?;
    Ok(ctx.evaluate(delegates.mean.path())?)
}

/// The `mean` delegate divides by the number of inputs, so every term of a composite
/// must be one number.
pub(crate) fn check_composite_terms(
    operation: &Operation,
    prepared: &Prepared,
    problems: &mut ValidationProblems,
) {
    for (input, resolved) in prepared.group(operation, first_group(operation)) {
        if resolved.is_many() {
            problems.error(
                operation.transformation_id(),
                operation.path(),
                format!(
                    "Term {} is multi-valued; {} terms must be single values",
                    input.value(),
                    operation.kind()
                ),
            );
        }
    }
}
