use super::kinds::{aggregate, arithmetic, map, random, text, trig};
use super::{EvaluationContext, Operation, Prepared};
use crate::descriptor::catalog::MAP_TARGET;
use crate::descriptor::{Descriptor, OperationKind};
use crate::error::OperationError;
use crate::validation::ValidationProblems;
use crate::value::{Numeric, Resolved, Scalar};

/// Whether inputs of this descriptor are resolved during validation.
pub(super) fn resolves(kind: OperationKind, descriptor: &Descriptor) -> bool {
    match kind {
        // Count never looks at values, unresolvable inputs count too.
        OperationKind::Count => false,
        OperationKind::Map => descriptor.id != MAP_TARGET,
        _ => true,
    }
}

/// Kind-specific validation on top of the generic arity and type checks.
pub(super) fn check(
    operation: &Operation,
    prepared: &Prepared,
    ctx: &EvaluationContext<'_>,
    problems: &mut ValidationProblems,
) {
    match operation.kind() {
        OperationKind::Map => map::check(operation, ctx, problems),
        OperationKind::Median | OperationKind::Average => {
            aggregate::check_composite_terms(operation, prepared, problems)
        }
        _ => {}
    }
}

pub(super) fn calculate(
    operation: &Operation,
    prepared: &Prepared,
    ctx: &EvaluationContext<'_>,
) -> Result<Resolved, OperationError> {
    use OperationKind::*;

    let result = match operation.kind() {
        Add => arithmetic::add(operation, prepared)?,
        Subtract => arithmetic::subtract(operation, prepared)?,
        Multiply => arithmetic::multiply(operation, prepared)?,
        Divide => arithmetic::divide(operation, prepared)?,
        Modulus => arithmetic::modulus(operation, prepared)?,
        Power => arithmetic::power(operation, prepared)?,
        Increment => arithmetic::unary(operation, prepared, Numeric::increment)?,
        Decrement => arithmetic::unary(operation, prepared, Numeric::decrement)?,
        AbsoluteValue => arithmetic::unary(operation, prepared, Numeric::abs)?,
        Ceiling => arithmetic::unary(operation, prepared, Numeric::ceil)?,
        Floor => arithmetic::unary(operation, prepared, Numeric::floor)?,
        Round => arithmetic::unary(operation, prepared, Numeric::round)?,
        Sign => arithmetic::unary(operation, prepared, Numeric::signum)?,
        Sine => trig::apply(operation, prepared, f64::sin)?,
        Cosine => trig::apply(operation, prepared, f64::cos)?,
        Tangent => trig::apply(operation, prepared, f64::tan)?,
        Concat => text::concat(operation, prepared),
        Count => aggregate::count(operation),
        Mode => aggregate::mode(operation, prepared),
        Median => aggregate::median(operation, prepared)?,
        Average => aggregate::average(operation, ctx)?,
        Map => map::apply(operation, prepared, ctx)?,
        Random => random::uniform(),
    };
    Ok(result)
}

/// The number inside a resolved scalar.
pub(super) fn numeric<'s>(
    operation: &Operation,
    scalar: &'s Scalar,
) -> Result<&'s Numeric, OperationError> {
    scalar
        .as_numeric()
        .ok_or_else(|| OperationError::TypeMismatch {
            operation: operation.path().to_string(),
            expected: "number".to_string(),
            found: scalar.clone(),
        })
}

/// The single number held by a bounded slot.
pub(super) fn operand<'p>(
    operation: &'p Operation,
    prepared: &'p Prepared,
    descriptor_id: &'p str,
) -> Result<&'p Numeric, OperationError> {
    match prepared.single(operation, descriptor_id) {
        Some(Resolved::Single(scalar)) => numeric(operation, scalar),
        Some(Resolved::Many(scalars)) => Err(OperationError::TypeMismatch {
            operation: operation.path().to_string(),
            expected: "a single number".to_string(),
            found: Scalar::Text(format!("{} values", scalars.len())),
        }),
        None => Err(OperationError::TypeMismatch {
            operation: operation.path().to_string(),
            expected: format!("a value for '{}'", descriptor_id),
            found: Scalar::Null,
        }),
    }
}

/// The id of the first input group of the operation's kind.
pub(super) fn first_group(operation: &Operation) -> &str {
    operation
        .descriptor()
        .inputs
        .first()
        .map(|d| d.id.as_str())
        .unwrap_or_default()
}

pub(super) fn arithmetic_error(operation: &Operation, message: impl Into<String>) -> OperationError {
    OperationError::Arithmetic {
        operation: operation.path().to_string(),
        message: message.into(),
    }
}
