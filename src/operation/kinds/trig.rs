use crate::error::OperationError;
use crate::operation::calculation::{first_group, operand};
use crate::operation::{Operation, Prepared};
use crate::value::{Numeric, Resolved, Scalar};

/// Trigonometric functions always compute in double precision, in radians.
pub(crate) fn apply(
    operation: &Operation,
    prepared: &Prepared,
    f: fn(f64) -> f64,
) -> Result<Resolved, OperationError> {
    let angle = operand(operation, prepared, first_group(operation))?;
    Ok(Resolved::Single(Scalar::Number(Numeric::Float(f(
        angle.to_f64(),
    )))))
}
