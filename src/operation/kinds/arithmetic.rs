use crate::error::OperationError;
use crate::operation::calculation::{arithmetic_error, first_group, numeric, operand};
use crate::operation::{Operation, Prepared};
use crate::value::{Numeric, Resolved, Scalar};

fn number(n: Numeric) -> Resolved {
    Resolved::Single(Scalar::Number(n))
}

fn terms(operation: &Operation, prepared: &Prepared) -> Result<Vec<Numeric>, OperationError> {
    prepared
        .terms(operation, first_group(operation))
        .iter()
        .map(|scalar| numeric(operation, scalar).cloned())
        .collect()
}

/// The two slots of a binary operation, in declaration order.
fn binary<'p>(
    operation: &'p Operation,
    prepared: &'p Prepared,
) -> Result<(&'p Numeric, &'p Numeric), OperationError> {
    let inputs = &operation.descriptor().inputs;
    match (inputs.first(), inputs.get(1)) {
        (Some(left), Some(right)) => Ok((
            operand(operation, prepared, &left.id)?,
            operand(operation, prepared, &right.id)?,
        )),
        _ => Err(arithmetic_error(operation, "not a binary operation")),
    }
}

/// Integral terms are summed as checked 64-bit integers. A single floating term
/// makes the whole sum a double.
pub(crate) fn add(operation: &Operation, prepared: &Prepared) -> Result<Resolved, OperationError> {
    let terms = terms(operation, prepared)?;
    if terms.iter().any(Numeric::is_floating) {
        return Ok(number(Numeric::Float(terms.iter().map(Numeric::to_f64).sum())));
    }
    let mut total: i64 = 0;
    for term in &terms {
        let value = term.to_i64().ok_or_else(|| {
            arithmetic_error(operation, format!("{} does not fit in a 64-bit integer", term))
        })?;
        total = total
            .checked_add(value)
            .ok_or_else(|| arithmetic_error(operation, "integer overflow"))?;
    }
    Ok(number(Numeric::Integer(total)))
}

pub(crate) fn subtract(operation: &Operation, prepared: &Prepared) -> Result<Resolved, OperationError> {
    let (minuend, subtrahend) = binary(operation, prepared)?;
    Ok(number(minuend.sub(subtrahend)))
}

pub(crate) fn multiply(operation: &Operation, prepared: &Prepared) -> Result<Resolved, OperationError> {
    let product = terms(operation, prepared)?
        .into_iter()
        .reduce(|acc, factor| acc.mul(&factor))
        .ok_or_else(|| arithmetic_error(operation, "nothing to multiply"))?;
    Ok(number(product))
}

pub(crate) fn divide(operation: &Operation, prepared: &Prepared) -> Result<Resolved, OperationError> {
    let (dividend, divisor) = binary(operation, prepared)?;
    dividend
        .div(divisor)
        .map(number)
        .map_err(|message| arithmetic_error(operation, message))
}

pub(crate) fn modulus(operation: &Operation, prepared: &Prepared) -> Result<Resolved, OperationError> {
    let (dividend, divisor) = binary(operation, prepared)?;
    dividend
        .rem(divisor)
        .map(number)
        .map_err(|message| arithmetic_error(operation, message))
}

pub(crate) fn power(operation: &Operation, prepared: &Prepared) -> Result<Resolved, OperationError> {
    let (base, exponent) = binary(operation, prepared)?;
    Ok(number(base.pow(exponent)))
}

/// Applies a type preserving function to the single operand.
pub(crate) fn unary(
    operation: &Operation,
    prepared: &Prepared,
    f: fn(&Numeric) -> Numeric,
) -> Result<Resolved, OperationError> {
    let value = operand(operation, prepared, first_group(operation))?;
    Ok(number(f(value)))
}
