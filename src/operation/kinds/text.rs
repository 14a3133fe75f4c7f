use crate::operation::calculation::first_group;
use crate::operation::{Operation, Prepared};
use crate::value::{Resolved, Scalar};

/// Joins every part in input order. Null renders as `null`.
pub(crate) fn concat(operation: &Operation, prepared: &Prepared) -> Resolved {
    let joined: String = prepared
        .terms(operation, first_group(operation))
        .iter()
        .map(Scalar::to_string)
        .collect();
    Resolved::Single(Scalar::Text(joined))
}
