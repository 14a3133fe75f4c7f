use super::{DeclaredType, Descriptor, OperationDescriptor, OperationKind};

pub const ADD_TERMS: &str = "add.terms";
pub const DIVIDE_DIVIDEND: &str = "divide.dividend";
pub const DIVIDE_DIVISOR: &str = "divide.divisor";
pub const MEDIAN_TERMS: &str = "median.terms";
pub const AVERAGE_TERMS: &str = "average.terms";
pub const MAP_SOURCE: &str = "map.source";
pub const MAP_TARGET: &str = "map.target";

fn descriptor(
    id: String,
    name: &str,
    description: &str,
    declared_type: DeclaredType,
    unbounded: bool,
) -> Descriptor {
    Descriptor {
        id,
        name: name.to_string(),
        description: description.to_string(),
        declared_type,
        modifiable: true,
        required_count: 1,
        unbounded,
        multivalued: false,
    }
}

/// A single-valued input slot.
fn slot(kind: OperationKind, slot: &str, description: &str, ty: DeclaredType) -> Descriptor {
    descriptor(format!("{}.{}", kind.id(), slot), slot, description, ty, false)
}

/// A variadic input group requiring at least one value.
fn group(kind: OperationKind, group: &str, description: &str, ty: DeclaredType) -> Descriptor {
    descriptor(format!("{}.{}", kind.id(), group), group, description, ty, true)
}

fn output(kind: OperationKind, description: &str, ty: DeclaredType) -> Descriptor {
    Descriptor {
        modifiable: false,
        ..descriptor(format!("{}.result", kind.id()), "result", description, ty, false)
    }
}

fn operand(kind: OperationKind) -> Vec<Descriptor> {
    vec![slot(kind, "operand", "The number to operate on", DeclaredType::Number)]
}

fn angle(kind: OperationKind) -> Vec<Descriptor> {
    vec![slot(kind, "angle", "An angle in radians", DeclaredType::Number)]
}

/// Composite term groups are edited as a whole so their delegates stay in sync.
fn terms(kind: OperationKind) -> Vec<Descriptor> {
    vec![Descriptor {
        modifiable: false,
        ..group(kind, "terms", "The numbers to aggregate", DeclaredType::Number)
    }]
}

/// Builds the schema of a built-in operation kind.
pub fn operation_descriptor(kind: OperationKind) -> OperationDescriptor {
    use DeclaredType::*;
    use OperationKind::*;

    let (output, inputs) = match kind {
        Add => (
            output(kind, "The sum of all terms", Number),
            vec![group(kind, "terms", "The numbers to add", Number)],
        ),
        Subtract => (
            output(kind, "The minuend minus the subtrahend", Number),
            vec![
                slot(kind, "minuend", "The number to subtract from", Number),
                slot(kind, "subtrahend", "The number to subtract", Number),
            ],
        ),
        Multiply => (
            output(kind, "The product of all factors", Number),
            vec![group(kind, "factors", "The numbers to multiply", Number)],
        ),
        Divide => (
            output(kind, "The dividend divided by the divisor", Number),
            vec![
                slot(kind, "dividend", "The number to divide", Number),
                slot(kind, "divisor", "The number to divide by", Number),
            ],
        ),
        Modulus => (
            output(kind, "The remainder of the division", Number),
            vec![
                slot(kind, "dividend", "The number to divide", Number),
                slot(kind, "divisor", "The number to divide by", Number),
            ],
        ),
        Power => (
            output(kind, "The base raised to the exponent", Number),
            vec![
                slot(kind, "base", "The number to raise", Number),
                slot(kind, "exponent", "The power to raise to", Number),
            ],
        ),
        Increment => (output(kind, "The operand plus one", Number), operand(kind)),
        Decrement => (output(kind, "The operand minus one", Number), operand(kind)),
        AbsoluteValue => (output(kind, "The magnitude of the operand", Number), operand(kind)),
        Ceiling => (output(kind, "The smallest integral value not below the operand", Number), operand(kind)),
        Floor => (output(kind, "The largest integral value not above the operand", Number), operand(kind)),
        Round => (output(kind, "The operand rounded half away from zero", Number), operand(kind)),
        Sign => (output(kind, "-1, 0 or 1", Number), operand(kind)),
        Sine => (output(kind, "The sine of the angle", Number), angle(kind)),
        Cosine => (output(kind, "The cosine of the angle", Number), angle(kind)),
        Tangent => (output(kind, "The tangent of the angle", Number), angle(kind)),
        Concat => (
            output(kind, "All parts joined in input order", Text),
            vec![group(kind, "parts", "The values to join", Any)],
        ),
        Count => (
            output(kind, "The number of inputs", Integer),
            vec![group(kind, "items", "The inputs to count", Any)],
        ),
        Mode => (
            output(kind, "The most frequent values", Any),
            vec![group(kind, "items", "The values to tally", Any)],
        ),
        Median => (output(kind, "The middle term in sorted order", Number), terms(kind)),
        Average => (output(kind, "The arithmetic mean of the terms", Number), terms(kind)),
        Map => (
            output(kind, "The value copied onto the target", Any),
            vec![
                Descriptor {
                    multivalued: true,
                    ..slot(kind, "source", "The property to copy from", Any)
                },
                Descriptor {
                    multivalued: true,
                    ..slot(kind, "target", "The property to copy onto", Any)
                },
            ],
        ),
        Random => (output(kind, "A uniform number in [0, 1)", Number), Vec::new()),
    };

    OperationDescriptor {
        kind,
        output,
        inputs,
    }
}
