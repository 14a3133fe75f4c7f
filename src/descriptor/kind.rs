use serde::{Deserialize, Serialize};
use std::fmt;

/// Master macro defining every built-in operation kind, its id and its display name.
macro_rules! define_operation_kinds {
    ( $( ($variant:ident, $id:literal, $name:literal) ),* $(,)? ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum OperationKind {
            $( $variant, )*
        }

        impl OperationKind {
            pub const ALL: &'static [OperationKind] = &[ $( OperationKind::$variant, )* ];

            /// The identifier used in documents and registries.
            pub fn id(&self) -> &'static str {
                match self {
                    $( OperationKind::$variant => $id, )*
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $( OperationKind::$variant => $name, )*
                }
            }

            pub fn from_id(id: &str) -> Option<OperationKind> {
                match id {
                    $( $id => Some(OperationKind::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

define_operation_kinds! {
    // Arithmetic
    (Add, "add", "Add"),
    (Subtract, "subtract", "Subtract"),
    (Multiply, "multiply", "Multiply"),
    (Divide, "divide", "Divide"),
    (Modulus, "modulus", "Modulus"),
    (Power, "power", "Power"),
    (Increment, "increment", "Increment"),
    (Decrement, "decrement", "Decrement"),

    // Magnitude and rounding
    (AbsoluteValue, "absolute_value", "Absolute Value"),
    (Ceiling, "ceiling", "Ceiling"),
    (Floor, "floor", "Floor"),
    (Round, "round", "Round"),
    (Sign, "sign", "Sign"),

    // Trigonometry
    (Sine, "sine", "Sine"),
    (Cosine, "cosine", "Cosine"),
    (Tangent, "tangent", "Tangent"),

    // Text and aggregation
    (Concat, "concat", "Concat"),
    (Count, "count", "Count"),
    (Mode, "mode", "Mode"),
    (Median, "median", "Median"),
    (Average, "average", "Average"),

    // Store and generators
    (Map, "map", "Map"),
    (Random, "random", "Random"),
}

impl OperationKind {
    /// Kinds that own delegate operations kept in sync with their inputs.
    pub fn is_composite(&self) -> bool {
        matches!(self, OperationKind::Median | OperationKind::Average)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_id() {
        for kind in OperationKind::ALL {
            assert_eq!(OperationKind::from_id(kind.id()), Some(*kind));
        }
        assert_eq!(OperationKind::from_id("sumNode"), None);
    }

    #[test]
    fn serde_names_match_ids() {
        let json = serde_json::to_string(&OperationKind::AbsoluteValue).unwrap();
        assert_eq!(json, "\"absolute_value\"");
    }
}
