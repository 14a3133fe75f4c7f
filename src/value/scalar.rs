use super::Numeric;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single concrete value, as stored in a property or produced by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Numeric),
    Text(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_numeric(&self) -> Option<&Numeric> {
        match self {
            Scalar::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short name of the value's runtime type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Number(Numeric::Integer(_)) => "integer",
            Scalar::Number(Numeric::Float(_)) => "float",
            Scalar::Number(Numeric::BigInteger(_)) => "big integer",
            Scalar::Number(Numeric::Decimal(_)) => "decimal",
            Scalar::Text(_) => "text",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<Numeric> for Scalar {
    fn from(n: Numeric) -> Self {
        Scalar::Number(n)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(Numeric::Integer(n))
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Number(Numeric::Integer(n.into()))
    }
}

impl From<usize> for Scalar {
    fn from(n: usize) -> Self {
        match i64::try_from(n) {
            Ok(small) => Scalar::Number(Numeric::Integer(small)),
            Err(_) => Scalar::Number(Numeric::BigInteger(BigInt::from(n))),
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(Numeric::Float(n))
    }
}

impl From<BigInt> for Scalar {
    fn from(n: BigInt) -> Self {
        Scalar::Number(Numeric::BigInteger(n))
    }
}

impl From<BigDecimal> for Scalar {
    fn from(n: BigDecimal) -> Self {
        Scalar::Number(Numeric::Decimal(n))
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}
