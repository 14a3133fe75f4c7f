use crate::error::DefinitionError;
use crate::store::PropertyValue;
use crate::value::Scalar;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde_json::Value as JsonValue;

/// Converts a JSON scalar into a `Scalar`.
///
/// Integers that do not fit in an `i64` become big integers. Arbitrary precision
/// numbers can be written as `{"decimal": "1.25"}` or `{"big_integer": "123"}`.
pub fn scalar_from_json(json: &JsonValue) -> Result<Scalar, DefinitionError> {
    match json {
        JsonValue::Null => Ok(Scalar::Null),
        JsonValue::Bool(b) => Ok(Scalar::Bool(*b)),
        JsonValue::String(s) => Ok(Scalar::Text(s.clone())),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Scalar::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Scalar::from(BigInt::from(u)))
            } else if let Some(f) = n.as_f64() {
                Ok(Scalar::from(f))
            } else {
                Err(DefinitionError::UnsupportedLiteral(n.to_string()))
            }
        }
        JsonValue::Object(map) if map.len() == 1 => {
            let unsupported = || DefinitionError::UnsupportedLiteral(json.to_string());
            match map.iter().next() {
                Some((key, JsonValue::String(text))) if key == "decimal" => text
                    .parse::<BigDecimal>()
                    .map(Scalar::from)
                    .map_err(|_| unsupported()),
                Some((key, JsonValue::String(text))) if key == "big_integer" => text
                    .parse::<BigInt>()
                    .map(Scalar::from)
                    .map_err(|_| unsupported()),
                _ => Err(unsupported()),
            }
        }
        JsonValue::Object(_) | JsonValue::Array(_) => {
            Err(DefinitionError::UnsupportedLiteral(json.to_string()))
        }
    }
}

/// Converts a JSON value into a stored property. Arrays become multi-valued.
pub fn property_from_json(json: &JsonValue) -> Result<PropertyValue, DefinitionError> {
    match json {
        JsonValue::Array(items) => items
            .iter()
            .map(scalar_from_json)
            .collect::<Result<Vec<_>, _>>()
            .map(PropertyValue::Multi),
        _ => scalar_from_json(json).map(PropertyValue::Single),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Numeric;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn numbers_pick_the_narrowest_representation() {
        assert_eq!(scalar_from_json(&json!(3)).unwrap(), Scalar::from(3i64));
        assert_eq!(scalar_from_json(&json!(2.5)).unwrap(), Scalar::from(2.5));
        assert_eq!(
            scalar_from_json(&json!(u64::MAX)).unwrap(),
            Scalar::from(BigInt::from(u64::MAX))
        );
    }

    #[test]
    fn tagged_objects_carry_arbitrary_precision() {
        assert_eq!(
            scalar_from_json(&json!({"decimal": "0.1"})).unwrap(),
            Scalar::Number(Numeric::Decimal(BigDecimal::from_str("0.1").unwrap()))
        );
        assert!(scalar_from_json(&json!({"decimal": "abc"})).is_err());
        assert!(scalar_from_json(&json!({"other": "1"})).is_err());
    }

    #[test]
    fn arrays_are_only_properties() {
        assert!(scalar_from_json(&json!([1, 2])).is_err());
        assert_eq!(
            property_from_json(&json!([1, null])).unwrap(),
            PropertyValue::Multi(vec![Scalar::from(1i64), Scalar::Null])
        );
        assert!(property_from_json(&json!([[1]])).is_err());
    }
}
