use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign};
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Upper bound on the size of an exactly computed power.
pub const MAX_EXACT_POWER_BITS: u64 = 1 << 20;

/// Coarse classification of a `Numeric`, used when deciding how to compute a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    Integer64,
    Float64,
    ArbitraryPrecision,
}

/// A number as it appears in the store or in a literal.
///
/// Floats compare by their canonical bits: `0.0` equals `-0.0` and every NaN equals
/// every other NaN, so equal numbers always hash alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Numeric {
    Integer(i64),
    Float(f64),
    BigInteger(#[serde(with = "text_repr")] BigInt),
    Decimal(#[serde(with = "text_repr")] BigDecimal),
}

/// Two operands brought to a common representation.
pub(crate) enum Promoted {
    Integers(i64, i64),
    BigIntegers(BigInt, BigInt),
    Decimals(BigDecimal, BigDecimal),
    Floats(f64, f64),
}

/// Bit pattern shared by equal floats.
fn canonical_bits(n: f64) -> u64 {
    if n == 0.0 {
        0.0f64.to_bits()
    } else if n.is_nan() {
        f64::NAN.to_bits()
    } else {
        n.to_bits()
    }
}

// Manual implementation to handle f64
impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Numeric::Integer(a), Numeric::Integer(b)) => a == b,
            (Numeric::Float(a), Numeric::Float(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Numeric::BigInteger(a), Numeric::BigInteger(b)) => a == b,
            (Numeric::Decimal(a), Numeric::Decimal(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Numeric {}

// Hashes the same canonical bits `eq` compares
impl Hash for Numeric {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Numeric::Integer(n) => n.hash(state),
            Numeric::Float(n) => canonical_bits(*n).hash(state),
            Numeric::BigInteger(n) => n.hash(state),
            Numeric::Decimal(n) => n.hash(state),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Integer(n) => write!(f, "{}", n),
            Numeric::Float(n) => write!(f, "{}", n),
            Numeric::BigInteger(n) => write!(f, "{}", n),
            Numeric::Decimal(n) => write!(f, "{}", n),
        }
    }
}

impl Numeric {
    pub fn kind(&self) -> NumericKind {
        match self {
            Numeric::Integer(_) => NumericKind::Integer64,
            Numeric::Float(_) => NumericKind::Float64,
            Numeric::BigInteger(_) | Numeric::Decimal(_) => NumericKind::ArbitraryPrecision,
        }
    }

    /// Integers of any width.
    pub fn is_integral(&self) -> bool {
        matches!(self, Numeric::Integer(_) | Numeric::BigInteger(_))
    }

    /// Floats and decimals.
    pub fn is_floating(&self) -> bool {
        !self.is_integral()
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Numeric::Integer(n) => *n == 0,
            Numeric::Float(n) => *n == 0.0,
            Numeric::BigInteger(n) => n.is_zero(),
            Numeric::Decimal(n) => n.is_zero(),
        }
    }

    /// Lossy conversion to double precision. Values out of range become infinite or NaN.
    pub fn to_f64(&self) -> f64 {
        match self {
            Numeric::Integer(n) => *n as f64,
            Numeric::Float(n) => *n,
            Numeric::BigInteger(n) => n.to_f64().unwrap_or(f64::NAN),
            Numeric::Decimal(n) => n.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// The value as a 64-bit integer, if it is integral and fits.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Numeric::Integer(n) => Some(*n),
            Numeric::BigInteger(n) => n.to_i64(),
            Numeric::Float(_) | Numeric::Decimal(_) => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Numeric::Integer(_) => 0,
            Numeric::BigInteger(_) => 1,
            Numeric::Decimal(_) => 2,
            Numeric::Float(_) => 3,
        }
    }

    fn to_bigint(&self) -> BigInt {
        match self {
            Numeric::Integer(n) => BigInt::from(*n),
            Numeric::BigInteger(n) => n.clone(),
            Numeric::Decimal(n) => n.with_scale(0).into_bigint_and_exponent().0,
            Numeric::Float(n) => BigInt::from(*n as i64),
        }
    }

    fn to_bigdecimal(&self) -> BigDecimal {
        match self {
            Numeric::Integer(n) => BigDecimal::from(*n),
            Numeric::BigInteger(n) => BigDecimal::new(n.clone(), 0),
            Numeric::Decimal(n) => n.clone(),
            Numeric::Float(n) => BigDecimal::from_f64(*n).unwrap_or_default(),
        }
    }

    /// Brings two operands to the widest representation either of them needs.
    pub(crate) fn promote(&self, other: &Numeric) -> Promoted {
        match self.rank().max(other.rank()) {
            0 => match (self, other) {
                (Numeric::Integer(a), Numeric::Integer(b)) => Promoted::Integers(*a, *b),
                _ => Promoted::BigIntegers(self.to_bigint(), other.to_bigint()),
            },
            1 => Promoted::BigIntegers(self.to_bigint(), other.to_bigint()),
            2 => Promoted::Decimals(self.to_bigdecimal(), other.to_bigdecimal()),
            _ => Promoted::Floats(self.to_f64(), other.to_f64()),
        }
    }

    /// Narrows a big integer back to 64 bits when it fits.
    fn normalize(n: BigInt) -> Numeric {
        match n.to_i64() {
            Some(small) => Numeric::Integer(small),
            None => Numeric::BigInteger(n),
        }
    }

    pub fn add(&self, other: &Numeric) -> Numeric {
        match self.promote(other) {
            Promoted::Integers(a, b) => a
                .checked_add(b)
                .map(Numeric::Integer)
                .unwrap_or_else(|| Numeric::BigInteger(BigInt::from(a) + BigInt::from(b))),
            Promoted::BigIntegers(a, b) => Numeric::BigInteger(a + b),
            Promoted::Decimals(a, b) => Numeric::Decimal(a + b),
            Promoted::Floats(a, b) => Numeric::Float(a + b),
        }
    }

    pub fn sub(&self, other: &Numeric) -> Numeric {
        match self.promote(other) {
            Promoted::Integers(a, b) => a
                .checked_sub(b)
                .map(Numeric::Integer)
                .unwrap_or_else(|| Numeric::BigInteger(BigInt::from(a) - BigInt::from(b))),
            Promoted::BigIntegers(a, b) => Numeric::BigInteger(a - b),
            Promoted::Decimals(a, b) => Numeric::Decimal(a - b),
            Promoted::Floats(a, b) => Numeric::Float(a - b),
        }
    }

    pub fn mul(&self, other: &Numeric) -> Numeric {
        match self.promote(other) {
            Promoted::Integers(a, b) => a
                .checked_mul(b)
                .map(Numeric::Integer)
                .unwrap_or_else(|| Numeric::BigInteger(BigInt::from(a) * BigInt::from(b))),
            Promoted::BigIntegers(a, b) => Numeric::BigInteger(a * b),
            Promoted::Decimals(a, b) => Numeric::Decimal(a * b),
            Promoted::Floats(a, b) => Numeric::Float(a * b),
        }
    }

    /// Quotient. Decimal operands stay decimal; everything else is computed in f64.
    pub fn div(&self, other: &Numeric) -> Result<Numeric, String> {
        if other.is_zero() {
            return Err("division by zero".to_string());
        }
        Ok(match self.promote(other) {
            Promoted::Decimals(a, b) => Numeric::Decimal(a / b),
            _ => Numeric::Float(self.to_f64() / other.to_f64()),
        })
    }

    pub fn rem(&self, other: &Numeric) -> Result<Numeric, String> {
        if other.is_zero() {
            return Err("modulus by zero".to_string());
        }
        Ok(match self.promote(other) {
            Promoted::Integers(a, b) => a
                .checked_rem(b)
                .map(Numeric::Integer)
                .unwrap_or_else(|| Self::normalize(BigInt::from(a) % BigInt::from(b))),
            Promoted::BigIntegers(a, b) => Numeric::BigInteger(a % b),
            Promoted::Decimals(a, b) => Numeric::Decimal(a % b),
            Promoted::Floats(a, b) => Numeric::Float(a % b),
        })
    }

    /// Raises `self` to `exponent`. Integral bases with a non-negative integral
    /// exponent are computed exactly while the result stays within
    /// `MAX_EXACT_POWER_BITS`; everything else falls back to f64.
    pub fn pow(&self, exponent: &Numeric) -> Numeric {
        let small_exponent = exponent.to_i64().and_then(|e| u32::try_from(e).ok());
        if let (Some(e), true) = (small_exponent, self.is_integral()) {
            if let Some(n) = self.to_i64().and_then(|base| base.checked_pow(e)) {
                return Numeric::Integer(n);
            }
            let base = self.to_bigint();
            if base.bits().saturating_mul(u64::from(e)) <= MAX_EXACT_POWER_BITS {
                return Numeric::BigInteger(base.pow(e));
            }
        }
        Numeric::Float(self.to_f64().powf(exponent.to_f64()))
    }

    /// Average of two numbers, used for the midpoint of an even-sized sample.
    pub fn midpoint(&self, other: &Numeric) -> Numeric {
        let sum = self.add(other);
        match sum.div(&Numeric::Integer(2)) {
            Ok(mid) => mid,
            // Dividing by a non-zero literal cannot fail.
            Err(_) => Numeric::Float(sum.to_f64() / 2.0),
        }
    }

    pub fn abs(&self) -> Numeric {
        match self {
            Numeric::Integer(n) => n
                .checked_abs()
                .map(Numeric::Integer)
                .unwrap_or_else(|| Numeric::BigInteger(BigInt::from(*n).abs())),
            Numeric::Float(n) => Numeric::Float(n.abs()),
            Numeric::BigInteger(n) => Numeric::BigInteger(n.abs()),
            Numeric::Decimal(n) => Numeric::Decimal(n.abs()),
        }
    }

    /// -1, 0 or 1 in the operand's own representation.
    pub fn signum(&self) -> Numeric {
        match self {
            Numeric::Integer(n) => Numeric::Integer(n.signum()),
            Numeric::Float(n) if *n == 0.0 || n.is_nan() => Numeric::Float(*n),
            Numeric::Float(n) => Numeric::Float(n.signum()),
            Numeric::BigInteger(n) => Numeric::BigInteger(n.signum()),
            Numeric::Decimal(n) => Numeric::Decimal(BigDecimal::from(match n.sign() {
                Sign::Minus => -1,
                Sign::NoSign => 0,
                Sign::Plus => 1,
            })),
        }
    }

    pub fn ceil(&self) -> Numeric {
        self.round_with(f64::ceil, RoundingMode::Ceiling)
    }

    pub fn floor(&self) -> Numeric {
        self.round_with(f64::floor, RoundingMode::Floor)
    }

    /// Rounds half away from zero.
    pub fn round(&self) -> Numeric {
        self.round_with(f64::round, RoundingMode::HalfUp)
    }

    fn round_with(&self, float: fn(f64) -> f64, mode: RoundingMode) -> Numeric {
        match self {
            Numeric::Integer(_) | Numeric::BigInteger(_) => self.clone(),
            Numeric::Float(n) => Numeric::Float(float(*n)),
            Numeric::Decimal(n) => Numeric::Decimal(n.with_scale_round(0, mode)),
        }
    }

    pub fn increment(&self) -> Numeric {
        self.add(&Numeric::Integer(1))
    }

    pub fn decrement(&self) -> Numeric {
        self.sub(&Numeric::Integer(1))
    }

    /// Total order across representations; NaN sorts after every other float.
    pub fn total_cmp(&self, other: &Numeric) -> Ordering {
        match self.promote(other) {
            Promoted::Integers(a, b) => a.cmp(&b),
            Promoted::BigIntegers(a, b) => a.cmp(&b),
            Promoted::Decimals(a, b) => a.cmp(&b),
            Promoted::Floats(a, b) => a.total_cmp(&b),
        }
    }
}

impl From<i64> for Numeric {
    fn from(n: i64) -> Self {
        Numeric::Integer(n)
    }
}

impl From<f64> for Numeric {
    fn from(n: f64) -> Self {
        Numeric::Float(n)
    }
}

impl From<BigInt> for Numeric {
    fn from(n: BigInt) -> Self {
        Numeric::BigInteger(n)
    }
}

impl From<BigDecimal> for Numeric {
    fn from(n: BigDecimal) -> Self {
        Numeric::Decimal(n)
    }
}

/// Arbitrary precision numbers travel as their decimal text so every serde format can carry them.
mod text_repr {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn integer_overflow_widens() {
        let sum = Numeric::Integer(i64::MAX).add(&Numeric::Integer(1));
        assert_eq!(
            sum,
            Numeric::BigInteger(BigInt::from(i64::MAX) + BigInt::from(1))
        );
        assert_eq!(
            Numeric::Integer(i64::MIN).abs(),
            Numeric::BigInteger(BigInt::from(i64::MIN).abs())
        );
    }

    #[test]
    fn promotion_prefers_float_over_decimal() {
        let decimal = Numeric::Decimal(BigDecimal::from_str("1.5").unwrap());
        assert_eq!(decimal.add(&Numeric::Float(1.0)), Numeric::Float(2.5));
        assert_eq!(
            decimal.add(&Numeric::Integer(1)),
            Numeric::Decimal(BigDecimal::from_str("2.5").unwrap())
        );
    }

    #[test]
    fn division_and_modulus_reject_zero() {
        assert!(Numeric::Integer(4).div(&Numeric::Integer(0)).is_err());
        assert!(Numeric::Float(4.0).rem(&Numeric::Float(0.0)).is_err());
        assert_eq!(
            Numeric::Integer(7).rem(&Numeric::Integer(3)),
            Ok(Numeric::Integer(1))
        );
        assert_eq!(
            Numeric::Integer(i64::MIN).rem(&Numeric::Integer(-1)),
            Ok(Numeric::Integer(0))
        );
    }

    #[test]
    fn decimal_rounding_is_type_preserving() {
        let value = Numeric::Decimal(BigDecimal::from_str("-2.5").unwrap());
        assert_eq!(value.round(), Numeric::Decimal(BigDecimal::from(-3)));
        assert_eq!(value.ceil(), Numeric::Decimal(BigDecimal::from(-2)));
        assert_eq!(value.floor(), Numeric::Decimal(BigDecimal::from(-3)));
        assert_eq!(value.signum(), Numeric::Decimal(BigDecimal::from(-1)));
    }

    fn hash_of(n: &Numeric) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        n.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equal_floats_hash_alike() {
        let zero = Numeric::Float(0.0);
        let negative_zero = Numeric::Float(-0.0);
        assert_eq!(zero, negative_zero);
        assert_eq!(hash_of(&zero), hash_of(&negative_zero));

        let nan = Numeric::Float(f64::NAN);
        let other_nan = Numeric::Float(-f64::NAN);
        assert_eq!(nan, other_nan);
        assert_eq!(hash_of(&nan), hash_of(&other_nan));

        assert_ne!(Numeric::Float(1.0), Numeric::Integer(1));
    }

    #[test]
    fn float_sign_of_zero_is_zero() {
        assert_eq!(Numeric::Float(0.0).signum(), Numeric::Float(0.0));
        assert_eq!(Numeric::Float(-3.2).signum(), Numeric::Float(-1.0));
    }

    #[test]
    fn exact_integer_powers() {
        assert_eq!(
            Numeric::Integer(2).pow(&Numeric::Integer(10)),
            Numeric::Integer(1024)
        );
        assert_eq!(
            Numeric::Integer(2).pow(&Numeric::Integer(-1)),
            Numeric::Float(0.5)
        );
        assert_eq!(
            Numeric::Integer(10).pow(&Numeric::Integer(30)),
            Numeric::BigInteger(BigInt::from(10).pow(30))
        );
    }

    #[test]
    fn huge_powers_fall_back_to_floats() {
        assert_eq!(
            Numeric::Integer(2).pow(&Numeric::Integer(4_000_000_000)),
            Numeric::Float(f64::INFINITY)
        );
        assert_eq!(
            Numeric::BigInteger(BigInt::from(10).pow(30)).pow(&Numeric::Integer(1 << 20)),
            Numeric::Float(f64::INFINITY)
        );
        // Just inside the bound the result stays exact.
        assert_eq!(
            Numeric::Integer(2).pow(&Numeric::Integer(1 << 19)),
            Numeric::BigInteger(BigInt::from(2).pow(1 << 19))
        );
    }

    #[test]
    fn cross_representation_ordering() {
        assert_eq!(
            Numeric::Integer(3).total_cmp(&Numeric::Float(2.5)),
            Ordering::Greater
        );
        assert_eq!(
            Numeric::BigInteger(BigInt::from(2)).total_cmp(&Numeric::Integer(2)),
            Ordering::Equal
        );
    }
}
