//! Concrete literals read back from a solver model.

use std::fmt::{Display, Formatter};

use num_bigint::{BigInt, BigUint};

/// A literal value of a symbolic term under some model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(BigInt),
    Bool(bool),
}

impl Value {
    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(v) => Some(v),
            Value::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Int(_) => None,
            Value::Bool(b) => Some(*b),
        }
    }

    /// Interprets the low `width` bits of `bits` as a two's complement number.
    pub fn from_bits(bits: u64, width: u32, signed: bool) -> Value {
        assert!((1..=64).contains(&width), "width must be in 1..=64");
        let masked = if width == 64 { bits } else { bits & ((1u64 << width) - 1) };
        let sign_bit = 1u64 << (width - 1);
        if signed && masked & sign_bit != 0 {
            let magnitude = BigInt::from(BigUint::from(1u8) << width);
            Value::Int(BigInt::from(masked) - magnitude)
        } else {
            Value::Int(BigInt::from(masked))
        }
    }

    /// Parses an integer numeral as printed by the solver, e.g. `42` or `(- 42)`.
    pub fn parse_numeral(text: &str) -> Option<Value> {
        let text = text.trim();
        if let Some(inner) = text.strip_prefix("(-").and_then(|s| s.strip_suffix(')')) {
            let v: BigInt = inner.trim().parse().ok()?;
            return Some(Value::Int(-v));
        }
        text.parse().ok().map(Value::Int)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(BigInt::from(v))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_from_bits_signed() {
        assert_eq!(Value::from_bits(0xFF, 8, true), Value::from(-1));
        assert_eq!(Value::from_bits(0x80, 8, true), Value::from(-128));
        assert_eq!(Value::from_bits(0x7F, 8, true), Value::from(127));
        assert_eq!(Value::from_bits(u64::MAX, 64, true), Value::from(-1));
    }

    #[test]
    fn test_from_bits_unsigned() {
        assert_eq!(Value::from_bits(0xFF, 8, false), Value::from(255));
        assert_eq!(Value::from_bits(0x1FF, 8, false), Value::from(255));
        assert_eq!(Value::from_bits(u64::MAX, 64, false), Value::Int(BigInt::from(u64::MAX)));
    }

    #[test]
    fn test_parse_numeral() {
        assert_eq!(Value::parse_numeral("17"), Some(Value::from(17)));
        assert_eq!(Value::parse_numeral("(- 17)"), Some(Value::from(-17)));
        assert_eq!(Value::parse_numeral("x"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(-3).to_string(), "-3");
        assert_eq!(Value::from(true).to_string(), "true");
    }
}
