//! Custom serde helpers for node wire formats.
//!
//! Nodes are inconsistent about numeric encoding: the ticker returns decimal
//! strings, while `asset` amounts arrive as JSON numbers on some builds and
//! as strings on others (64-bit values beyond 2^53).

use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

/// Deserializes a `Decimal` from either a JSON string or a JSON number.
pub mod lenient_decimal {
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    use super::StringOrNumber;

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::Str(s) => Decimal::from_str(s.trim())
                .or_else(|_| Decimal::from_scientific(s.trim()))
                .map_err(|e| serde::de::Error::custom(format!("Invalid decimal '{}': {}", s, e))),
            StringOrNumber::Int(i) => Ok(Decimal::from(i)),
            StringOrNumber::Float(f) => Decimal::from_f64(f)
                .ok_or_else(|| serde::de::Error::custom(format!("Invalid decimal {}", f))),
        }
    }
}

/// Deserializes an integer asset amount from either a JSON string or number.
pub mod raw_amount {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::StringOrNumber;

    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::Str(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| serde::de::Error::custom(format!("Invalid amount '{}': {}", s, e))),
            StringOrNumber::Int(i) => Ok(i),
            StringOrNumber::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Ok(f as i64)
            }
            StringOrNumber::Float(f) => Err(serde::de::Error::custom(format!(
                "Invalid amount {}",
                f
            ))),
        }
    }
}
