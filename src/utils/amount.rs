//! Lenient deserialization for monetary amounts
//!
//! Upstream systems deliver amounts inconsistently: JSON numbers, numeric
//! strings, or null. A single malformed record must not poison an entire
//! reconciliation pass, so anything unparsable coerces to zero instead of
//! failing the whole deserialization.

use bigdecimal::BigDecimal;
use serde::de::{self, Deserializer, Visitor};
use std::fmt;
use std::str::FromStr;

/// Zero amount, used as the serde default for missing fields
pub fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = BigDecimal;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a numeric amount, a numeric string, or null")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(BigDecimal::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(BigDecimal::from(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(BigDecimal::try_from(value).unwrap_or_else(|_| zero()))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(BigDecimal::from_str(value.trim()).unwrap_or_else(|_| zero()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(zero())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(zero())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Deserialize an amount, coercing null, missing, or unparsable values
/// to zero
pub fn lenient<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(AmountVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(default = "zero", deserialize_with = "lenient")]
        amount: BigDecimal,
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let from_number: Payload = serde_json::from_str(r#"{"amount": 125}"#).unwrap();
        assert_eq!(from_number.amount, BigDecimal::from(125));

        let from_string: Payload = serde_json::from_str(r#"{"amount": "99.50"}"#).unwrap();
        assert_eq!(from_string.amount, BigDecimal::from_str("99.50").unwrap());
    }

    #[test]
    fn coerces_garbage_to_zero() {
        let from_garbage: Payload = serde_json::from_str(r#"{"amount": "N/A"}"#).unwrap();
        assert_eq!(from_garbage.amount, zero());

        let from_null: Payload = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert_eq!(from_null.amount, zero());

        let from_missing: Payload = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(from_missing.amount, zero());
    }
}
