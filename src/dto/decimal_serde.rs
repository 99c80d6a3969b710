//! Exact `Decimal` <-> JSON number conversion.
//!
//! `serde_json` is built with `arbitrary_precision`, so prices go through
//! `serde_json::Number` and never through `f64`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

fn to_number(value: &Decimal) -> Result<serde_json::Number, String> {
    serde_json::Number::from_str(&value.normalize().to_string()).map_err(|e| e.to_string())
}

fn from_number(num: &serde_json::Number) -> Result<Decimal, String> {
    let text = num.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| format!("invalid decimal `{text}`: {e}"))
}

pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    to_number(value)
        .map_err(serde::ser::Error::custom)?
        .serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let num = serde_json::Number::deserialize(deserializer)?;
    from_number(&num).map_err(serde::de::Error::custom)
}

pub mod option {
    use super::{from_number, to_number};
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => to_number(d)
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<serde_json::Number>::deserialize(deserializer)?
            .map(|num| from_number(&num).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Price {
        #[serde(with = "super")]
        price: Decimal,
        #[serde(default, with = "super::option")]
        size: Option<Decimal>,
    }

    #[test]
    fn test_keeps_exact_digits() {
        let parsed: Price = serde_json::from_str(r#"{"price": 1.01, "size": 10.10}"#).unwrap();
        assert_eq!(parsed.price, dec!(1.01));
        assert_eq!(parsed.size, Some(dec!(10.10)));

        let text = serde_json::to_string(&parsed).unwrap();
        assert_eq!(text, r#"{"price":1.01,"size":10.1}"#);
    }

    #[test]
    fn test_scientific_notation() {
        let parsed: Price = serde_json::from_str(r#"{"price": 1.5E+2}"#).unwrap();
        assert_eq!(parsed.price, dec!(150));
        assert_eq!(parsed.size, None);
    }
}
