/*
[INPUT]:  Typed request values (serde::Serialize) and free-form user data scalars
[OUTPUT]: Deterministic JSON body strings used both on the wire and as signed message
[POS]:    Serialization layer - canonical rendering shared by signer and client
[UPDATE]: When the rendering rules for a value type change
*/

//! Canonical serialization.
//!
//! The body produced here is signed and then sent verbatim, so the same
//! logical payload must always yield the same bytes:
//!
//! * decimals are fixed-point strings (`"100"`, `"100.50"`), never floats;
//! * UUIDs are hyphenated lowercase strings;
//! * timestamps are `YYYY-MM-DD HH:MM:SS` and dates `YYYY-MM-DD`, in UTC;
//! * enums are their wire value;
//! * objects are compact with keys in lexicographic order;
//! * an absent, `null` or empty-object payload is the empty string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::http::{Result, RozertError};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a UTC timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Render a date as `YYYY-MM-DD`
pub fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Render a decimal in fixed-point notation, keeping its scale
pub fn format_decimal(value: &Decimal) -> String {
    value.to_string()
}

/// Convert a serializable value into its canonical JSON tree.
pub fn to_canonical_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    let value = serde_json::to_value(value).map_err(RozertError::Serialization)?;
    Ok(sort_keys(value))
}

/// Render a canonical JSON tree as the request body.
pub fn value_to_body(value: &Value) -> Result<String> {
    if is_empty_payload(value) {
        return Ok(String::new());
    }
    serde_json::to_string(&sort_keys(value.clone())).map_err(RozertError::Serialization)
}

/// Render an optional payload as the request body.
///
/// `None` gives the empty string, which is also what gets signed.
pub fn to_body<T: Serialize>(payload: Option<&T>) -> Result<String> {
    match payload {
        Some(payload) => value_to_body(&to_canonical_value(payload)?),
        None => Ok(String::new()),
    }
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

// serde_json may be built with `preserve_order` elsewhere in the graph, so
// ordering is applied explicitly rather than relied upon.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(key, value)| (key, sort_keys(value)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Values with a lossless canonical JSON form.
///
/// Floating-point numbers intentionally have no implementation; use
/// [`Decimal`] for fractional amounts.
pub trait IntoCanonical {
    fn into_canonical(self) -> Value;
}

impl IntoCanonical for Value {
    fn into_canonical(self) -> Value {
        sort_keys(self)
    }
}

impl IntoCanonical for String {
    fn into_canonical(self) -> Value {
        Value::String(self)
    }
}

impl IntoCanonical for &str {
    fn into_canonical(self) -> Value {
        Value::String(self.to_string())
    }
}

impl IntoCanonical for bool {
    fn into_canonical(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! integer_into_canonical {
    ($($ty:ty),*) => {
        $(
            impl IntoCanonical for $ty {
                fn into_canonical(self) -> Value {
                    Value::from(self)
                }
            }
        )*
    };
}

integer_into_canonical!(i8, i16, i32, i64, u8, u16, u32, u64);

impl IntoCanonical for Decimal {
    fn into_canonical(self) -> Value {
        Value::String(format_decimal(&self))
    }
}

impl IntoCanonical for Uuid {
    fn into_canonical(self) -> Value {
        Value::String(self.hyphenated().to_string())
    }
}

impl IntoCanonical for NaiveDateTime {
    fn into_canonical(self) -> Value {
        Value::String(format_timestamp(&self))
    }
}

impl IntoCanonical for DateTime<Utc> {
    fn into_canonical(self) -> Value {
        Value::String(format_timestamp(&self.naive_utc()))
    }
}

impl IntoCanonical for NaiveDate {
    fn into_canonical(self) -> Value {
        Value::String(format_date(&self))
    }
}

impl<T: IntoCanonical> IntoCanonical for Option<T> {
    fn into_canonical(self) -> Value {
        self.map_or(Value::Null, IntoCanonical::into_canonical)
    }
}

impl<T: IntoCanonical> IntoCanonical for Vec<T> {
    fn into_canonical(self) -> Value {
        Value::Array(self.into_iter().map(IntoCanonical::into_canonical).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde::Serializer;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    #[derive(Serialize)]
    struct Payload {
        zeta: &'static str,
        #[serde(with = "rust_decimal::serde::str")]
        amount: Decimal,
        alpha: Option<String>,
    }

    #[rstest]
    #[case("100", "100")]
    #[case("100.50", "100.50")]
    #[case("0.01", "0.01")]
    #[case("0", "0")]
    #[case("12345678901234567890.12345678", "12345678901234567890.12345678")]
    fn test_decimal_renders_fixed_point(#[case] input: &str, #[case] expected: &str) {
        let amount = Decimal::from_str(input).unwrap();
        let rendered = amount.into_canonical();
        assert_eq!(rendered, Value::String(expected.to_string()));

        let parsed = Decimal::from_str(rendered.as_str().unwrap()).unwrap();
        assert_eq!(parsed, amount);
    }

    #[test]
    fn test_decimal_from_integer_has_no_fraction() {
        assert_eq!(format_decimal(&Decimal::from(100)), "100");
    }

    #[test]
    fn test_uuid_renders_hyphenated() {
        let id = Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap();
        assert_eq!(
            id.into_canonical(),
            json!("11111111-1111-1111-1111-111111111111")
        );
    }

    #[test]
    fn test_dates_and_timestamps() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(date.into_canonical(), json!("2024-03-09"));

        let timestamp = date.and_hms_opt(7, 5, 3).unwrap();
        assert_eq!(timestamp.into_canonical(), json!("2024-03-09 07:05:03"));

        let aware = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap();
        assert_eq!(aware.into_canonical(), json!("2024-03-09 23:59:59"));
    }

    #[test]
    fn test_option_and_vec() {
        assert_eq!(None::<String>.into_canonical(), Value::Null);
        assert_eq!(Some("x").into_canonical(), json!("x"));
        assert_eq!(vec![1_u32, 2].into_canonical(), json!([1, 2]));
    }

    #[test]
    fn test_empty_payloads_render_empty_string() {
        assert_eq!(to_body::<Value>(None).unwrap(), "");
        assert_eq!(to_body(Some(&Value::Null)).unwrap(), "");
        assert_eq!(to_body(Some(&json!({}))).unwrap(), "");
        assert_eq!(value_to_body(&json!({})).unwrap(), "");
    }

    #[test]
    fn test_body_is_compact_and_sorted() {
        let payload = Payload {
            zeta: "last",
            amount: Decimal::from(100),
            alpha: None,
        };
        let body = to_body(Some(&payload)).unwrap();
        assert_eq!(body, r#"{"alpha":null,"amount":"100","zeta":"last"}"#);
    }

    #[test]
    fn test_nested_keys_sorted() {
        let value = json!({"b": {"y": 1, "x": [{"d": 1, "c": 2}]}, "a": true});
        let body = value_to_body(&value).unwrap();
        assert_eq!(body, r#"{"a":true,"b":{"x":[{"c":2,"d":1}],"y":1}}"#);
    }

    #[test]
    fn test_same_payload_same_bytes() {
        let first = to_body(Some(&json!({"currency": "MXN", "amount": "1"}))).unwrap();
        let second = to_body(Some(&json!({"amount": "1", "currency": "MXN"}))).unwrap();
        assert_eq!(first, second);
    }

    struct Unrenderable;

    impl Serialize for Unrenderable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("value has no canonical form"))
        }
    }

    #[test]
    fn test_unrenderable_value_fails() {
        let err = to_body(Some(&Unrenderable)).unwrap_err();
        assert!(matches!(err, RozertError::Serialization(_)));
    }

    #[test]
    fn test_non_string_key_fails() {
        let mut map = BTreeMap::new();
        map.insert(vec![1_u8], "value");
        let err = to_canonical_value(&map).unwrap_err();
        assert!(matches!(err, RozertError::Serialization(_)));
    }
}
