/*
[INPUT]:  Merchant-supplied payer details (email, phone, address, ...)
[OUTPUT]: Free-form user data map with canonical values
[POS]:    Data layer - user data carried by deposit requests and transactions
[UPDATE]: When user data accepts new value kinds
*/

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::canonical::IntoCanonical;

/// Free-form payer data attached to a deposit.
///
/// Values go through [`IntoCanonical`], so only types with a lossless wire
/// form can be stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserData(Map<String, Value>);

impl UserData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous one for that key
    pub fn insert(&mut self, key: impl Into<String>, value: impl IntoCanonical) -> Option<Value> {
        self.0.insert(key.into(), value.into_canonical())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl IntoCanonical) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value for a key, if present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for UserData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: IntoCanonical> FromIterator<(K, V)> for UserData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = UserData::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}
