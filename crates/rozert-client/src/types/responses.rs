/*
[INPUT]:  Raw JSON bodies returned by the payment API
[OUTPUT]: Validated TransactionData snapshots
[POS]:    Data layer - response types and the remote-to-local field adaptation
[UPDATE]: When API schema changes or new types added
[UPDATE]: Remote `form` field is exposed as `user_form_data`
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::enums::{FormMethod, TransactionStatus, TransactionType};
use super::user_data::UserData;
use crate::http::{Result, RozertError};

/// Follow-up action the payer must take for a pending transaction.
///
/// Exactly the payload field of the tag may be set; the other one must be
/// absent or null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", try_from = "RawInstruction")]
pub enum Instruction {
    #[serde(rename = "instruction_file")]
    File { link: String },
    #[serde(rename = "instruction_qr_code")]
    QrCode { qr_code: String },
}

#[derive(Deserialize)]
struct RawInstruction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    qr_code: Option<String>,
}

impl TryFrom<RawInstruction> for Instruction {
    type Error = String;

    fn try_from(raw: RawInstruction) -> std::result::Result<Self, Self::Error> {
        match (raw.kind.as_str(), raw.link, raw.qr_code) {
            ("instruction_file", Some(link), None) => Ok(Instruction::File { link }),
            ("instruction_qr_code", None, Some(qr_code)) => Ok(Instruction::QrCode { qr_code }),
            ("instruction_file", _, _) => {
                Err("instruction_file requires link and no qr_code".to_string())
            }
            ("instruction_qr_code", _, _) => {
                Err("instruction_qr_code requires qr_code and no link".to_string())
            }
            (other, _, _) => Err(format!("unknown instruction type {other:?}")),
        }
    }
}

/// Form the payer has to submit to continue the transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionExtraFormData {
    pub action_url: String,
    pub method: FormMethod,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionData {
    pub id: String,
    pub status: TransactionStatus,
    pub wallet_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(
        deserialize_with = "serde_helpers::deserialize_decimal",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub amount: Decimal,
    pub currency: String,
    pub instruction: Option<Instruction>,
    pub decline_code: Option<String>,
    pub decline_reason: Option<String>,
    pub user_data: Option<UserData>,
    pub user_form_data: Option<TransactionExtraFormData>,
}

impl TransactionData {
    /// Parse a raw response body.
    pub fn from_response_body(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| RozertError::validation(format!("response is not JSON: {err}")))?;
        transaction_data_from_response(value)
    }

    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }
}

/// Validate a decoded response object into [`TransactionData`].
///
/// The remote `form` field is moved to `user_form_data`; any
/// `user_form_data` sent by the server is replaced.
pub fn transaction_data_from_response(response: Value) -> Result<TransactionData> {
    let mut fields = match response {
        Value::Object(fields) => fields,
        other => {
            return Err(RozertError::validation(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )));
        }
    };

    let form = fields.remove("form").unwrap_or(Value::Null);
    fields.insert("user_form_data".to_string(), form);

    serde_json::from_value(Value::Object(fields))
        .map_err(|err| RozertError::validation(format!("unexpected transaction shape: {err}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

mod serde_helpers {
    use super::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use std::str::FromStr;

    // Amounts may arrive as strings or JSON numbers; numbers are parsed from
    // their textual form so no binary float is involved.
    pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(raw) => Decimal::from_str(raw.trim()).map_err(serde::de::Error::custom),
            Value::Number(number) => {
                let raw = number.to_string();
                Decimal::from_str(&raw)
                    .or_else(|_| Decimal::from_scientific(&raw))
                    .map_err(serde::de::Error::custom)
            }
            _ => Err(serde::de::Error::custom("invalid decimal value")),
        }
    }

    pub fn serialize_decimal<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }
}
