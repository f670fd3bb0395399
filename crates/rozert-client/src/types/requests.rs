/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization and local validation
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::StpCodiDepositType;
use super::user_data::UserData;
use crate::http::{Result, RozertError};

/// Local checks run before a request is serialized and signed
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Request bodies accepted by the deposit endpoints
pub trait DepositPayload: Serialize + Validate {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRequest {
    pub wallet_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    pub callback_url: Option<String>,
    pub user_data: Option<UserData>,
    pub redirect_url: Option<String>,
}

impl DepositRequest {
    pub fn new(wallet_id: Uuid, amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            wallet_id,
            amount,
            currency: currency.into(),
            callback_url: None,
            user_data: None,
            redirect_url: None,
        }
    }

    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    pub fn with_user_data(mut self, user_data: UserData) -> Self {
        self.user_data = Some(user_data);
        self
    }

    pub fn with_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }
}

impl Validate for DepositRequest {
    fn validate(&self) -> Result<()> {
        validate_amount(&self.amount)?;
        validate_currency(&self.currency)?;
        validate_url("callback_url", self.callback_url.as_deref())?;
        validate_url("redirect_url", self.redirect_url.as_deref())
    }
}

impl DepositPayload for DepositRequest {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub wallet_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    pub callback_url: Option<String>,
    /// Routing key selecting the withdrawal provider
    pub system: String,
}

impl WithdrawRequest {
    pub fn new(
        wallet_id: Uuid,
        amount: Decimal,
        currency: impl Into<String>,
        system: impl Into<String>,
    ) -> Self {
        Self {
            wallet_id,
            amount,
            currency: currency.into(),
            callback_url: None,
            system: system.into(),
        }
    }

    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }
}

impl Validate for WithdrawRequest {
    fn validate(&self) -> Result<()> {
        validate_amount(&self.amount)?;
        validate_currency(&self.currency)?;
        validate_url("callback_url", self.callback_url.as_deref())?;
        if self.system.trim().is_empty() {
            return Err(RozertError::invalid_request("system must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneRequired {
    pub phone: String,
}

/// STP CoDi deposit: user data must carry the payer phone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StpCodiRequest {
    pub wallet_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    pub callback_url: Option<String>,
    pub user_data: PhoneRequired,
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub deposit_type: StpCodiDepositType,
}

impl StpCodiRequest {
    pub fn new(
        wallet_id: Uuid,
        amount: Decimal,
        currency: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            wallet_id,
            amount,
            currency: currency.into(),
            callback_url: None,
            user_data: PhoneRequired {
                phone: phone.into(),
            },
            redirect_url: None,
            deposit_type: StpCodiDepositType::default(),
        }
    }

    pub fn with_deposit_type(mut self, deposit_type: StpCodiDepositType) -> Self {
        self.deposit_type = deposit_type;
        self
    }

    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    pub fn with_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    /// The phone payload sent in place of generic user data
    pub fn phone_user_data(&self) -> UserData {
        UserData::new().with("phone", self.user_data.phone.as_str())
    }
}

impl Validate for StpCodiRequest {
    fn validate(&self) -> Result<()> {
        validate_amount(&self.amount)?;
        validate_currency(&self.currency)?;
        validate_url("callback_url", self.callback_url.as_deref())?;
        validate_url("redirect_url", self.redirect_url.as_deref())?;
        if self.user_data.phone.trim().is_empty() {
            return Err(RozertError::invalid_request("user_data.phone must not be empty"));
        }
        Ok(())
    }
}

impl DepositPayload for StpCodiRequest {}

fn validate_amount(amount: &Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(RozertError::invalid_request(format!(
            "amount must not be negative, got {amount}"
        )));
    }
    Ok(())
}

fn validate_currency(currency: &str) -> Result<()> {
    let valid = currency.len() == 3 && currency.bytes().all(|b| b.is_ascii_uppercase());
    if !valid {
        return Err(RozertError::invalid_request(format!(
            "currency must be a 3-letter uppercase code, got {currency:?}"
        )));
    }
    Ok(())
}

fn validate_url(field: &str, value: Option<&str>) -> Result<()> {
    if let Some(raw) = value {
        url::Url::parse(raw).map_err(|err| {
            RozertError::invalid_request(format!("{field} is not an absolute URL: {err}"))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn wallet() -> Uuid {
        Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap()
    }

    #[test]
    fn deposit_request_serializes_amount_as_string() {
        let request = DepositRequest::new(wallet(), Decimal::from(100), "MXN");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "wallet_id": "11111111-1111-1111-1111-111111111111",
                "amount": "100",
                "currency": "MXN",
                "callback_url": null,
                "user_data": null,
                "redirect_url": null,
            })
        );
    }

    #[test]
    fn stp_codi_request_serializes_nested_phone() {
        let request = StpCodiRequest::new(wallet(), Decimal::from(50), "MXN", "+525512345678")
            .with_deposit_type(StpCodiDepositType::QrCode);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["user_data"], json!({"phone": "+525512345678"}));
        assert_eq!(value["deposit_type"], json!("qr_code"));
        assert_eq!(
            request.phone_user_data().into_value(),
            json!({"phone": "+525512345678"})
        );
    }

    #[test]
    fn negative_amount_rejected() {
        let request = DepositRequest::new(wallet(), Decimal::from_str("-0.01").unwrap(), "MXN");
        assert!(matches!(request.validate(), Err(RozertError::InvalidRequest(_))));
    }

    #[test]
    fn zero_amount_accepted() {
        let request = DepositRequest::new(wallet(), Decimal::ZERO, "USD");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn currency_must_be_three_uppercase_letters() {
        for currency in ["mxn", "MX", "MXNN", "M1N", ""] {
            let request = DepositRequest::new(wallet(), Decimal::ONE, currency);
            assert!(request.validate().is_err(), "{currency:?} should be rejected");
        }
    }

    #[test]
    fn callback_url_must_be_absolute() {
        let request =
            DepositRequest::new(wallet(), Decimal::ONE, "MXN").with_callback_url("/callback");
        assert!(request.validate().is_err());

        let request = DepositRequest::new(wallet(), Decimal::ONE, "MXN")
            .with_callback_url("https://merchant.com/callback");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn withdraw_requires_system() {
        let request = WithdrawRequest::new(wallet(), Decimal::ONE, "MXN", " ");
        assert!(request.validate().is_err());
    }

    #[test]
    fn stp_codi_requires_phone() {
        let request = StpCodiRequest::new(wallet(), Decimal::ONE, "MXN", "");
        assert!(request.validate().is_err());
    }
}
