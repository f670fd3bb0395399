/*
[INPUT]:  Deposit, withdrawal and STP CoDi requests
[OUTPUT]: TransactionData for the created transaction
[POS]:    HTTP layer - payment endpoints (signed POST bodies)
[UPDATE]: When adding new payment endpoints or changing payload merging
*/

use reqwest::Method;
use serde_json::Value;

use crate::canonical;
use crate::http::client::SignedRequest;
use crate::http::routes::withdraw_route;
use crate::http::{Result, RozertClient};
use crate::types::{DepositPayload, StpCodiRequest, TransactionData, UserData, Validate, WithdrawRequest};

impl RozertClient {
    /// Build a signed deposit request for `route`.
    ///
    /// A non-empty `user_data` replaces the request's own `user_data`.
    pub fn prepare_deposit<R: DepositPayload>(
        &self,
        request: &R,
        route: &str,
        user_data: Option<&UserData>,
    ) -> Result<SignedRequest> {
        request.validate()?;

        let mut payload = canonical::to_canonical_value(request)?;
        if let (Some(user_data), Value::Object(fields)) = (user_data, &mut payload) {
            if !user_data.is_empty() {
                fields.insert("user_data".to_string(), user_data.clone().into_value());
            }
        }

        let body = canonical::value_to_body(&payload)?;
        self.signed_request(Method::POST, route, body)
    }

    /// Start a deposit
    ///
    /// POST {host}{route}, usually built with [`deposit_route`](crate::http::routes::deposit_route)
    pub async fn start_deposit<R: DepositPayload>(
        &self,
        request: &R,
        route: &str,
        user_data: Option<&UserData>,
    ) -> Result<TransactionData> {
        let signed = self.prepare_deposit(request, route, user_data)?;
        self.execute(signed).await
    }

    /// Build a signed withdrawal request routed by `request.system`
    pub fn prepare_withdraw(&self, request: &WithdrawRequest) -> Result<SignedRequest> {
        request.validate()?;
        let route = withdraw_route(&request.system)?;
        let body = canonical::to_body(Some(request))?;
        self.signed_request(Method::POST, route, body)
    }

    /// Start a withdrawal
    ///
    /// POST /api/payment/v1/{provider}/withdraw/
    /// Unknown systems fail before anything is sent.
    pub async fn start_withdraw(&self, request: &WithdrawRequest) -> Result<TransactionData> {
        let signed = self.prepare_withdraw(request)?;
        self.execute(signed).await
    }

    /// Build a signed STP CoDi deposit, posted to the bare host
    pub fn prepare_stp_codi_deposit(&self, request: &StpCodiRequest) -> Result<SignedRequest> {
        self.prepare_deposit(request, "", Some(&request.phone_user_data()))
    }

    /// Start an STP CoDi deposit
    ///
    /// POST {host}
    pub async fn stp_codi_deposit(&self, request: &StpCodiRequest) -> Result<TransactionData> {
        let signed = self.prepare_stp_codi_deposit(request)?;
        self.execute(signed).await
    }
}
