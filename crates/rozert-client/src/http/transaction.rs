/*
[INPUT]:  Transaction id
[OUTPUT]: Current TransactionData snapshot
[POS]:    HTTP layer - transaction query endpoint (bodiless signed GET)
[UPDATE]: When adding new query endpoints
*/

use reqwest::Method;

use crate::http::client::SignedRequest;
use crate::http::routes::transaction_route;
use crate::http::{Result, RozertClient};
use crate::types::TransactionData;

impl RozertClient {
    /// Build the signed query; the signature covers the empty body
    pub fn prepare_transaction_query(&self, id: &str) -> Result<SignedRequest> {
        let route = transaction_route(id)?;
        self.signed_request(Method::GET, &route, String::new())
    }

    /// Fetch a transaction by id
    ///
    /// GET /api/payment/v1/transaction/{id}/
    pub async fn get_transaction(&self, id: &str) -> Result<TransactionData> {
        let signed = self.prepare_transaction_query(id)?;
        self.execute(signed).await
    }
}
