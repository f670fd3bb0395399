/*
[INPUT]:  Provider names, withdrawal system keys, transaction ids
[OUTPUT]: API paths relative to the merchant host
[POS]:    HTTP layer - endpoint paths and withdrawal routing table
[UPDATE]: When the API adds providers or withdrawal systems
*/

use crate::http::{Result, RozertError};

/// Withdrawal systems the client knows how to route
const WITHDRAW_ROUTES: &[(&str, &str)] = &[("rozert_paypal", "/api/payment/v1/paypal/withdraw/")];

/// POST /api/payment/v1/{provider}/deposit/
pub fn deposit_route(provider: &str) -> String {
    format!("/api/payment/v1/{provider}/deposit/")
}

/// Resolve the withdrawal path for a `system` routing key.
///
/// New systems need an entry in the routing table; anything else is a
/// configuration error.
pub fn withdraw_route(system: &str) -> Result<&'static str> {
    WITHDRAW_ROUTES
        .iter()
        .find(|(key, _)| *key == system)
        .map(|(_, route)| *route)
        .ok_or_else(|| RozertError::Configuration(format!("Unknown system {system}")))
}

/// Systems accepted by [`withdraw_route`]
pub fn withdraw_systems() -> impl Iterator<Item = &'static str> {
    WITHDRAW_ROUTES.iter().map(|(key, _)| *key)
}

/// GET /api/payment/v1/transaction/{id}/
///
/// Ids are limited to RFC 3986 unreserved characters and may not be a dot
/// segment, so URL normalization cannot move the request to another path.
pub fn transaction_route(id: &str) -> Result<String> {
    let unreserved = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'));
    if id.is_empty() || !unreserved || id == "." || id == ".." {
        return Err(RozertError::invalid_request(format!(
            "transaction id {id:?} is not a valid path segment"
        )));
    }
    Ok(format!("/api/payment/v1/transaction/{id}/"))
}
