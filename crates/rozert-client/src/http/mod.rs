/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: Signed HTTP requests and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod payment;
pub mod routes;
pub mod signature;
pub mod transaction;

pub use error::{Result, RozertError};
pub use signature::{sign_request, RequestSigner};

pub use client::{
    ClientConfig, MerchantCredentials, RozertClient, SignedRequest, CONTENT_TYPE_HEADER,
    MERCHANT_ID_HEADER, SANDBOX_HEADER, SIGNATURE_HEADER,
};
pub use routes::{deposit_route, transaction_route, withdraw_route};
