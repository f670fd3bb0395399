/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Rozert payment client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod canonical;
pub mod http;
pub mod types;

pub use canonical::IntoCanonical;

// Re-export commonly used types from http
pub use http::{
    deposit_route,
    sign_request,
    ClientConfig,
    MerchantCredentials,
    RequestSigner,
    Result,
    RozertClient,
    RozertError,
    SignedRequest,
};

// Re-export all types
pub use types::*;
