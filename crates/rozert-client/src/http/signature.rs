/*
[INPUT]:  Canonical request body and merchant secret key
[OUTPUT]: Base64 HMAC-SHA256 signature for the X-Signature header
[POS]:    HTTP layer - request signing for every endpoint
[UPDATE]: When changing signing algorithm or header format
*/

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ring::hmac;

/// Sign a request body with the merchant secret.
///
/// Computes `HMAC-SHA256(body, secret)` over the exact UTF-8 bytes of
/// `body` and returns the padded base64 encoding of the raw digest.
/// A bodiless request is signed as `sign_request("", secret)`.
pub fn sign_request(body: &str, secret: &str) -> String {
    RequestSigner::new(secret).sign(body)
}

/// Signs HTTP request bodies with a prepared HMAC key
#[derive(Clone)]
pub struct RequestSigner {
    key: hmac::Key,
}

impl RequestSigner {
    /// Create a new request signer from the merchant secret key
    pub fn new(secret: &str) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()),
        }
    }

    /// Sign the exact bytes that will be sent as the request body
    pub fn sign(&self, body: &str) -> String {
        let tag = hmac::sign(&self.key, body.as_bytes());
        BASE64.encode(tag.as_ref())
    }

    /// Check a base64 signature against a body in constant time
    pub fn verify(&self, body: &str, signature: &str) -> bool {
        let Ok(raw) = BASE64.decode(signature) else {
            return false;
        };
        hmac::verify(&self.key, body.as_bytes(), &raw).is_ok()
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("algorithm", &"HMAC-SHA256")
            .finish_non_exhaustive()
    }
}
