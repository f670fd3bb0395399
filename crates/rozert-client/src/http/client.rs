/*
[INPUT]:  Merchant credentials (host, merchant id, secret, sandbox flag) and timeouts
[OUTPUT]: Configured client that signs, sends and parses API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::header::HeaderValue;
use reqwest::{Client, Method, Url};
use tracing::warn;

use crate::http::signature::RequestSigner;
use crate::http::{Result, RozertError};
use crate::types::TransactionData;

pub const MERCHANT_ID_HEADER: &str = "X-Merchant-Id";
pub const SIGNATURE_HEADER: &str = "X-Signature";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
/// Present only in sandbox mode; its absence selects production
pub const SANDBOX_HEADER: &str = "X-Sandbox-Mode";

const JSON_CONTENT_TYPE: &str = "application/json";
const ERROR_BODY_LOG_LIMIT: usize = 1000;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Merchant identity and environment supplied by the caller
#[derive(Clone)]
pub struct MerchantCredentials {
    pub host: String,
    pub merchant_id: String,
    pub secret_key: String,
    pub sandbox: bool,
}

impl MerchantCredentials {
    /// Production credentials; see [`sandbox`](Self::sandbox)
    pub fn new(
        host: impl Into<String>,
        merchant_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            merchant_id: merchant_id.into(),
            secret_key: secret_key.into(),
            sandbox: false,
        }
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }
}

impl std::fmt::Debug for MerchantCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantCredentials")
            .field("host", &self.host)
            .field("merchant_id", &self.merchant_id)
            .field("secret_key", &"<redacted>")
            .field("sandbox", &self.sandbox)
            .finish()
    }
}

/// A fully built API call: the body here is exactly what was signed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: Method,
    pub url: Url,
    pub body: String,
    pub headers: Vec<(&'static str, String)>,
}

impl SignedRequest {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn signature(&self) -> Option<&str> {
        self.header(SIGNATURE_HEADER)
    }
}

/// Main HTTP client for the Rozert payment API
///
/// Immutable after construction; clones share the connection pool, so one
/// instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct RozertClient {
    http_client: Client,
    host: String,
    merchant_id: String,
    signer: RequestSigner,
    sandbox: bool,
}

impl RozertClient {
    /// Create a new client with default configuration
    pub fn new(credentials: MerchantCredentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(credentials: MerchantCredentials, config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|err| RozertError::Configuration(format!("http client: {err}")))?;

        let host = credentials.host.trim_end_matches('/').to_string();
        let parsed = Url::parse(&host)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RozertError::Configuration(format!(
                "host must be an http(s) URL, got {host}"
            )));
        }

        if credentials.merchant_id.is_empty()
            || HeaderValue::from_str(&credentials.merchant_id).is_err()
        {
            return Err(RozertError::Configuration(
                "merchant id must be a non-empty header-safe string".to_string(),
            ));
        }

        Ok(Self {
            http_client,
            host,
            merchant_id: credentials.merchant_id,
            signer: RequestSigner::new(&credentials.secret_key),
            sandbox: credentials.sandbox,
        })
    }

    /// Replace the underlying `reqwest::Client` (proxy, TLS, custom pool)
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn is_sandbox(&self) -> bool {
        self.sandbox
    }

    /// Headers for a request carrying `body`
    pub fn headers(&self, body: &str) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            (MERCHANT_ID_HEADER, self.merchant_id.clone()),
            (SIGNATURE_HEADER, self.signer.sign(body)),
            (CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE.to_string()),
        ];
        if self.sandbox {
            headers.push((SANDBOX_HEADER, "true".to_string()));
        }
        headers
    }

    /// Build a signed request for `host + endpoint`.
    ///
    /// `body` must already be canonical; it is signed and later sent as is.
    pub fn signed_request(&self, method: Method, endpoint: &str, body: String) -> Result<SignedRequest> {
        let url = Url::parse(&format!("{}{}", self.host, endpoint))?;
        let headers = self.headers(&body);
        Ok(SignedRequest {
            method,
            url,
            body,
            headers,
        })
    }

    /// Send a prepared request and parse the transaction it returns
    pub async fn execute(&self, request: SignedRequest) -> Result<TransactionData> {
        let SignedRequest {
            method,
            url,
            body,
            headers,
        } = request;

        let mut builder = self.http_client.request(method.clone(), url.clone());
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if !body.is_empty() {
            builder = builder.body(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(%method, %url, error = %err, "Rozert request failed");
                return Err(err.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response.text().await);
            warn!(
                %method,
                %url,
                status = status.as_u16(),
                body = %truncate(&body, ERROR_BODY_LOG_LIMIT),
                "Rozert request failed"
            );
            return Err(RozertError::Transport { status, body });
        }

        let bytes = response.bytes().await?;
        TransactionData::from_response_body(&bytes)
    }
}

// A failed body read is reported in place of the body.
fn error_body<E: std::fmt::Display>(read: std::result::Result<String, E>) -> String {
    match read {
        Ok(body) => body,
        Err(err) => format!("<failed to read response body: {err}>"),
    }
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::signature::sign_request;

    fn credentials() -> MerchantCredentials {
        MerchantCredentials::new("https://ps-stage.rozert.cloud/", "merchant-1", "test-secret")
    }

    #[test]
    fn test_host_trailing_slash_trimmed() {
        let client = RozertClient::new(credentials()).expect("client init");
        assert_eq!(client.host(), "https://ps-stage.rozert.cloud");
        assert!(!client.is_sandbox());
    }

    #[test]
    fn test_invalid_host_rejected() {
        let err = RozertClient::new(MerchantCredentials::new("not a url", "m", "s")).unwrap_err();
        assert!(err.is_configuration_error());

        let err = RozertClient::new(MerchantCredentials::new("ftp://files.example", "m", "s"))
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_invalid_merchant_id_rejected() {
        let err = RozertClient::new(MerchantCredentials::new("https://h.example", "", "s"))
            .unwrap_err();
        assert!(err.is_configuration_error());

        let err = RozertClient::new(MerchantCredentials::new("https://h.example", "a\nb", "s"))
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_production_headers_have_no_sandbox_flag() {
        let client = RozertClient::new(credentials()).expect("client init");
        let headers = client.headers("");
        assert_eq!(headers.len(), 3);
        assert!(headers.iter().all(|(name, _)| *name != SANDBOX_HEADER));
    }

    #[test]
    fn test_sandbox_headers() {
        let client = RozertClient::new(credentials().sandbox(true)).expect("client init");
        let request = client
            .signed_request(Method::GET, "/api/payment/v1/transaction/abc123/", String::new())
            .expect("signed request");

        assert_eq!(request.header("x-sandbox-mode"), Some("true"));
        assert_eq!(request.header(MERCHANT_ID_HEADER), Some("merchant-1"));
        assert_eq!(request.header(CONTENT_TYPE_HEADER), Some("application/json"));
        assert_eq!(request.signature(), Some(sign_request("", "test-secret").as_str()));
        assert_eq!(
            request.url.as_str(),
            "https://ps-stage.rozert.cloud/api/payment/v1/transaction/abc123/"
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", credentials());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("test-secret"));

        let client = RozertClient::new(credentials()).expect("client init");
        assert!(!format!("{client:?}").contains("test-secret"));
    }

    #[test]
    fn test_error_body_keeps_read_failure() {
        assert_eq!(error_body::<String>(Ok("bad gateway".to_string())), "bad gateway");
        let body = error_body(Err("connection closed before message completed"));
        assert_eq!(
            body,
            "<failed to read response body: connection closed before message completed>"
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("short", 1000), "short");
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<RozertClient>();
    }
}
