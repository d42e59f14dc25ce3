//! OAuth 1.0a Request Signing
//!
//! RFC 5849 HMAC-SHA256 signing for NetSuite token-based authentication.
//!
//! The signing process:
//! 1. Merge the URL's query parameters with the OAuth protocol parameters
//! 2. Build the signature base string from method, base URL and the sorted,
//!    encoded parameters
//! 3. Sign it with `encode(consumer_secret)&encode(token_secret)`
//! 4. Render the `Authorization: OAuth realm="..", ...` header
//!
//! Reference: https://www.rfc-editor.org/rfc/rfc5849#section-3.4

use base64::Engine;
use hmac::{Hmac, Mac};
use rand::RngCore;
use secrecy::ExposeSecret;
use sha2::Sha256;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::encoding::{parse_query_params, percent_encode, split_url};
use super::transport::HttpMethod;
use crate::types::NetSuiteCredentials;

type HmacSha256 = Hmac<Sha256>;

/// Signature method identifier.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA256";

/// OAuth protocol version.
pub const OAUTH_VERSION: &str = "1.0";

/// Random bytes in a generated nonce.
pub const NONCE_BYTES: usize = 16;

/// Nonce source (for dependency injection).
pub trait NonceGenerator: Send + Sync {
    /// Produce a single-use nonce.
    fn generate(&self) -> String;
}

/// Hex-encoded random nonce.
pub struct DefaultNonceGenerator {
    bytes: usize,
}

impl DefaultNonceGenerator {
    pub fn new() -> Self {
        Self { bytes: NONCE_BYTES }
    }

    /// Nonce with a custom number of random bytes (at least 16).
    pub fn with_bytes(bytes: usize) -> Self {
        Self {
            bytes: bytes.max(NONCE_BYTES),
        }
    }
}

impl Default for DefaultNonceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceGenerator for DefaultNonceGenerator {
    fn generate(&self) -> String {
        let mut buf = vec![0u8; self.bytes];
        rand::thread_rng().fill_bytes(&mut buf);
        hex::encode(buf)
    }
}

/// Nonce generator returning the same value every time. Test use only.
pub struct FixedNonceGenerator(pub String);

impl NonceGenerator for FixedNonceGenerator {
    fn generate(&self) -> String {
        self.0.clone()
    }
}

/// Timestamp source (for dependency injection).
pub trait Clock: Send + Sync {
    /// Current unix time in seconds.
    fn unix_timestamp(&self) -> i64;
}

/// Wall clock.
#[derive(Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock frozen at one instant. Test use only.
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn unix_timestamp(&self) -> i64 {
        self.0
    }
}

/// OAuth protocol parameters, kept sorted by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OAuthParameters {
    params: BTreeMap<String, String>,
}

impl OAuthParameters {
    /// Protocol parameters for one request, without the signature.
    pub fn new(consumer_key: &str, token: &str, timestamp: i64, nonce: &str) -> Self {
        let mut params = BTreeMap::new();
        params.insert("oauth_consumer_key".to_string(), consumer_key.to_string());
        params.insert("oauth_token".to_string(), token.to_string());
        params.insert(
            "oauth_signature_method".to_string(),
            SIGNATURE_METHOD.to_string(),
        );
        params.insert("oauth_timestamp".to_string(), timestamp.to_string());
        params.insert("oauth_nonce".to_string(), nonce.to_string());
        params.insert("oauth_version".to_string(), OAUTH_VERSION.to_string());
        Self { params }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn with_signature(mut self, signature: String) -> Self {
        self.params.insert("oauth_signature".to_string(), signature);
        self
    }
}

/// Build the normalized parameter string: encoded pairs sorted by key, then
/// value, joined with `&`.
pub fn normalized_parameters<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut encoded: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();

    encoded.sort();

    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the signature base string for a request.
///
/// Query parameters embedded in `url` are merged with `oauth`; the OAuth
/// value wins when both define the same name.
pub fn signature_base_string(method: HttpMethod, url: &str, oauth: &OAuthParameters) -> String {
    let mut merged = parse_query_params(url);
    for (key, value) in oauth.iter() {
        merged.insert(key.to_string(), value.to_string());
    }

    let (base_url, _) = split_url(url);
    let param_string = normalized_parameters(merged.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        percent_encode(base_url),
        percent_encode(&param_string)
    )
}

/// Build the HMAC key from the two secrets.
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    )
}

/// HMAC-SHA256 the base string and base64-encode the digest.
pub fn compute_signature(base_string: &str, key: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(base_string.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Render the Authorization header. The realm is not part of the signature.
pub fn authorization_header(realm: &str, oauth: &OAuthParameters) -> String {
    let params = oauth
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("OAuth realm=\"{}\", {}", realm, params)
}

/// Everything produced while signing one request.
#[derive(Clone, Debug)]
pub struct SignedRequest {
    /// Protocol parameters including `oauth_signature`.
    pub oauth: OAuthParameters,
    pub base_string: String,
    pub signature: String,
    pub authorization: String,
}

/// OAuth 1.0a signer bound to one set of credentials.
pub struct OAuth1Signer {
    credentials: NetSuiteCredentials,
    nonce_generator: Arc<dyn NonceGenerator>,
    clock: Arc<dyn Clock>,
}

impl OAuth1Signer {
    /// Signer with random nonces and the system clock.
    pub fn new(credentials: NetSuiteCredentials) -> Self {
        Self::with_sources(
            credentials,
            Arc::new(DefaultNonceGenerator::new()),
            Arc::new(SystemClock),
        )
    }

    /// Signer with custom nonce and timestamp sources.
    pub fn with_sources(
        credentials: NetSuiteCredentials,
        nonce_generator: Arc<dyn NonceGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            credentials,
            nonce_generator,
            clock,
        }
    }

    pub fn credentials(&self) -> &NetSuiteCredentials {
        &self.credentials
    }

    /// Sign a request with a fresh nonce and timestamp.
    pub fn sign(&self, method: HttpMethod, url: &str) -> SignedRequest {
        let nonce = self.nonce_generator.generate();
        let timestamp = self.clock.unix_timestamp();
        self.sign_with(method, url, &nonce, timestamp)
    }

    /// Sign a request with an explicit nonce and timestamp.
    pub fn sign_with(
        &self,
        method: HttpMethod,
        url: &str,
        nonce: &str,
        timestamp: i64,
    ) -> SignedRequest {
        let creds = &self.credentials;
        let oauth = OAuthParameters::new(&creds.consumer_key, &creds.token_id, timestamp, nonce);

        let base_string = signature_base_string(method, url, &oauth);
        let key = signing_key(
            creds.consumer_secret.expose_secret(),
            creds.token_secret.expose_secret(),
        );
        let signature = compute_signature(&base_string, &key);

        let oauth = oauth.with_signature(signature.clone());
        let authorization = authorization_header(&creds.realm(), &oauth);

        SignedRequest {
            oauth,
            base_string,
            signature,
            authorization,
        }
    }

    /// Produce just the Authorization header value.
    pub fn authorization_header(&self, method: HttpMethod, url: &str) -> String {
        self.sign(method, url).authorization
    }
}
