//! Core Infrastructure
//!
//! Encoding, OAuth 1.0a signing, HTTP transport and response normalization.

pub mod encoding;
pub mod response;
pub mod signer;
pub mod transport;

pub use encoding::{encode_query, parse_query_params, percent_decode, percent_encode, split_url};
pub use response::{body_error, body_success, normalize_failure, normalize_response, parse_body};
pub use signer::{
    authorization_header, compute_signature, normalized_parameters, signature_base_string,
    signing_key, Clock, DefaultNonceGenerator, FixedClock, FixedNonceGenerator, NonceGenerator,
    OAuth1Signer, OAuthParameters, SignedRequest, SystemClock,
};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
    DEFAULT_MAX_RESPONSE_SIZE,
};
