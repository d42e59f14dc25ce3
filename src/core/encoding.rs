//! Percent Encoding
//!
//! RFC 5849 section 3.6 encoding for signature base strings and headers.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// Characters left literal: the RFC 3986 unreserved set.
///
/// `! * ' ( )` are encoded, unlike browser URI component encoding.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a string for OAuth 1.0a signing.
///
/// # Examples
///
/// ```
/// use netsuite_integration::core::percent_encode;
///
/// assert_eq!(percent_encode("a b!"), "a%20b%21");
/// assert_eq!(percent_encode("safe-_.~"), "safe-_.~");
/// ```
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Decode a percent-encoded component. Invalid UTF-8 is replaced lossily.
pub fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

/// Split a URL into its base (everything before `?`) and raw query.
pub fn split_url(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    }
}

/// Parse the query string of a URL into decoded key/value pairs.
///
/// Pairs with an empty key or value are skipped. A repeated key keeps its
/// last value.
pub fn parse_query_params(url: &str) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();

    let Some(query) = split_url(url).1 else {
        return params;
    };

    for pair in query.split('&') {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        params.insert(percent_decode(key), percent_decode(value));
    }

    params
}

/// Serialize pairs as a query string, encoding each key and value.
pub fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
