//! Decoding of the `X-Cf-Warnings` response header.

use percent_encoding::percent_decode_str;
use reqwest::header::HeaderMap;

use crate::warnings::Warnings;

/// Header the Cloud Controller attaches advisory warnings to.
pub(super) const WARNINGS_HEADER: &str = "x-cf-warnings";

/// Header carrying the router's request identifiers.
pub(super) const REQUEST_ID_HEADER: &str = "x-vcap-request-id";

/// Collects the warnings carried by every `X-Cf-Warnings` header.
///
/// Each header value is a comma-separated list of form-encoded strings.
/// Entries are decoded and trimmed; empty entries are dropped.
pub(super) fn parse_warnings(headers: &HeaderMap) -> Warnings {
    headers
        .get_all(WARNINGS_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(decode_warning)
        .filter(|warning| !warning.is_empty())
        .collect()
}

/// Collects every `X-Vcap-Request-Id` value, in header order.
pub(super) fn parse_request_ids(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(REQUEST_ID_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(String::from)
        .collect()
}

fn decode_warning(encoded: &str) -> String {
    let spaced = encoded.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8_lossy()
        .trim()
        .to_owned()
}
