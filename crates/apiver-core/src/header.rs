//! Version token extraction from request headers

use http::HeaderMap;

/// Request header carrying the client's requested API version
pub const API_VERSION_HEADER: &str = "Api-Version";

/// Read the `Api-Version` token from request headers
///
/// Header names are case-insensitive. Missing, empty and non-ASCII values are
/// all treated as absent, which resolves to the registry default.
pub fn version_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_VERSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
