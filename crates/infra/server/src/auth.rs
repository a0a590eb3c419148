//! Bearer-token extraction and the authorization gate.

use http::HeaderMap;
use nekostats_core::auth::{Authorizer, Principal};
use nekostats_core::error::{StatsError, StatsResult};

/// Extracts a bearer token from the Authorization header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .filter(|v| v.starts_with("Bearer "))
        .map(|v| v[7..].to_string())
}

/// Builds the request principal from the headers.
pub fn principal_from_headers(headers: &HeaderMap) -> Principal {
    match extract_bearer_token(headers) {
        Some(token) => Principal::with_token(token),
        None => Principal::anonymous(),
    }
}

/// Rejects the request before it touches the store if the caller is not
/// authorized.
pub fn authorize(authorizer: &dyn Authorizer, headers: &HeaderMap) -> StatsResult<()> {
    let principal = principal_from_headers(headers);
    if authorizer.is_authorized(&principal) {
        Ok(())
    } else {
        tracing::warn!("rejected unauthorized request");
        Err(StatsError::Unauthorized)
    }
}
