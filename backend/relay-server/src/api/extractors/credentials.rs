//! Shared-secret check for the producer endpoints

use crate::ApiError;

use relay_ws::AppState;

use std::future::Future;
use std::panic::Location;

use axum::{extract::FromRequestParts, http::request::Parts};
use error_location::ErrorLocation;

pub const KEY_HEADER: &str = "key";
pub const SECRET_HEADER: &str = "secret";

/// Proof that the request carried the configured `key` and `secret` headers.
///
/// Always succeeds when auth is disabled.
#[derive(Debug)]
pub struct Credentials;

impl FromRequestParts<AppState> for Credentials {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let header = |name: &str| {
                parts
                    .headers
                    .get(name)
                    .and_then(|value| value.to_str().ok())
            };

            if state.auth.accepts(header(KEY_HEADER), header(SECRET_HEADER)) {
                return Ok(Credentials);
            }

            log::warn!("Rejected request to {}: bad credentials", parts.uri.path());
            Err(ApiError::Unauthorized {
                message: "Invalid key or secret".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}
