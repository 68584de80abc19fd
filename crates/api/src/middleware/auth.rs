//! Caller identity extractor.
//!
//! The platform gateway authenticates every request and forwards the
//! caller's stable identity token in the `x-openid` header; this layer
//! trusts that value as already authenticated (OpenID derivation is the
//! platform's concern, not ours).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use campus_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the authenticated caller identity.
pub const OPENID_HEADER: &str = "x-openid";

/// Authenticated caller extracted from the `x-openid` header.
///
/// Use this as an extractor parameter in any handler that needs to know
/// who is calling:
///
/// ```ignore
/// async fn my_handler(caller: CallerIdentity) -> AppResult<Json<()>> {
///     tracing::info!(openid = %caller.openid, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub openid: String,
}

impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let openid = parts
            .headers
            .get(OPENID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing caller identity header".into(),
                ))
            })?;

        Ok(CallerIdentity {
            openid: openid.to_string(),
        })
    }
}
