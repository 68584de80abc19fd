//! Role-based access control extractors.
//!
//! [`RequireAdmin`] wraps [`CallerIdentity`] and re-reads the caller's
//! role from the `users` table on every privileged request -- roles are
//! never cached across invocations, so a demoted admin loses access
//! immediately.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use campus_core::error::CoreError;
use campus_core::roles::ROLE_ADMIN;
use campus_db::models::user::User;
use campus_db::repositories::UserRepo;

use super::auth::CallerIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     // admin.role == "admin" is guaranteed here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = CallerIdentity::from_request_parts(parts, state).await?;

        let user = UserRepo::find_by_openid(&state.pool, &caller.openid)
            .await?
            .filter(|u| u.role == ROLE_ADMIN)
            .ok_or_else(|| {
                AppError::Core(CoreError::Forbidden("Admin role required".into()))
            })?;

        Ok(RequireAdmin(user))
    }
}
