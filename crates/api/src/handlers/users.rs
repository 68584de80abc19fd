//! User binding and profile lookup.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use campus_core::error::CoreError;
use campus_core::roles::ROLE_STUDENT;
use campus_db::models::user::CreateUser;
use campus_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CallerIdentity;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BindRequest {
    pub name: String,
    pub student_id: String,
    #[serde(default)]
    pub phone: String,
}

/// POST /api/v1/users/bind
///
/// Register or refresh the caller's identity. The openid comes from the
/// gateway header, never the body; the role is always `student` here,
/// admin roles are assigned out of band.
pub async fn bind_user(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Json(input): Json<BindRequest>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.trim().to_string();
    let student_id = input.student_id.trim().to_string();
    if name.is_empty() || student_id.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name and student id are required".into(),
        )));
    }

    let existing_role = UserRepo::role_of(&state.pool, &caller.openid).await?;
    let user = UserRepo::upsert(
        &state.pool,
        &CreateUser {
            openid: caller.openid.clone(),
            name,
            student_id,
            phone: input.phone.trim().to_string(),
            role: existing_role.unwrap_or_else(|| ROLE_STUDENT.to_string()),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, openid = %caller.openid, "User bound");
    Ok(Json(DataResponse { data: user }))
}

/// GET /api/v1/users/me
pub async fn get_me(
    caller: CallerIdentity,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_openid(&state.pool, &caller.openid)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", &caller.openid)))?;
    Ok(Json(DataResponse { data: user }))
}
