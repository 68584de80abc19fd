//! Reward storefront and the admin catalog CRUD.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use campus_core::error::CoreError;
use campus_core::pagination::{clamp_page, clamp_page_size};
use campus_core::status::RewardStatus;
use campus_core::types::DbId;
use campus_db::models::reward::SaveReward;
use campus_db::repositories::RewardRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CallerIdentity;
use crate::middleware::rbac::RequireAdmin;
use crate::query::non_empty;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdminRewardParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
}

/// GET /api/v1/rewards
///
/// Enabled rewards for the student storefront, sort order then newest.
pub async fn list_rewards(
    _caller: CallerIdentity,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rewards = RewardRepo::list_enabled(&state.pool).await?;
    Ok(Json(DataResponse { data: rewards }))
}

/// GET /api/v1/admin/rewards
pub async fn admin_list_rewards(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<AdminRewardParams>,
) -> AppResult<impl IntoResponse> {
    let page = clamp_page(params.page);
    let page_size = clamp_page_size(params.page_size);
    let status = match non_empty(&params.status) {
        Some(raw) => Some(RewardStatus::parse(raw).map_err(AppError::Core)?),
        None => None,
    };

    let result = RewardRepo::list(&state.pool, status, page, page_size).await?;
    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/admin/rewards
pub async fn create_reward(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<SaveReward>,
) -> AppResult<impl IntoResponse> {
    let input = validate_save_reward(input)?;
    let reward = RewardRepo::create(&state.pool, &input).await?;
    tracing::info!(reward_id = reward.id, admin = %admin.openid, "Reward created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: reward })))
}

/// PUT /api/v1/admin/rewards/{id}
pub async fn update_reward(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SaveReward>,
) -> AppResult<impl IntoResponse> {
    let input = validate_save_reward(input)?;
    let reward = RewardRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Reward", id)))?;
    tracing::info!(reward_id = id, admin = %admin.openid, "Reward updated");
    Ok(Json(DataResponse { data: reward }))
}

/// DELETE /api/v1/admin/rewards/{id}
pub async fn delete_reward(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let removed = RewardRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::not_found("Reward", id)));
    }
    tracing::info!(reward_id = id, admin = %admin.openid, "Reward deleted");
    Ok(Json(DataResponse {
        data: serde_json::json!({ "id": id }),
    }))
}

/// Shared validation for create and update.
fn validate_save_reward(mut input: SaveReward) -> Result<SaveReward, AppError> {
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Reward name must not be empty".into(),
        )));
    }
    if input.need_points <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Reward cost must be a positive number of points".into(),
        )));
    }
    if let Some(stock) = input.stock {
        if stock < 0 {
            return Err(AppError::Core(CoreError::Validation(
                "Reward stock must not be negative".into(),
            )));
        }
    }
    if let Some(status) = &input.status {
        let parsed = RewardStatus::parse(status).map_err(AppError::Core)?;
        input.status = Some(parsed.as_str().to_string());
    }
    Ok(input)
}
