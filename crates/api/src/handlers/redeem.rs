//! Redemption: the student-side exchange plus the admin record views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use campus_core::error::CoreError;
use campus_core::pagination::{clamp_page, clamp_page_size};
use campus_core::status::RedeemStatus;
use campus_core::types::DbId;
use campus_db::models::redeem_record::{RedeemOutcome, RedeemRecord};
use campus_db::repositories::RedeemRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CallerIdentity;
use crate::middleware::rbac::RequireAdmin;
use crate::query::non_empty;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
    pub reward_id: Option<DbId>,
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub record: RedeemRecord,
    pub remaining_points: i64,
}

/// POST /api/v1/rewards/{id}/redeem
///
/// Exchange points for a reward. Stock and balance are checked and
/// updated inside one transaction; losers of a race get a clean error,
/// never a negative balance or oversold stock.
pub async fn redeem_reward(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    match RedeemRepo::redeem(&state.pool, &caller.openid, id).await? {
        RedeemOutcome::Redeemed {
            record,
            remaining_points,
        } => {
            tracing::info!(
                record_id = record.id,
                reward_id = id,
                student = %caller.openid,
                points = record.need_points,
                "Reward redeemed"
            );
            Ok((
                StatusCode::CREATED,
                Json(DataResponse {
                    data: RedeemResponse {
                        record,
                        remaining_points,
                    },
                }),
            ))
        }
        RedeemOutcome::RewardNotFound => {
            Err(AppError::Core(CoreError::not_found("Reward", id)))
        }
        RedeemOutcome::RewardDisabled => Err(AppError::Core(CoreError::Conflict(
            "Reward is not currently available".into(),
        ))),
        RedeemOutcome::InvalidConfig => Err(AppError::Core(CoreError::Validation(
            "Reward has an invalid points cost".into(),
        ))),
        RedeemOutcome::OutOfStock => Err(AppError::Core(CoreError::Insufficient(
            "Reward is out of stock".into(),
        ))),
        RedeemOutcome::UserNotFound => Err(AppError::Core(CoreError::Validation(
            "Complete the user binding before redeeming".into(),
        ))),
        RedeemOutcome::InsufficientPoints { needed, available } => {
            Err(AppError::Core(CoreError::Insufficient(format!(
                "Not enough points: need {needed}, have {available}"
            ))))
        }
    }
}

/// GET /api/v1/admin/redeem/records
pub async fn list_redeem_records(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<RecordParams>,
) -> AppResult<impl IntoResponse> {
    let page = clamp_page(params.page);
    let page_size = clamp_page_size(params.page_size);
    let status = match non_empty(&params.status) {
        Some(raw) => Some(RedeemStatus::parse(raw).map_err(AppError::Core)?),
        None => None,
    };

    let result = RedeemRepo::list_records(
        &state.pool,
        status,
        params.reward_id,
        non_empty(&params.keyword),
        page,
        page_size,
    )
    .await?;

    Ok(Json(DataResponse { data: result }))
}

/// PUT /api/v1/admin/redeem/records/{id}/status
///
/// Move a record through the fulfilment flow. Only the known statuses
/// are accepted; anything else is rejected before touching the row.
pub async fn update_redeem_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let status = RedeemStatus::parse(&input.status).map_err(AppError::Core)?;

    let record = RedeemRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("RedeemRecord", id)))?;

    tracing::info!(
        record_id = id,
        status = status.as_str(),
        admin = %admin.openid,
        "Redemption record status updated"
    );
    Ok(Json(DataResponse { data: record }))
}
