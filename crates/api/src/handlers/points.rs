//! Points summary, earning history, and the admin reconciliation job.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use campus_core::pagination::{clamp_page, clamp_page_size};
use campus_db::repositories::PointsRepo;

use crate::error::AppResult;
use crate::middleware::auth::CallerIdentity;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/points/summary
///
/// The caller's balances plus campus-wide average and rank.
pub async fn points_summary(
    caller: CallerIdentity,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let summary = PointsRepo::summary(&state.pool, &caller.openid).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/points/details
///
/// Approved applications as the caller's earning history, most recently
/// reviewed first.
pub async fn points_details(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = clamp_page(params.page);
    let page_size = clamp_page_size(params.page_size);
    let result =
        PointsRepo::approved_details(&state.pool, &caller.openid, page, page_size).await?;
    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/admin/points/reconcile
///
/// Recompute every user's earned total from approved applications.
/// Per-user failures are tolerated and counted.
pub async fn reconcile_points(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    tracing::info!(admin = %admin.openid, "Points reconciliation started");
    let report = PointsRepo::reconcile_all(&state.pool).await?;
    tracing::info!(
        scanned = report.scanned,
        updated = report.updated,
        failed = report.failed,
        "Points reconciliation finished"
    );
    Ok(Json(DataResponse { data: report }))
}
