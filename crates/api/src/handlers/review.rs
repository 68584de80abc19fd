//! Handlers for the admin review workflow: pending queue, decisions,
//! and the review history.
//!
//! Approve/reject are idempotent at the HTTP level: re-approving an
//! approved application (double-click, client retry) returns success
//! with `already: true` and never credits points a second time.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use campus_core::error::CoreError;
use campus_core::pagination::{clamp_page, clamp_page_size};
use campus_core::status::ApplicationStatus;
use campus_core::types::DbId;
use campus_db::models::application::{
    Application, ApproveOutcome, ApproveRequest, RejectOutcome, RejectRequest,
};
use campus_db::models::review_log::CreateReviewLog;
use campus_db::models::user::User;
use campus_db::repositories::{ActivityRepo, ApplicationRepo, ReviewLogRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::non_empty;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the pending queue.
#[derive(Debug, Deserialize)]
pub struct PendingParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub category: Option<String>,
    pub keyword: Option<String>,
}

/// Query parameters for the review history.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub keyword: Option<String>,
}

/// Response body for a review decision.
#[derive(Debug, Serialize)]
pub struct ReviewDecision {
    pub id: DbId,
    pub status: &'static str,
    /// True when the application was already in the target state and
    /// this call was a no-op.
    pub already: bool,
    /// Points credited by this call (0 for no-ops and rejections).
    pub points_awarded: i64,
}

/// GET /api/v1/admin/review/pending
///
/// Paginated pending applications, newest first, with category and
/// keyword filters.
pub async fn list_pending(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PendingParams>,
) -> AppResult<impl IntoResponse> {
    let page = clamp_page(params.page);
    let page_size = clamp_page_size(params.page_size);

    let result = ApplicationRepo::list_by_status(
        &state.pool,
        ApplicationStatus::Pending,
        non_empty(&params.category),
        non_empty(&params.keyword),
        page,
        page_size,
    )
    .await?;

    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/admin/review/history
///
/// Review logs joined with live application data for display.
pub async fn list_history(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> AppResult<impl IntoResponse> {
    let page = clamp_page(params.page);
    let page_size = clamp_page_size(params.page_size);

    let status = match non_empty(&params.status) {
        Some(raw) => Some(ApplicationStatus::parse(raw).map_err(AppError::Core)?),
        None => None,
    };

    let result = ReviewLogRepo::list_history(
        &state.pool,
        status,
        non_empty(&params.category),
        non_empty(&params.keyword),
        page,
        page_size,
    )
    .await?;

    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/admin/review/filters
///
/// Distinct activity categories plus the terminal decision statuses.
pub async fn list_filters(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = ActivityRepo::list_categories(&state.pool).await?;
    let statuses = vec![
        ApplicationStatus::Approved.as_str(),
        ApplicationStatus::Rejected.as_str(),
    ];
    Ok(Json(DataResponse {
        data: serde_json::json!({ "categories": categories, "statuses": statuses }),
    }))
}

/// POST /api/v1/admin/review/{id}/approve
///
/// Approve an application: status write and points credit commit in one
/// transaction; the review log is appended best-effort after commit.
pub async fn approve_application(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApproveRequest>,
) -> AppResult<impl IntoResponse> {
    let remark = input.remark.trim().to_string();

    match ApplicationRepo::approve(&state.pool, id, &remark).await? {
        ApproveOutcome::Approved {
            application,
            before_status,
            points_awarded,
        } => {
            tracing::info!(
                application_id = id,
                admin = %admin.openid,
                points_awarded,
                "Application approved"
            );
            log_decision(
                &state,
                &application,
                &admin,
                &before_status,
                ApplicationStatus::Approved,
                &remark,
            )
            .await;
            Ok(Json(DataResponse {
                data: ReviewDecision {
                    id,
                    status: ApplicationStatus::Approved.as_str(),
                    already: false,
                    points_awarded,
                },
            }))
        }
        ApproveOutcome::AlreadyApproved => Ok(Json(DataResponse {
            data: ReviewDecision {
                id,
                status: ApplicationStatus::Approved.as_str(),
                already: true,
                points_awarded: 0,
            },
        })),
        ApproveOutcome::NotFound => {
            Err(AppError::Core(CoreError::not_found("Application", id)))
        }
    }
}

/// POST /api/v1/admin/review/{id}/reject
///
/// Reject an application. The remark is mandatory: a rejection without
/// a reason is not actionable by the student.
pub async fn reject_application(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RejectRequest>,
) -> AppResult<impl IntoResponse> {
    let remark = input.remark.trim().to_string();
    if remark.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Rejection remark must not be empty".into(),
        )));
    }

    match ApplicationRepo::reject(&state.pool, id, &remark).await? {
        RejectOutcome::Rejected {
            application,
            before_status,
        } => {
            tracing::info!(application_id = id, admin = %admin.openid, "Application rejected");
            log_decision(
                &state,
                &application,
                &admin,
                &before_status,
                ApplicationStatus::Rejected,
                &remark,
            )
            .await;
            Ok(Json(DataResponse {
                data: ReviewDecision {
                    id,
                    status: ApplicationStatus::Rejected.as_str(),
                    already: false,
                    points_awarded: 0,
                },
            }))
        }
        RejectOutcome::AlreadyRejected => Ok(Json(DataResponse {
            data: ReviewDecision {
                id,
                status: ApplicationStatus::Rejected.as_str(),
                already: true,
                points_awarded: 0,
            },
        })),
        RejectOutcome::NotFound => Err(AppError::Core(CoreError::not_found("Application", id))),
    }
}

/// Append the audit entry for an admin decision. Best-effort: a failed
/// log write is reported in the logs but never fails the decision that
/// already committed.
async fn log_decision(
    state: &AppState,
    application: &Application,
    admin: &User,
    before_status: &str,
    after: ApplicationStatus,
    remark: &str,
) {
    let entry = CreateReviewLog {
        application_id: application.id,
        project_id: application.project_id,
        student_name: application.name.clone(),
        student_id: application.student_id.clone(),
        project_name: application.project_name.clone(),
        project_category: application.project_category.clone(),
        before_status: before_status.to_string(),
        after_status: after.as_str().to_string(),
        remark: remark.to_string(),
        admin_openid: admin.openid.clone(),
        admin_name: admin.name.clone(),
    };

    if let Err(err) = ReviewLogRepo::append(&state.pool, &entry).await {
        tracing::warn!(
            application_id = application.id,
            error = %err,
            "Review log write failed; decision is already committed"
        );
    }
}
