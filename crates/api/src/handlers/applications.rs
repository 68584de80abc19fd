//! Handlers for student application submission, listing, and resubmit.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use campus_core::error::CoreError;
use campus_core::pagination::{clamp_page, clamp_page_size};
use campus_core::points::{normalize_score_options, select_points};
use campus_core::status::ApplicationStatus;
use campus_core::types::DbId;
use campus_db::models::application::{
    CreateApplication, NewApplication, ResubmitApplication, ResubmitData, ResubmitOutcome,
};
use campus_db::models::review_log::CreateReviewLog;
use campus_db::repositories::{ActivityRepo, ApplicationRepo, ReviewLogRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CallerIdentity;
use crate::query::non_empty;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attachments allowed per application.
const MAX_ATTACHMENTS: usize = 3;

/// Query parameters for listing the caller's applications.
#[derive(Debug, Deserialize)]
pub struct MyApplicationsParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
}

/// POST /api/v1/applications
///
/// Create a pending application. The points value is fixed here from
/// the activity's score menu; the applicant identity is bound from the
/// caller's user row.
pub async fn create_application(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Json(input): Json<CreateApplication>,
) -> AppResult<impl IntoResponse> {
    let reason = input.reason.trim().to_string();
    if reason.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Application reason must not be empty".into(),
        )));
    }
    let file_ids = clamp_attachments(input.file_ids)?;

    let activity = ActivityRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Activity", input.project_id)))?;

    let options = normalize_score_options(&activity.score_options);
    let points = select_points(&options, input.points);

    let user = UserRepo::find_by_openid(&state.pool, &caller.openid)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Complete the user binding before applying".into(),
            ))
        })?;
    if user.name.is_empty() || user.student_id.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Applicant name and student id are required; complete the binding first".into(),
        )));
    }

    let application = ApplicationRepo::create(
        &state.pool,
        &NewApplication {
            project_id: activity.id,
            project_name: activity.name,
            project_category: activity.category,
            name: user.name,
            student_id: user.student_id,
            phone: user.phone,
            reason,
            file_ids,
            student_openid: caller.openid.clone(),
            points,
        },
    )
    .await?;

    tracing::info!(
        application_id = application.id,
        student = %caller.openid,
        points,
        "Application created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/v1/applications
///
/// The caller's own applications, newest first, optional status filter.
pub async fn list_my_applications(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Query(params): Query<MyApplicationsParams>,
) -> AppResult<impl IntoResponse> {
    let page = clamp_page(params.page);
    let page_size = clamp_page_size(params.page_size);

    let status = match non_empty(&params.status) {
        Some(raw) => Some(ApplicationStatus::parse(raw).map_err(AppError::Core)?),
        None => None,
    };

    let result = ApplicationRepo::list_for_student(
        &state.pool,
        &caller.openid,
        status,
        page,
        page_size,
    )
    .await?;

    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/applications/{id}/resubmit
///
/// Resubmit a rejected application with fresh reason, attachments, and
/// score-menu selection. Only the owning student may resubmit, and only
/// from the `rejected` state.
pub async fn resubmit_application(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ResubmitApplication>,
) -> AppResult<impl IntoResponse> {
    let reason = input.reason.trim().to_string();
    if reason.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Application reason must not be empty".into(),
        )));
    }
    let file_ids = clamp_attachments(input.file_ids)?;

    let application = ApplicationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Application", id)))?;

    let project_id = application.project_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Application has no linked activity and cannot be resubmitted".into(),
        ))
    })?;
    let activity = ActivityRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Activity", project_id)))?;

    let options = normalize_score_options(&activity.score_options);
    let points = select_points(&options, input.points);

    // Refresh applicant identity, falling back to what the application
    // already carries.
    let user = UserRepo::find_by_openid(&state.pool, &caller.openid).await?;
    let (name, student_id, phone) = match user {
        Some(u) => (
            pick(u.name, &application.name),
            pick(u.student_id, &application.student_id),
            pick(u.phone, &application.phone),
        ),
        None => (
            application.name.clone(),
            application.student_id.clone(),
            application.phone.clone(),
        ),
    };
    if name.is_empty() || student_id.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Applicant name and student id are required; complete the binding first".into(),
        )));
    }

    let data = ResubmitData {
        project_name: activity.name,
        project_category: activity.category,
        name,
        student_id,
        phone,
        reason,
        file_ids,
        points,
    };

    match ApplicationRepo::resubmit(&state.pool, id, &caller.openid, &data).await? {
        ResubmitOutcome::Resubmitted { application } => {
            tracing::info!(
                application_id = id,
                student = %caller.openid,
                resubmit_count = application.resubmit_count,
                "Application resubmitted"
            );
            log_resubmit(&state, &application).await;
            Ok(Json(DataResponse {
                data: serde_json::json!({ "id": id }),
            }))
        }
        ResubmitOutcome::NotOwner => Err(AppError::Core(CoreError::Forbidden(
            "Only the owning student may resubmit this application".into(),
        ))),
        ResubmitOutcome::InvalidState { current } => {
            Err(AppError::Core(CoreError::Conflict(format!(
                "Only rejected applications can be resubmitted (current status: {current})"
            ))))
        }
        ResubmitOutcome::NotFound => Err(AppError::Core(CoreError::not_found("Application", id))),
    }
}

/// Bound and validate the attachment list (1..=3 references).
fn clamp_attachments(file_ids: Vec<String>) -> Result<Vec<String>, AppError> {
    let file_ids: Vec<String> = file_ids
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .take(MAX_ATTACHMENTS)
        .collect();
    if file_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one attachment is required".into(),
        )));
    }
    Ok(file_ids)
}

fn pick(fresh: String, fallback: &str) -> String {
    if fresh.is_empty() {
        fallback.to_string()
    } else {
        fresh
    }
}

/// Append the student-actor audit entry for a resubmission. Best-effort.
async fn log_resubmit(state: &AppState, application: &campus_db::models::application::Application) {
    let entry = CreateReviewLog {
        application_id: application.id,
        project_id: application.project_id,
        student_name: application.name.clone(),
        student_id: application.student_id.clone(),
        project_name: application.project_name.clone(),
        project_category: application.project_category.clone(),
        before_status: ApplicationStatus::Rejected.as_str().to_string(),
        after_status: ApplicationStatus::Pending.as_str().to_string(),
        remark: "Resubmitted by student".to_string(),
        admin_openid: String::new(),
        admin_name: "student".to_string(),
    };

    if let Err(err) = ReviewLogRepo::append(&state.pool, &entry).await {
        tracing::warn!(
            application_id = application.id,
            error = %err,
            "Review log write failed; resubmission is already committed"
        );
    }
}
