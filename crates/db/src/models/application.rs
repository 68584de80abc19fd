//! Application entity model, request DTOs, and review outcomes.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full row from the `applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub project_id: Option<DbId>,
    pub project_name: String,
    pub project_category: String,
    /// Applicant name, denormalized from the user row at submission time.
    pub name: String,
    pub student_id: String,
    pub phone: String,
    pub reason: String,
    /// Opaque attachment references, at most 3.
    pub file_ids: Vec<String>,
    pub student_openid: String,
    pub points: i64,
    /// Canonical status literal; parse with `ApplicationStatus::parse`.
    pub status: String,
    pub create_time: Timestamp,
    pub review_time: Option<Timestamp>,
    pub review_remark: String,
    pub reject_remark: String,
    /// JSON array of [`RejectHistoryEntry`], newest last.
    pub reject_history: serde_json::Value,
    pub resubmit_count: i32,
    pub resubmitted_at: Option<Timestamp>,
}

/// One archived rejection, kept when the student resubmits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectHistoryEntry {
    pub remark: String,
    pub time: Option<Timestamp>,
}

/// Request body for creating an application.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApplication {
    pub project_id: DbId,
    pub reason: String,
    #[serde(default)]
    pub file_ids: Vec<String>,
    /// Chosen score-menu option; validated against the activity's menu.
    #[serde(default)]
    pub points: i64,
}

/// Request body for resubmitting a rejected application.
#[derive(Debug, Clone, Deserialize)]
pub struct ResubmitApplication {
    pub reason: String,
    #[serde(default)]
    pub file_ids: Vec<String>,
    #[serde(default)]
    pub points: i64,
}

/// Request body for the approve endpoint. Remark is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveRequest {
    #[serde(default)]
    pub remark: String,
}

/// Request body for the reject endpoint. Remark is mandatory and must
/// be non-empty after trimming.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub remark: String,
}

/// Fully validated data for inserting a new application.
///
/// Assembled by the handler after project lookup, applicant binding,
/// and score-menu validation.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub project_id: DbId,
    pub project_name: String,
    pub project_category: String,
    pub name: String,
    pub student_id: String,
    pub phone: String,
    pub reason: String,
    pub file_ids: Vec<String>,
    pub student_openid: String,
    pub points: i64,
}

/// Fully validated replacement data for a resubmission.
///
/// Project and applicant fields are refreshed from their live rows
/// before the transaction; the status check happens inside it.
#[derive(Debug, Clone)]
pub struct ResubmitData {
    pub project_name: String,
    pub project_category: String,
    pub name: String,
    pub student_id: String,
    pub phone: String,
    pub reason: String,
    pub file_ids: Vec<String>,
    pub points: i64,
}

/// Result of an approval attempt.
///
/// Distinguishes the idempotent no-op from a fresh approval so the
/// handler can report `already: true` without a second points credit.
#[derive(Debug)]
pub enum ApproveOutcome {
    Approved {
        application: Application,
        /// Canonical status literal the row held before this call.
        before_status: String,
        points_awarded: i64,
    },
    AlreadyApproved,
    NotFound,
}

/// Result of a rejection attempt.
#[derive(Debug)]
pub enum RejectOutcome {
    Rejected {
        application: Application,
        /// Canonical status literal the row held before this call.
        before_status: String,
    },
    AlreadyRejected,
    NotFound,
}

/// Result of a resubmission attempt.
#[derive(Debug)]
pub enum ResubmitOutcome {
    Resubmitted { application: Application },
    /// Caller does not own the application.
    NotOwner,
    /// Current status is not `rejected`.
    InvalidState { current: String },
    NotFound,
}

/// One row of a student's approved-points detail view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PointsDetailItem {
    pub project_name: String,
    pub points: i64,
    pub create_time: Timestamp,
    pub review_time: Option<Timestamp>,
}
