//! Review log (audit trail) model and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `review_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewLog {
    pub id: DbId,
    pub application_id: DbId,
    pub project_id: Option<DbId>,
    pub student_name: String,
    pub student_id: String,
    pub project_name: String,
    pub project_category: String,
    pub before_status: String,
    pub after_status: String,
    pub remark: String,
    pub admin_openid: String,
    pub admin_name: String,
    pub create_time: Timestamp,
}

/// DTO for appending a review log entry.
#[derive(Debug, Clone)]
pub struct CreateReviewLog {
    pub application_id: DbId,
    pub project_id: Option<DbId>,
    pub student_name: String,
    pub student_id: String,
    pub project_name: String,
    pub project_category: String,
    pub before_status: String,
    pub after_status: String,
    pub remark: String,
    pub admin_openid: String,
    pub admin_name: String,
}

/// A review log enriched with live application/activity/admin data for
/// the admin history view. Read-side only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewHistoryItem {
    pub id: DbId,
    pub application_id: DbId,
    pub project_name: String,
    pub project_category: String,
    pub student_name: String,
    pub student_id: String,
    pub admin_name: String,
    pub remark: String,
    pub after_status: String,
    pub application_time: Option<Timestamp>,
    pub review_time: Timestamp,
}
