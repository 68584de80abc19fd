//! Repository for the `applications` table: creation, listings, and the
//! review state machine (approve / reject / resubmit).
//!
//! Approval and the points credit execute in one transaction with a row
//! lock on the application, so a retried or concurrent approval can
//! never credit twice. Rejection and resubmission take the same lock to
//! serialize status transitions.

use campus_core::pagination::{offset, Paged};
use campus_core::status::ApplicationStatus;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::application::{
    Application, ApproveOutcome, NewApplication, RejectHistoryEntry, RejectOutcome,
    ResubmitData, ResubmitOutcome,
};

/// Column list for applications queries.
const COLUMNS: &str = "id, project_id, project_name, project_category, name, student_id, \
    phone, reason, file_ids, student_openid, points, status, create_time, review_time, \
    review_remark, reject_remark, reject_history, resubmit_count, resubmitted_at";

/// Most recent rejection entries kept when archiving on resubmit.
const REJECT_HISTORY_CAP: usize = 20;

/// Provides application lifecycle operations.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert a new application in the initial `pending` state.
    pub async fn create(
        pool: &PgPool,
        input: &NewApplication,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications
                (project_id, project_name, project_category, name, student_id, phone,
                 reason, file_ids, student_openid, points, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(input.project_id)
            .bind(&input.project_name)
            .bind(&input.project_category)
            .bind(&input.name)
            .bind(&input.student_id)
            .bind(&input.phone)
            .bind(&input.reason)
            .bind(&input.file_ids)
            .bind(&input.student_openid)
            .bind(input.points)
            .bind(ApplicationStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find an application by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Paginated list of applications in a given status, newest first,
    /// with optional category and keyword filters.
    pub async fn list_by_status(
        pool: &PgPool,
        status: ApplicationStatus,
        category: Option<&str>,
        keyword: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<Paged<Application>, sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM applications
             WHERE status = $1
               AND ($2::text IS NULL OR project_category = $2)
               AND ($3::text IS NULL OR
                    (name || ' ' || student_id || ' ' || project_name || ' ' ||
                     project_category || ' ' || reason) ILIKE '%' || $3 || '%')",
        )
        .bind(status.as_str())
        .bind(category)
        .bind(keyword)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM applications
             WHERE status = $1
               AND ($2::text IS NULL OR project_category = $2)
               AND ($3::text IS NULL OR
                    (name || ' ' || student_id || ' ' || project_name || ' ' ||
                     project_category || ' ' || reason) ILIKE '%' || $3 || '%')
             ORDER BY create_time DESC
             LIMIT $4 OFFSET $5"
        );
        let list = sqlx::query_as::<_, Application>(&query)
            .bind(status.as_str())
            .bind(category)
            .bind(keyword)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Paged {
            page,
            page_size,
            total,
            list,
        })
    }

    /// Paginated list of one student's applications, newest first.
    pub async fn list_for_student(
        pool: &PgPool,
        openid: &str,
        status: Option<ApplicationStatus>,
        page: i64,
        page_size: i64,
    ) -> Result<Paged<Application>, sqlx::Error> {
        let status_str = status.map(|s| s.as_str());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM applications
             WHERE student_openid = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(openid)
        .bind(status_str)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM applications
             WHERE student_openid = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY create_time DESC
             LIMIT $3 OFFSET $4"
        );
        let list = sqlx::query_as::<_, Application>(&query)
            .bind(openid)
            .bind(status_str)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Paged {
            page,
            page_size,
            total,
            list,
        })
    }

    /// Approve an application and credit the owner's points, atomically.
    ///
    /// Idempotent: an already-approved application is reported as
    /// [`ApproveOutcome::AlreadyApproved`] and no second credit happens.
    /// The row lock serializes concurrent approvals of the same id.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        remark: &str,
    ) -> Result<ApproveOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM applications WHERE id = $1 FOR UPDATE");
        let Some(app) = sqlx::query_as::<_, Application>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(ApproveOutcome::NotFound);
        };

        if normalized_status(&app.status) == ApplicationStatus::Approved {
            return Ok(ApproveOutcome::AlreadyApproved);
        }

        let update = format!(
            "UPDATE applications
                SET status = $2, review_time = now(), reject_remark = '', review_remark = $3
              WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let application = sqlx::query_as::<_, Application>(&update)
            .bind(id)
            .bind(ApplicationStatus::Approved.as_str())
            .bind(remark)
            .fetch_one(&mut *tx)
            .await?;

        let points = app.points.max(0);
        let mut points_awarded = 0;
        if points > 0 && !app.student_openid.is_empty() {
            let credited = sqlx::query(
                "UPDATE users
                    SET total_points = total_points + $2, updated_at = now()
                  WHERE openid = $1",
            )
            .bind(&app.student_openid)
            .bind(points)
            .execute(&mut *tx)
            .await?;
            if credited.rows_affected() > 0 {
                points_awarded = points;
            }
        }

        tx.commit().await?;
        Ok(ApproveOutcome::Approved {
            application,
            before_status: app.status,
            points_awarded,
        })
    }

    /// Reject an application with a mandatory remark (validated by the
    /// caller). Idempotent when already rejected.
    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        remark: &str,
    ) -> Result<RejectOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM applications WHERE id = $1 FOR UPDATE");
        let Some(app) = sqlx::query_as::<_, Application>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(RejectOutcome::NotFound);
        };

        if normalized_status(&app.status) == ApplicationStatus::Rejected {
            return Ok(RejectOutcome::AlreadyRejected);
        }

        let update = format!(
            "UPDATE applications
                SET status = $2, review_time = now(), reject_remark = $3
              WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let application = sqlx::query_as::<_, Application>(&update)
            .bind(id)
            .bind(ApplicationStatus::Rejected.as_str())
            .bind(remark)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(RejectOutcome::Rejected {
            application,
            before_status: app.status,
        })
    }

    /// Resubmit a rejected application: archive the prior rejection into
    /// the history (newest kept, capped), reset to `pending`, and
    /// replace reason/attachments/points with the refreshed data.
    pub async fn resubmit(
        pool: &PgPool,
        id: DbId,
        openid: &str,
        data: &ResubmitData,
    ) -> Result<ResubmitOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM applications WHERE id = $1 FOR UPDATE");
        let Some(app) = sqlx::query_as::<_, Application>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(ResubmitOutcome::NotFound);
        };

        if app.student_openid != openid {
            return Ok(ResubmitOutcome::NotOwner);
        }
        if normalized_status(&app.status) != ApplicationStatus::Rejected {
            return Ok(ResubmitOutcome::InvalidState {
                current: app.status,
            });
        }

        let mut history: Vec<RejectHistoryEntry> =
            serde_json::from_value(app.reject_history.clone()).unwrap_or_default();
        if !app.reject_remark.is_empty() {
            history.push(RejectHistoryEntry {
                remark: app.reject_remark.clone(),
                time: app.review_time,
            });
        }
        if history.len() > REJECT_HISTORY_CAP {
            let drop = history.len() - REJECT_HISTORY_CAP;
            history.drain(..drop);
        }
        let history_json =
            serde_json::to_value(&history).unwrap_or_else(|_| serde_json::Value::Array(vec![]));

        let update = format!(
            "UPDATE applications
                SET status = $2,
                    project_name = $3,
                    project_category = $4,
                    name = $5,
                    student_id = $6,
                    phone = $7,
                    reason = $8,
                    file_ids = $9,
                    points = $10,
                    review_time = NULL,
                    review_remark = '',
                    reject_remark = '',
                    reject_history = $11,
                    resubmit_count = resubmit_count + 1,
                    resubmitted_at = now()
              WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let application = sqlx::query_as::<_, Application>(&update)
            .bind(id)
            .bind(ApplicationStatus::Pending.as_str())
            .bind(&data.project_name)
            .bind(&data.project_category)
            .bind(&data.name)
            .bind(&data.student_id)
            .bind(&data.phone)
            .bind(&data.reason)
            .bind(&data.file_ids)
            .bind(data.points)
            .bind(&history_json)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ResubmitOutcome::Resubmitted { application })
    }
}

/// Normalize a stored literal; unknown legacy values are treated as
/// still reviewable rather than wedging the row.
fn normalized_status(raw: &str) -> ApplicationStatus {
    ApplicationStatus::parse(raw).unwrap_or(ApplicationStatus::Pending)
}
