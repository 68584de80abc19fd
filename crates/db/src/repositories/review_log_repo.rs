//! Repository for the append-only `review_logs` table.
//!
//! Log writes are best-effort observability: callers log and swallow
//! insert failures rather than failing the primary operation (an audit
//! write must never roll back a committed approval).

use campus_core::pagination::{offset, Paged};
use campus_core::status::ApplicationStatus;
use sqlx::PgPool;

use crate::models::review_log::{CreateReviewLog, ReviewHistoryItem, ReviewLog};

/// Column list for review_logs queries.
const COLUMNS: &str = "id, application_id, project_id, student_name, student_id, \
    project_name, project_category, before_status, after_status, remark, \
    admin_openid, admin_name, create_time";

pub struct ReviewLogRepo;

impl ReviewLogRepo {
    /// Append one log entry.
    pub async fn append(
        pool: &PgPool,
        input: &CreateReviewLog,
    ) -> Result<ReviewLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO review_logs
                (application_id, project_id, student_name, student_id, project_name,
                 project_category, before_status, after_status, remark, admin_openid, admin_name)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewLog>(&query)
            .bind(input.application_id)
            .bind(input.project_id)
            .bind(&input.student_name)
            .bind(&input.student_id)
            .bind(&input.project_name)
            .bind(&input.project_category)
            .bind(&input.before_status)
            .bind(&input.after_status)
            .bind(&input.remark)
            .bind(&input.admin_openid)
            .bind(&input.admin_name)
            .fetch_one(pool)
            .await
    }

    /// Admin review history: logs joined with the live application row
    /// (for submission time) and filtered by decision / category /
    /// keyword. Pure read-side enrichment.
    pub async fn list_history(
        pool: &PgPool,
        after_status: Option<ApplicationStatus>,
        category: Option<&str>,
        keyword: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<Paged<ReviewHistoryItem>, sqlx::Error> {
        let status_str = after_status.map(|s| s.as_str());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM review_logs l
             WHERE ($1::text IS NULL OR l.after_status = $1)
               AND ($2::text IS NULL OR l.project_category = $2)
               AND ($3::text IS NULL OR
                    (l.student_name || ' ' || l.student_id || ' ' || l.project_name || ' ' ||
                     l.project_category || ' ' || l.admin_name || ' ' || l.remark)
                    ILIKE '%' || $3 || '%')",
        )
        .bind(status_str)
        .bind(category)
        .bind(keyword)
        .fetch_one(pool)
        .await?;

        let list = sqlx::query_as::<_, ReviewHistoryItem>(
            "SELECT l.id, l.application_id, l.project_name, l.project_category,
                    l.student_name, l.student_id, l.admin_name, l.remark, l.after_status,
                    a.create_time AS application_time,
                    l.create_time AS review_time
             FROM review_logs l
             LEFT JOIN applications a ON a.id = l.application_id
             WHERE ($1::text IS NULL OR l.after_status = $1)
               AND ($2::text IS NULL OR l.project_category = $2)
               AND ($3::text IS NULL OR
                    (l.student_name || ' ' || l.student_id || ' ' || l.project_name || ' ' ||
                     l.project_category || ' ' || l.admin_name || ' ' || l.remark)
                    ILIKE '%' || $3 || '%')
             ORDER BY l.create_time DESC
             LIMIT $4 OFFSET $5",
        )
        .bind(status_str)
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
}
