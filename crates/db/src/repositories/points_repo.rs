//! Points ledger reads and the batch reconciliation job.
//!
//! `users.total_points` is a cached projection of
//! `SUM(points) over approved applications`; [`PointsRepo::reconcile_all`]
//! is the authoritative recovery path that rebuilds the projection from
//! the source rows. It is a pure overwrite, so running it repeatedly is
//! harmless.

use campus_core::pagination::{Paged, SCAN_BATCH_SIZE};
use campus_core::roles::ROLE_ADMIN;
use campus_core::status::ApplicationStatus;
use campus_core::types::DbId;
use futures::future::try_join_all;
use sqlx::PgPool;

use crate::models::application::PointsDetailItem;
use crate::models::user::{PointsSummary, ReconcileReport};
use crate::repositories::UserRepo;

pub struct PointsRepo;

impl PointsRepo {
    /// Caller-facing summary: own balances plus cohort average and rank.
    ///
    /// Unknown callers get the zeroed student view rather than an
    /// error; the summary card renders before the user has bound.
    pub async fn summary(pool: &PgPool, openid: &str) -> Result<PointsSummary, sqlx::Error> {
        let user = UserRepo::find_by_openid(pool, openid).await?;

        let (total_points, consumed_points, role) = match &user {
            Some(u) => (u.total_points, u.consumed_points, u.role.clone()),
            None => (0, 0, "student".to_string()),
        };

        let average_points = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(total_points)::float8 FROM users WHERE role <> $1",
        )
        .bind(ROLE_ADMIN)
        .fetch_one(pool)
        .await?
        .map(|avg| avg.round() as i64)
        .unwrap_or(0);

        let rank = if role == ROLE_ADMIN {
            None
        } else {
            let higher = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM users WHERE role <> $1 AND total_points > $2",
            )
            .bind(ROLE_ADMIN)
            .bind(total_points)
            .fetch_one(pool)
            .await?;
            Some(higher + 1)
        };

        Ok(PointsSummary {
            total_points,
            consumed_points,
            redeemable_points: (total_points - consumed_points).max(0),
            average_points,
            rank,
            role,
        })
    }

    /// One page of a student's approved applications, most recent
    /// review first.
    ///
    /// Reads every matching row via the exhaustive batched scan before
    /// sorting and slicing: ordering depends on `COALESCE(review_time,
    /// create_time)` across the full set, and truncating the scan would
    /// silently drop rows from later store pages.
    pub async fn approved_details(
        pool: &PgPool,
        openid: &str,
        page: i64,
        page_size: i64,
    ) -> Result<Paged<PointsDetailItem>, sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM applications WHERE student_openid = $1 AND status = $2",
        )
        .bind(openid)
        .bind(ApplicationStatus::Approved.as_str())
        .fetch_one(pool)
        .await?;

        let batches = campus_core::pagination::scan_offsets(total)
            .into_iter()
            .map(|batch_offset| {
                sqlx::query_as::<_, PointsDetailItem>(
                    "SELECT project_name, points, create_time, review_time
                     FROM applications
                     WHERE student_openid = $1 AND status = $2
                     ORDER BY id ASC
                     LIMIT $3 OFFSET $4",
                )
                .bind(openid)
                .bind(ApplicationStatus::Approved.as_str())
                .bind(SCAN_BATCH_SIZE)
                .bind(batch_offset)
                .fetch_all(pool)
            });
        let mut all: Vec<PointsDetailItem> = try_join_all(batches)
            .await?
            .into_iter()
            .flatten()
            .collect();

        all.sort_by_key(|item| {
            std::cmp::Reverse(item.review_time.unwrap_or(item.create_time))
        });

        let start = ((page - 1) * page_size) as usize;
        let list: Vec<PointsDetailItem> = all
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();

        Ok(Paged {
            page,
            page_size,
            total,
            list,
        })
    }

    /// Recompute `total_points` for every user from approved
    /// applications.
    ///
    /// Scans users in id order with bounded batches so no page is ever
    /// truncated, and tolerates per-user failures: a failed recompute is
    /// logged and counted, never aborts the run. Not transactional
    /// across users; each per-user overwrite is independently
    /// idempotent.
    pub async fn reconcile_all(pool: &PgPool) -> Result<ReconcileReport, sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        let mut report = ReconcileReport::default();

        for batch_offset in campus_core::pagination::scan_offsets(total) {
            let users: Vec<(DbId, String)> = sqlx::query_as(
                "SELECT id, openid FROM users ORDER BY id ASC LIMIT $1 OFFSET $2",
            )
            .bind(SCAN_BATCH_SIZE)
            .bind(batch_offset)
            .fetch_all(pool)
            .await?;

            for (user_id, openid) in users {
                report.scanned += 1;
                match Self::reconcile_user(pool, user_id).await {
                    Ok(changed) => {
                        if changed {
                            report.updated += 1;
                        }
                    }
                    Err(err) => {
                        report.failed += 1;
                        tracing::warn!(
                            user_id,
                            openid = %openid,
                            error = %err,
                            "Points reconciliation failed for user, continuing"
                        );
                    }
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            updated = report.updated,
            failed = report.failed,
            "Points reconciliation finished"
        );
        Ok(report)
    }

    /// Overwrite one user's `total_points` with the authoritative sum.
    /// Returns whether the stored value changed.
    async fn reconcile_user(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users u
                SET total_points = src.sum_points, updated_at = now()
               FROM (SELECT COALESCE((SELECT SUM(a.points)
                                        FROM applications a
                                       WHERE a.student_openid = (SELECT openid FROM users WHERE id = $1)
                                         AND a.status = $2), 0) AS sum_points) src
              WHERE u.id = $1 AND u.total_points <> src.sum_points",
        )
        .bind(user_id)
        .bind(ApplicationStatus::Approved.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
