//! The reward redemption engine and redemption-record queries.
//!
//! [`RedeemRepo::redeem`] is the one place in the system that needs
//! true all-or-nothing semantics: stock and points are both scarce,
//! concurrently-contended resources, so validation, the stock
//! decrement, the points debit, and the record insert all happen inside
//! a single transaction with row locks. Any abort before commit rolls
//! everything back.

use campus_core::pagination::{offset, Paged};
use campus_core::status::{RedeemStatus, RewardStatus};
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::redeem_record::{RedeemOutcome, RedeemRecord, RedeemRecordWithUser};
use crate::models::reward::Reward;
use crate::models::user::User;

/// Column list for redeem_records queries.
const RECORD_COLUMNS: &str = "id, reward_id, reward_name, openid, need_points, status, \
    points_snapshot, created_at, updated_at";

/// Column list for the locked reward read inside the transaction.
const REWARD_COLUMNS: &str =
    "id, name, need_points, stock, cover, status, description, sort, created_at, updated_at";

/// Column list for the locked user read inside the transaction.
const USER_COLUMNS: &str = "id, openid, name, student_id, phone, role, \
    total_points, consumed_points, created_at, updated_at";

pub struct RedeemRepo;

impl RedeemRepo {
    /// Redeem one unit of a reward for the caller.
    ///
    /// Steps, all inside one transaction:
    /// 1. lock + validate the reward (exists, enabled, sane cost, stock),
    /// 2. lock + validate the user (exists, redeemable >= cost),
    /// 3. conditional stock decrement (`stock > 0` guard),
    /// 4. conditional points debit (`redeemable >= cost` guard),
    /// 5. insert the `unissued` record with a balance snapshot.
    ///
    /// The conditional guards re-check what step 1/2 validated so that
    /// two racing transactions can never both take the last unit or
    /// overdraft a balance.
    pub async fn redeem(
        pool: &PgPool,
        openid: &str,
        reward_id: DbId,
    ) -> Result<RedeemOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select_reward =
            format!("SELECT {REWARD_COLUMNS} FROM rewards WHERE id = $1 FOR UPDATE");
        let Some(reward) = sqlx::query_as::<_, Reward>(&select_reward)
            .bind(reward_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(RedeemOutcome::RewardNotFound);
        };

        if reward.status != RewardStatus::Enabled.as_str() {
            return Ok(RedeemOutcome::RewardDisabled);
        }
        let need_points = reward.need_points;
        if need_points <= 0 {
            return Ok(RedeemOutcome::InvalidConfig);
        }
        if matches!(reward.stock, Some(stock) if stock <= 0) {
            return Ok(RedeemOutcome::OutOfStock);
        }

        let select_user = format!("SELECT {USER_COLUMNS} FROM users WHERE openid = $1 FOR UPDATE");
        let Some(user) = sqlx::query_as::<_, User>(&select_user)
            .bind(openid)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(RedeemOutcome::UserNotFound);
        };

        let redeemable = user.redeemable_points();
        if redeemable < need_points {
            return Ok(RedeemOutcome::InsufficientPoints {
                needed: need_points,
                available: redeemable,
            });
        }

        if reward.stock.is_some() {
            let decremented = sqlx::query(
                "UPDATE rewards
                    SET stock = stock - 1, updated_at = now()
                  WHERE id = $1 AND stock > 0",
            )
            .bind(reward_id)
            .execute(&mut *tx)
            .await?;
            if decremented.rows_affected() == 0 {
                return Ok(RedeemOutcome::OutOfStock);
            }
        }

        let debited = sqlx::query(
            "UPDATE users
                SET consumed_points = consumed_points + $2, updated_at = now()
              WHERE openid = $1 AND total_points - consumed_points >= $2",
        )
        .bind(openid)
        .bind(need_points)
        .execute(&mut *tx)
        .await?;
        if debited.rows_affected() == 0 {
            return Ok(RedeemOutcome::InsufficientPoints {
                needed: need_points,
                available: redeemable,
            });
        }

        let insert = format!(
            "INSERT INTO redeem_records
                (reward_id, reward_name, openid, need_points, status, points_snapshot)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {RECORD_COLUMNS}"
        );
        let record = sqlx::query_as::<_, RedeemRecord>(&insert)
            .bind(reward_id)
            .bind(&reward.name)
            .bind(openid)
            .bind(need_points)
            .bind(RedeemStatus::Unissued.as_str())
            .bind(redeemable)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(RedeemOutcome::Redeemed {
            remaining_points: redeemable - need_points,
            record,
        })
    }

    /// Admin listing of redemption records with consumer identity,
    /// newest first, with optional status / reward / keyword filters.
    pub async fn list_records(
        pool: &PgPool,
        status: Option<RedeemStatus>,
        reward_id: Option<DbId>,
        keyword: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<Paged<RedeemRecordWithUser>, sqlx::Error> {
        let status_str = status.map(|s| s.as_str());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM redeem_records r
             WHERE ($1::text IS NULL OR r.status = $1)
               AND ($2::bigint IS NULL OR r.reward_id = $2)
               AND ($3::text IS NULL OR r.reward_name ILIKE '%' || $3 || '%')",
        )
        .bind(status_str)
        .bind(reward_id)
        .bind(keyword)
        .fetch_one(pool)
        .await?;

        let list = sqlx::query_as::<_, RedeemRecordWithUser>(
            "SELECT r.id, r.reward_id, r.reward_name, r.openid, r.need_points,
                    r.status, r.points_snapshot, r.created_at,
                    u.name AS user_name, u.student_id AS user_student_id
             FROM redeem_records r
             LEFT JOIN users u ON u.openid = r.openid
             WHERE ($1::text IS NULL OR r.status = $1)
               AND ($2::bigint IS NULL OR r.reward_id = $2)
               AND ($3::text IS NULL OR r.reward_name ILIKE '%' || $3 || '%')
             ORDER BY r.created_at DESC
             LIMIT $4 OFFSET $5",
        )
        .bind(status_str)
        .bind(reward_id)
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

    /// Transition a record's fulfillment status. The status is already
    /// allow-list validated by the `RedeemStatus` parse at the edge.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: RedeemStatus,
    ) -> Result<Option<RedeemRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE redeem_records
                SET status = $2, updated_at = now()
              WHERE id = $1
             RETURNING {RECORD_COLUMNS}"
        );
        sqlx::query_as::<_, RedeemRecord>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}
