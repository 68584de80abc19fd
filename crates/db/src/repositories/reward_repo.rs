//! Repository for the `rewards` table (catalog maintenance + storefront).

use campus_core::pagination::{offset, Paged};
use campus_core::status::RewardStatus;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::reward::{Reward, SaveReward};

/// Column list for rewards queries.
const COLUMNS: &str =
    "id, name, need_points, stock, cover, status, description, sort, created_at, updated_at";

pub struct RewardRepo;

impl RewardRepo {
    /// Insert a new reward, returning the created row.
    pub async fn create(pool: &PgPool, input: &SaveReward) -> Result<Reward, sqlx::Error> {
        let status = input.status.as_deref().unwrap_or("enabled");
        let query = format!(
            "INSERT INTO rewards (name, need_points, stock, cover, status, description, sort)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reward>(&query)
            .bind(&input.name)
            .bind(input.need_points)
            .bind(input.stock)
            .bind(&input.cover)
            .bind(status)
            .bind(&input.description)
            .bind(input.sort)
            .fetch_one(pool)
            .await
    }

    /// Replace a reward's editable fields, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &SaveReward,
    ) -> Result<Option<Reward>, sqlx::Error> {
        let status = input.status.as_deref().unwrap_or("enabled");
        let query = format!(
            "UPDATE rewards
                SET name = $2, need_points = $3, stock = $4, cover = $5,
                    status = $6, description = $7, sort = $8, updated_at = now()
              WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reward>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.need_points)
            .bind(input.stock)
            .bind(&input.cover)
            .bind(status)
            .bind(&input.description)
            .bind(input.sort)
            .fetch_optional(pool)
            .await
    }

    /// Find a reward by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reward>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rewards WHERE id = $1");
        sqlx::query_as::<_, Reward>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a reward. Returns whether a row was removed. Existing
    /// redemption records keep their name snapshot.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rewards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Admin listing: all rewards, optional status filter, stable
    /// sort-order-then-newest ordering.
    pub async fn list(
        pool: &PgPool,
        status: Option<RewardStatus>,
        page: i64,
        page_size: i64,
    ) -> Result<Paged<Reward>, sqlx::Error> {
        let status_str = status.map(|s| s.as_str());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM rewards WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status_str)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM rewards
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY sort ASC, created_at DESC
             LIMIT $2 OFFSET $3"
        );
        let list = sqlx::query_as::<_, Reward>(&query)
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

    /// Storefront listing: enabled rewards only.
    pub async fn list_enabled(pool: &PgPool) -> Result<Vec<Reward>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rewards
             WHERE status = $1
             ORDER BY sort ASC, created_at DESC"
        );
        sqlx::query_as::<_, Reward>(&query)
            .bind(RewardStatus::Enabled.as_str())
            .fetch_all(pool)
            .await
    }
}
