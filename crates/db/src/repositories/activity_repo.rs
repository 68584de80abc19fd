//! Repository for the `activities` table.
//!
//! Activity CRUD proper is administrative glue and lives outside this
//! service; the review and application flows only need lookup and the
//! category list for filters.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity::{Activity, CreateActivity};

/// Column list for activities queries.
const COLUMNS: &str =
    "id, name, category, score_options, status, description, created_at, updated_at";

pub struct ActivityRepo;

impl ActivityRepo {
    /// Insert a new activity, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateActivity) -> Result<Activity, sqlx::Error> {
        let query = format!(
            "INSERT INTO activities (name, category, score_options, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.score_options)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find an activity by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Activity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM activities WHERE id = $1");
        sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Distinct non-empty categories, sorted, for the review filters.
    pub async fn list_categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT trim(category) FROM activities
             WHERE trim(category) <> ''
             ORDER BY 1 ASC",
        )
        .fetch_all(pool)
        .await
    }
}
