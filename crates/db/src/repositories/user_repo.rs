//! Repository for the `users` table.

use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list for users queries.
const COLUMNS: &str = "id, openid, name, student_id, phone, role, \
    total_points, consumed_points, created_at, updated_at";

/// Provides identity and balance operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by their platform identity token.
    pub async fn find_by_openid(
        pool: &PgPool,
        openid: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE openid = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(openid)
            .fetch_optional(pool)
            .await
    }

    /// Create a user on first bind, or refresh identity fields if the
    /// openid is already registered. Points balances are never touched.
    pub async fn upsert(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (openid, name, student_id, phone, role)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (openid) DO UPDATE
                 SET name = EXCLUDED.name,
                     student_id = EXCLUDED.student_id,
                     phone = EXCLUDED.phone,
                     updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.openid)
            .bind(&input.name)
            .bind(&input.student_id)
            .bind(&input.phone)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Read the caller's role, or `None` when no user row exists.
    ///
    /// Privileged handlers call this on every request; roles are never
    /// cached across invocations.
    pub async fn role_of(pool: &PgPool, openid: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE openid = $1")
            .bind(openid)
            .fetch_optional(pool)
            .await
    }

    /// Atomically add `delta` to a user's total points.
    ///
    /// The one sanctioned way to bump a balance outside the redemption
    /// and approval transactions (seeding, manual corrections).
    pub async fn grant_points(
        pool: &PgPool,
        openid: &str,
        delta: i64,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users
                SET total_points = total_points + $2, updated_at = now()
              WHERE openid = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(openid)
            .bind(delta)
            .fetch_optional(pool)
            .await
    }
}
