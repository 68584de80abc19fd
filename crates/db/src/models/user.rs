//! User entity model and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub openid: String,
    pub name: String,
    pub student_id: String,
    pub phone: String,
    /// `"student"` or `"admin"`.
    pub role: String,
    pub total_points: i64,
    pub consumed_points: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Points available for redemption, never negative.
    pub fn redeemable_points(&self) -> i64 {
        (self.total_points - self.consumed_points).max(0)
    }
}

/// DTO for creating a user on first bind.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub openid: String,
    pub name: String,
    pub student_id: String,
    #[serde(default)]
    pub phone: String,
    pub role: String,
}

/// Outcome counts of one reconciliation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    /// Users visited by the scan.
    pub scanned: i64,
    /// Users whose `total_points` changed.
    pub updated: i64,
    /// Users skipped because their recompute failed.
    pub failed: i64,
}

/// Caller-facing points summary.
#[derive(Debug, Clone, Serialize)]
pub struct PointsSummary {
    pub total_points: i64,
    pub consumed_points: i64,
    pub redeemable_points: i64,
    /// Mean total points across all students, rounded.
    pub average_points: i64,
    /// 1-based rank among students by total points; `None` for admins.
    pub rank: Option<i64>,
    pub role: String,
}
