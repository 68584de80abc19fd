//! Reward catalog model and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rewards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reward {
    pub id: DbId,
    pub name: String,
    pub need_points: i64,
    /// `None` means unlimited stock.
    pub stock: Option<i64>,
    pub cover: String,
    /// `"enabled"` or `"disabled"`.
    pub status: String,
    pub description: String,
    pub sort: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating or updating a reward.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveReward {
    pub name: String,
    pub need_points: i64,
    pub stock: Option<i64>,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort: i32,
}
