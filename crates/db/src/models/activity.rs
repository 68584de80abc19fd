//! Activity (service project) model.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `activities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: DbId,
    pub name: String,
    pub category: String,
    /// Raw score menu: JSON number or array of numbers. Normalize with
    /// [`campus_core::points::normalize_score_options`].
    pub score_options: serde_json::Value,
    pub status: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an activity (used by seeds and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActivity {
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub score_options: serde_json::Value,
    #[serde(default)]
    pub description: String,
}
