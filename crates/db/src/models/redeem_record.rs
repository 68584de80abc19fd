//! Redemption record model and the redemption transaction outcome.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `redeem_records` table.
///
/// Immutable after insert except for `status` (fulfillment tracking).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RedeemRecord {
    pub id: DbId,
    pub reward_id: DbId,
    pub reward_name: String,
    pub openid: String,
    pub need_points: i64,
    /// `unissued | issued | success | failed`.
    pub status: String,
    /// Redeemable balance at the moment of redemption, before the debit.
    pub points_snapshot: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A redemption record joined with consumer identity for the admin view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RedeemRecordWithUser {
    pub id: DbId,
    pub reward_id: DbId,
    pub reward_name: String,
    pub openid: String,
    pub need_points: i64,
    pub status: String,
    pub points_snapshot: i64,
    pub created_at: Timestamp,
    pub user_name: Option<String>,
    pub user_student_id: Option<String>,
}

/// Result of a redemption attempt.
///
/// Every non-`Redeemed` variant means the transaction rolled back and
/// nothing was mutated.
#[derive(Debug)]
pub enum RedeemOutcome {
    Redeemed {
        record: RedeemRecord,
        remaining_points: i64,
    },
    RewardNotFound,
    RewardDisabled,
    /// `need_points` is not a positive number (misconfigured reward).
    InvalidConfig,
    OutOfStock,
    UserNotFound,
    InsufficientPoints {
        needed: i64,
        available: i64,
    },
}
