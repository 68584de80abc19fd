//! Canonical status enums and legacy-literal normalization.
//!
//! The source data historically mixed English and localized Chinese
//! status strings on the same collection (`"approved"` next to
//! `"已通过"`). The enums here are the single canonical form: writes
//! always use the lowercase English literal, and [`ApplicationStatus::parse`]
//! accepts every literal observed in the wild so legacy rows normalize
//! on read.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle state of an application.
///
/// `Pending -> Approved | Rejected`; `Rejected -> Pending` via resubmit.
/// `Approved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Canonical storage literal.
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Parse a canonical or legacy literal.
    ///
    /// Accepts the lowercase English forms plus the localized literals
    /// found in historical data.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim() {
            "pending" | "待审核" => Ok(ApplicationStatus::Pending),
            "approved" | "已通过" => Ok(ApplicationStatus::Approved),
            "rejected" | "已驳回" => Ok(ApplicationStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "unknown application status: {other:?}"
            ))),
        }
    }
}

/// Availability of a reward in the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardStatus {
    Enabled,
    Disabled,
}

impl RewardStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RewardStatus::Enabled => "enabled",
            RewardStatus::Disabled => "disabled",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim() {
            "enabled" => Ok(RewardStatus::Enabled),
            "disabled" => Ok(RewardStatus::Disabled),
            other => Err(CoreError::Validation(format!(
                "unknown reward status: {other:?}"
            ))),
        }
    }
}

/// Fulfillment state of a redemption record.
///
/// No business invariant beyond valid-enum membership; transitions are
/// admin bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedeemStatus {
    Unissued,
    Issued,
    Success,
    Failed,
}

impl RedeemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RedeemStatus::Unissued => "unissued",
            RedeemStatus::Issued => "issued",
            RedeemStatus::Success => "success",
            RedeemStatus::Failed => "failed",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim() {
            "unissued" => Ok(RedeemStatus::Unissued),
            "issued" => Ok(RedeemStatus::Issued),
            "success" => Ok(RedeemStatus::Success),
            "failed" => Ok(RedeemStatus::Failed),
            other => Err(CoreError::Validation(format!(
                "unknown redeem status: {other:?}"
            ))),
        }
    }
}
