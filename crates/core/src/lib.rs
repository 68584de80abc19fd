//! Domain logic for the campus service-points platform.
//!
//! Pure, I/O-free building blocks shared by the data and HTTP layers:
//! canonical status enums (with legacy-literal normalization), the
//! score-menu points policy, pagination clamps, and the error taxonomy.

pub mod error;
pub mod pagination;
pub mod points;
pub mod roles;
pub mod status;
pub mod types;
