//! Entity models and DTOs.
//!
//! Each module pairs the `FromRow` row struct with the request/response
//! DTOs used by the repository and HTTP layers.

pub mod activity;
pub mod application;
pub mod redeem_record;
pub mod review_log;
pub mod reward;
pub mod user;
