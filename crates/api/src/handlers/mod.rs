//! Request handlers, grouped by surface.

pub mod applications;
pub mod points;
pub mod redeem;
pub mod review;
pub mod rewards;
pub mod users;
