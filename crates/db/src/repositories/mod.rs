//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that touch the
//! contended resources (points balances, reward stock) run inside a
//! single transaction with row locks; plain reads and inserts go
//! straight to the pool.

pub mod activity_repo;
pub mod application_repo;
pub mod points_repo;
pub mod redeem_repo;
pub mod review_log_repo;
pub mod reward_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use application_repo::ApplicationRepo;
pub use points_repo::PointsRepo;
pub use redeem_repo::RedeemRepo;
pub use review_log_repo::ReviewLogRepo;
pub use reward_repo::RewardRepo;
pub use user_repo::UserRepo;
