/// Role name for administrators (may review applications and manage rewards).
pub const ROLE_ADMIN: &str = "admin";

/// Role name for students (may apply, resubmit, and redeem).
pub const ROLE_STUDENT: &str = "student";
