//! Route tree for the HTTP API.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{applications, points, redeem, review, rewards, users};
use crate::state::AppState;

pub mod health;

/// All `/api/v1` routes. Authentication and role checks live in the
/// handler extractors, not here.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(student_routes())
        .merge(admin_routes())
}

fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/users/bind", post(users::bind_user))
        .route("/users/me", get(users::get_me))
        .route(
            "/applications",
            get(applications::list_my_applications).post(applications::create_application),
        )
        .route(
            "/applications/{id}/resubmit",
            post(applications::resubmit_application),
        )
        .route("/points/summary", get(points::points_summary))
        .route("/points/details", get(points::points_details))
        .route("/rewards", get(rewards::list_rewards))
        .route("/rewards/{id}/redeem", post(redeem::redeem_reward))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/review/pending", get(review::list_pending))
        .route("/admin/review/history", get(review::list_history))
        .route("/admin/review/filters", get(review::list_filters))
        .route(
            "/admin/review/{id}/approve",
            post(review::approve_application),
        )
        .route("/admin/review/{id}/reject", post(review::reject_application))
        .route("/admin/redeem/records", get(redeem::list_redeem_records))
        .route(
            "/admin/redeem/records/{id}/status",
            put(redeem::update_redeem_status),
        )
        .route("/admin/points/reconcile", post(points::reconcile_points))
        .route(
            "/admin/rewards",
            get(rewards::admin_list_rewards).post(rewards::create_reward),
        )
        .route(
            "/admin/rewards/{id}",
            put(rewards::update_reward).delete(rewards::delete_reward),
        )
}
