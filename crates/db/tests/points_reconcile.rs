//! Reconciliation job and points summary tests.

mod common;

use sqlx::PgPool;

use campus_db::repositories::{ApplicationRepo, PointsRepo, RedeemRepo, UserRepo};

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn reconcile_repairs_drifted_balances(pool: PgPool) {
    common::seed_student(&pool, "alice", 0).await;
    let activity = common::seed_activity(&pool).await;

    // Two approved applications worth 30 in total, one still pending.
    for points in [10, 20] {
        let app = common::seed_application(&pool, "alice", &activity, points).await;
        ApplicationRepo::approve(&pool, app.id, "").await.unwrap();
    }
    common::seed_application(&pool, "alice", &activity, 99).await;

    // Introduce drift.
    UserRepo::grant_points(&pool, "alice", 500).await.unwrap();
    assert_eq!(common::balances(&pool, "alice").await, (530, 0));

    let report = PointsRepo::reconcile_all(&pool).await.unwrap();
    assert_eq!(report.scanned, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(report.failed, 0);

    // Recomputed from approved applications only.
    assert_eq!(common::balances(&pool, "alice").await, (30, 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn reconcile_is_idempotent(pool: PgPool) {
    common::seed_student(&pool, "alice", 0).await;
    let activity = common::seed_activity(&pool).await;
    let app = common::seed_application(&pool, "alice", &activity, 10).await;
    ApplicationRepo::approve(&pool, app.id, "").await.unwrap();

    let first = PointsRepo::reconcile_all(&pool).await.unwrap();
    // Everything already matches after the approval credit.
    assert_eq!(first.updated, 0);

    let second = PointsRepo::reconcile_all(&pool).await.unwrap();
    assert_eq!(second.scanned, first.scanned);
    assert_eq!(second.updated, 0);
    assert_eq!(common::balances(&pool, "alice").await, (10, 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn reconcile_zeroes_users_with_no_approvals(pool: PgPool) {
    common::seed_student(&pool, "alice", 100).await;

    let report = PointsRepo::reconcile_all(&pool).await.unwrap();
    assert_eq!(report.updated, 1);
    assert_eq!(common::balances(&pool, "alice").await, (0, 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn reconcile_preserves_consumed_points(pool: PgPool) {
    common::seed_student(&pool, "alice", 0).await;
    let activity = common::seed_activity(&pool).await;
    let app = common::seed_application(&pool, "alice", &activity, 50).await;
    ApplicationRepo::approve(&pool, app.id, "").await.unwrap();

    let reward = common::seed_reward(&pool, 20, None).await;
    RedeemRepo::redeem(&pool, "alice", reward.id).await.unwrap();
    assert_eq!(common::balances(&pool, "alice").await, (50, 20));

    PointsRepo::reconcile_all(&pool).await.unwrap();
    // Earned side recomputed, spent side untouched.
    assert_eq!(common::balances(&pool, "alice").await, (50, 20));
}

#[sqlx::test(migrations = "./migrations")]
async fn reconcile_scans_past_one_batch(pool: PgPool) {
    // More users than one scan batch (100) to prove the loop pages on.
    for i in 0..120 {
        common::seed_student(&pool, &format!("u{i}"), 7).await;
    }

    let report = PointsRepo::reconcile_all(&pool).await.unwrap();
    assert_eq!(report.scanned, 120);
    assert_eq!(report.updated, 120);
    assert_eq!(common::balances(&pool, "u119").await, (0, 0));
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn summary_reports_balances_average_and_rank(pool: PgPool) {
    common::seed_student(&pool, "alice", 30).await;
    common::seed_student(&pool, "bob", 10).await;
    common::seed_student(&pool, "carol", 20).await;

    let summary = PointsRepo::summary(&pool, "carol").await.unwrap();
    assert_eq!(summary.total_points, 20);
    assert_eq!(summary.consumed_points, 0);
    assert_eq!(summary.redeemable_points, 20);
    assert_eq!(summary.average_points, 20);
    assert_eq!(summary.rank, Some(2));
}

#[sqlx::test(migrations = "./migrations")]
async fn summary_for_unknown_user_is_all_zeroes(pool: PgPool) {
    let summary = PointsRepo::summary(&pool, "ghost").await.unwrap();
    assert_eq!(summary.total_points, 0);
    assert_eq!(summary.redeemable_points, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn approved_details_lists_only_approved(pool: PgPool) {
    common::seed_student(&pool, "alice", 0).await;
    let activity = common::seed_activity(&pool).await;

    let approved = common::seed_application(&pool, "alice", &activity, 10).await;
    ApplicationRepo::approve(&pool, approved.id, "").await.unwrap();
    common::seed_application(&pool, "alice", &activity, 20).await;

    let page = PointsRepo::approved_details(&pool, "alice", 1, 20).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.list.len(), 1);
    assert_eq!(page.list[0].points, 10);
}
