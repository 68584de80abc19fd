//! Integration tests for the reward catalog and redemption endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_as, get_as, post_json_as, put_json_as, ADMIN, STUDENT};
use serde_json::json;
use sqlx::PgPool;

async fn create_reward(pool: &PgPool, need_points: i64, stock: Option<i64>) -> i64 {
    let response = post_json_as(
        common::build_test_app(pool.clone()),
        ADMIN,
        "/api/v1/admin/rewards",
        json!({
            "name": "Canteen voucher",
            "need_points": need_points,
            "stock": stock,
            "description": "10 yuan canteen voucher",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reward_crud_is_admin_only(pool: PgPool) {
    common::seed_accounts(&pool).await;

    let response = post_json_as(
        common::build_test_app(pool),
        STUDENT,
        "/api/v1/admin/rewards",
        json!({ "name": "Nope", "need_points": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reward_validation_rejects_bad_input(pool: PgPool) {
    common::seed_accounts(&pool).await;

    for body in [
        json!({ "name": "  ", "need_points": 10 }),
        json!({ "name": "Voucher", "need_points": 0 }),
        json!({ "name": "Voucher", "need_points": 10, "stock": -1 }),
        json!({ "name": "Voucher", "need_points": 10, "status": "haunted" }),
    ] {
        let response = post_json_as(
            common::build_test_app(pool.clone()),
            ADMIN,
            "/api/v1/admin/rewards",
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn storefront_hides_disabled_rewards(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let id = create_reward(&pool, 10, Some(5)).await;

    let response = get_as(common::build_test_app(pool.clone()), STUDENT, "/api/v1/rewards").await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = put_json_as(
        common::build_test_app(pool.clone()),
        ADMIN,
        &format!("/api/v1/admin/rewards/{id}"),
        json!({
            "name": "Canteen voucher",
            "need_points": 10,
            "stock": 5,
            "status": "disabled",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_as(common::build_test_app(pool), STUDENT, "/api/v1/rewards").await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn redeem_debits_and_creates_a_record(pool: PgPool) {
    common::seed_accounts(&pool).await;
    // Seeded student holds 50 points.
    let id = create_reward(&pool, 30, Some(2)).await;

    let response = post_json_as(
        common::build_test_app(pool.clone()),
        STUDENT,
        &format!("/api/v1/rewards/{id}/redeem"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["record"]["status"], "unissued");
    assert_eq!(json["data"]["remaining_points"], 20);

    // A second redemption no longer fits the remaining 20.
    let response = post_json_as(
        common::build_test_app(pool.clone()),
        STUDENT,
        &format!("/api/v1/rewards/{id}/redeem"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_RESOURCE");

    // The record shows up in the admin listing with consumer identity.
    let response = get_as(
        common::build_test_app(pool),
        ADMIN,
        "/api/v1/admin/redeem/records",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["list"][0]["user_name"], "Student One");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn out_of_stock_is_a_conflict(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let id = create_reward(&pool, 10, Some(0)).await;

    let response = post_json_as(
        common::build_test_app(pool),
        STUDENT,
        &format!("/api/v1/rewards/{id}/redeem"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "INSUFFICIENT_RESOURCE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn record_status_updates_only_to_known_values(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let id = create_reward(&pool, 10, Some(5)).await;

    let response = post_json_as(
        common::build_test_app(pool.clone()),
        STUDENT,
        &format!("/api/v1/rewards/{id}/redeem"),
        json!({}),
    )
    .await;
    let record_id = body_json(response).await["data"]["record"]["id"]
        .as_i64()
        .unwrap();

    let response = put_json_as(
        common::build_test_app(pool.clone()),
        ADMIN,
        &format!("/api/v1/admin/redeem/records/{record_id}/status"),
        json!({ "status": "teleported" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_as(
        common::build_test_app(pool),
        ADMIN,
        &format!("/api/v1/admin/redeem/records/{record_id}/status"),
        json!({ "status": "issued" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "issued");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_a_reward_keeps_the_record_snapshot(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let id = create_reward(&pool, 10, Some(5)).await;

    post_json_as(
        common::build_test_app(pool.clone()),
        STUDENT,
        &format!("/api/v1/rewards/{id}/redeem"),
        json!({}),
    )
    .await;

    let response = delete_as(
        common::build_test_app(pool.clone()),
        ADMIN,
        &format!("/api/v1/admin/rewards/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_as(
        common::build_test_app(pool),
        ADMIN,
        "/api/v1/admin/redeem/records",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["list"][0]["reward_name"], "Canteen voucher");
}
