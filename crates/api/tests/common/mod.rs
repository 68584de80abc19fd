//! Shared harness for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use campus_api::config::ServerConfig;
use campus_api::middleware::auth::OPENID_HEADER;
use campus_api::routes;
use campus_api::state::AppState;

/// Openid used for the seeded admin account.
pub const ADMIN: &str = "admin-openid";
/// Openid used for the default seeded student.
pub const STUDENT: &str = "student-openid";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(OPENID_HEADER)])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Seed an admin and a student account directly through SQL.
pub async fn seed_accounts(pool: &PgPool) {
    sqlx::query(
        "INSERT INTO users (openid, name, student_id, phone, role, total_points)
         VALUES ($1, 'Admin One', 'A-001', '', 'admin', 0),
                ($2, 'Student One', 'S-001', '13800000000', 'student', 50)",
    )
    .bind(ADMIN)
    .bind(STUDENT)
    .execute(pool)
    .await
    .unwrap();
}

/// Insert an activity with a `[5, 10, 20]` score menu, returning its id.
pub async fn seed_activity(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO activities (name, category, score_options, description)
         VALUES ('Campus cleanup', 'volunteering', '[5, 10, 20]'::jsonb, '')
         RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap()
}

/// GET without an identity header.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// GET with an `x-openid` identity header.
pub async fn get_as(app: Router, openid: &str, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(OPENID_HEADER, openid)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST a JSON body with an `x-openid` identity header.
pub async fn post_json_as(
    app: Router,
    openid: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json_as(app, Method::POST, openid, uri, body).await
}

/// PUT a JSON body with an `x-openid` identity header.
pub async fn put_json_as(
    app: Router,
    openid: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json_as(app, Method::PUT, openid, uri, body).await
}

/// DELETE with an `x-openid` identity header.
pub async fn delete_as(app: Router, openid: &str, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .header(OPENID_HEADER, openid)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn send_json_as(
    app: Router,
    method: Method,
    openid: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header(OPENID_HEADER, openid)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
