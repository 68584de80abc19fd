//! Shared fixtures for the database integration tests.

use serde_json::json;
use sqlx::PgPool;

use campus_core::types::DbId;
use campus_db::models::activity::{Activity, CreateActivity};
use campus_db::models::application::{Application, NewApplication};
use campus_db::models::reward::{Reward, SaveReward};
use campus_db::models::user::{CreateUser, User};
use campus_db::repositories::{ActivityRepo, ApplicationRepo, RewardRepo, UserRepo};

/// Insert a student with the given openid and starting balance.
pub async fn seed_student(pool: &PgPool, openid: &str, total_points: i64) -> User {
    let user = UserRepo::upsert(
        pool,
        &CreateUser {
            openid: openid.to_string(),
            name: format!("Student {openid}"),
            student_id: format!("S-{openid}"),
            phone: "13800000000".to_string(),
            role: "student".to_string(),
        },
    )
    .await
    .unwrap();

    if total_points > 0 {
        return UserRepo::grant_points(pool, openid, total_points)
            .await
            .unwrap()
            .unwrap();
    }
    user
}

/// Insert an activity with a three-option score menu.
pub async fn seed_activity(pool: &PgPool) -> Activity {
    ActivityRepo::create(
        pool,
        &CreateActivity {
            name: "Campus cleanup".to_string(),
            category: "volunteering".to_string(),
            score_options: json!([5, 10, 20]),
            description: "Weekend campus cleanup shift".to_string(),
        },
    )
    .await
    .unwrap()
}

/// Insert a pending application for the given student and activity.
pub async fn seed_application(
    pool: &PgPool,
    openid: &str,
    activity: &Activity,
    points: i64,
) -> Application {
    ApplicationRepo::create(
        pool,
        &NewApplication {
            project_id: activity.id,
            project_name: activity.name.clone(),
            project_category: activity.category.clone(),
            name: format!("Student {openid}"),
            student_id: format!("S-{openid}"),
            phone: "13800000000".to_string(),
            reason: "Completed the full shift".to_string(),
            file_ids: vec!["cloud://proof-1.jpg".to_string()],
            student_openid: openid.to_string(),
            points,
        },
    )
    .await
    .unwrap()
}

/// Insert an enabled reward.
pub async fn seed_reward(pool: &PgPool, need_points: i64, stock: Option<i64>) -> Reward {
    RewardRepo::create(
        pool,
        &SaveReward {
            name: "Canteen voucher".to_string(),
            need_points,
            stock,
            cover: String::new(),
            status: Some("enabled".to_string()),
            description: "10 yuan canteen voucher".to_string(),
            sort: 0,
        },
    )
    .await
    .unwrap()
}

/// Current balances of a user, `(total_points, consumed_points)`.
pub async fn balances(pool: &PgPool, openid: &str) -> (i64, i64) {
    let user = UserRepo::find_by_openid(pool, openid)
        .await
        .unwrap()
        .unwrap();
    (user.total_points, user.consumed_points)
}

/// Current status literal of an application row.
pub async fn application_status(pool: &PgPool, id: DbId) -> String {
    ApplicationRepo::find_by_id(pool, id)
        .await
        .unwrap()
        .unwrap()
        .status
}
