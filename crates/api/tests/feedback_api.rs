//! HTTP-level integration tests for feedback submission, organizer views,
//! analytics and the dashboard.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, get, get_auth, post_json, post_json_auth,
    test_config, token_for,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Create an event as `token` in the given status and return its id.
async fn create_event(pool: &PgPool, token: &str, title: &str, status: &str) -> String {
    let body = json!({
        "title": title,
        "event_type": "workshop",
        "location": "Berlin",
        "start_date": "2026-10-01T09:00:00Z",
        "end_date": "2026-10-01T12:00:00Z",
        "status": status,
    });
    let response = post_json_auth(build_test_app(pool.clone()), "/api/v1/events", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

fn submission(name: Option<&str>, anonymous: bool, rating: i32, comment: &str) -> serde_json::Value {
    json!({
        "name": name,
        "is_anonymous": anonymous,
        "items": [
            { "category": "overall", "rating": rating, "comment": comment },
            { "category": "venue", "comment": "nice venue" },
            { "category": "speaker", "comment": "" },
        ],
    })
}

fn feedback_uri(event_id: &str) -> String {
    format!("/api/v1/public/events/{event_id}/feedback")
}

async fn profile_count(pool: &PgPool, id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn guest_submission_writes_one_row_per_answered_category(pool: PgPool) {
    let owner = token_for(Uuid::new_v4(), "Ada Organizer");
    let event_id = create_event(&pool, &owner, "Async Workshop", "published").await;

    let response = post_json(
        build_test_app(pool.clone()),
        &feedback_uri(&event_id),
        submission(Some("Grace"), false, 5, "Great talks, loved it"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let submission_id = json["data"]["submission_id"].as_str().unwrap();
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2, "blank speaker entry must be skipped");
    for item in items {
        assert_eq!(item["submission_id"], submission_id);
        assert_eq!(item["name"], "Grace");
        assert!(item["user_id"].is_null());
        assert_eq!(item["rating"], 5);
    }
    assert_eq!(items[0]["sentiment"], "positive");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signed_in_submission_records_identity(pool: PgPool) {
    let owner = token_for(Uuid::new_v4(), "Ada Organizer");
    let event_id = create_event(&pool, &owner, "Async Workshop", "published").await;

    let attendee = Uuid::new_v4();
    let token = token_for(attendee, "Grace Hopper");
    let response = post_json_auth(
        build_test_app(pool.clone()),
        &feedback_uri(&event_id),
        submission(None, false, 4, "well organized"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["items"][0]["user_id"], attendee.to_string());

    // Anonymous submissions drop the identity even with a token.
    let response = post_json_auth(
        build_test_app(pool),
        &feedback_uri(&event_id),
        submission(Some("Grace"), true, 2, "too long"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["items"][0]["user_id"].is_null());
    assert!(json["data"]["items"][0]["name"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn closed_events_are_not_available(pool: PgPool) {
    let owner = token_for(Uuid::new_v4(), "Ada Organizer");
    let draft = create_event(&pool, &owner, "Draft Workshop", "draft").await;

    for event_id in [draft, Uuid::new_v4().to_string()] {
        let response = post_json(
            build_test_app(pool.clone()),
            &feedback_uri(&event_id),
            submission(None, true, 3, ""),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Event not available");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_submission_returns_400_and_writes_nothing(pool: PgPool) {
    let owner = token_for(Uuid::new_v4(), "Ada Organizer");
    let event_id = create_event(&pool, &owner, "Async Workshop", "published").await;

    let body = json!({
        "items": [{ "category": "overall", "rating": 7 }],
    });
    let response = post_json(build_test_app(pool.clone()), &feedback_uri(&event_id), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let body = json!({
        "items": [{ "category": "venue", "rating": 4, "comment": "spacious" }],
    });
    let response = post_json(build_test_app(pool.clone()), &feedback_uri(&event_id), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn identity_policy_rejects_guests(pool: PgPool) {
    let owner = token_for(Uuid::new_v4(), "Ada Organizer");
    let event_id = create_event(&pool, &owner, "Async Workshop", "published").await;

    let mut config = test_config();
    config.feedback.require_identity = true;

    let response = post_json(
        build_test_app_with(pool.clone(), config.clone()),
        &feedback_uri(&event_id),
        submission(Some("Grace"), false, 4, ""),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        build_test_app_with(pool, config),
        &feedback_uri(&event_id),
        submission(None, true, 4, ""),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_signed_in_submission_writes_no_profile(pool: PgPool) {
    let owner = token_for(Uuid::new_v4(), "Ada Organizer");
    let event_id = create_event(&pool, &owner, "Async Workshop", "published").await;

    let attendee = Uuid::new_v4();
    let token = token_for(attendee, "Grace Hopper");
    let body = json!({ "items": [{ "category": "venue", "rating": 9 }] });

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &feedback_uri(&Uuid::new_v4().to_string()),
        body.clone(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(profile_count(&pool, attendee).await, 0);

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &feedback_uri(&event_id),
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(profile_count(&pool, attendee).await, 0);

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &feedback_uri(&event_id),
        submission(None, false, 4, "well organized"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(profile_count(&pool, attendee).await, 1);

    // The profile written with the rows names the respondent.
    let uri = format!("/api/v1/events/{event_id}/feedback");
    let response = get_auth(build_test_app(pool), &uri, &owner).await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["respondent"], "Grace Hopper");
}

// ---------------------------------------------------------------------------
// Organizer views
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_sees_grouped_submissions(pool: PgPool) {
    let owner = token_for(Uuid::new_v4(), "Ada Organizer");
    let event_id = create_event(&pool, &owner, "Async Workshop", "published").await;

    post_json(
        build_test_app(pool.clone()),
        &feedback_uri(&event_id),
        submission(Some("Grace"), false, 5, "excellent"),
    )
    .await;
    post_json(
        build_test_app(pool.clone()),
        &feedback_uri(&event_id),
        submission(None, true, 2, "boring"),
    )
    .await;

    let uri = format!("/api/v1/events/{event_id}/feedback");
    let response = get_auth(build_test_app(pool.clone()), &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let groups = json["data"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    // Newest first.
    assert_eq!(groups[0]["respondent"], "Anonymous");
    assert_eq!(groups[0]["rating"], 2);
    assert_eq!(groups[0]["sentiment"], "negative");
    assert_eq!(groups[1]["respondent"], "Grace");
    assert_eq!(groups[1]["event_title"], "Async Workshop");
    assert_eq!(groups[1]["items"].as_array().unwrap().len(), 2);

    let response = get_auth(build_test_app(pool.clone()), &format!("{uri}?limit=1"), &owner).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get_auth(build_test_app(pool), "/api/v1/feedback", &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feedback_is_private_to_the_owner(pool: PgPool) {
    let owner = token_for(Uuid::new_v4(), "Ada Organizer");
    let event_id = create_event(&pool, &owner, "Async Workshop", "published").await;
    let uri = format!("/api/v1/events/{event_id}/feedback");

    let response = get(build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let stranger = token_for(Uuid::new_v4(), "Someone Else");
    let response = get_auth(build_test_app(pool.clone()), &uri, &stranger).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(
        build_test_app(pool),
        &format!("/api/v1/events/{event_id}/analytics"),
        &stranger,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn analytics_count_submissions_not_rows(pool: PgPool) {
    let owner = token_for(Uuid::new_v4(), "Ada Organizer");
    let event_id = create_event(&pool, &owner, "Async Workshop", "published").await;

    let uri = format!("/api/v1/events/{event_id}/analytics");
    let response = get_auth(build_test_app(pool.clone()), &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_feedback"], 0);
    assert!(json["data"]["avg_rating"].is_null());

    post_json(
        build_test_app(pool.clone()),
        &feedback_uri(&event_id),
        submission(Some("Grace"), false, 5, "great"),
    )
    .await;
    post_json(
        build_test_app(pool.clone()),
        &feedback_uri(&event_id),
        submission(None, true, 2, "boring"),
    )
    .await;

    let response = get_auth(build_test_app(pool), &uri, &owner).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_feedback"], 2);
    assert_eq!(json["data"]["avg_rating"], 3.5);
    assert_eq!(json["data"]["positive_count"], 1);
    assert_eq!(json["data"]["negative_count"], 1);
    assert_eq!(json["data"]["event_title"], "Async Workshop");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_totals_span_owned_events(pool: PgPool) {
    let owner_id = Uuid::new_v4();
    let owner = token_for(owner_id, "Ada Organizer");
    let first = create_event(&pool, &owner, "Async Workshop", "published").await;
    let second = create_event(&pool, &owner, "Macro Workshop", "published").await;
    create_event(&pool, &owner, "Draft Workshop", "draft").await;

    for (event_id, rating) in [(&first, 4), (&first, 2), (&second, 5)] {
        let response = post_json(
            build_test_app(pool.clone()),
            &feedback_uri(event_id),
            submission(None, true, rating, ""),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get_auth(build_test_app(pool.clone()), "/api/v1/dashboard", &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["total_events"], 3);
    assert_eq!(data["total_feedback"], 3);
    // Mean of per-event averages: (3.0 + 5.0) / 2.
    assert_eq!(data["average_rating"], 4.0);
    assert_eq!(data["top_events"][0]["event_title"], "Macro Workshop");
    assert_eq!(data["recent_submissions"].as_array().unwrap().len(), 3);

    let stranger = token_for(Uuid::new_v4(), "Someone Else");
    let response = get_auth(build_test_app(pool), "/api/v1/dashboard", &stranger).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_events"], 0);
    assert_eq!(json["data"]["total_feedback"], 0);
    assert!(json["data"]["average_rating"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_synced_profile(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let token = token_for(user_id, "Grace Hopper");

    let response = get_auth(build_test_app(pool), "/api/v1/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user_id.to_string());
    assert_eq!(json["data"]["full_name"], "Grace Hopper");
    assert_eq!(json["data"]["role"], "user");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn analytics_recover_from_a_missed_refresh(pool: PgPool) {
    let owner = token_for(Uuid::new_v4(), "Ada Organizer");
    let event_id = create_event(&pool, &owner, "Async Workshop", "published").await;

    let response = post_json(
        build_test_app(pool.clone()),
        &feedback_uri(&event_id),
        submission(None, true, 5, "great"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // A submission whose follow-up refresh never ran.
    sqlx::query(
        "INSERT INTO feedback (event_id, submission_id, category, rating, sentiment) \
         VALUES ($1, gen_random_uuid(), 'overall', 1, 'neutral')",
    )
    .bind(Uuid::parse_str(&event_id).unwrap())
    .execute(&pool)
    .await
    .unwrap();

    let response = get_auth(build_test_app(pool.clone()), "/api/v1/dashboard", &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_feedback"], 2);
    assert_eq!(json["data"]["average_rating"], 3.0);

    sqlx::query(
        "INSERT INTO feedback (event_id, submission_id, category, rating, sentiment) \
         VALUES ($1, gen_random_uuid(), 'overall', 3, 'neutral')",
    )
    .bind(Uuid::parse_str(&event_id).unwrap())
    .execute(&pool)
    .await
    .unwrap();

    let uri = format!("/api/v1/events/{event_id}/analytics");
    let response = get_auth(build_test_app(pool), &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_feedback"], 3);
    assert_eq!(json["data"]["avg_rating"], 3.0);
}
