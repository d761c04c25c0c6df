//! HTTP-level integration tests for the storyboard surface: projects,
//! scenes, the shot sequence, the take ledger, and generation dispatch.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router.
//! The generation gateway is an in-process stub. All resource responses
//! carry the `{ "data": ... }` envelope; error responses carry
//! `{ "error", "code" }`.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, delete, expect_json, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Assert status, then unwrap the `{ "data": ... }` envelope.
async fn expect_data(
    response: axum::http::Response<axum::body::Body>,
    status: StatusCode,
) -> serde_json::Value {
    let mut json = expect_json(response, status).await;
    let data = json["data"].take();
    assert!(!data.is_null(), "response carried no data envelope: {json}");
    data
}

/// Create a project and a scene via the API, returning the scene id.
async fn setup_scene(app: &Router, suffix: &str) -> i64 {
    let project = expect_data(
        post_json(
            app.clone(),
            "/api/v1/projects",
            json!({ "name": format!("API_{suffix}") }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    let scene = expect_data(
        post_json(
            app.clone(),
            &format!("/api/v1/projects/{}/scenes", project["id"]),
            json!({
                "name": format!("Scene_{suffix}"),
                "master_context": "neon-lit rooftop at night"
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    scene["id"].as_i64().unwrap()
}

/// Append a shot and return its id.
async fn append_shot(app: &Router, scene_id: i64, prompt: &str) -> i64 {
    let shot = expect_data(
        post_json(
            app.clone(),
            &format!("/api/v1/scenes/{scene_id}/shots"),
            json!({ "prompt": prompt }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    shot["id"].as_i64().unwrap()
}

/// Assign a keyframe, making the shot claimable.
async fn set_keyframe(app: &Router, shot_id: i64) {
    let response = put_json(
        app.clone(),
        &format!("/api/v1/shots/{shot_id}/keyframe"),
        json!({ "keyframe_path": "/frames/key.png" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Fetch a shot, unwrapping the envelope.
async fn fetch_shot(app: &Router, shot_id: i64) -> serde_json::Value {
    let mut body = body_json(get(app.clone(), &format!("/api/v1/shots/{shot_id}")).await).await;
    body["data"].take()
}

/// Poll the shot until its status matches, or fail after ~5 seconds.
async fn wait_for_status(app: &Router, shot_id: i64, status: &str) -> serde_json::Value {
    for _ in 0..100 {
        let shot = fetch_shot(app, shot_id).await;
        if shot_status(&shot) == status {
            return shot;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("shot {shot_id} never reached status {status}");
}

/// Decode the serialized `status_id` into its wire name.
fn shot_status(shot: &serde_json::Value) -> &'static str {
    match shot["status_id"].as_i64().unwrap() {
        1 => "pending",
        2 => "ready",
        3 => "animating",
        4 => "complete",
        5 => "error",
        other => panic!("unknown status_id {other}"),
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn resource_responses_use_the_data_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "envelope").await;
    let shot_id = append_shot(&app, scene_id, "a").await;

    // Single entity.
    let body = body_json(get(app.clone(), &format!("/api/v1/shots/{shot_id}")).await).await;
    assert_eq!(body["data"]["id"].as_i64(), Some(shot_id));

    // Collection.
    let body = body_json(get(app.clone(), "/api/v1/projects").await).await;
    assert!(body["data"].is_array());

    // Mutation.
    let body = body_json(
        put_json(
            app.clone(),
            &format!("/api/v1/shots/{shot_id}"),
            json!({ "prompt": "updated" }),
        )
        .await,
    )
    .await;
    assert_eq!(body["data"]["prompt"], "updated");
}

// ---------------------------------------------------------------------------
// Shot sequence
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn shots_append_with_dense_indices(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "append").await;

    append_shot(&app, scene_id, "first").await;
    append_shot(&app, scene_id, "second").await;

    let shots = expect_data(
        get(app.clone(), &format!("/api/v1/scenes/{scene_id}/shots")).await,
        StatusCode::OK,
    )
    .await;
    let indices: Vec<i64> = shots
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["order_index"].as_i64().unwrap())
        .collect();
    assert_eq!(indices, vec![0, 1]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn empty_prompt_is_seeded_from_master_context(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "seed").await;

    let shot = expect_data(
        post_json(
            app.clone(),
            &format!("/api/v1/scenes/{scene_id}/shots"),
            json!({}),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(shot["prompt"], "neon-lit rooftop at night");
}

#[sqlx::test(migrations = "../../migrations")]
async fn deleting_a_shot_closes_the_index_gap(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "delete").await;
    let first = append_shot(&app, scene_id, "a").await;
    let second = append_shot(&app, scene_id, "b").await;
    let third = append_shot(&app, scene_id, "c").await;

    let response = delete(app.clone(), &format!("/api/v1/shots/{second}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let shots = expect_data(
        get(app.clone(), &format!("/api/v1/scenes/{scene_id}/shots")).await,
        StatusCode::OK,
    )
    .await;
    let got: Vec<(i64, i64)> = shots
        .as_array()
        .unwrap()
        .iter()
        .map(|s| (s["id"].as_i64().unwrap(), s["order_index"].as_i64().unwrap()))
        .collect();
    assert_eq!(got, vec![(first, 0), (third, 1)]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn reorder_applies_a_full_permutation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "reorder").await;
    let a = append_shot(&app, scene_id, "a").await;
    let b = append_shot(&app, scene_id, "b").await;
    let c = append_shot(&app, scene_id, "c").await;

    let shots = expect_data(
        put_json(
            app.clone(),
            &format!("/api/v1/scenes/{scene_id}/shots/order"),
            json!({ "shot_ids": [c, a, b] }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let ids: Vec<i64> = shots
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![c, a, b]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn reorder_rejects_a_partial_list_with_422(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "badperm").await;
    let a = append_shot(&app, scene_id, "a").await;
    append_shot(&app, scene_id, "b").await;

    let json = expect_json(
        put_json(
            app.clone(),
            &format!("/api/v1/scenes/{scene_id}/shots/order"),
            json!({ "shot_ids": [a] }),
        )
        .await,
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await;
    assert_eq!(json["code"], "INVALID_PERMUTATION");
}

// ---------------------------------------------------------------------------
// Lifecycle and generation dispatch
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn keyframe_assignment_promotes_the_shot(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "keyframe").await;
    let shot_id = append_shot(&app, scene_id, "a").await;

    let shot = expect_data(
        put_json(
            app.clone(),
            &format!("/api/v1/shots/{shot_id}/keyframe"),
            json!({ "keyframe_path": "/frames/key.png" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(shot_status(&shot), "ready");
}

#[sqlx::test(migrations = "../../migrations")]
async fn animate_without_a_keyframe_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "nokey").await;
    let shot_id = append_shot(&app, scene_id, "a").await;

    let json = expect_json(
        post_json(app.clone(), &format!("/api/v1/shots/{shot_id}/animate"), json!({})).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(json["code"], "PRECONDITION_FAILED");
}

#[sqlx::test(migrations = "../../migrations")]
async fn animate_dispatches_and_completes(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "animate").await;
    let shot_id = append_shot(&app, scene_id, "Detective walks away.").await;
    set_keyframe(&app, shot_id).await;

    let accepted = expect_data(
        post_json(app.clone(), &format!("/api/v1/shots/{shot_id}/animate"), json!({})).await,
        StatusCode::ACCEPTED,
    )
    .await;
    assert_eq!(shot_status(&accepted["shot"]), "animating");

    let done = wait_for_status(&app, shot_id, "complete").await;
    assert!(done["selected_take_id"].is_i64());

    let takes = expect_data(
        get(app.clone(), &format!("/api/v1/shots/{shot_id}/takes")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(takes.as_array().unwrap().len(), 1);
    assert_eq!(takes[0]["video_path"], "/takes/stub.mp4");
}

#[sqlx::test(migrations = "../../migrations")]
async fn cancel_without_an_active_job_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "cancel").await;
    let shot_id = append_shot(&app, scene_id, "a").await;

    let json = expect_json(
        post_json(app.clone(), &format!("/api/v1/shots/{shot_id}/cancel"), json!({})).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(json["code"], "PRECONDITION_FAILED");
}

#[sqlx::test(migrations = "../../migrations")]
async fn bridge_requires_a_transition_prompt(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "bridge").await;
    let shot_id = append_shot(&app, scene_id, "a").await;
    set_keyframe(&app, shot_id).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/shots/{shot_id}/bridge"),
        json!({ "transition_prompt": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Take ledger and playlist
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn selecting_a_take_completes_the_shot(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "select").await;
    let shot_id = append_shot(&app, scene_id, "a").await;
    set_keyframe(&app, shot_id).await;

    let take = expect_data(
        post_json(
            app.clone(),
            &format!("/api/v1/shots/{shot_id}/takes"),
            json!({ "video_path": "/takes/manual.mp4" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let take_id = take["id"].as_i64().unwrap();

    let shot = expect_data(
        post_json(
            app.clone(),
            &format!("/api/v1/shots/{shot_id}/takes/{take_id}/select"),
            json!({}),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(shot_status(&shot), "complete");
    assert_eq!(shot["selected_take_id"].as_i64(), Some(take_id));
}

#[sqlx::test(migrations = "../../migrations")]
async fn deleting_the_main_take_reopens_the_shot(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "delmain").await;
    let shot_id = append_shot(&app, scene_id, "a").await;
    set_keyframe(&app, shot_id).await;
    let take = expect_data(
        post_json(
            app.clone(),
            &format!("/api/v1/shots/{shot_id}/takes"),
            json!({ "video_path": "/takes/main.mp4" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let take_id = take["id"].as_i64().unwrap();
    post_json(
        app.clone(),
        &format!("/api/v1/shots/{shot_id}/takes/{take_id}/select"),
        json!({}),
    )
    .await;

    let shot = expect_data(
        delete(app.clone(), &format!("/api/v1/takes/{take_id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(shot["selected_take_id"], serde_json::Value::Null);
    assert_eq!(shot_status(&shot), "ready");
}

#[sqlx::test(migrations = "../../migrations")]
async fn playlist_lists_main_takes_in_order(pool: PgPool) {
    let app = common::build_test_app(pool);
    let scene_id = setup_scene(&app, "playlist").await;

    // Two shots with selected takes, one without.
    for n in 0..2 {
        let shot_id = append_shot(&app, scene_id, "shot").await;
        set_keyframe(&app, shot_id).await;
        let take = expect_data(
            post_json(
                app.clone(),
                &format!("/api/v1/shots/{shot_id}/takes"),
                json!({ "video_path": format!("/takes/{n}.mp4") }),
            )
            .await,
            StatusCode::CREATED,
        )
        .await;
        post_json(
            app.clone(),
            &format!("/api/v1/shots/{shot_id}/takes/{}/select", take["id"]),
            json!({}),
        )
        .await;
    }
    append_shot(&app, scene_id, "unfinished").await;

    let entries = expect_data(
        get(app.clone(), &format!("/api/v1/scenes/{scene_id}/playlist")).await,
        StatusCode::OK,
    )
    .await;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["video_path"], "/takes/0.mp4");
    assert_eq!(entries[1]["video_path"], "/takes/1.mp4");
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn unknown_entities_return_404_with_code(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = expect_json(
        get(app.clone(), "/api/v1/projects/424242").await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(json["code"], "NOT_FOUND");

    let json = expect_json(
        post_json(
            app.clone(),
            "/api/v1/takes/424242/stitch",
            json!({ "prompt": "continue" }),
        )
        .await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../migrations")]
async fn blank_project_name_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = expect_json(
        post_json(app.clone(), "/api/v1/projects", json!({ "name": "   " })).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "BAD_REQUEST");
}
