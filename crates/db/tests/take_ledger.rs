//! Integration tests for the take ledger and the scene playlist query.

use sqlx::PgPool;

use cinestudio_core::lifecycle::ShotStatus;
use cinestudio_db::models::project::CreateProject;
use cinestudio_db::models::scene::CreateScene;
use cinestudio_db::models::take::CreateTake;
use cinestudio_db::repositories::{ProjectRepo, SceneRepo, ShotRepo, TakeRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn setup_scene(pool: &PgPool, suffix: &str) -> i64 {
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: format!("Ledger_{suffix}"),
            description: None,
            aspect_ratio: None,
        },
    )
    .await
    .unwrap();
    let scene = SceneRepo::create(
        pool,
        project.id,
        &CreateScene {
            name: format!("Scene_{suffix}"),
            master_context: None,
        },
    )
    .await
    .unwrap();
    scene.id
}

async fn setup_shot(pool: &PgPool, scene_id: i64, prompt: &str) -> i64 {
    let shot = ShotRepo::create_at_tail(pool, scene_id, prompt).await.unwrap();
    shot.id
}

async fn record_take(pool: &PgPool, shot_id: i64, video_path: &str) -> i64 {
    let take = TakeRepo::create(
        pool,
        &CreateTake {
            shot_id,
            video_path: video_path.to_string(),
            prompt_used: "prompt".to_string(),
        },
    )
    .await
    .unwrap();
    take.id
}

// ---------------------------------------------------------------------------
// Append and list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_takes_list_oldest_first(pool: PgPool) {
    let scene_id = setup_scene(&pool, "list").await;
    let shot_id = setup_shot(&pool, scene_id, "shot").await;

    let first = record_take(&pool, shot_id, "/takes/1.mp4").await;
    let second = record_take(&pool, shot_id, "/takes/2.mp4").await;

    let takes = TakeRepo::list_by_shot(&pool, shot_id).await.unwrap();
    let ids: Vec<i64> = takes.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_recording_a_take_does_not_touch_the_shot(pool: PgPool) {
    let scene_id = setup_scene(&pool, "no_promote").await;
    let shot_id = setup_shot(&pool, scene_id, "shot").await;

    record_take(&pool, shot_id, "/takes/1.mp4").await;

    let shot = ShotRepo::find_by_id(&pool, shot_id).await.unwrap().unwrap();
    assert_eq!(shot.selected_take_id, None);
    assert_eq!(shot.status().unwrap(), ShotStatus::Pending);
}

// ---------------------------------------------------------------------------
// Main selection and deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_deleting_main_take_clears_selection_via_fk(pool: PgPool) {
    let scene_id = setup_scene(&pool, "fk").await;
    let shot_id = setup_shot(&pool, scene_id, "shot").await;
    let take_id = record_take(&pool, shot_id, "/takes/1.mp4").await;
    ShotRepo::select_take(&pool, shot_id, Some(take_id), ShotStatus::Complete)
        .await
        .unwrap();

    assert!(TakeRepo::delete(&pool, take_id).await.unwrap());

    let shot = ShotRepo::find_by_id(&pool, shot_id).await.unwrap().unwrap();
    assert_eq!(shot.selected_take_id, None);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_deleting_alternate_take_keeps_selection(pool: PgPool) {
    let scene_id = setup_scene(&pool, "alt").await;
    let shot_id = setup_shot(&pool, scene_id, "shot").await;
    let main = record_take(&pool, shot_id, "/takes/1.mp4").await;
    let alternate = record_take(&pool, shot_id, "/takes/2.mp4").await;
    ShotRepo::select_take(&pool, shot_id, Some(main), ShotStatus::Complete)
        .await
        .unwrap();

    assert!(TakeRepo::delete(&pool, alternate).await.unwrap());

    let shot = ShotRepo::find_by_id(&pool, shot_id).await.unwrap().unwrap();
    assert_eq!(shot.selected_take_id, Some(main));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_deleting_shot_cascades_to_takes(pool: PgPool) {
    let scene_id = setup_scene(&pool, "cascade").await;
    let shot_id = setup_shot(&pool, scene_id, "shot").await;
    let take_id = record_take(&pool, shot_id, "/takes/1.mp4").await;

    assert!(ShotRepo::delete_and_reindex(&pool, shot_id).await.unwrap());
    assert!(TakeRepo::find_by_id(&pool, take_id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Playlist
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_playlist_follows_order_index_and_skips_unselected(pool: PgPool) {
    let scene_id = setup_scene(&pool, "playlist").await;
    let shot_a = setup_shot(&pool, scene_id, "a").await;
    let shot_b = setup_shot(&pool, scene_id, "b").await;
    let shot_c = setup_shot(&pool, scene_id, "c").await;

    let take_a = record_take(&pool, shot_a, "/takes/a.mp4").await;
    let take_c = record_take(&pool, shot_c, "/takes/c.mp4").await;
    ShotRepo::select_take(&pool, shot_a, Some(take_a), ShotStatus::Complete)
        .await
        .unwrap();
    ShotRepo::select_take(&pool, shot_c, Some(take_c), ShotStatus::Complete)
        .await
        .unwrap();
    // shot_b has no main take and must be skipped.
    let _ = shot_b;

    let playlist = TakeRepo::playlist(&pool, scene_id).await.unwrap();
    let entries: Vec<(i64, &str)> = playlist
        .iter()
        .map(|e| (e.shot_id, e.video_path.as_str()))
        .collect();
    assert_eq!(entries, vec![(shot_a, "/takes/a.mp4"), (shot_c, "/takes/c.mp4")]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_playlist_tracks_reordering(pool: PgPool) {
    let scene_id = setup_scene(&pool, "replay").await;
    let shot_a = setup_shot(&pool, scene_id, "a").await;
    let shot_b = setup_shot(&pool, scene_id, "b").await;
    for (shot_id, path) in [(shot_a, "/takes/a.mp4"), (shot_b, "/takes/b.mp4")] {
        let take_id = record_take(&pool, shot_id, path).await;
        ShotRepo::select_take(&pool, shot_id, Some(take_id), ShotStatus::Complete)
            .await
            .unwrap();
    }

    ShotRepo::apply_order(&pool, scene_id, &[shot_b, shot_a])
        .await
        .unwrap();

    let playlist = TakeRepo::playlist(&pool, scene_id).await.unwrap();
    let order: Vec<i64> = playlist.iter().map(|e| e.shot_id).collect();
    assert_eq!(order, vec![shot_b, shot_a]);
}
