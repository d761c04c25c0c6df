//! Take ledger: append-only version history and main-take selection.

use cinestudio_core::lifecycle;
use cinestudio_core::types::DbId;
use cinestudio_core::CoreError;
use cinestudio_db::models::shot::Shot;
use cinestudio_db::models::take::{CreateTake, PlaylistEntry, Take};
use cinestudio_db::repositories::{SceneRepo, ShotRepo, TakeRepo};
use cinestudio_events::StudioEvent;

use crate::sequencer::internal;
use crate::Engine;

impl Engine {
    /// Append a take to a shot's ledger without promoting it.
    ///
    /// Promotion is a separate, explicit act so a freshly generated
    /// alternate never silently replaces the director's chosen cut.
    pub async fn record_take(
        &self,
        shot_id: DbId,
        video_path: &str,
        prompt_used: &str,
    ) -> Result<Take, CoreError> {
        if video_path.trim().is_empty() {
            return Err(CoreError::Validation(
                "video_path must not be empty".to_string(),
            ));
        }
        self.require_shot(shot_id).await?;

        let take = TakeRepo::create(
            &self.pool,
            &CreateTake {
                shot_id,
                video_path: video_path.to_string(),
                prompt_used: prompt_used.to_string(),
            },
        )
        .await
        .map_err(internal)?;

        tracing::info!(shot_id, take_id = take.id, "Take recorded");
        Ok(take)
    }

    /// List a shot's takes, oldest first.
    pub async fn list_takes(&self, shot_id: DbId) -> Result<Vec<Take>, CoreError> {
        self.require_shot(shot_id).await?;
        TakeRepo::list_by_shot(&self.pool, shot_id)
            .await
            .map_err(internal)
    }

    /// Promote a take to the shot's main selection. Idempotent.
    pub async fn select_main(&self, shot_id: DbId, take_id: DbId) -> Result<Shot, CoreError> {
        let shot = self.require_shot(shot_id).await?;
        let take = TakeRepo::find_by_id(&self.pool, take_id)
            .await
            .map_err(internal)?
            .filter(|take| take.shot_id == shot.id)
            .ok_or(CoreError::NotFound {
                entity: "take",
                id: take_id,
            })?;

        let updated = ShotRepo::select_take(
            &self.pool,
            shot_id,
            Some(take.id),
            lifecycle::recompute_status(shot.keyframe_path.is_some(), true),
        )
        .await
        .map_err(|err| selection_error(err, take_id))?
        .ok_or(CoreError::NotFound {
            entity: "shot",
            id: shot_id,
        })?;

        tracing::info!(shot_id, take_id, "Main take selected");
        self.bus.publish(
            StudioEvent::new("take.selected")
                .with_entity("take", take_id)
                .with_payload(serde_json::json!({ "shot_id": shot_id })),
        );
        Ok(updated)
    }

    /// Delete a take; if it was the main selection, the selection is cleared
    /// and the shot's status recomputed (not reassigned to another take —
    /// which one the user would prefer is ambiguous).
    pub async fn delete_take(&self, take_id: DbId) -> Result<Shot, CoreError> {
        let take = TakeRepo::find_by_id(&self.pool, take_id)
            .await
            .map_err(internal)?
            .ok_or(CoreError::NotFound {
                entity: "take",
                id: take_id,
            })?;
        let shot = self.require_shot(take.shot_id).await?;
        let was_main = shot.selected_take_id == Some(take_id);

        TakeRepo::delete(&self.pool, take_id)
            .await
            .map_err(internal)?;

        let updated = if was_main {
            let status = lifecycle::recompute_status(shot.keyframe_path.is_some(), false);
            ShotRepo::select_take(&self.pool, shot.id, None, status)
                .await
                .map_err(internal)?
                .ok_or(CoreError::NotFound {
                    entity: "shot",
                    id: shot.id,
                })?
        } else {
            self.require_shot(shot.id).await?
        };

        tracing::info!(take_id, shot_id = shot.id, was_main, "Take deleted");
        self.bus.publish(
            StudioEvent::new("take.deleted")
                .with_entity("take", take_id)
                .with_payload(serde_json::json!({ "shot_id": shot.id })),
        );
        Ok(updated)
    }

    /// The playable sequence for a scene: each shot's main take in
    /// `order_index` order, skipping shots without a selection.
    pub async fn playlist(&self, scene_id: DbId) -> Result<Vec<PlaylistEntry>, CoreError> {
        SceneRepo::find_by_id(&self.pool, scene_id)
            .await
            .map_err(internal)?
            .ok_or(CoreError::NotFound {
                entity: "scene",
                id: scene_id,
            })?;

        TakeRepo::playlist(&self.pool, scene_id)
            .await
            .map_err(internal)
    }
}

/// A take deleted between the ownership check and the selection update trips
/// the `selected_take_id` foreign key; surface that race as a missing take
/// rather than an internal error.
fn selection_error(err: sqlx::Error, take_id: DbId) -> CoreError {
    match err.as_database_error().and_then(|db| db.constraint()) {
        Some("fk_shots_selected_take") => CoreError::NotFound {
            entity: "take",
            id: take_id,
        },
        _ => internal(err),
    }
}
