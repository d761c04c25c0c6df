//! Shot sequencer: ordered, gap-free shot lists per scene.

use cinestudio_core::types::DbId;
use cinestudio_core::{sequencing, CoreError};
use cinestudio_db::models::shot::Shot;
use cinestudio_db::repositories::{SceneRepo, ShotRepo};
use cinestudio_events::StudioEvent;

use crate::Engine;

impl Engine {
    /// Append a new shot at the end of a scene's sequence.
    ///
    /// With no prompt given, the shot is seeded from the scene's master
    /// context so generation has something to work with immediately.
    pub async fn append_shot(
        &self,
        scene_id: DbId,
        prompt: Option<String>,
    ) -> Result<Shot, CoreError> {
        let scene = SceneRepo::find_by_id(&self.pool, scene_id)
            .await
            .map_err(internal)?
            .ok_or(CoreError::NotFound {
                entity: "scene",
                id: scene_id,
            })?;

        let prompt = prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| scene.master_context.clone());

        let shot = ShotRepo::create_at_tail(&self.pool, scene_id, &prompt)
            .await
            .map_err(internal)?;

        tracing::info!(
            shot_id = shot.id,
            scene_id,
            order_index = shot.order_index,
            "Shot appended"
        );
        self.bus
            .publish(StudioEvent::new("shot.created").with_entity("shot", shot.id));
        Ok(shot)
    }

    /// Delete a shot and all its takes, closing the index gap atomically.
    pub async fn delete_shot(&self, shot_id: DbId) -> Result<(), CoreError> {
        let shot = ShotRepo::find_by_id(&self.pool, shot_id)
            .await
            .map_err(internal)?
            .ok_or(CoreError::NotFound {
                entity: "shot",
                id: shot_id,
            })?;

        let deleted = ShotRepo::delete_and_reindex(&self.pool, shot_id)
            .await
            .map_err(internal)?;
        if !deleted {
            // Raced with another delete; the shot is gone either way.
            return Err(CoreError::NotFound {
                entity: "shot",
                id: shot_id,
            });
        }

        tracing::info!(shot_id, scene_id = shot.scene_id, "Shot deleted and scene re-indexed");
        self.bus
            .publish(StudioEvent::new("shot.deleted").with_entity("shot", shot_id));
        Ok(())
    }

    /// Reorder a scene by a full permutation of its shot ids.
    ///
    /// Fails with `InvalidPermutation` on malformed input and leaves the
    /// ordering untouched; a pre-existing index gap is surfaced as
    /// `ConsistencyViolation` before anything is written.
    pub async fn reorder(&self, scene_id: DbId, new_order: &[DbId]) -> Result<Vec<Shot>, CoreError> {
        SceneRepo::find_by_id(&self.pool, scene_id)
            .await
            .map_err(internal)?
            .ok_or(CoreError::NotFound {
                entity: "scene",
                id: scene_id,
            })?;

        let indices = ShotRepo::list_indices_by_scene(&self.pool, scene_id)
            .await
            .map_err(internal)?;
        if let Err(violation) = sequencing::validate_dense_indices(&indices) {
            tracing::error!(scene_id, error = %violation, "Scene ordering is corrupt; aborting reorder");
            return Err(violation);
        }

        let current = ShotRepo::list_ids_by_scene(&self.pool, scene_id)
            .await
            .map_err(internal)?;
        sequencing::validate_permutation(&current, new_order)?;

        // The repo re-checks membership under row locks; a concurrent
        // append/delete between our read and the update surfaces here.
        let applied = ShotRepo::apply_order(&self.pool, scene_id, new_order)
            .await
            .map_err(internal)?;
        if !applied {
            return Err(CoreError::InvalidPermutation(
                "scene shots changed while reordering; retry with the current list".to_string(),
            ));
        }

        tracing::info!(scene_id, shots = new_order.len(), "Scene reordered");
        self.bus
            .publish(StudioEvent::new("scene.reordered").with_entity("scene", scene_id));

        ShotRepo::list_by_scene(&self.pool, scene_id)
            .await
            .map_err(internal)
    }
}

/// Map a store error into the engine's opaque internal variant.
pub(crate) fn internal(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("store error: {err}"))
}
