//! Shot lifecycle operations: keyframe assignment, generation claim,
//! and resolution.

use cinestudio_core::lifecycle::{self, ShotStatus};
use cinestudio_core::types::DbId;
use cinestudio_core::{CoreError, GatewayFailure};
use cinestudio_db::models::shot::Shot;
use cinestudio_db::models::take::CreateTake;
use cinestudio_db::repositories::{ShotRepo, TakeRepo};
use cinestudio_events::StudioEvent;

use crate::sequencer::internal;
use crate::Engine;

impl Engine {
    /// Assign (or replace) a shot's keyframe.
    ///
    /// Existing takes are untouched; the status is recomputed, so a
    /// `complete` shot stays `complete` and a `pending` one becomes `ready`.
    pub async fn assign_keyframe(
        &self,
        shot_id: DbId,
        keyframe_path: &str,
    ) -> Result<Shot, CoreError> {
        if keyframe_path.trim().is_empty() {
            return Err(CoreError::Validation(
                "keyframe_path must not be empty".to_string(),
            ));
        }

        let shot = self.require_shot(shot_id).await?;
        lifecycle::validate_assign_keyframe(shot.status()?)?;

        let status = lifecycle::recompute_status(true, shot.selected_take_id.is_some());
        let shot = ShotRepo::set_keyframe(&self.pool, shot_id, keyframe_path, status)
            .await
            .map_err(internal)?
            .ok_or(CoreError::NotFound {
                entity: "shot",
                id: shot_id,
            })?;

        tracing::info!(shot_id, status = status.as_str(), "Keyframe assigned");
        self.bus
            .publish(StudioEvent::new("shot.keyframe_assigned").with_entity("shot", shot_id));
        Ok(shot)
    }

    /// Claim a shot for generation, moving it to `animating`.
    ///
    /// This is the re-entrancy guard: the underlying UPDATE only succeeds
    /// from a claimable status with a keyframe present, so of two racing
    /// calls exactly one claims the shot and the other fails with
    /// `PreconditionFailed`.
    pub async fn begin_generation(&self, shot_id: DbId) -> Result<Shot, CoreError> {
        let shot = self.require_shot(shot_id).await?;
        // Friendly errors first; the atomic claim below is authoritative.
        lifecycle::validate_begin_generation(shot.status()?, shot.keyframe_path.is_some())?;

        let claimed = ShotRepo::claim_for_generation(&self.pool, shot_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                CoreError::PreconditionFailed(format!(
                    "shot {shot_id} was claimed by a concurrent generation request"
                ))
            })?;

        tracing::info!(shot_id, "Generation claimed; shot animating");
        self.bus
            .publish(StudioEvent::new("shot.generation_started").with_entity("shot", shot_id));
        Ok(claimed)
    }

    /// Apply a generation result to its shot.
    ///
    /// Only an `animating` shot can be resolved; a resolution arriving after
    /// the claim was released (e.g. a late outcome the sweeper already
    /// recovered from) fails with `PreconditionFailed` and leaves the shot
    /// and its ledger untouched.
    ///
    /// Success appends a take and promotes it to main only when the shot has
    /// no current selection, then marks the shot `complete`. Failure moves
    /// the shot to `error` with the reason recorded; keyframe and prompt are
    /// left untouched so retry needs no re-entry.
    pub async fn resolve_generation(
        &self,
        shot_id: DbId,
        outcome: Result<String, GatewayFailure>,
        prompt_used: &str,
    ) -> Result<Shot, CoreError> {
        let shot = self.require_shot(shot_id).await?;
        if shot.status()? != ShotStatus::Animating {
            // Not ours to finish: another job may be tracked for this shot.
            return Err(CoreError::PreconditionFailed(format!(
                "shot {shot_id} has no generation in flight to resolve"
            )));
        }
        self.jobs.finish(shot_id);

        match outcome {
            Ok(video_path) => {
                let take = TakeRepo::create(
                    &self.pool,
                    &CreateTake {
                        shot_id,
                        video_path,
                        prompt_used: prompt_used.to_string(),
                    },
                )
                .await
                .map_err(internal)?;

                // Auto-promote only a first take; an established main
                // selection is the director's cut and stays.
                let selected = shot.selected_take_id.unwrap_or(take.id);
                let updated = ShotRepo::select_take(
                    &self.pool,
                    shot_id,
                    Some(selected),
                    ShotStatus::Complete,
                )
                .await
                .map_err(internal)?
                .ok_or(CoreError::NotFound {
                    entity: "shot",
                    id: shot_id,
                })?;

                tracing::info!(shot_id, take_id = take.id, "Generation completed");
                self.bus.publish(
                    StudioEvent::new("shot.generation_completed")
                        .with_entity("shot", shot_id)
                        .with_payload(serde_json::json!({ "take_id": take.id })),
                );
                Ok(updated)
            }
            Err(failure) => {
                let reason = failure.to_string();
                let updated =
                    ShotRepo::set_status(&self.pool, shot_id, ShotStatus::Error, Some(&reason))
                        .await
                        .map_err(internal)?
                        .ok_or(CoreError::NotFound {
                            entity: "shot",
                            id: shot_id,
                        })?;

                tracing::warn!(shot_id, reason = %reason, "Generation failed");
                self.bus.publish(
                    StudioEvent::new("shot.generation_failed")
                        .with_entity("shot", shot_id)
                        .with_payload(serde_json::json!({ "reason": reason })),
                );
                Ok(updated)
            }
        }
    }

    /// Acknowledge a failed generation, returning the shot to `ready`.
    pub async fn acknowledge_error(&self, shot_id: DbId) -> Result<Shot, CoreError> {
        let shot = self.require_shot(shot_id).await?;
        if shot.status()? != ShotStatus::Error {
            return Err(CoreError::PreconditionFailed(format!(
                "shot {shot_id} is not in the error state"
            )));
        }

        let status = cinestudio_core::lifecycle::recompute_status(
            shot.keyframe_path.is_some(),
            shot.selected_take_id.is_some(),
        );
        ShotRepo::set_status(&self.pool, shot_id, status, None)
            .await
            .map_err(internal)?
            .ok_or(CoreError::NotFound {
                entity: "shot",
                id: shot_id,
            })
    }

    pub(crate) async fn require_shot(&self, shot_id: DbId) -> Result<Shot, CoreError> {
        ShotRepo::find_by_id(&self.pool, shot_id)
            .await
            .map_err(internal)?
            .ok_or(CoreError::NotFound {
                entity: "shot",
                id: shot_id,
            })
    }
}
