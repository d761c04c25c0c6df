//! Generation coordinator: animate, bridge, and stitch dispatch.
//!
//! Each operation composes the final prompt, claims its target shot (stitch
//! targets a shot that does not exist yet, so it claims nothing), and spawns
//! the gateway call as a detached task. The task races the backend against
//! the liveness timeout and the job's cancellation token, then applies the
//! outcome through [`Engine::resolve_generation`].

use cinestudio_core::types::DbId;
use cinestudio_core::{director, job::JobPayload, lifecycle, CoreError, GatewayFailure};
use cinestudio_db::models::scene::Scene;
use cinestudio_db::models::shot::Shot;
use cinestudio_db::repositories::{SceneRepo, ShotRepo, TakeRepo};
use cinestudio_events::StudioEvent;
use tokio_util::sync::CancellationToken;

use crate::sequencer::internal;
use crate::Engine;

impl Engine {
    /// Animate a shot's keyframe into a new take.
    ///
    /// Claims the shot (moving it to `animating`) and returns immediately;
    /// the gateway call runs detached and its outcome lands through
    /// [`Engine::resolve_generation`].
    pub async fn animate(
        &self,
        shot_id: DbId,
        style: Option<&str>,
        camera_move: Option<&str>,
    ) -> Result<Shot, CoreError> {
        let shot = self.require_shot(shot_id).await?;
        let scene = self.require_scene(shot.scene_id).await?;
        lifecycle::validate_begin_generation(shot.status()?, shot.keyframe_path.is_some())?;

        let Some(keyframe_path) = shot.keyframe_path.clone() else {
            return Err(CoreError::PreconditionFailed(format!(
                "shot {shot_id} has no keyframe to animate"
            )));
        };
        let prompt = director::compose_prompt(
            Some(&scene.master_context),
            &shot.prompt,
            style.unwrap_or(director::DEFAULT_STYLE),
            camera_move.unwrap_or(director::DEFAULT_CAMERA_MOVE),
        );
        let payload = JobPayload::Animate {
            prompt: prompt.clone(),
            keyframe_path,
        };
        payload.validate()?;

        let claimed = self.begin_generation(shot_id).await?;
        let token = self.track_or_release(&claimed).await?;
        self.spawn_shot_generation(shot_id, payload, prompt, token);
        Ok(claimed)
    }

    /// Generate a transition clip from a shot's keyframe.
    ///
    /// Same claim and dispatch path as [`Engine::animate`]; only the prompt
    /// and job kind differ. The clip lands as a take on the source shot.
    pub async fn bridge(
        &self,
        shot_id: DbId,
        transition_prompt: &str,
        style: Option<&str>,
        camera_move: Option<&str>,
    ) -> Result<Shot, CoreError> {
        if transition_prompt.trim().is_empty() {
            return Err(CoreError::Validation(
                "transition_prompt must not be empty".to_string(),
            ));
        }

        let shot = self.require_shot(shot_id).await?;
        let scene = self.require_scene(shot.scene_id).await?;
        lifecycle::validate_begin_generation(shot.status()?, shot.keyframe_path.is_some())?;

        let Some(keyframe_path) = shot.keyframe_path.clone() else {
            return Err(CoreError::PreconditionFailed(format!(
                "shot {shot_id} has no keyframe to bridge from"
            )));
        };
        let prompt = director::compose_prompt(
            Some(&scene.master_context),
            transition_prompt,
            style.unwrap_or(director::DEFAULT_STYLE),
            camera_move.unwrap_or(director::DEFAULT_CAMERA_MOVE),
        );
        let payload = JobPayload::Bridge {
            prompt: prompt.clone(),
            keyframe_path,
        };
        payload.validate()?;

        let claimed = self.begin_generation(shot_id).await?;
        let token = self.track_or_release(&claimed).await?;
        self.spawn_shot_generation(shot_id, payload, prompt, token);
        Ok(claimed)
    }

    /// Extend a scene from an existing take: derive a keyframe from the
    /// take's last frame and append a new shot carrying it.
    ///
    /// The new shot is created only once the gateway confirms the derived
    /// frame, so a failed stitch leaves the scene's shot list untouched. No
    /// shot is claimed (the target does not exist yet) and the job is not
    /// individually cancellable; the liveness timeout still bounds it.
    pub async fn stitch(&self, take_id: DbId, prompt: &str) -> Result<(), CoreError> {
        if prompt.trim().is_empty() {
            return Err(CoreError::Validation(
                "prompt must not be empty".to_string(),
            ));
        }

        let take = TakeRepo::find_by_id(&self.pool, take_id)
            .await
            .map_err(internal)?
            .ok_or(CoreError::NotFound {
                entity: "take",
                id: take_id,
            })?;
        let shot = self.require_shot(take.shot_id).await?;
        let scene = self.require_scene(shot.scene_id).await?;

        let composed = director::compose_prompt(
            Some(&scene.master_context),
            prompt,
            director::DEFAULT_STYLE,
            director::DEFAULT_CAMERA_MOVE,
        );
        let payload = JobPayload::Stitch {
            prompt: composed,
            source_video_path: take.video_path.clone(),
        };
        payload.validate()?;

        tracing::info!(take_id, scene_id = scene.id, "Stitch dispatched");
        let engine = self.clone();
        let shot_prompt = prompt.to_string();
        tokio::spawn(async move {
            let outcome = engine.await_gateway(&payload).await;
            engine.finish_stitch(scene.id, &shot_prompt, outcome).await;
        });
        Ok(())
    }

    /// Cancel the in-flight generation job for a shot.
    ///
    /// The job's task observes the token and resolves the shot to `error`
    /// with a cancellation reason.
    pub fn cancel_generation(&self, shot_id: DbId) -> Result<(), CoreError> {
        if !self.jobs.cancel(shot_id) {
            return Err(CoreError::PreconditionFailed(format!(
                "no generation job is in flight for shot {shot_id}"
            )));
        }
        tracing::info!(shot_id, "Generation cancellation requested");
        Ok(())
    }

    /// Register the claimed shot with the job tracker, releasing the claim
    /// if registration fails so the shot is not stranded in `animating`.
    async fn track_or_release(&self, claimed: &Shot) -> Result<CancellationToken, CoreError> {
        match self.jobs.register(claimed.id) {
            Ok(token) => Ok(token),
            Err(err) => {
                let status = lifecycle::recompute_status(
                    claimed.keyframe_path.is_some(),
                    claimed.selected_take_id.is_some(),
                );
                if let Err(revert) =
                    ShotRepo::set_status(&self.pool, claimed.id, status, None).await
                {
                    tracing::error!(
                        shot_id = claimed.id,
                        error = %revert,
                        "Failed to release generation claim"
                    );
                }
                Err(err)
            }
        }
    }

    fn spawn_shot_generation(
        &self,
        shot_id: DbId,
        payload: JobPayload,
        prompt_used: String,
        token: CancellationToken,
    ) {
        let engine = self.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => Err(GatewayFailure::Cancelled),
                outcome = engine.await_gateway(&payload) => outcome,
            };
            if let Err(err) = engine.resolve_generation(shot_id, outcome, &prompt_used).await {
                tracing::error!(shot_id, error = %err, "Failed to apply generation outcome");
            }
        });
    }

    /// Run one gateway call under the liveness timeout.
    async fn await_gateway(&self, payload: &JobPayload) -> Result<String, GatewayFailure> {
        match tokio::time::timeout(self.config.generation_timeout, self.gateway.submit(payload))
            .await
        {
            Err(_) => Err(GatewayFailure::Timeout),
            Ok(Err(err)) => Err(GatewayFailure::Backend(err.to_string())),
            Ok(Ok(media_url)) => Ok(media_url),
        }
    }

    /// Apply a stitch outcome: create the deferred shot on success, publish
    /// the failure otherwise.
    async fn finish_stitch(
        &self,
        scene_id: DbId,
        prompt: &str,
        outcome: Result<String, GatewayFailure>,
    ) {
        match outcome {
            Ok(keyframe_path) => {
                match ShotRepo::create_at_tail_with_keyframe(
                    &self.pool,
                    scene_id,
                    prompt,
                    &keyframe_path,
                )
                .await
                {
                    Ok(shot) => {
                        tracing::info!(
                            scene_id,
                            shot_id = shot.id,
                            order_index = shot.order_index,
                            "Stitch completed; shot appended"
                        );
                        self.bus.publish(
                            StudioEvent::new("shot.stitched")
                                .with_entity("shot", shot.id)
                                .with_payload(serde_json::json!({ "scene_id": scene_id })),
                        );
                    }
                    Err(err) => {
                        tracing::error!(scene_id, error = %err, "Failed to append stitched shot");
                    }
                }
            }
            Err(failure) => {
                let reason = failure.to_string();
                tracing::warn!(scene_id, reason = %reason, "Stitch failed");
                self.bus.publish(
                    StudioEvent::new("scene.stitch_failed")
                        .with_entity("scene", scene_id)
                        .with_payload(serde_json::json!({ "reason": reason })),
                );
            }
        }
    }

    pub(crate) async fn require_scene(&self, scene_id: DbId) -> Result<Scene, CoreError> {
        SceneRepo::find_by_id(&self.pool, scene_id)
            .await
            .map_err(internal)?
            .ok_or(CoreError::NotFound {
                entity: "scene",
                id: scene_id,
            })
    }
}
