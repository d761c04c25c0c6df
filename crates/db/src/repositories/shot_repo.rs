//! Repository for the `shots` table.
//!
//! Besides plain CRUD this repo owns the two structural operations that must
//! be atomic: delete-with-reindex and whole-scene reordering. Both run as a
//! single transaction/statement so partial re-indexing is never observable.

use sqlx::PgPool;

use cinestudio_core::lifecycle::{ShotStatus, StatusId};
use cinestudio_core::types::DbId;

use crate::models::shot::{Shot, UpdateShot};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, scene_id, order_index, prompt, keyframe_path, \
    selected_take_id, status_id, error_reason, animating_since, \
    created_at, updated_at";

/// Provides CRUD, lifecycle, and ordering operations for shots.
pub struct ShotRepo;

impl ShotRepo {
    /// Insert a new shot at the end of its scene's sequence.
    ///
    /// `order_index` is assigned from the current tail (max + 1, or 0 for an
    /// empty scene) inside the statement, so concurrent appends cannot skip
    /// or reuse an index without tripping the unique constraint.
    pub async fn create_at_tail(
        pool: &PgPool,
        scene_id: DbId,
        prompt: &str,
    ) -> Result<Shot, sqlx::Error> {
        let query = format!(
            "INSERT INTO shots (scene_id, order_index, prompt)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(order_index) + 1, 0) FROM shots WHERE scene_id = $1),
                $2
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(scene_id)
            .bind(prompt)
            .fetch_one(pool)
            .await
    }

    /// Find a shot by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shots WHERE id = $1");
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all shots of a scene, ordered by `order_index` ascending.
    pub async fn list_by_scene(pool: &PgPool, scene_id: DbId) -> Result<Vec<Shot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shots WHERE scene_id = $1 ORDER BY order_index ASC"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(scene_id)
            .fetch_all(pool)
            .await
    }

    /// List the shot IDs of a scene in `order_index` order.
    pub async fn list_ids_by_scene(
        pool: &PgPool,
        scene_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM shots WHERE scene_id = $1 ORDER BY order_index ASC",
        )
        .bind(scene_id)
        .fetch_all(pool)
        .await
    }

    /// List the `order_index` values of a scene in ascending order.
    ///
    /// Used by the sequencer's density check.
    pub async fn list_indices_by_scene(
        pool: &PgPool,
        scene_id: DbId,
    ) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT order_index FROM shots WHERE scene_id = $1 ORDER BY order_index ASC",
        )
        .bind(scene_id)
        .fetch_all(pool)
        .await
    }

    /// Update a shot's authored fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateShot,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!(
            "UPDATE shots SET
                prompt = COALESCE($2, prompt),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .bind(&input.prompt)
            .fetch_optional(pool)
            .await
    }

    /// Assign a keyframe and set the resulting status in one statement.
    pub async fn set_keyframe(
        pool: &PgPool,
        id: DbId,
        keyframe_path: &str,
        status: ShotStatus,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!(
            "UPDATE shots SET
                keyframe_path = $2,
                status_id = $3,
                error_reason = NULL,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .bind(keyframe_path)
            .bind(status.id())
            .fetch_optional(pool)
            .await
    }

    /// Set a shot's lifecycle status, recording or clearing the error reason.
    ///
    /// `animating_since` is cleared for every non-`animating` status.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ShotStatus,
        error_reason: Option<&str>,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!(
            "UPDATE shots SET
                status_id = $2,
                error_reason = $3,
                animating_since = CASE WHEN $2 = {animating} THEN animating_since ELSE NULL END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}",
            animating = ShotStatus::Animating.id(),
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .bind(status.id())
            .bind(error_reason)
            .fetch_optional(pool)
            .await
    }

    /// Atomically claim a shot for generation: `ready`/`error`/`complete`
    /// with a keyframe moves to `animating`.
    ///
    /// Returns the claimed row, or `None` if the shot is missing, lacks a
    /// keyframe, or is not in a claimable state. This single conditional
    /// UPDATE is the per-shot re-entrancy guard: of two racing callers only
    /// one can observe a claimable status.
    pub async fn claim_for_generation(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let claimable: Vec<StatusId> = vec![
            ShotStatus::Ready.id(),
            ShotStatus::Error.id(),
            ShotStatus::Complete.id(),
        ];
        let query = format!(
            "UPDATE shots SET
                status_id = $2,
                error_reason = NULL,
                animating_since = NOW(),
                updated_at = NOW()
             WHERE id = $1
               AND status_id = ANY($3)
               AND keyframe_path IS NOT NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .bind(ShotStatus::Animating.id())
            .bind(&claimable)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the main take selection and the resulting status.
    pub async fn select_take(
        pool: &PgPool,
        id: DbId,
        take_id: Option<DbId>,
        status: ShotStatus,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!(
            "UPDATE shots SET
                selected_take_id = $2,
                status_id = $3,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .bind(take_id)
            .bind(status.id())
            .fetch_optional(pool)
            .await
    }

    /// Delete a shot and close the index gap in one transaction.
    ///
    /// Subsequent shots in the scene have their `order_index` decremented;
    /// either both steps commit or neither does, so partial re-indexing is
    /// never observable. Returns `false` if the shot did not exist.
    pub async fn delete_and_reindex(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted: Option<(DbId, i32)> = sqlx::query_as(
            "DELETE FROM shots WHERE id = $1 RETURNING scene_id, order_index",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((scene_id, order_index)) = deleted else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query(
            "UPDATE shots SET order_index = order_index - 1, updated_at = NOW()
             WHERE scene_id = $1 AND order_index > $2",
        )
        .bind(scene_id)
        .bind(order_index)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Apply a full ordering to a scene's shots in one atomic batch.
    ///
    /// `ordered_ids` must already be validated as a permutation of the
    /// scene's shots; each shot receives its position in the slice as its
    /// new `order_index`. The scene's rows are locked first and the
    /// membership re-checked under the lock, so a concurrent append or
    /// delete cannot slip between validation and update — in that case
    /// nothing is written and `false` is returned. The unique constraint is
    /// deferred, so the single UPDATE may pass through transient duplicates.
    pub async fn apply_order(
        pool: &PgPool,
        scene_id: DbId,
        ordered_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut locked: Vec<DbId> = sqlx::query_scalar(
            "SELECT id FROM shots WHERE scene_id = $1 ORDER BY order_index FOR UPDATE",
        )
        .bind(scene_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut requested = ordered_ids.to_vec();
        locked.sort_unstable();
        requested.sort_unstable();
        if locked != requested {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE shots SET
                order_index = ord.position - 1,
                updated_at = NOW()
             FROM unnest($2::bigint[]) WITH ORDINALITY AS ord(shot_id, position)
             WHERE shots.id = ord.shot_id AND shots.scene_id = $1",
        )
        .bind(scene_id)
        .bind(ordered_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Insert a new shot at the scene tail with its keyframe already set.
    ///
    /// Used by the stitch flow, where shot creation is deferred until the
    /// derived frame is confirmed available; the shot is born `ready`.
    pub async fn create_at_tail_with_keyframe(
        pool: &PgPool,
        scene_id: DbId,
        prompt: &str,
        keyframe_path: &str,
    ) -> Result<Shot, sqlx::Error> {
        let query = format!(
            "INSERT INTO shots (scene_id, order_index, prompt, keyframe_path, status_id)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(order_index) + 1, 0) FROM shots WHERE scene_id = $1),
                $2, $3, $4
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(scene_id)
            .bind(prompt)
            .bind(keyframe_path)
            .bind(ShotStatus::Ready.id())
            .fetch_one(pool)
            .await
    }

    /// Revert shots stuck in `animating` longer than `stale_after_secs` back
    /// to `ready`, returning the recovered rows.
    ///
    /// Keyframes are guaranteed present (claiming required one), so `ready`
    /// is always the correct recovery state.
    pub async fn sweep_stale_animating(
        pool: &PgPool,
        stale_after_secs: i64,
    ) -> Result<Vec<Shot>, sqlx::Error> {
        let query = format!(
            "UPDATE shots SET
                status_id = $1,
                error_reason = 'generation job lost; recovered by liveness sweep',
                animating_since = NULL,
                updated_at = NOW()
             WHERE status_id = $2
               AND animating_since < NOW() - make_interval(secs => $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(ShotStatus::Ready.id())
            .bind(ShotStatus::Animating.id())
            .bind(stale_after_secs as f64)
            .fetch_all(pool)
            .await
    }
}
