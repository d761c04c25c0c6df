//! Repository for the `takes` table.
//!
//! Takes are append-only: insert, read, and delete. There is no update.

use sqlx::PgPool;

use cinestudio_core::types::DbId;

use crate::models::take::{CreateTake, PlaylistEntry, Take};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, shot_id, video_path, prompt_used, created_at";

/// Provides append/read/delete operations for takes.
pub struct TakeRepo;

impl TakeRepo {
    /// Append a new take to a shot's ledger, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTake) -> Result<Take, sqlx::Error> {
        let query = format!(
            "INSERT INTO takes (shot_id, video_path, prompt_used)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Take>(&query)
            .bind(input.shot_id)
            .bind(&input.video_path)
            .bind(&input.prompt_used)
            .fetch_one(pool)
            .await
    }

    /// Find a take by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Take>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM takes WHERE id = $1");
        sqlx::query_as::<_, Take>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all takes of a shot, oldest first.
    pub async fn list_by_shot(pool: &PgPool, shot_id: DbId) -> Result<Vec<Take>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM takes WHERE shot_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Take>(&query)
            .bind(shot_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a take by ID. Returns `true` if a row was removed.
    ///
    /// The owning shot's `selected_take_id` is cleared by the
    /// `ON DELETE SET NULL` foreign key; the caller is responsible for
    /// recomputing the shot's status afterwards.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM takes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Build the playable sequence for a scene: the main take of every shot
    /// that has one, in `order_index` order. Shots without a main selection
    /// are skipped, so a partially-produced scene yields a shorter playlist.
    pub async fn playlist(
        pool: &PgPool,
        scene_id: DbId,
    ) -> Result<Vec<PlaylistEntry>, sqlx::Error> {
        sqlx::query_as::<_, PlaylistEntry>(
            "SELECT shots.id AS shot_id, takes.video_path
             FROM shots
             JOIN takes ON takes.id = shots.selected_take_id
             WHERE shots.scene_id = $1
             ORDER BY shots.order_index ASC",
        )
        .bind(scene_id)
        .fetch_all(pool)
        .await
    }
}
