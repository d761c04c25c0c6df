//! Repository for the `scenes` table.

use sqlx::PgPool;

use cinestudio_core::types::DbId;

use crate::models::scene::{CreateScene, Scene, UpdateScene};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, master_context, created_at, updated_at";

/// Provides CRUD operations for scenes.
pub struct SceneRepo;

impl SceneRepo {
    /// Insert a new scene for a project, returning the created row.
    ///
    /// If `master_context` is `None`, defaults to an empty string.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateScene,
    ) -> Result<Scene, sqlx::Error> {
        let query = format!(
            "INSERT INTO scenes (project_id, name, master_context)
             VALUES ($1, $2, COALESCE($3, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.master_context)
            .fetch_one(pool)
            .await
    }

    /// Find a scene by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scenes WHERE id = $1");
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all scenes for a project, oldest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenes WHERE project_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a scene. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScene,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!(
            "UPDATE scenes SET
                name = COALESCE($2, name),
                master_context = COALESCE($3, master_context),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.master_context)
            .fetch_optional(pool)
            .await
    }

    /// Delete a scene by ID. Cascades to its shots and their takes.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scenes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
