//! Scene entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cinestudio_core::types::{DbId, Timestamp};

/// A row from the `scenes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scene {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    /// Mood/lighting description injected into every shot's generation prompt.
    pub master_context: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new scene.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScene {
    pub name: String,
    /// Defaults to an empty context if omitted.
    pub master_context: Option<String>,
}

/// DTO for updating an existing scene. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateScene {
    pub name: Option<String>,
    pub master_context: Option<String>,
}
