//! Shot entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cinestudio_core::lifecycle::{ShotStatus, StatusId};
use cinestudio_core::types::{DbId, Timestamp};
use cinestudio_core::CoreError;

/// A row from the `shots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shot {
    pub id: DbId,
    pub scene_id: DbId,
    /// Dense, zero-based position within the scene.
    pub order_index: i32,
    pub prompt: String,
    pub keyframe_path: Option<String>,
    /// The take currently designated "main", if any.
    pub selected_take_id: Option<DbId>,
    pub status_id: StatusId,
    /// Failure reason recorded by the last unsuccessful generation job.
    pub error_reason: Option<String>,
    /// Set while a generation job is in flight; drives stale-shot recovery.
    pub animating_since: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Shot {
    /// Decode the stored status ID into the lifecycle enum.
    ///
    /// An unknown ID means the row was written outside the engine and is
    /// reported as a consistency violation.
    pub fn status(&self) -> Result<ShotStatus, CoreError> {
        ShotStatus::from_id(self.status_id).ok_or_else(|| {
            CoreError::ConsistencyViolation(format!(
                "shot {} has unknown status_id {}",
                self.id, self.status_id
            ))
        })
    }
}

/// DTO for creating a new shot at the end of a scene's sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShot {
    /// Defaults to an empty prompt (later seeded from the scene context).
    pub prompt: Option<String>,
}

/// DTO for updating a shot's authored fields. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateShot {
    pub prompt: Option<String>,
}
