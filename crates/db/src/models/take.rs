//! Take entity model and DTOs.
//!
//! Takes are immutable once created; there is deliberately no update DTO.
//! The "main" designation lives on the owning shot (`selected_take_id`).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cinestudio_core::types::{DbId, Timestamp};

/// A row from the `takes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Take {
    pub id: DbId,
    pub shot_id: DbId,
    pub video_path: String,
    /// The exact prompt submitted to the generation backend for this take.
    pub prompt_used: String,
    pub created_at: Timestamp,
}

/// DTO for recording a new take.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTake {
    pub shot_id: DbId,
    pub video_path: String,
    pub prompt_used: String,
}

/// One entry of a scene playlist: the main take of a shot, in order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlaylistEntry {
    pub shot_id: DbId,
    pub video_path: String,
}
