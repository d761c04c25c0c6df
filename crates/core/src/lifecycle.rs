//! Shot lifecycle state machine.
//!
//! A shot moves `pending -> ready -> animating -> complete`, with an explicit
//! `error` state entered when a generation job fails. The transition rules
//! here are pure; the engine applies them against the store, and the
//! `animating` claim itself is enforced atomically at the SQL layer.

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Lifecycle status of a single shot.
///
/// Discriminants match the seed order of the `shot_statuses` lookup table.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotStatus {
    /// No keyframe assigned yet.
    Pending = 1,
    /// Keyframe assigned, no main take selected.
    Ready = 2,
    /// A generation job is in flight for this shot.
    Animating = 3,
    /// At least one take exists and is selected as main.
    Complete = 4,
    /// The last generation job failed; keyframe and prompt are preserved.
    Error = 5,
}

impl ShotStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Map a database status ID back to a status, if known.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Pending),
            2 => Some(Self::Ready),
            3 => Some(Self::Animating),
            4 => Some(Self::Complete),
            5 => Some(Self::Error),
            _ => None,
        }
    }

    /// Lowercase wire name, e.g. `"animating"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Animating => "animating",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

impl From<ShotStatus> for StatusId {
    fn from(value: ShotStatus) -> Self {
        value as StatusId
    }
}

/// Check that a keyframe may be (re)assigned in the current status.
///
/// Legal from every state except `animating` — swapping the seed image under
/// an in-flight job would make the resulting take unattributable.
pub fn validate_assign_keyframe(status: ShotStatus) -> Result<(), CoreError> {
    if status == ShotStatus::Animating {
        return Err(CoreError::PreconditionFailed(
            "cannot assign a keyframe while a generation job is in flight".to_string(),
        ));
    }
    Ok(())
}

/// Check the preconditions for starting a generation job.
///
/// Legal from `ready`, `error` (retry), and `complete` (an alternate take for
/// a finished shot); always requires a keyframe. `animating` is rejected here
/// as the re-entrancy guard; the engine still claims the status atomically in
/// SQL so two racing calls cannot both pass.
pub fn validate_begin_generation(
    status: ShotStatus,
    has_keyframe: bool,
) -> Result<(), CoreError> {
    if !has_keyframe {
        return Err(CoreError::PreconditionFailed(
            "shot has no keyframe to animate".to_string(),
        ));
    }
    match status {
        ShotStatus::Ready | ShotStatus::Error | ShotStatus::Complete => Ok(()),
        ShotStatus::Animating => Err(CoreError::PreconditionFailed(
            "a generation job is already in flight for this shot".to_string(),
        )),
        ShotStatus::Pending => Err(CoreError::PreconditionFailed(
            "shot has no keyframe to animate".to_string(),
        )),
    }
}

/// Recompute a shot's status from its observable fields.
///
/// `complete` iff a main take is selected, otherwise `ready` when a keyframe
/// exists, otherwise `pending`. Used after take deletion, keyframe
/// assignment, and stale-job recovery; never yields `animating` or `error`.
pub fn recompute_status(has_keyframe: bool, has_main_take: bool) -> ShotStatus {
    if has_main_take {
        ShotStatus::Complete
    } else if has_keyframe {
        ShotStatus::Ready
    } else {
        ShotStatus::Pending
    }
}
