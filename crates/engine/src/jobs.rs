//! In-flight generation job registry.
//!
//! A generation job is ephemeral: it exists as a spawned task from the
//! moment a request is accepted until its result is applied to the store.
//! The tracker maps each target shot to the job's [`CancellationToken`] so
//! callers can cancel, and doubles as an in-process re-entrancy backstop
//! behind the authoritative SQL status claim.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

use cinestudio_core::types::DbId;
use cinestudio_core::CoreError;

/// Registry of in-flight jobs keyed by target shot.
#[derive(Default)]
pub struct JobTracker {
    active: Mutex<HashMap<DbId, CancellationToken>>,
}

impl JobTracker {
    /// Register a job for `shot_id`, returning its cancellation token.
    ///
    /// Fails with `PreconditionFailed` if a job is already registered. The
    /// SQL claim makes this unreachable in practice; it stays as a guard
    /// against engine bugs.
    pub fn register(&self, shot_id: DbId) -> Result<CancellationToken, CoreError> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if active.contains_key(&shot_id) {
            return Err(CoreError::PreconditionFailed(format!(
                "a generation job is already in flight for shot {shot_id}"
            )));
        }
        let token = CancellationToken::new();
        active.insert(shot_id, token.clone());
        Ok(token)
    }

    /// Drop the registration for `shot_id` once its result has been applied.
    pub fn finish(&self, shot_id: DbId) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.remove(&shot_id);
    }

    /// Trigger cancellation of the job for `shot_id`, if one is in flight.
    ///
    /// Returns `true` if a token was signalled. The job's task observes the
    /// token and resolves the shot to `error` with reason `Cancelled`.
    pub fn cancel(&self, shot_id: DbId) -> bool {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        match active.get(&shot_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Number of jobs currently in flight.
    pub fn active_count(&self) -> usize {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.len()
    }
}
