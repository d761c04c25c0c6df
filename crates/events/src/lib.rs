//! Studio event bus.
//!
//! In-process publish/subscribe hub the engine uses to notify the
//! presentation layer of shot and take changes (generation started,
//! completed, failed; ordering changed; takes selected or deleted).

pub mod bus;

pub use bus::{EventBus, StudioEvent};
