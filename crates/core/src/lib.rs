//! Pure domain logic for the shot sequencing and take orchestration engine.
//!
//! Everything in this crate is synchronous and side-effect free: lifecycle
//! transition rules, permutation validation for shot reordering, generation
//! job payload variants, and prompt direction helpers. Persistence lives in
//! `cinestudio-db`, orchestration in `cinestudio-engine`.

pub mod director;
pub mod error;
pub mod job;
pub mod lifecycle;
pub mod sequencing;
pub mod types;

pub use error::{CoreError, GatewayFailure};
pub use lifecycle::ShotStatus;
