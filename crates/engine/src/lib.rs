//! Shot sequencing and take orchestration engine.
//!
//! [`Engine`] owns the control logic over the entity store and the
//! generation gateway: the shot sequencer (ordered, gap-free shot lists),
//! the shot lifecycle state machine, the take ledger, and the bridge/stitch
//! coordinator for compound generation operations. Every mutating operation
//! returns the authoritative post-state so callers never have to guess.

pub mod coordinator;
pub mod jobs;
pub mod ledger;
pub mod lifecycle;
pub mod sequencer;
pub mod sweeper;

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use cinestudio_events::EventBus;
use cinestudio_gateway::GenerationGateway;

use crate::jobs::JobTracker;

/// Tunables for generation dispatch and recovery.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Liveness window for one gateway call; expiry resolves the job as
    /// a timeout failure.
    pub generation_timeout: Duration,
    /// How long a shot may sit in `animating` before the recovery sweep
    /// reverts it to `ready` (covers crashes, not just slow jobs).
    pub stale_after: Duration,
    /// Interval between recovery sweeps.
    pub sweep_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(600),
            stale_after: Duration::from_secs(900),
            sweep_interval: Duration::from_secs(30),
        }
    }
}

/// The orchestration engine. Cheaply cloneable; clones share the pool,
/// gateway, event bus, and in-flight job registry.
#[derive(Clone)]
pub struct Engine {
    pool: PgPool,
    gateway: Arc<dyn GenerationGateway>,
    bus: Arc<EventBus>,
    jobs: Arc<JobTracker>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(
        pool: PgPool,
        gateway: Arc<dyn GenerationGateway>,
        bus: Arc<EventBus>,
        config: EngineConfig,
    ) -> Self {
        Self {
            pool,
            gateway,
            bus,
            jobs: Arc::new(JobTracker::default()),
            config,
        }
    }

    /// The shared database pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// The shared event bus.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}
