//! Stale-shot recovery sweep.
//!
//! A generation job lives only as a spawned task; if the process dies or a
//! task is lost, its shot would sit in `animating` forever. The sweeper
//! periodically reverts shots whose `animating_since` exceeds the configured
//! staleness window back to `ready` and announces the recovery.

use tokio_util::sync::CancellationToken;

use cinestudio_db::repositories::ShotRepo;
use cinestudio_events::StudioEvent;

use crate::Engine;

impl Engine {
    /// Run the recovery sweep loop until `shutdown` is triggered.
    ///
    /// Intended to be spawned once at startup next to the server task.
    pub async fn run_sweeper(&self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.sweep_interval);
        // The first tick fires immediately; recover leftovers from a
        // previous process right away.
        tracing::info!(
            interval_secs = self.config.sweep_interval.as_secs(),
            stale_after_secs = self.config.stale_after.as_secs(),
            "Stale-shot sweeper started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Stale-shot sweeper stopping");
                    return;
                }
                _ = ticker.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// One recovery pass; errors are logged, never fatal to the loop.
    pub async fn sweep_once(&self) {
        let stale_after_secs = self.config.stale_after.as_secs() as i64;
        match ShotRepo::sweep_stale_animating(&self.pool, stale_after_secs).await {
            Ok(recovered) if recovered.is_empty() => {}
            Ok(recovered) => {
                tracing::warn!(count = recovered.len(), "Recovered stale animating shots");
                for shot in recovered {
                    self.jobs.finish(shot.id);
                    self.bus.publish(
                        StudioEvent::new("shot.generation_recovered").with_entity("shot", shot.id),
                    );
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "Stale-shot sweep failed");
            }
        }
    }
}
