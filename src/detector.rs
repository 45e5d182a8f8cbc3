use std::sync::Arc;

use hotspot_grid::{ClusterParams, ClusterReport, cluster_with_report};
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::blackboard::{Blackboard, record_report, record_skip};
use crate::bus::Topic;
use crate::config::DetectorSettings;
use crate::source::PointSource;

/// Periodic clustering loop: sample, cluster, publish.
///
/// Runs are strictly serial; a tick that fires while a run is still in
/// progress is skipped rather than queued.
pub struct Detector<S> {
    source: S,
    params: ClusterParams,
    settings: DetectorSettings,
    bb: Blackboard,
    topic: Topic<ClusterReport>,
}

impl<S: PointSource> Detector<S> {
    pub fn new(
        source: S,
        params: ClusterParams,
        settings: DetectorSettings,
        bb: Blackboard,
        topic: Topic<ClusterReport>,
    ) -> Self {
        Self { source, params, settings, bb, topic }
    }

    /// One detector tick: sample a fresh snapshot and cluster it.
    pub fn run_once(&mut self) -> Arc<ClusterReport> {
        let entities = self.source.sample();
        let report = Arc::new(cluster_with_report(&entities, &self.params));

        if report.dropped_points > 0 {
            debug!(dropped = report.dropped_points, "Entities without a position were skipped");
        }

        record_report(&self.bb, Arc::clone(&report));
        let delivered = self.topic.publish(Arc::clone(&report));
        debug!(
            clusters = report.cluster_count(),
            entities = entities.len(),
            delivered,
            "Detector tick complete"
        );
        report
    }

    /// Ticks until `max_ticks` is reached, or forever when it is 0.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!(
            cell_size = self.params.cell_size(),
            threshold = self.params.threshold(),
            interval_ms = self.settings.update_interval_ms,
            enabled = self.settings.enabled,
            subscribers = self.topic.subscriber_count(),
            "Detector task started."
        );

        let mut ticker = time::interval(self.settings.update_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks: u64 = 0;

        loop {
            ticker.tick().await;
            ticks += 1;

            if self.settings.enabled {
                self.run_once();
            } else {
                record_skip(&self.bb);
            }

            if self.settings.max_ticks > 0 && ticks >= self.settings.max_ticks {
                info!(ticks, "Detector reached its tick limit.");
                return Ok(());
            }
        }
    }
}

/// Consumes published reports and logs them.
///
/// This is where a renderer would project each box to screen space; here the
/// reports are only logged. Returns once the topic's sender is gone.
pub async fn overlay_sink(mut report_rx: broadcast::Receiver<Arc<ClusterReport>>) -> anyhow::Result<()> {
    info!("Overlay sink started.");
    let mut last_count = None;

    loop {
        match report_rx.recv().await {
            Ok(report) => {
                let count = report.cluster_count();
                if last_count != Some(count) {
                    info!(active_clusters = count, "Active cluster count changed");
                    last_count = Some(count);
                }
                for (i, bounds) in report.clusters.iter().enumerate() {
                    debug!(
                        cluster = i,
                        min_x = bounds.min_x,
                        min_y = bounds.min_y,
                        max_x = bounds.max_x,
                        max_y = bounds.max_y,
                        total_count = bounds.total_count,
                        "Cluster"
                    );
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                // Only the newest report matters for an overlay.
                warn!("Overlay sink lagged by {} reports.", n);
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!("Report topic closed. Overlay sink exiting.");
                return Ok(());
            }
        }
    }
}

/// Logs the outcome of a finished sink task.
pub fn log_sink_exit(result: anyhow::Result<()>) {
    if let Err(e) = result {
        error!("Overlay sink failed: {:?}", e);
    }
}
