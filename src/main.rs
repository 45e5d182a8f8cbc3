mod blackboard; // latest detector state shared across tasks
mod bus; // broadcast topics
mod config; // settings file + environment overrides
mod detector; // periodic clustering loop and overlay sink
mod source; // entity snapshot providers

use blackboard::{Blackboard, snapshot};
use bus::Topic;
use detector::{Detector, log_sink_exit, overlay_sink};
use hotspot_grid::ClusterReport;
use source::ScatterSource;

use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let settings = config::load_settings(&config_path)?;
    let params = settings.cluster.params()?;

    info!("Hotspot detector starting.");

    let bb: Blackboard = Arc::default();
    let report_topic: Topic<ClusterReport> = Topic::new("clusters", settings.detector.topic_capacity);
    let sink = tokio::spawn(overlay_sink(report_topic.subscribe()));

    let source = ScatterSource::new(settings.source.clone())?;
    info!(blob_centers = ?source.centers(), "Synthetic entity source ready.");
    let detector = Detector::new(source, params, settings.detector.clone(), Arc::clone(&bb), report_topic);

    tokio::select! {
        result = detector.run() => result?,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Ctrl-C received, shutting down."),
                Err(e) => warn!("Failed to listen for Ctrl-C: {}. Shutting down.", e),
            }
        }
    }

    // The detector owned the last sender, so the sink drains and exits.
    log_sink_exit(sink.await?);

    let state = snapshot(&bb);
    info!(
        runs = state.runs,
        skipped = state.skipped,
        last_clusters = state.report.cluster_count(),
        last_dropped = state.report.dropped_points,
        "Hotspot detector stopped."
    );
    Ok(())
}
