use hotspot_grid::ClusterReport;
use parking_lot::RwLock;
use std::{sync::Arc, time::Instant};

/// Latest detector state, readable from any task.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Report from the most recent completed run.
    pub report: Arc<ClusterReport>,
    /// Completed clustering runs.
    pub runs: u64,
    /// Ticks skipped because the detector was disabled.
    pub skipped: u64,
    pub last_run_ts: Option<Instant>,
}

pub type Blackboard = Arc<RwLock<State>>;

pub fn snapshot(bb: &Blackboard) -> State {
    (*bb.read()).clone()
}

pub fn record_report(bb: &Blackboard, report: Arc<ClusterReport>) {
    let mut g = bb.write();
    g.report = report;
    g.runs += 1;
    g.last_run_ts = Some(Instant::now());
}

pub fn record_skip(bb: &Blackboard) {
    bb.write().skipped += 1;
}
