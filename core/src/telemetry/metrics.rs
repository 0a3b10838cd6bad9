use serde::Serialize;
use std::sync::Mutex;

/// Events counted across the sync loop and routing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    Tick,
    PositionFailure,
    ReportFailure,
    SinkFailure,
    RouteApplied,
    RouteFailure,
    Discarded,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub ticks: usize,
    pub position_failures: usize,
    pub report_failures: usize,
    pub sink_failures: usize,
    pub routes_applied: usize,
    pub route_failures: usize,
    pub discarded: usize,
}

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record(&self, event: SyncEvent) {
        if let Ok(mut metrics) = self.inner.lock() {
            let counter = match event {
                SyncEvent::Tick => &mut metrics.ticks,
                SyncEvent::PositionFailure => &mut metrics.position_failures,
                SyncEvent::ReportFailure => &mut metrics.report_failures,
                SyncEvent::SinkFailure => &mut metrics.sink_failures,
                SyncEvent::RouteApplied => &mut metrics.routes_applied,
                SyncEvent::RouteFailure => &mut metrics.route_failures,
                SyncEvent::Discarded => &mut metrics.discarded,
            };
            *counter += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
