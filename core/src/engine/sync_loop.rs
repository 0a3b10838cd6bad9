use crate::engine::state::ViewHandle;
use crate::model::{Coordinate, TeamId};
use crate::prelude::{LocationSink, PositionSource, ReportStore, SyncConfig, SyncError, SyncResult};
use crate::telemetry::{LogManager, MetricsRecorder, SyncEvent};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Collaborators polled on every tick.
#[derive(Clone)]
pub struct SyncSources {
    pub position: Arc<dyn PositionSource>,
    pub reports: Arc<dyn ReportStore>,
    pub sink: Arc<dyn LocationSink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Polling,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Success,
    PartialFailure(Vec<SyncError>),
}

/// Periodic refresh of `position` and `reports`.
///
/// A tick acquires the position first and fetches reports second; a failed
/// fix never skips the report fetch. Failures are logged and the next tick
/// runs on schedule.
pub struct SyncLoop {
    sources: SyncSources,
    team: TeamId,
    config: SyncConfig,
    view: ViewHandle,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
    state: SyncState,
}

impl SyncLoop {
    pub fn new(
        sources: SyncSources,
        team: TeamId,
        config: SyncConfig,
        view: ViewHandle,
        metrics: Arc<MetricsRecorder>,
    ) -> Self {
        Self {
            sources,
            team,
            config,
            view,
            metrics,
            logger: LogManager::new("fieldcore::sync"),
            state: SyncState::Idle,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub async fn tick(&mut self) -> TickOutcome {
        self.state = SyncState::Polling;
        self.metrics.record(SyncEvent::Tick);
        self.logger.trace_state("idle -> polling");
        let mut failures = Vec::new();

        match self.acquire_position().await {
            Ok(position) => {
                if self.view.update(|vm| vm.set_position(position)) {
                    self.forward_location(position);
                } else {
                    self.metrics.record(SyncEvent::Discarded);
                }
            }
            Err(err) => {
                self.metrics.record(SyncEvent::PositionFailure);
                self.logger
                    .failure(&format!("position acquisition failed: {}", err));
                failures.push(err);
            }
        }

        match self.sources.reports.fetch_confirmed().await {
            Ok(reports) => {
                let count = reports.len();
                if self.view.update(|vm| vm.replace_reports(reports)) {
                    self.logger
                        .trace_state(&format!("reports replaced ({} entries)", count));
                } else {
                    self.metrics.record(SyncEvent::Discarded);
                }
            }
            Err(err) => {
                self.metrics.record(SyncEvent::ReportFailure);
                self.logger.failure(&format!("report fetch failed: {}", err));
                failures.push(err);
            }
        }

        self.state = SyncState::Idle;
        if failures.is_empty() {
            TickOutcome::Success
        } else {
            self.logger.trace_state(&format!(
                "polling -> idle with {} failure(s)",
                failures.len()
            ));
            TickOutcome::PartialFailure(failures)
        }
    }

    /// Starts the fixed-period timer. The first tick fires immediately.
    pub fn spawn(self) -> SyncHandle {
        let cancel = self.view.session_token().child_token();
        let task = tokio::spawn(self.run(cancel.clone()));
        SyncHandle { cancel, task }
    }

    async fn run(mut self, cancel: CancellationToken) {
        let mut ticker = interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.logger.record(&format!(
            "sync loop started for team {} every {:?}",
            self.team,
            self.config.poll_interval()
        ));

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let finished = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                outcome = self.tick() => Some(outcome),
            };
            if finished.is_none() {
                break;
            }
        }

        self.logger.record("sync loop stopped");
    }

    async fn acquire_position(&self) -> SyncResult<Coordinate> {
        let limit = self.config.position_timeout();
        match timeout(limit, self.sources.position.acquire()).await {
            Ok(result) => result,
            Err(_) => Err(SyncError::LocationUnavailable(format!(
                "no fix within {:?}",
                limit
            ))),
        }
    }

    /// Detached write; its outcome is logged and never awaited.
    fn forward_location(&self, position: Coordinate) {
        let sink = Arc::clone(&self.sources.sink);
        let team = self.team.clone();
        let metrics = Arc::clone(&self.metrics);
        let logger = self.logger;
        tokio::spawn(async move {
            if let Err(err) = sink.update_location(&team, position).await {
                metrics.record(SyncEvent::SinkFailure);
                logger.failure(&format!("location update for team {} failed: {}", team, err));
            }
        });
    }
}

/// Cancellable handle to a running sync loop.
pub struct SyncHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SyncHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the timer and waits for the loop task to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            LogManager::new("fieldcore::sync").failure(&format!("sync loop task failed: {}", err));
        }
    }
}
