use crate::engine::routing::{RouteOutcome, RoutingSession};
use crate::engine::state::ViewHandle;
use crate::engine::sync_loop::{SyncHandle, SyncLoop, SyncSources};
use crate::model::{TeamId, ViewModel};
use crate::prelude::{
    DirectionsProvider, LocationSink, NotificationStore, PositionSource, ReportStore, SyncConfig,
    TeamIdentity,
};
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;

/// Everything a dashboard session talks to.
#[derive(Clone)]
pub struct SessionServices {
    pub position: Arc<dyn PositionSource>,
    pub reports: Arc<dyn ReportStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub directions: Arc<dyn DirectionsProvider>,
    pub sink: Arc<dyn LocationSink>,
}

/// One team login: owns the view model, the sync loop and routing.
///
/// Ending the session (explicitly or by drop) seals the view model so late
/// ticks and in-flight route requests cannot mutate it.
pub struct DashboardSession {
    identity: Arc<dyn TeamIdentity>,
    team: TeamId,
    view: ViewHandle,
    routing: RoutingSession,
    sync: Mutex<Option<SyncHandle>>,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl DashboardSession {
    /// Starts polling, then loads notifications once.
    pub async fn start(
        identity: Arc<dyn TeamIdentity>,
        services: SessionServices,
        config: SyncConfig,
    ) -> Self {
        let logger = LogManager::new("fieldcore::session");
        let team = identity.team_id();
        let view = ViewHandle::new();
        let metrics = Arc::new(MetricsRecorder::new());

        let sync = SyncLoop::new(
            SyncSources {
                position: services.position,
                reports: services.reports,
                sink: services.sink,
            },
            team.clone(),
            config.clone(),
            view.clone(),
            metrics.clone(),
        )
        .spawn();
        let routing = RoutingSession::new(services.directions, view.clone(), config, metrics.clone());

        match services.notifications.fetch_for(&team).await {
            Ok(notifications) => {
                let count = notifications.len();
                view.update(|vm| vm.set_notifications(notifications));
                logger.record(&format!("team {}: {} notification(s)", team, count));
            }
            Err(err) => logger.failure(&format!("team {}: {}", team, err)),
        }

        Self {
            identity,
            team,
            view,
            routing,
            sync: Mutex::new(Some(sync)),
            metrics,
            logger,
        }
    }

    pub fn team(&self) -> &TeamId {
        &self.team
    }

    pub fn view(&self) -> &ViewHandle {
        &self.view
    }

    pub fn snapshot(&self) -> ViewModel {
        self.view.snapshot()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn is_active(&self) -> bool {
        self.view.is_active()
    }

    pub async fn request_directions(&self, index: usize) -> RouteOutcome {
        self.routing.request(index).await
    }

    pub fn spawn_directions(&self, index: usize) -> JoinHandle<RouteOutcome> {
        self.routing.spawn_request(index)
    }

    pub fn open_notifications(&self) {
        self.view.update(|vm| vm.open_notifications());
    }

    pub fn close_notifications(&self) {
        self.view.update(|vm| vm.close_notifications());
    }

    /// Empties the list and closes the notification view.
    pub fn clear_notifications(&self) {
        self.view.update(|vm| vm.clear_notifications());
    }

    /// Seals the view model and waits for the sync loop to exit.
    pub async fn end(&self) {
        self.view.seal();
        let sync = self
            .sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sync) = sync {
            sync.stop().await;
            self.logger.record(&format!("team {}: session ended", self.team));
        }
    }

    pub async fn logout(&self) {
        self.end().await;
        self.identity.logout();
    }
}

impl Drop for DashboardSession {
    fn drop(&mut self) {
        self.view.seal();
    }
}
