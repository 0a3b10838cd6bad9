use crate::generator::position::SimulatedPosition;
use crate::workflow::config::DashboardConfig;
use crate::workflow::identity::StaticIdentity;
use anyhow::Context;
use fieldcore::engine::{SyncLoop, SyncSources, TickOutcome};
use fieldcore::remote::{HttpBackend, HttpDirections};
use fieldcore::telemetry::MetricsRecorder;
use fieldcore::{DashboardSession, SessionServices, TeamId, ViewHandle, ViewModel};
use log::warn;
use std::sync::Arc;

pub struct OnceResult {
    pub outcome: TickOutcome,
    pub view: ViewModel,
}

#[derive(Clone)]
pub struct Runner {
    config: DashboardConfig,
}

impl Runner {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn services(&self) -> anyhow::Result<SessionServices> {
        let timeout = self.config.request_timeout();
        let backend = Arc::new(
            HttpBackend::new(&self.config.api_base, timeout).context("creating backend client")?,
        );

        let key = self.config.directions_key();
        if key.is_empty() {
            warn!("no directions key configured; route requests will be rejected upstream");
        }
        let directions = Arc::new(
            HttpDirections::new(&self.config.directions_url, key, timeout)
                .context("creating directions client")?,
        );
        let position = Arc::new(
            SimulatedPosition::new(&self.config.position)
                .context("creating position source")?,
        );

        Ok(SessionServices {
            position,
            reports: backend.clone(),
            notifications: backend.clone(),
            directions,
            sink: backend,
        })
    }

    pub async fn start_session(&self) -> anyhow::Result<DashboardSession> {
        let identity = Arc::new(StaticIdentity::new(TeamId::new(self.config.team_id.clone())));
        let services = self.services()?;
        Ok(DashboardSession::start(identity, services, self.config.sync.clone()).await)
    }

    /// A single poll tick outside any long-lived session.
    pub async fn run_once(&self) -> anyhow::Result<OnceResult> {
        let services = self.services()?;
        let view = ViewHandle::new();
        let mut sync = SyncLoop::new(
            SyncSources {
                position: services.position,
                reports: services.reports,
                sink: services.sink,
            },
            TeamId::new(self.config.team_id.clone()),
            self.config.sync.clone(),
            view.clone(),
            Arc::new(MetricsRecorder::new()),
        );
        let outcome = sync.tick().await;
        Ok(OnceResult {
            outcome,
            view: view.snapshot(),
        })
    }
}
