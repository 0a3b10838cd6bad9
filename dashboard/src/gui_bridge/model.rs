use fieldcore::telemetry::MetricsSnapshot;
use fieldcore::{DashboardSession, ViewModel};
use serde::Serialize;

/// JSON document served to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPayload {
    pub team: String,
    pub active: bool,
    pub notification_badge: usize,
    pub view: ViewModel,
    pub metrics: MetricsSnapshot,
}

impl DashboardPayload {
    pub fn from_session(session: &DashboardSession) -> Self {
        let view = session.snapshot();
        Self {
            team: session.team().to_string(),
            active: session.is_active(),
            notification_badge: view.notifications().len(),
            view,
            metrics: session.metrics(),
        }
    }
}
