use crate::model::{Coordinate, Notification, Report, RouteProfile, RouteResult, TeamId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing shared by the sync loop and the routing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub poll_interval_ms: u64,
    pub position_timeout_ms: u64,
    pub directions_timeout_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10_000,
            position_timeout_ms: 15_000,
            directions_timeout_ms: 15_000,
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn position_timeout(&self) -> Duration {
        Duration::from_millis(self.position_timeout_ms.max(1))
    }

    pub fn directions_timeout(&self) -> Duration {
        Duration::from_millis(self.directions_timeout_ms.max(1))
    }
}

/// Failure kinds raised at the edge of each operation.
///
/// None of these escape the loop or the session: callers convert them into
/// "no state change this cycle" and log them.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),
    #[error("report fetch failed: {0}")]
    ReportFetch(String),
    #[error("notification fetch failed: {0}")]
    NotificationFetch(String),
    #[error("routing unavailable: {0}")]
    RoutingUnavailable(String),
    #[error("location sink rejected update: {0}")]
    LocationSink(String),
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

pub type SyncResult<T> = Result<T, SyncError>;

/// Device geolocation at the best available accuracy. No internal retries.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn acquire(&self) -> SyncResult<Coordinate>;
}

/// Confirmed field reports, emergencies ahead of complaints.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn fetch_confirmed(&self) -> SyncResult<Vec<Report>>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn fetch_for(&self, team: &TeamId) -> SyncResult<Vec<Notification>>;
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        profile: RouteProfile,
    ) -> SyncResult<RouteResult>;
}

/// Upstream "update location" endpoint. Writes are fire-and-forget.
#[async_trait]
pub trait LocationSink: Send + Sync {
    async fn update_location(&self, team: &TeamId, position: Coordinate) -> SyncResult<()>;
}

/// Login collaborator owning the team identity.
pub trait TeamIdentity: Send + Sync {
    fn team_id(&self) -> TeamId;
    fn logout(&self);
}
