//! Scripted collaborators shared by the engine tests.

use crate::model::{Coordinate, Notification, Report, ReportKind, RouteProfile, RouteResult, TeamId};
use crate::prelude::{
    DirectionsProvider, LocationSink, NotificationStore, PositionSource, ReportStore, SyncError,
    SyncResult, TeamIdentity,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

pub(crate) fn point(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new(latitude, longitude).unwrap()
}

pub(crate) fn report_at(id: &str, latitude: f64, longitude: f64) -> Report {
    Report {
        id: id.into(),
        name: format!("reporter {}", id),
        address: "1 Main St".into(),
        kind: ReportKind::Complaint,
        category: "Pothole".into(),
        location: point(latitude, longitude),
        media_url: None,
    }
}

/// Hands out queued values, then the fallback forever.
pub(crate) struct Script<T: Clone> {
    queue: Mutex<VecDeque<T>>,
    fallback: T,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    pub(crate) fn new(queue: Vec<T>, fallback: T) -> Self {
        Self {
            queue: Mutex::new(queue.into()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn next(&self) -> T {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub(crate) struct ScriptedPosition(pub(crate) Script<SyncResult<Coordinate>>);

impl ScriptedPosition {
    pub(crate) fn always(position: Coordinate) -> Self {
        Self(Script::new(Vec::new(), Ok(position)))
    }

    pub(crate) fn unavailable() -> Self {
        Self(Script::new(
            Vec::new(),
            Err(SyncError::LocationUnavailable("permission denied".into())),
        ))
    }
}

#[async_trait]
impl PositionSource for ScriptedPosition {
    async fn acquire(&self) -> SyncResult<Coordinate> {
        self.0.next()
    }
}

/// Never resolves; exercises the acquisition timeout.
pub(crate) struct StalledPosition;

#[async_trait]
impl PositionSource for StalledPosition {
    async fn acquire(&self) -> SyncResult<Coordinate> {
        std::future::pending::<SyncResult<Coordinate>>().await
    }
}

pub(crate) struct ScriptedReports(pub(crate) Script<SyncResult<Vec<Report>>>);

impl ScriptedReports {
    pub(crate) fn sequence(batches: Vec<SyncResult<Vec<Report>>>) -> Self {
        Self(Script::new(
            batches,
            Err(SyncError::ReportFetch("backend offline".into())),
        ))
    }

    pub(crate) fn always(reports: Vec<Report>) -> Self {
        Self(Script::new(Vec::new(), Ok(reports)))
    }
}

#[async_trait]
impl ReportStore for ScriptedReports {
    async fn fetch_confirmed(&self) -> SyncResult<Vec<Report>> {
        self.0.next()
    }
}

pub(crate) struct FixedNotifications(pub(crate) SyncResult<Vec<Notification>>);

#[async_trait]
impl NotificationStore for FixedNotifications {
    async fn fetch_for(&self, _team: &TeamId) -> SyncResult<Vec<Notification>> {
        self.0.clone()
    }
}

/// Reports every sink call over a channel so tests can await detached writes.
pub(crate) struct RecordingSink {
    tx: mpsc::UnboundedSender<(TeamId, Coordinate)>,
    fail: bool,
}

impl RecordingSink {
    pub(crate) fn new(fail: bool) -> (Self, mpsc::UnboundedReceiver<(TeamId, Coordinate)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, fail }, rx)
    }
}

#[async_trait]
impl LocationSink for RecordingSink {
    async fn update_location(&self, team: &TeamId, position: Coordinate) -> SyncResult<()> {
        let _ = self.tx.send((team.clone(), position));
        if self.fail {
            Err(SyncError::LocationSink("503 Service Unavailable".into()))
        } else {
            Ok(())
        }
    }
}

/// Each call sleeps for the scripted delay, then yields the scripted result.
pub(crate) struct DelayedDirections(pub(crate) Script<(Duration, SyncResult<RouteResult>)>);

impl DelayedDirections {
    pub(crate) fn sequence(responses: Vec<(Duration, SyncResult<RouteResult>)>) -> Self {
        Self(Script::new(
            responses,
            (
                Duration::ZERO,
                Err(SyncError::RoutingUnavailable("no routes returned".into())),
            ),
        ))
    }
}

#[async_trait]
impl DirectionsProvider for DelayedDirections {
    async fn route(
        &self,
        _from: Coordinate,
        _to: Coordinate,
        _profile: RouteProfile,
    ) -> SyncResult<RouteResult> {
        let (delay, result) = self.0.next();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

pub(crate) struct StaticIdentity {
    team: TeamId,
    logged_out: AtomicBool,
}

impl StaticIdentity {
    pub(crate) fn new(team: &str) -> Self {
        Self {
            team: TeamId::new(team),
            logged_out: AtomicBool::new(false),
        }
    }

    pub(crate) fn logged_out(&self) -> bool {
        self.logged_out.load(Ordering::SeqCst)
    }
}

impl TeamIdentity for StaticIdentity {
    fn team_id(&self) -> TeamId {
        self.team.clone()
    }

    fn logout(&self) {
        self.logged_out.store(true, Ordering::SeqCst);
    }
}
