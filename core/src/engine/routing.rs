use crate::engine::state::ViewHandle;
use crate::model::{RouteDetails, RouteProfile};
use crate::prelude::{DirectionsProvider, SyncConfig, SyncError};
use crate::telemetry::{LogManager, MetricsRecorder, SyncEvent};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// What a single directions request did to the view model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteOutcome {
    Applied { index: usize, details: RouteDetails },
    /// No fix yet; nothing was requested.
    NoPosition,
    UnknownReport { index: usize },
    Failed { reason: String },
    /// The session ended while the request was in flight.
    Discarded,
}

/// On-demand routing from the team position to one report.
///
/// Requests may overlap; whichever completes last owns the drawn polyline.
#[derive(Clone)]
pub struct RoutingSession {
    provider: Arc<dyn DirectionsProvider>,
    view: ViewHandle,
    config: SyncConfig,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl RoutingSession {
    pub fn new(
        provider: Arc<dyn DirectionsProvider>,
        view: ViewHandle,
        config: SyncConfig,
        metrics: Arc<MetricsRecorder>,
    ) -> Self {
        Self {
            provider,
            view,
            config,
            metrics,
            logger: LogManager::new("fieldcore::routing"),
        }
    }

    pub async fn request(&self, index: usize) -> RouteOutcome {
        let Some(from) = self.view.position() else {
            self.logger
                .trace_state(&format!("directions to #{} skipped: no fix", index));
            return RouteOutcome::NoPosition;
        };
        let Some(to) = self.view.report_location(index) else {
            self.logger
                .trace_state(&format!("directions to #{} skipped: no such report", index));
            return RouteOutcome::UnknownReport { index };
        };

        let limit = self.config.directions_timeout();
        let result = match timeout(limit, self.provider.route(from, to, RouteProfile::Driving)).await
        {
            Ok(result) => result,
            Err(_) => Err(SyncError::RoutingUnavailable(format!(
                "no route within {:?}",
                limit
            ))),
        };

        let route = match result {
            Ok(route) => route,
            Err(err) => {
                self.metrics.record(SyncEvent::RouteFailure);
                self.logger
                    .failure(&format!("directions to #{} failed: {}", index, err));
                return RouteOutcome::Failed {
                    reason: err.to_string(),
                };
            }
        };

        let details = route.details();
        if self.view.update(|vm| vm.apply_route(index, route)) {
            self.metrics.record(SyncEvent::RouteApplied);
            self.logger.record(&format!(
                "route to #{}: {:.2} km, {} min",
                index, details.distance_km, details.duration_minutes
            ));
            RouteOutcome::Applied { index, details }
        } else {
            self.metrics.record(SyncEvent::Discarded);
            RouteOutcome::Discarded
        }
    }

    /// Runs the request as its own task; earlier in-flight requests are not
    /// cancelled.
    pub fn spawn_request(&self, index: usize) -> JoinHandle<RouteOutcome> {
        let session = self.clone();
        tokio::spawn(async move { session.request(index).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RouteResult, ViewModel};
    use crate::testing::{point, report_at, DelayedDirections};
    use std::time::Duration;

    fn routing(
        directions: DelayedDirections,
        config: SyncConfig,
    ) -> (RoutingSession, ViewHandle, Arc<DelayedDirections>) {
        let view = ViewHandle::new();
        let directions = Arc::new(directions);
        let session = RoutingSession::new(
            directions.clone(),
            view.clone(),
            config,
            Arc::new(MetricsRecorder::new()),
        );
        (session, view, directions)
    }

    fn seeded(view: &ViewHandle) {
        view.update(|vm| {
            vm.set_position(point(1.0, 2.0));
            vm.replace_reports(vec![report_at("a", 1.0, 2.1), report_at("b", 1.2, 2.2)]);
        });
    }

    fn route(points: Vec<(f64, f64)>, meters: f64, seconds: f64) -> RouteResult {
        RouteResult::from_provider_units(
            points.into_iter().map(|(lat, lng)| point(lat, lng)).collect(),
            meters,
            seconds,
        )
    }

    #[tokio::test]
    async fn request_without_fix_leaves_view_untouched() {
        let (session, view, directions) = routing(
            DelayedDirections::sequence(vec![(Duration::ZERO, Ok(route(vec![], 1.0, 1.0)))]),
            SyncConfig::default(),
        );
        view.update(|vm| vm.replace_reports(vec![report_at("a", 1.0, 2.1)]));
        let before = view.snapshot();

        assert_eq!(session.request(0).await, RouteOutcome::NoPosition);
        assert_eq!(view.snapshot(), before);
        assert_eq!(directions.0.calls(), 0);
    }

    #[tokio::test]
    async fn request_for_missing_index_is_rejected() {
        let (session, view, _) = routing(DelayedDirections::sequence(vec![]), SyncConfig::default());
        seeded(&view);
        assert_eq!(
            session.request(9).await,
            RouteOutcome::UnknownReport { index: 9 }
        );
    }

    #[tokio::test]
    async fn successful_route_sets_details_for_its_index() {
        let (session, view, _) = routing(
            DelayedDirections::sequence(vec![(
                Duration::ZERO,
                Ok(route(vec![(1.0, 2.0), (1.0, 2.05), (1.0, 2.1)], 5230.0, 640.0)),
            )]),
            SyncConfig::default(),
        );
        seeded(&view);

        let outcome = session.request(0).await;

        let expected = RouteDetails {
            distance_km: 5.23,
            duration_minutes: 11,
        };
        assert_eq!(
            outcome,
            RouteOutcome::Applied {
                index: 0,
                details: expected
            }
        );
        let snapshot = view.snapshot();
        assert_eq!(snapshot.route_details(0), Some(&expected));
        assert_eq!(snapshot.active_route().len(), 3);
    }

    #[tokio::test]
    async fn new_route_replaces_polyline_and_keeps_other_details() {
        let (session, view, _) = routing(
            DelayedDirections::sequence(vec![
                (Duration::ZERO, Ok(route(vec![(1.0, 2.0), (1.0, 2.1)], 1000.0, 60.0))),
                (Duration::ZERO, Ok(route(vec![(1.2, 2.2)], 3000.0, 300.0))),
            ]),
            SyncConfig::default(),
        );
        seeded(&view);

        session.request(0).await;
        session.request(1).await;

        let snapshot = view.snapshot();
        assert_eq!(snapshot.active_route(), &[point(1.2, 2.2)]);
        assert_eq!(snapshot.route_details(0).unwrap().distance_km, 1.0);
        assert_eq!(snapshot.route_details(1).unwrap().duration_minutes, 5);
    }

    #[tokio::test]
    async fn failed_route_keeps_previous_route() {
        let (session, view, _) = routing(
            DelayedDirections::sequence(vec![(
                Duration::ZERO,
                Ok(route(vec![(1.0, 2.0), (1.0, 2.1)], 1000.0, 60.0)),
            )]),
            SyncConfig::default(),
        );
        seeded(&view);
        session.request(0).await;
        let before = view.snapshot();

        let outcome = session.request(1).await;

        assert!(matches!(outcome, RouteOutcome::Failed { .. }));
        assert_eq!(view.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_requests_last_completion_wins() {
        let (session, view, _) = routing(
            DelayedDirections::sequence(vec![
                (
                    Duration::from_millis(3_000),
                    Ok(route(vec![(1.0, 2.0), (1.0, 2.1)], 1000.0, 60.0)),
                ),
                (
                    Duration::from_millis(500),
                    Ok(route(vec![(1.2, 2.2)], 3000.0, 300.0)),
                ),
            ]),
            SyncConfig::default(),
        );
        seeded(&view);

        let slow = session.spawn_request(0);
        tokio::time::sleep(Duration::from_millis(10)).await;
        let fast = session.spawn_request(1);

        assert!(matches!(fast.await.unwrap(), RouteOutcome::Applied { index: 1, .. }));
        assert!(matches!(slow.await.unwrap(), RouteOutcome::Applied { index: 0, .. }));

        let snapshot = view.snapshot();
        assert_eq!(snapshot.active_route(), &[point(1.0, 2.0), point(1.0, 2.1)]);
        assert_eq!(snapshot.route_details_by_index().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out_as_unavailable() {
        let (session, view, _) = routing(
            DelayedDirections::sequence(vec![(
                Duration::from_millis(60_000),
                Ok(route(vec![(1.0, 2.0)], 1000.0, 60.0)),
            )]),
            SyncConfig {
                directions_timeout_ms: 15_000,
                ..SyncConfig::default()
            },
        );
        seeded(&view);

        let outcome = session.request(0).await;

        assert!(matches!(
            outcome,
            RouteOutcome::Failed { ref reason } if reason.starts_with("routing unavailable")
        ));
        assert!(view.snapshot().active_route().is_empty());
    }

    #[tokio::test]
    async fn result_after_seal_is_discarded() {
        let (session, view, _) = routing(
            DelayedDirections::sequence(vec![(
                Duration::ZERO,
                Ok(route(vec![(1.0, 2.0)], 1000.0, 60.0)),
            )]),
            SyncConfig::default(),
        );
        seeded(&view);
        let before = view.snapshot();
        view.seal();

        assert_eq!(session.request(0).await, RouteOutcome::Discarded);
        assert_eq!(view.snapshot(), before);
        assert_ne!(before, ViewModel::new());
    }
}
