use crate::model::{Coordinate, Notification, Report, RouteDetails, RouteResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate state consumed by the presentation layer.
///
/// `position` and `reports` are overwritten wholesale by each poll tick.
/// `active_route` holds only the most recent route while `route_details`
/// accumulates per report index.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ViewModel {
    position: Option<Coordinate>,
    reports: Vec<Report>,
    active_route: Vec<Coordinate>,
    route_details: BTreeMap<usize, RouteDetails>,
    notifications: Vec<Notification>,
    notifications_open: bool,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<Coordinate> {
        self.position
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn active_route(&self) -> &[Coordinate] {
        &self.active_route
    }

    pub fn route_details(&self, index: usize) -> Option<&RouteDetails> {
        self.route_details.get(&index)
    }

    pub fn route_details_by_index(&self) -> &BTreeMap<usize, RouteDetails> {
        &self.route_details
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn notifications_open(&self) -> bool {
        self.notifications_open
    }

    pub fn set_position(&mut self, position: Coordinate) {
        self.position = Some(position);
    }

    pub fn replace_reports(&mut self, reports: Vec<Report>) {
        self.reports = reports;
    }

    /// Replaces the drawn polyline and upserts the details for `index`.
    pub fn apply_route(&mut self, index: usize, route: RouteResult) {
        let details = route.details();
        self.active_route = route.polyline;
        self.route_details.insert(index, details);
    }

    pub fn set_notifications(&mut self, notifications: Vec<Notification>) {
        self.notifications = notifications;
    }

    pub fn open_notifications(&mut self) {
        self.notifications_open = true;
    }

    pub fn close_notifications(&mut self) {
        self.notifications_open = false;
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
        self.close_notifications();
    }
}
