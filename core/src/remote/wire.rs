use crate::codec::polyline::{self, DIRECTIONS_PRECISION};
use crate::model::{Coordinate, Notification, Report, ReportKind, RouteResult};
use crate::prelude::{SyncError, SyncResult};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct ConfirmedReportsBody {
    #[serde(default)]
    pub complaints: Vec<ReportRecord>,
    #[serde(default)]
    pub emergencies: Vec<ReportRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ReportRecord {
    #[serde(default, alias = "id", alias = "_id")]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub emergency_type: Option<String>,
    #[serde(default)]
    pub complaint_type: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotificationsBody {
    #[serde(default)]
    pub notifications: Vec<NotificationRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotificationRecord {
    pub id: Value,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LocationUpdate<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub team_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsBody {
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RouteRecord {
    pub geometry: String,
    pub distance: f64,
    pub duration: f64,
}

fn value_to_id(value: Value) -> String {
    match value {
        Value::String(id) => id,
        other => other.to_string(),
    }
}

/// Backends emit coordinates as JSON numbers or as decimal strings.
fn parse_degrees(field: &str, value: Option<&Value>) -> SyncResult<f64> {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        SyncError::InvalidCoordinate(format!(
            "{} is not a number: {}",
            field,
            value.map_or_else(|| "missing".to_string(), Value::to_string)
        ))
    })
}

impl ReportRecord {
    fn into_report(self, kind: ReportKind, position: usize) -> SyncResult<Report> {
        let latitude = parse_degrees("Latitude", self.latitude.as_ref())?;
        let longitude = parse_degrees("Longitude", self.longitude.as_ref())?;
        let location = Coordinate::new(latitude, longitude)?;
        let category = match kind {
            ReportKind::Emergency => self.emergency_type,
            ReportKind::Complaint => self.complaint_type,
        }
        .unwrap_or_default();
        let id = self
            .id
            .map(value_to_id)
            .unwrap_or_else(|| format!("{}-{}", kind.label(), position));

        Ok(Report {
            id,
            name: self.name,
            address: self.address,
            kind,
            category,
            location,
            media_url: self.media_url.filter(|url| !url.is_empty()),
        })
    }
}

impl ConfirmedReportsBody {
    /// Flattens both collections, emergencies first. Records with unusable
    /// coordinates are dropped individually.
    pub(crate) fn into_reports(self) -> Vec<Report> {
        let emergencies = self
            .emergencies
            .into_iter()
            .enumerate()
            .map(|(position, record)| (ReportKind::Emergency, position, record));
        let complaints = self
            .complaints
            .into_iter()
            .enumerate()
            .map(|(position, record)| (ReportKind::Complaint, position, record));

        emergencies
            .chain(complaints)
            .filter_map(|(kind, position, record)| {
                match record.into_report(kind, position) {
                    Ok(report) => Some(report),
                    Err(err) => {
                        warn!("skipping {} #{}: {}", kind.label(), position, err);
                        None
                    }
                }
            })
            .collect()
    }
}

impl NotificationsBody {
    pub(crate) fn into_notifications(self) -> Vec<Notification> {
        self.notifications
            .into_iter()
            .map(|record| Notification::new(value_to_id(record.id), record.message))
            .collect()
    }
}

impl DirectionsBody {
    /// Uses the first route only.
    pub(crate) fn into_route(self) -> SyncResult<RouteResult> {
        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::RoutingUnavailable("no routes returned".into()))?;

        if !route.distance.is_finite() || !route.duration.is_finite() {
            return Err(SyncError::RoutingUnavailable(
                "route carries non-finite distance or duration".into(),
            ));
        }

        let points = polyline::decode(&route.geometry, DIRECTIONS_PRECISION)
            .map_err(|err| SyncError::RoutingUnavailable(err.to_string()))?;
        let polyline = points
            .into_iter()
            .map(|(latitude, longitude)| Coordinate::new(latitude, longitude))
            .collect::<SyncResult<Vec<_>>>()
            .map_err(|err| SyncError::RoutingUnavailable(err.to_string()))?;

        Ok(RouteResult::from_provider_units(
            polyline,
            route.distance,
            route.duration,
        ))
    }
}
