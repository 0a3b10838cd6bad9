use crate::model::Coordinate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub enum RouteProfile {
    #[default]
    Driving,
}

impl RouteProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteProfile::Driving => "driving",
        }
    }
}

/// Decoded route in display units.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteResult {
    pub polyline: Vec<Coordinate>,
    pub distance_km: f64,
    pub duration_minutes: u64,
}

/// Distance/ETA kept per report index after a route request.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RouteDetails {
    pub distance_km: f64,
    pub duration_minutes: u64,
}

impl RouteResult {
    /// Converts provider units (meters, seconds) into kilometers with two
    /// decimals and whole minutes.
    pub fn from_provider_units(polyline: Vec<Coordinate>, meters: f64, seconds: f64) -> Self {
        Self {
            polyline,
            distance_km: meters_to_km(meters),
            duration_minutes: seconds_to_minutes(seconds),
        }
    }

    pub fn details(&self) -> RouteDetails {
        RouteDetails {
            distance_km: self.distance_km,
            duration_minutes: self.duration_minutes,
        }
    }
}

fn meters_to_km(meters: f64) -> f64 {
    (meters.max(0.0) / 10.0).round() / 100.0
}

fn seconds_to_minutes(seconds: f64) -> u64 {
    (seconds.max(0.0) / 60.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_units_are_rounded_for_display() {
        let route = RouteResult::from_provider_units(Vec::new(), 5230.0, 640.0);
        assert_eq!(route.distance_km, 5.23);
        assert_eq!(route.duration_minutes, 11);
    }

    #[test]
    fn short_hops_round_down() {
        let route = RouteResult::from_provider_units(Vec::new(), 4.0, 29.0);
        assert_eq!(route.distance_km, 0.0);
        assert_eq!(route.duration_minutes, 0);
        assert_eq!(RouteProfile::default().as_str(), "driving");
    }
}
