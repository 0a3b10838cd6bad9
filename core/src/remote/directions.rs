use crate::model::{Coordinate, RouteProfile, RouteResult};
use crate::prelude::{DirectionsProvider, SyncError, SyncResult};
use crate::remote::wire::DirectionsBody;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_DIRECTIONS_URL: &str = "https://us1.locationiq.com/v1/directions";

/// Directions client for LocationIQ/OSRM-style services.
#[derive(Debug, Clone)]
pub struct HttpDirections {
    client: Client,
    base_url: String,
    access_key: String,
}

impl HttpDirections {
    pub fn new(
        base_url: impl Into<String>,
        access_key: impl Into<String>,
        request_timeout: Duration,
    ) -> SyncResult<Self> {
        let client = Client::builder().timeout(request_timeout).build().map_err(|err| {
            SyncError::RoutingUnavailable(format!("building HTTP client: {}", err))
        })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
        })
    }

    /// Path form is `{profile}/{lng},{lat};{lng},{lat}`.
    fn route_url(&self, from: Coordinate, to: Coordinate, profile: RouteProfile) -> String {
        format!(
            "{}/{}/{},{};{},{}",
            self.base_url,
            profile.as_str(),
            from.longitude(),
            from.latitude(),
            to.longitude(),
            to.latitude()
        )
    }
}

#[async_trait]
impl DirectionsProvider for HttpDirections {
    async fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        profile: RouteProfile,
    ) -> SyncResult<RouteResult> {
        let body = self
            .client
            .get(self.route_url(from, to, profile))
            .query(&[
                ("key", self.access_key.as_str()),
                ("steps", "true"),
                ("geometries", "polyline"),
                ("overview", "full"),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| SyncError::RoutingUnavailable(err.to_string()))?
            .json::<DirectionsBody>()
            .await
            .map_err(|err| SyncError::RoutingUnavailable(err.to_string()))?;
        body.into_route()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_url_orders_longitude_first() {
        let directions =
            HttpDirections::new(DEFAULT_DIRECTIONS_URL, "test-key", Duration::from_secs(1))
                .unwrap();
        let from = Coordinate::new(1.0, 2.0).unwrap();
        let to = Coordinate::new(1.0, 2.1).unwrap();
        assert_eq!(
            directions.route_url(from, to, RouteProfile::Driving),
            "https://us1.locationiq.com/v1/directions/driving/2,1;2.1,1"
        );
    }
}
