use crate::model::{Coordinate, Notification, Report, TeamId};
use crate::prelude::{LocationSink, NotificationStore, ReportStore, SyncError, SyncResult};
use crate::remote::wire::{ConfirmedReportsBody, LocationUpdate, NotificationsBody};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Client for the dashboard backend (`/api/...` endpoints).
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| SyncError::ReportFetch(format!("building HTTP client: {}", err)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

#[async_trait]
impl ReportStore for HttpBackend {
    async fn fetch_confirmed(&self) -> SyncResult<Vec<Report>> {
        let body = self
            .client
            .get(self.endpoint("confirmedReports"))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| SyncError::ReportFetch(err.to_string()))?
            .json::<ConfirmedReportsBody>()
            .await
            .map_err(|err| SyncError::ReportFetch(err.to_string()))?;
        Ok(body.into_reports())
    }
}

#[async_trait]
impl NotificationStore for HttpBackend {
    async fn fetch_for(&self, team: &TeamId) -> SyncResult<Vec<Notification>> {
        let body = self
            .client
            .get(self.endpoint(&format!("notifications/{}", team)))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| SyncError::NotificationFetch(err.to_string()))?
            .json::<NotificationsBody>()
            .await
            .map_err(|err| SyncError::NotificationFetch(err.to_string()))?;
        Ok(body.into_notifications())
    }
}

#[async_trait]
impl LocationSink for HttpBackend {
    async fn update_location(&self, team: &TeamId, position: Coordinate) -> SyncResult<()> {
        let update = LocationUpdate {
            latitude: position.latitude(),
            longitude: position.longitude(),
            team_id: team.as_str(),
        };
        self.client
            .post(self.endpoint("updateLocation"))
            .json(&update)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| SyncError::LocationSink(err.to_string()))?;
        Ok(())
    }
}
