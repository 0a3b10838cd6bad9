use crate::generator::position::PositionConfig;
use anyhow::Context;
use fieldcore::prelude::SyncConfig;
use fieldcore::remote::directions::DEFAULT_DIRECTIONS_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const DIRECTIONS_KEY_ENV: &str = "FIELDOPS_DIRECTIONS_KEY";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub team_id: String,
    pub api_base: String,
    pub directions_url: String,
    pub directions_key: Option<String>,
    pub request_timeout_ms: u64,
    pub bind: SocketAddr,
    pub sync: SyncConfig,
    pub position: PositionConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            team_id: "team-1".into(),
            api_base: "http://127.0.0.1:5000".into(),
            directions_url: DEFAULT_DIRECTIONS_URL.into(),
            directions_key: None,
            request_timeout_ms: 10_000,
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
            sync: SyncConfig::default(),
            position: PositionConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dashboard config {}", path_ref.display()))?;
        let config: DashboardConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing dashboard config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(team_id: String, api_base: String, poll_interval_ms: u64) -> Self {
        Self {
            team_id,
            api_base,
            sync: SyncConfig {
                poll_interval_ms,
                ..SyncConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }

    /// Configured key, else the environment. Empty when neither is set.
    pub fn directions_key(&self) -> String {
        self.directions_key
            .clone()
            .or_else(|| std::env::var(DIRECTIONS_KEY_ENV).ok())
            .unwrap_or_default()
    }
}
