use anyhow::{bail, Context};
use async_trait::async_trait;
use fieldcore::prelude::{PositionSource, SyncError, SyncResult};
use fieldcore::Coordinate;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

const METERS_PER_DEGREE: f64 = 111_320.0;

/// Settings for the simulated device fix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// Maximum per-fix movement along each axis, in meters.
    pub drift_m: f64,
    /// Probability in [0, 1] that a fix is unavailable.
    pub dropout: f64,
    pub seed: u64,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            latitude: -1.2921,
            longitude: 36.8219,
            drift_m: 25.0,
            dropout: 0.0,
            seed: 0,
        }
    }
}

struct WalkState {
    rng: StdRng,
    current: Coordinate,
}

/// Seeded random walk standing in for device geolocation.
pub struct SimulatedPosition {
    state: Mutex<WalkState>,
    drift_m: f64,
    dropout: f64,
}

impl SimulatedPosition {
    pub fn new(config: &PositionConfig) -> anyhow::Result<Self> {
        let origin = Coordinate::new(config.latitude, config.longitude)
            .context("validating simulated position origin")?;
        if !(0.0..=1.0).contains(&config.dropout) {
            bail!("position dropout {} must be within [0, 1]", config.dropout);
        }
        if !config.drift_m.is_finite() || config.drift_m < 0.0 {
            bail!("position drift {} must be a non-negative distance", config.drift_m);
        }

        Ok(Self {
            state: Mutex::new(WalkState {
                rng: StdRng::seed_from_u64(config.seed),
                current: origin,
            }),
            drift_m: config.drift_m,
            dropout: config.dropout,
        })
    }

    fn step(&self) -> SyncResult<Coordinate> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| SyncError::LocationUnavailable("position simulator poisoned".into()))?;

        if self.dropout > 0.0 && state.rng.gen_bool(self.dropout) {
            return Err(SyncError::LocationUnavailable("simulated dropout".into()));
        }

        if self.drift_m > 0.0 {
            let north = state.rng.gen_range(-self.drift_m..=self.drift_m);
            let east = state.rng.gen_range(-self.drift_m..=self.drift_m);
            let current = state.current;

            let latitude = (current.latitude() + north / METERS_PER_DEGREE).clamp(-90.0, 90.0);
            let meters_per_lon_degree = (METERS_PER_DEGREE * latitude.to_radians().cos()).max(1.0);
            let mut longitude = current.longitude() + east / meters_per_lon_degree;
            if longitude > 180.0 {
                longitude -= 360.0;
            } else if longitude < -180.0 {
                longitude += 360.0;
            }
            state.current = Coordinate::new(latitude, longitude)?;
        }

        Ok(state.current)
    }
}

#[async_trait]
impl PositionSource for SimulatedPosition {
    async fn acquire(&self) -> SyncResult<Coordinate> {
        self.step()
    }
}
