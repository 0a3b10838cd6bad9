//! Location, report and routing-state engine for the response-team dashboard.
//!
//! A [`engine::DashboardSession`] polls the team position and the confirmed
//! report set on a fixed period, computes routes on demand, and merges all
//! of it into one [`model::ViewModel`] that presentation layers read.

pub mod codec;
pub mod engine;
pub mod model;
pub mod prelude;
pub mod remote;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{DashboardSession, RouteOutcome, SessionServices, ViewHandle};
pub use model::{Coordinate, Report, RouteResult, TeamId, ViewModel};
pub use prelude::{SyncConfig, SyncError, SyncResult};
