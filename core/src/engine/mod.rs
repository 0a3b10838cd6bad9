pub mod routing;
pub mod session;
pub mod state;
pub mod sync_loop;

pub use routing::{RouteOutcome, RoutingSession};
pub use session::{DashboardSession, SessionServices};
pub use state::ViewHandle;
pub use sync_loop::{SyncHandle, SyncLoop, SyncSources, SyncState, TickOutcome};
