pub mod coordinate;
pub mod notification;
pub mod report;
pub mod route;
pub mod team;
pub mod view;

pub use coordinate::Coordinate;
pub use notification::Notification;
pub use report::{MediaKind, Report, ReportKind};
pub use route::{RouteDetails, RouteProfile, RouteResult};
pub use team::TeamId;
pub use view::ViewModel;
