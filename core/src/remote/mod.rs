//! HTTP clients for the dashboard backend and the directions service.

pub mod directions;
pub mod http;
mod wire;

pub use directions::HttpDirections;
pub use http::HttpBackend;
