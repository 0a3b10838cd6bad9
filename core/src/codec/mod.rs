pub mod polyline;

pub use polyline::PolylineError;
