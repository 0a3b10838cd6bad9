use log::{debug, info, warn};

/// Per-component log handle; every line carries the component as its target.
#[derive(Debug, Clone, Copy)]
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn record(&self, message: &str) {
        info!(target: self.target, "{}", message);
    }

    pub fn trace_state(&self, message: &str) {
        debug!(target: self.target, "{}", message);
    }

    /// Swallowed failures land here; none of them stop the session.
    pub fn failure(&self, message: &str) {
        warn!(target: self.target, "{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("fieldcore")
    }
}
